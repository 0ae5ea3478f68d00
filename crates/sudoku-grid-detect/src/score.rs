use crate::hypothesis::LineGrid;
use std::cmp::Ordering;
use sudoku_grid_core::{points_on_line_fragment, GrayImageView};

/// Re-scores candidate grids against pixel evidence.
///
/// Each grid contributes its twenty clipped fragments; every binary pixel a
/// fragment passes through adds `1 / fragment_length`, which normalizes the
/// evidence per pixel of fragment. The grid score becomes
/// `prior · evidence / 20` and the grids are re-sorted, best first.
pub fn evaluate_grids(binary: &GrayImageView<'_>, mut grids: Vec<LineGrid>) -> Vec<LineGrid> {
    let width = binary.width as i64;
    let height = binary.height as i64;

    for grid in &mut grids {
        let fragments = grid.fragments();

        let mut evidence = 0.0;
        for fragment in &fragments {
            let length = fragment.length();
            if length == 0.0 {
                continue;
            }

            let value = 1.0 / length;
            for point in points_on_line_fragment(fragment) {
                if point.x < 0 || point.x >= width || point.y < 0 || point.y >= height {
                    continue;
                }
                if binary.data[point.y as usize * binary.width + point.x as usize] != 0 {
                    evidence += value;
                }
            }
        }

        grid.score = grid.score * evidence / fragments.len() as f64;
    }

    grids.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    grids
}
