use image::{Rgb, RgbImage};
use sudoku_grid_core::{points_on_line_fragment, GrayImage};
use sudoku_grid_detect::LineGrid;

const STROKE: Rgb<u8> = Rgb([0, 255, 0]);

/// Composite the twenty grid fragments, stroke width ~2, over a grayscale
/// image promoted to RGB.
pub fn overlay_grid(gray: &GrayImage, grid: &LineGrid) -> RgbImage {
    let (width, height) = (gray.width as u32, gray.height as u32);
    let mut out = RgbImage::from_fn(width, height, |x, y| {
        let g = gray.get(x as usize, y as usize);
        Rgb([g, g, g])
    });

    for fragment in grid.fragments() {
        for point in points_on_line_fragment(&fragment) {
            for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                let (px, py) = (point.x + dx, point.y + dy);
                if px >= 0 && py >= 0 && (px as u32) < width && (py as u32) < height {
                    out.put_pixel(px as u32, py as u32, STROKE);
                }
            }
        }
    }

    out
}

impl crate::Sudoku {
    /// The source image with the located grid drawn on top.
    pub fn overlay(&self) -> RgbImage {
        overlay_grid(self.gray(), self.grid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;
    use sudoku_grid_core::PolarLine;

    #[test]
    fn fragments_are_painted_green() {
        let gray = GrayImage::from_raw(100, 100, vec![128; 10_000]).unwrap();
        let distances: Vec<i64> = (0..10).map(|k| k * 10).collect();
        let grid = LineGrid {
            horizontal: distances.iter().map(|&d| PolarLine::new(FRAC_PI_2, d)).collect(),
            vertical: distances.iter().map(|&d| PolarLine::new(0.0, d)).collect(),
            score: 1.0,
        };

        let overlay = overlay_grid(&gray, &grid);
        assert_eq!(STROKE, *overlay.get_pixel(45, 30));
        assert_eq!(STROKE, *overlay.get_pixel(30, 45));
        assert_eq!(Rgb([128, 128, 128]), *overlay.get_pixel(45, 45 + 3));
    }
}
