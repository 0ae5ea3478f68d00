use crate::hypothesis::ScoredLines;
use sudoku_grid_core::{intersection, Point, PolarLine};

/// For every integer index `c` up to the last position, the input position
/// closest to `c` (ties go to the smaller position). A single forward walk
/// suffices because the positions are ascending.
pub(crate) fn prepare_point_distances(positions: &[f64]) -> Vec<f64> {
    let max_pos = positions[positions.len() - 1];
    let ld = max_pos as usize + 1;

    let mut closest = Vec::with_capacity(ld);
    let mut pos_i = 0;
    for c in 0..ld {
        let d1 = (positions[pos_i] - c as f64).abs();
        let d2 = if pos_i + 1 < positions.len() {
            (positions[pos_i + 1] - c as f64).abs()
        } else {
            ld as f64
        };

        if d1 <= d2 {
            closest.push(positions[pos_i]);
        } else {
            closest.push(positions[pos_i + 1]);
            pos_i += 1;
        }
    }

    closest
}

/// Walk the ideal ten positions, snapping each to the nearest observed one.
/// A snap whose gap deviates from the ideal step by 20% or more aborts the
/// candidate. The fit score is `1 − Σ deviation/9`, so a perfect run scores
/// 1.0.
pub(crate) fn point_similarities(expected: &[f64], distances: &[f64]) -> (f64, Vec<f64>) {
    let mut fit = 0.0;
    let mut matches: Vec<f64> = Vec::new();

    let step = expected[1] - expected[0];
    for &exp in expected {
        let point = distances[exp as usize];
        if let Some(&prev) = matches.last() {
            let f = ((point - prev).abs() - step).abs() / step;
            if f >= 0.2 {
                break;
            }
            fit += f / 9.0;
        }

        matches.push(point);
    }

    (1.0 - fit, matches)
}

/// Splits `lines` into groups of 10 scored by how linearly they are spaced
/// along `divider_line`.
///
/// The lines are cut by the divider, each reduced to its 1-D distance from
/// the first intersection, and every pair at least nine apart is tried as the
/// endpoints of an evenly spaced ten-tuple.
pub fn linear_distances(lines: &[PolarLine], divider_line: &PolarLine) -> Vec<ScoredLines> {
    let mut matches = Vec::new();

    let lines_count = lines.len();
    if lines_count < 10 {
        return matches;
    }

    let mut lines = lines.to_vec();
    lines.sort_by_key(|l| l.distance);

    let intersections: Vec<Point> = lines
        .iter()
        .map(|line| intersection(line, divider_line).unwrap_or_default())
        .collect();

    let points: Vec<f64> = intersections
        .iter()
        .map(|point| intersections[0].distance_to(*point))
        .collect();

    let distances = prepare_point_distances(&points);

    let mut expected_points = [0.0f64; 10];

    for i in 0..=lines_count - 10 {
        let d_i = i + 10 - 1;
        for j in d_i..lines_count {
            let (start, end) = (points[i], points[j]);
            let step = (end - start) / 9.0;
            for (k, slot) in expected_points.iter_mut().enumerate() {
                *slot = start + step * k as f64;
            }

            let (score, selected_points) = point_similarities(&expected_points, &distances);
            if selected_points.len() != 10 {
                continue;
            }

            let group: Vec<PolarLine> = selected_points
                .iter()
                .map(|&sel| lines[points.partition_point(|&p| p < sel)])
                .collect();

            matches.push(ScoredLines {
                lines: group,
                score,
            });
        }
    }

    matches
}
