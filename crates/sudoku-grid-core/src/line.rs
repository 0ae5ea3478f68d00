use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

const TWO_PI: f64 = 2.0 * PI;

/// A 2D line in polar form: `x·cos θ + y·sin θ = r`.
///
/// `distance` may be negative while a Hough accumulator is being walked; the
/// canonical form emitted to callers has `distance >= 0` with `theta` shifted
/// by π instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PolarLine {
    pub theta: f64,
    pub distance: i64,
    pub count: u64,
}

/// Structured identity of a polar line: θ rounded to 8 decimal places plus
/// the integer distance. Two accumulator cells that collapse to the same key
/// describe the same line.
pub type LineKey = (i64, i64);

impl PolarLine {
    pub fn new(theta: f64, distance: i64) -> Self {
        Self {
            theta,
            distance,
            count: 0,
        }
    }

    #[inline]
    pub fn key(&self) -> LineKey {
        ((self.theta * 1e8).round() as i64, self.distance)
    }
}

impl fmt::Display for PolarLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line{{theta: {:.6}, distance: {}, count: {}}}",
            self.theta, self.distance, self.count
        )
    }
}

/// Integer point in image coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        ((self.x - other.x) as f64).hypot((self.y - other.y) as f64)
    }
}

/// Floating-point point, used only around the homography solve.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<Point> for PointF {
    fn from(p: Point) -> Self {
        Self {
            x: p.x as f64,
            y: p.y as f64,
        }
    }
}

/// Ordered pair of endpoints on the pixel grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineFragment {
    pub start: Point,
    pub end: Point,
}

impl LineFragment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(self.end)
    }
}

/// Whether two angles point roughly the same way (within ~28.6°), treating
/// full turns as equal.
pub fn similar_angles(a: f64, b: f64) -> bool {
    let min_ang_diff = 0.5;

    let mut a = a;
    let mut b = b;
    if a >= TWO_PI || a <= -TWO_PI {
        a -= (a / TWO_PI).floor() * TWO_PI;
    }
    if b >= TWO_PI || b <= -TWO_PI {
        b -= (b / TWO_PI).floor() * TWO_PI;
    }

    let ang_diff = (a - b).abs();
    ang_diff < min_ang_diff || ang_diff > TWO_PI - min_ang_diff
}

/// Intersection of two polar lines.
///
/// Solves
/// `x·cos(θ_a) + y·sin(θ_a) = r_a`
/// `x·cos(θ_b) + y·sin(θ_b) = r_b`
/// and rounds the solution by adding 0.5 and truncating toward zero.
///
/// Returns `None` when the system is singular, i.e. `θ_a ≡ θ_b (mod π)`.
pub fn intersection(line_a: &PolarLine, line_b: &PolarLine) -> Option<Point> {
    let a = Matrix2::new(
        line_a.theta.cos(),
        line_a.theta.sin(),
        line_b.theta.cos(),
        line_b.theta.sin(),
    );
    let b = Vector2::new(line_a.distance as f64, line_b.distance as f64);

    let x = a.lu().solve(&b)?;

    Some(Point {
        x: (x[0] + 0.5) as i64,
        y: (x[1] + 0.5) as i64,
    })
}

/// Drop lines that duplicate an earlier one: similar angle and either nearly
/// the same distance or crossing the other line within an extended view box
/// (half the image size beyond every edge). The earlier line of each pair
/// survives and original order is kept.
pub fn remove_duplicate_lines(lines: &[PolarLine], width: i64, height: i64) -> Vec<PolarLine> {
    let min_dist = 3.0;

    let scope = 2;
    let min_x = -width / scope;
    let min_y = -height / scope;
    let max_x = width + width / scope;
    let max_y = height + height / scope;

    let mut to_remove = vec![false; lines.len()];
    for (i, line_a) in lines.iter().enumerate() {
        for (j, line_b) in lines.iter().enumerate().skip(i + 1) {
            if !similar_angles(line_a.theta, line_b.theta) {
                continue;
            }

            if ((line_a.distance - line_b.distance) as f64).abs() < min_dist {
                to_remove[j] = true;
                continue;
            }

            let Some(point) = intersection(line_a, line_b) else {
                continue;
            };

            let in_view = min_x <= point.x && point.x <= max_x && min_y <= point.y && point.y <= max_y;
            if in_view {
                to_remove[j] = true;
            }
        }
    }

    lines
        .iter()
        .zip(&to_remove)
        .filter(|(_, &remove)| !remove)
        .map(|(line, _)| *line)
        .collect()
}

/// Bresenham rasterization of the fragment, endpoints inclusive.
pub fn points_on_line_fragment(fragment: &LineFragment) -> Vec<Point> {
    let (x0, x1) = (fragment.start.x, fragment.end.x);
    let (y0, y1) = (fragment.start.y, fragment.end.y);

    let mut dx = (x1 - x0) as f64;
    let mut sx = 1;
    if dx < 0.0 {
        sx = -1;
        dx = -dx;
    }

    let mut dy = (y1 - y0) as f64;
    let mut sy = 1;
    if dy < 0.0 {
        sy = -1;
        dy = -dy;
    }

    let mut points = Vec::new();
    let (mut x, mut y) = (x0, y0);

    if dx > dy {
        let mut err = dx / 2.0;
        loop {
            points.push(Point { x, y });
            if x == x1 {
                break;
            }

            err -= dy;
            if err < 0.0 {
                y += sy;
                err += dx;
            }
            x += sx;
        }
    } else {
        let mut err = dy / 2.0;
        loop {
            points.push(Point { x, y });
            if y == y1 {
                break;
            }

            err -= dx;
            if err < 0.0 {
                x += sx;
                err += dy;
            }
            y += sy;
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn similar_angles_cases() {
        let cases = [
            (0.0, 0.0, true),
            (0.0, 0.49, true),
            (0.0, 0.50, false),
            (0.0, -0.49, true),
            (0.0, -0.50, false),
            (TWO_PI, 0.0, true),
            (TWO_PI, TWO_PI, true),
            (TWO_PI, 0.49, true),
            (TWO_PI, 0.50, false),
            (TWO_PI, -0.49, true),
            (TWO_PI, -0.50, false),
            (0.0, TWO_PI, true),
            (0.0, TWO_PI + 0.49, true),
            (0.0, TWO_PI + 0.50, false),
            (0.0, TWO_PI - 0.49, true),
            (0.0, TWO_PI - 0.50, false),
            (0.0, 3.0 * PI, false),
            (0.0, 4.0 * PI, true),
            (0.0, 4.0 * PI + 0.49, true),
            (0.0, 4.0 * PI + 0.50, false),
            (0.0, 4.0 * PI - 0.49, true),
            (0.0, 4.0 * PI - 0.50, false),
            (1.0, 1.0, true),
            (1.0, 1.49, true),
            (1.0, 1.50, false),
            (1.0, 1.0 - 0.49, true),
            (1.0, 1.0 - 0.50, false),
            (TWO_PI, 4.0 * PI, true),
            (PI, PI, true),
            (PI / 2.0, PI, false),
        ];

        for (a, b, expected) in cases {
            assert_eq!(
                expected,
                similar_angles(a, b),
                "angles {a} and {b}, expected similar={expected}"
            );
        }
    }

    #[test]
    fn intersection_cases() {
        let cases: [(PolarLine, PolarLine, Option<Point>); 10] = [
            (
                PolarLine::new(0.0, 10),
                PolarLine::new(1.570796, 10),
                Some(Point::new(10, 10)),
            ),
            (
                PolarLine::new(0.0, 10),
                PolarLine::new(0.785398, 148),
                Some(Point::new(10, 199)),
            ),
            (
                PolarLine::new(0.0, 10),
                PolarLine::new(0.453786, 184),
                Some(Point::new(10, 399)),
            ),
            (
                PolarLine::new(0.0, 10),
                PolarLine::new(1.117011, 184),
                Some(Point::new(10, 200)),
            ),
            (
                PolarLine::new(0.0, 10),
                PolarLine::new(0.785398, 290),
                Some(Point::new(10, 400)),
            ),
            (
                PolarLine::new(0.785398, 148),
                PolarLine::new(1.117011, 184),
                Some(Point::new(9, 200)),
            ),
            // Lines that are only almost parallel still intersect, far away.
            (
                PolarLine::new(0.785398, 148),
                PolarLine::new(0.785399, 290),
                Some(Point::new(-100409041, 100409284)),
            ),
            (PolarLine::new(0.0, 10), PolarLine::new(0.0, 20), None),
            (PolarLine::new(0.0, 10), PolarLine::new(0.0, 10), None),
            (
                PolarLine::new(0.785398, 148),
                PolarLine::new(0.785398, 290),
                None,
            ),
        ];

        for (a, b, expected) in cases {
            assert_eq!(
                expected,
                intersection(&a, &b),
                "intersection between {a} and {b}"
            );
        }
    }

    #[test]
    fn point_distance_is_symmetric() {
        let cases = [
            (Point::new(0, 0), Point::new(1, 1), 2.0_f64.sqrt()),
            (Point::new(1, 1), Point::new(2, 2), 2.0_f64.sqrt()),
            (Point::new(0, 0), Point::new(1, 2), 5.0_f64.sqrt()),
            (Point::new(-1, -1), Point::new(1, 1), 8.0_f64.sqrt()),
        ];

        for (a, b, expected) in cases {
            assert_eq!(a.distance_to(b), b.distance_to(a));
            assert_eq!(expected, a.distance_to(b));
        }
    }

    #[test]
    fn removes_duplicates_only_in_view() {
        // Angle too different: both survive.
        let lines = [PolarLine::new(0.0, 10), PolarLine::new(1.570796, 10)];
        assert_eq!(2, remove_duplicate_lines(&lines, 300, 300).len());

        // Similar angle, close distances: middle one wins.
        let lines = [
            PolarLine::new(1.570796, 100),
            PolarLine::new(1.5, 102),
            PolarLine::new(1.5, 98),
        ];
        assert_eq!(1, remove_duplicate_lines(&lines, 300, 300).len());

        // Similar angles crossing inside the extended view box.
        let lines = [PolarLine::new(1.570796, 100), PolarLine::new(1.605703, 104)];
        assert_eq!(1, remove_duplicate_lines(&lines, 300, 300).len());

        // Same pair, smaller image: the crossing falls outside the box.
        assert_eq!(2, remove_duplicate_lines(&lines, 200, 200).len());
    }

    #[test]
    fn bresenham_covers_fragment() {
        let diagonal = LineFragment::new(Point::new(0, 0), Point::new(5, 5));
        let expected: Vec<Point> = (0..=5).map(|i| Point::new(i, i)).collect();
        assert_eq!(expected, points_on_line_fragment(&diagonal));

        let shallow = LineFragment::new(Point::new(0, 1), Point::new(6, 4));
        let expected = vec![
            Point::new(0, 1),
            Point::new(1, 1),
            Point::new(2, 2),
            Point::new(3, 2),
            Point::new(4, 3),
            Point::new(5, 3),
            Point::new(6, 4),
        ];
        assert_eq!(expected, points_on_line_fragment(&shallow));
    }

    #[test]
    fn line_key_rounds_theta_to_8_decimals() {
        let a = PolarLine::new(0.123456789, 5);
        let b = PolarLine::new(0.123456794, 5);
        let c = PolarLine::new(0.123456796, 5);
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
    }
}
