use crate::line::PointF;
use nalgebra::{Matrix3, SMatrix, SVector};

/// 3×3 projective transform with `h33 ≡ 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    pub h: Matrix3<f64>,
}

impl Homography {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }

    /// Apply the projective map: divide the affine part by the scale row.
    #[inline]
    pub fn project(&self, x: f64, y: f64) -> (f64, f64) {
        let scale = self.h[(2, 0)] * x + self.h[(2, 1)] * y + self.h[(2, 2)];
        (
            (self.h[(0, 0)] * x + self.h[(0, 1)] * y + self.h[(0, 2)]) / scale,
            (self.h[(1, 0)] * x + self.h[(1, 1)] * y + self.h[(1, 2)]) / scale,
        )
    }
}

/// Solve the eight-unknown system mapping four source corners onto four
/// destination corners (in matching order).
///
/// For each correspondence (x,y) → (u,v):
/// `h11·x + h12·y + h13 − u·h31·x − u·h32·y = u`
/// `h21·x + h22·y + h23 − v·h31·x − v·h32·y = v`
///
/// The four u-rows come first, then the four v-rows. Returns `None` when the
/// correspondences are degenerate.
pub fn homography_from_corners(src: &[PointF; 4], dst: &[PointF; 4]) -> Option<Homography> {
    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();

    for i in 0..4 {
        a[(i, 0)] = src[i].x;
        a[(i, 1)] = src[i].y;
        a[(i, 2)] = 1.0;
        a[(i, 6)] = -src[i].x * dst[i].x;
        a[(i, 7)] = -src[i].y * dst[i].x;
        b[i] = dst[i].x;

        a[(i + 4, 3)] = src[i].x;
        a[(i + 4, 4)] = src[i].y;
        a[(i + 4, 5)] = 1.0;
        a[(i + 4, 6)] = -src[i].x * dst[i].y;
        a[(i + 4, 7)] = -src[i].y * dst[i].y;
        b[i + 4] = dst[i].y;
    }

    let x = a.lu().solve(&b)?;

    Some(Homography::new(Matrix3::new(
        x[0], x[1], x[2], //
        x[3], x[4], x[5], //
        x[6], x[7], 1.0,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn corners_map_onto_their_counterparts() {
        let src = [
            PointF::new(54.0, 64.0),
            PointF::new(368.0, 52.0),
            PointF::new(391.0, 391.0),
            PointF::new(27.0, 387.0),
        ];
        let dst = [
            PointF::new(0.0, 0.0),
            PointF::new(420.0, 0.0),
            PointF::new(420.0, 420.0),
            PointF::new(0.0, 420.0),
        ];

        let proj = homography_from_corners(&src, &dst).expect("solvable system");

        for (s, d) in src.iter().zip(&dst) {
            let (x, y) = proj.project(s.x, s.y);
            assert_abs_diff_eq!(d.x, x, epsilon = 0.001);
            assert_abs_diff_eq!(d.y, y, epsilon = 0.001);
        }
    }

    #[test]
    fn translation_is_recovered_exactly() {
        let src = [
            PointF::new(0.0, 0.0),
            PointF::new(100.0, 0.0),
            PointF::new(100.0, 100.0),
            PointF::new(0.0, 100.0),
        ];
        let dst = [
            PointF::new(7.0, -3.0),
            PointF::new(107.0, -3.0),
            PointF::new(107.0, 97.0),
            PointF::new(7.0, 97.0),
        ];

        let proj = homography_from_corners(&src, &dst).expect("solvable system");
        let (x, y) = proj.project(40.0, 60.0);
        assert_abs_diff_eq!(47.0, x, epsilon = 1e-9);
        assert_abs_diff_eq!(57.0, y, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_correspondences_are_rejected() {
        let src = [PointF::new(5.0, 5.0); 4];
        let dst = [
            PointF::new(0.0, 0.0),
            PointF::new(1.0, 0.0),
            PointF::new(1.0, 1.0),
            PointF::new(0.0, 1.0),
        ];
        assert!(homography_from_corners(&src, &dst).is_none());
    }
}
