use crate::homography::{homography_from_corners, Homography};
use crate::image::{GrayImage, GrayImageView};
use crate::line::PointF;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Perspective map between two quadrilaterals, with enough bookkeeping to
/// warp whole images.
#[derive(Clone, Copy, Debug)]
pub struct Perspective {
    homography: Homography,
    dst_points: [PointF; 4],
}

impl Perspective {
    /// Solve the homography taking `src` corners onto `dst` corners.
    pub fn from_corners(src: &[PointF; 4], dst: &[PointF; 4]) -> Option<Self> {
        Some(Self {
            homography: homography_from_corners(src, dst)?,
            dst_points: *dst,
        })
    }

    #[inline]
    pub fn project(&self, x: f64, y: f64) -> (f64, f64) {
        self.homography.project(x, y)
    }

    /// Forward-warp `src` into a destination buffer sized by the destination
    /// corners. Every source pixel is projected and written; destination
    /// pixels no source pixel lands on are then filled with the mean of their
    /// already-set 4-neighbors, round after round, until nothing changes.
    pub fn warp(&self, src: &GrayImageView<'_>) -> GrayImage {
        let mut max_x = 0.0f64;
        let mut max_y = 0.0f64;
        for p in &self.dst_points {
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        let dst_w = max_x as usize;
        let dst_h = max_y as usize;
        let mut dst = GrayImage::new(dst_w, dst_h);
        if dst_w == 0 || dst_h == 0 {
            return dst;
        }

        let pixels: Vec<AtomicU8> = (0..dst_w * dst_h).map(|_| AtomicU8::new(0)).collect();
        let mask: Vec<AtomicBool> = (0..dst_w * dst_h).map(|_| AtomicBool::new(false)).collect();

        (0..src.width).into_par_iter().for_each(|x| {
            for y in 0..src.height {
                let (new_x, new_y) = self.project(x as f64, y as f64);
                if new_x < 0.0 || new_x >= max_x || new_y < 0.0 || new_y >= max_y {
                    continue;
                }

                let g = src.data[y * src.width + x];
                let pos = new_y as usize * dst_w + new_x as usize;
                pixels[pos].store(g, Ordering::Relaxed);
                mask[pos].store(true, Ordering::Relaxed);
            }
        });

        dst.data = pixels.into_iter().map(AtomicU8::into_inner).collect();
        let mut mask: Vec<bool> = mask.into_iter().map(AtomicBool::into_inner).collect();

        fill_missing_pixels(&mut dst, &mut mask);
        dst
    }
}

/// Convenience wrapper: warp `src` so that `src_corners` land on
/// `dst_corners`.
pub fn warp_perspective(
    src: &GrayImageView<'_>,
    src_corners: &[PointF; 4],
    dst_corners: &[PointF; 4],
) -> Option<GrayImage> {
    Perspective::from_corners(src_corners, dst_corners).map(|p| p.warp(src))
}

/// Repeated 4-neighbor mean fill over unset pixels. Reads only the previous
/// round's mask, so rows can be scanned in parallel. Stops when a round sets
/// nothing; unreachable pixels stay 0.
fn fill_missing_pixels(img: &mut GrayImage, mask: &mut [bool]) {
    let w = img.width;
    let h = img.height;

    loop {
        let data = &img.data;
        let snapshot: &[bool] = mask;

        let updates: Vec<(usize, u8)> = (0..h)
            .into_par_iter()
            .flat_map_iter(|y| {
                let mut row_updates = Vec::new();
                for x in 0..w {
                    let pos = y * w + x;
                    if snapshot[pos] {
                        continue;
                    }

                    let mut sum = 0u32;
                    let mut cnt = 0u32;

                    if x > 0 && snapshot[pos - 1] {
                        sum += u32::from(data[pos - 1]);
                        cnt += 1;
                    }
                    if x < w - 1 && snapshot[pos + 1] {
                        sum += u32::from(data[pos + 1]);
                        cnt += 1;
                    }
                    if y > 0 && snapshot[pos - w] {
                        sum += u32::from(data[pos - w]);
                        cnt += 1;
                    }
                    if y < h - 1 && snapshot[pos + w] {
                        sum += u32::from(data[pos + w]);
                        cnt += 1;
                    }

                    if cnt != 0 {
                        row_updates.push((pos, (sum / cnt) as u8));
                    }
                }
                row_updates
            })
            .collect();

        if updates.is_empty() {
            return;
        }

        for (pos, value) in updates {
            img.data[pos] = value;
            mask[pos] = true;
        }

        if mask.iter().all(|&m| m) {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> [PointF; 4] {
        [
            PointF::new(0.0, 0.0),
            PointF::new(size, 0.0),
            PointF::new(size, size),
            PointF::new(0.0, size),
        ]
    }

    #[test]
    fn upscaling_fills_every_destination_pixel() {
        let src = GrayImage::from_raw(4, 4, vec![200; 16]).unwrap();
        let warped = warp_perspective(&src.view(), &square(4.0), &square(8.0)).unwrap();

        assert_eq!(8, warped.width);
        assert_eq!(8, warped.height);
        assert!(warped.data.iter().all(|&v| v == 200));
    }

    #[test]
    fn skewed_quad_is_rectified_to_square() {
        let mut src = GrayImage::new(40, 40);
        for y in 8..32 {
            for x in 10..34 {
                src.set(x, y, 180);
            }
        }

        let quad = [
            PointF::new(10.0, 8.0),
            PointF::new(33.0, 8.0),
            PointF::new(33.0, 31.0),
            PointF::new(10.0, 31.0),
        ];
        let warped = warp_perspective(&src.view(), &quad, &square(20.0)).unwrap();

        assert_eq!(20, warped.width);
        assert_eq!(20, warped.height);
        // Interior of the warped patch carries the patch value.
        for y in 2..18 {
            for x in 2..18 {
                assert_eq!(180, warped.get(x, y), "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn empty_destination_yields_empty_image() {
        let src = GrayImage::from_raw(4, 4, vec![50; 16]).unwrap();
        let dst = [
            PointF::new(0.0, 0.0),
            PointF::new(0.0, 0.0),
            PointF::new(0.0, 0.0),
            PointF::new(0.0, 0.0),
        ];
        assert!(Perspective::from_corners(&square(4.0), &dst).is_none());
    }
}
