use rayon::prelude::*;
use sudoku_grid_core::{GrayImage, GrayImageView};

/// Which side of the local mean wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThresholdKind {
    /// Emit `max_value` where `src > mean − delta`.
    Binary,
    /// Emit `max_value` where `src < mean − delta`.
    BinaryInv,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ThresholdError {
    #[error("invalid mean window (radius {radius})")]
    InvalidWindow { radius: i64 },
}

#[inline]
fn clamp_index(val: i64, max: usize) -> usize {
    if val < 0 {
        return 0;
    }
    if val > max as i64 - 1 {
        return max - 1;
    }
    val as usize
}

/// Horizontal pass of the separable box mean: a running sum of width
/// `2·radius + 1` along each row, clamp-to-edge at both ends. Rows are
/// independent and processed in parallel.
fn mean_horizontal(src: &GrayImageView<'_>, radius: i64) -> GrayImage {
    let (width, height) = (src.width, src.height);
    let norm = (radius * 2 + 1) as f64;
    let mut dst = GrayImage::new(width, height);

    dst.data
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, out_row)| {
            let row = &src.data[y * width..(y + 1) * width];

            let mut total = 0.0;
            for kx in -radius..=radius {
                total += f64::from(row[clamp_index(kx, width)]);
            }
            out_row[0] = (total / norm) as u8;

            for x in 1..width as i64 {
                total -= f64::from(row[clamp_index(x - radius - 1, width)]);
                total += f64::from(row[clamp_index(x + radius, width)]);
                out_row[x as usize] = (total / norm) as u8;
            }
        });

    dst
}

/// Vertical pass: the same running sum over columns of the horizontal-pass
/// result. Columns are computed in parallel and scattered back.
fn mean_vertical(src: &GrayImageView<'_>, radius: i64) -> GrayImage {
    let (width, height) = (src.width, src.height);
    let norm = (radius * 2 + 1) as f64;

    let columns: Vec<Vec<u8>> = (0..width)
        .into_par_iter()
        .map(|x| {
            let mut column = vec![0u8; height];

            let mut total = 0.0;
            for ky in -radius..=radius {
                total += f64::from(src.data[clamp_index(ky, height) * width + x]);
            }
            column[0] = (total / norm) as u8;

            for y in 1..height as i64 {
                total -= f64::from(src.data[clamp_index(y - radius - 1, height) * width + x]);
                total += f64::from(src.data[clamp_index(y + radius, height) * width + x]);
                column[y as usize] = (total / norm) as u8;
            }

            column
        })
        .collect();

    let mut dst = GrayImage::new(width, height);
    for (x, column) in columns.iter().enumerate() {
        for (y, &value) in column.iter().enumerate() {
            dst.set(x, y, value);
        }
    }

    dst
}

/// Per-pixel threshold against a box mean of window `(2·radius + 1)²`.
///
/// The mean is computed separably (horizontal then vertical running sums,
/// normalized each pass), so the result equals a true box mean up to the u8
/// truncation between passes. The output holds `max_value` where the
/// predicate of `kind` holds against `mean − delta`, and 0 elsewhere.
pub fn adaptive_threshold(
    src: &GrayImageView<'_>,
    max_value: u8,
    kind: ThresholdKind,
    radius: i64,
    delta: i64,
) -> Result<GrayImage, ThresholdError> {
    if radius < 0 {
        return Err(ThresholdError::InvalidWindow { radius });
    }
    if src.width == 0 || src.height == 0 {
        return Ok(GrayImage::new(src.width, src.height));
    }

    let mut dst = mean_vertical(&mean_horizontal(src, radius).view(), radius);

    for (out, &src_val) in dst.data.iter_mut().zip(src.data) {
        let mean_val = i64::from(*out) - delta;
        let hit = match kind {
            ThresholdKind::Binary => i64::from(src_val) > mean_val,
            ThresholdKind::BinaryInv => i64::from(src_val) < mean_val,
        };
        *out = if hit { max_value } else { 0 };
    }

    Ok(dst)
}

/// Otsu's global threshold over the whole image.
///
/// Keeps the classic two-threshold averaging: when several splits reach the
/// same between-class variance, the midpoint of the first and last is used.
pub fn otsu_level(img: &GrayImageView<'_>) -> u8 {
    let size = img.data.len() as f64;
    let mut histogram = [0.0f64; 256];
    for &pix in img.data {
        histogram[pix as usize] += 1.0;
    }

    let mut sum = 0.0;
    for (i, val) in histogram.iter().enumerate() {
        sum += i as f64 * val;
    }

    let mut sum_b = 0.0;
    let mut w_b = 0.0;
    let mut max = 0.0;
    let mut threshold1 = 0.0;
    let mut threshold2 = 0.0;

    for (i, val) in histogram.iter().enumerate() {
        w_b += val;
        if w_b == 0.0 {
            continue;
        }

        let w_f = size - w_b;
        if w_f == 0.0 {
            break;
        }
        sum_b += i as f64 * val;

        let m_b = sum_b / w_b;
        let m_f = (sum - sum_b) / w_f;
        let between = w_b * w_f * (m_b - m_f) * (m_b - m_f);
        if between >= max {
            threshold1 = i as f64;
            if between > max {
                threshold2 = i as f64;
            }
            max = between;
        }
    }

    ((threshold1 + threshold2) / 2.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_image(samples: &[u8]) -> GrayImage {
        GrayImage::from_raw(samples.len(), 1, samples.to_vec()).unwrap()
    }

    #[test]
    fn horizontal_mean_clamps_at_edges() {
        let src = row_image(&[10, 20, 30, 40, 50]);
        let mean = mean_horizontal(&src.view(), 1);
        assert_eq!(vec![13, 20, 30, 40, 46], mean.data);
    }

    #[test]
    fn vertical_mean_clamps_at_edges() {
        let src = GrayImage::from_raw(1, 5, vec![10, 20, 30, 40, 50]).unwrap();
        let mean = mean_vertical(&src.view(), 1);
        assert_eq!(vec![13, 20, 30, 40, 46], mean.data);
    }

    #[test]
    fn binary_inv_marks_pixels_below_local_mean() {
        let src = row_image(&[100, 100, 200]);
        let dst = adaptive_threshold(&src.view(), 255, ThresholdKind::BinaryInv, 1, 0).unwrap();
        assert_eq!(vec![0, 255, 0], dst.data);
    }

    #[test]
    fn binary_with_negative_delta_raises_the_bar() {
        let src = row_image(&[100, 100, 200]);
        let dst = adaptive_threshold(&src.view(), 255, ThresholdKind::Binary, 1, -128).unwrap();
        assert_eq!(vec![0, 0, 0], dst.data);

        let src = row_image(&[0, 0, 255, 0, 0]);
        let dst = adaptive_threshold(&src.view(), 255, ThresholdKind::Binary, 1, -128).unwrap();
        // Only the lone bright stroke clears mean + 128.
        assert_eq!(vec![0, 0, 255, 0, 0], dst.data);
    }

    #[test]
    fn negative_radius_is_rejected() {
        let src = row_image(&[1, 2, 3]);
        let err = adaptive_threshold(&src.view(), 255, ThresholdKind::Binary, -1, 0).unwrap_err();
        assert_eq!(ThresholdError::InvalidWindow { radius: -1 }, err);
    }

    #[test]
    fn single_pixel_image_comes_out_blank() {
        let src = row_image(&[77]);
        let dst = adaptive_threshold(&src.view(), 255, ThresholdKind::BinaryInv, 2, 0).unwrap();
        assert_eq!(vec![0], dst.data);
    }

    #[test]
    fn otsu_splits_a_bimodal_image() {
        let mut samples = vec![10u8; 50];
        samples.extend(vec![200u8; 50]);
        let img = GrayImage::from_raw(10, 10, samples).unwrap();
        let level = otsu_level(&img.view());
        assert!((10..200).contains(&level), "level {level}");
    }
}
