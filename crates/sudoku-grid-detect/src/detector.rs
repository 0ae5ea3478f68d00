use crate::hypothesis::{possible_grids, LineGrid};
use crate::score::evaluate_grids;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use sudoku_grid_core::{
    generate_angle_buckets, lines_with_similar_angle, put_lines_into_buckets,
    remove_duplicate_lines, GrayImageView,
};
use sudoku_grid_hough::hough_lines;
use sudoku_grid_prep::{preprocess, ThresholdError};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors returned by the grid detector.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("could not find a sudoku grid on the image")]
    NotRecognised,
    #[error(transparent)]
    Threshold(#[from] ThresholdError),
}

/// Configuration for the grid detector.
///
/// The defaults are the values that work on the repo's example photographs;
/// there is rarely a reason to change anything but the Hough threshold for
/// unusually small or noisy inputs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectorParams {
    /// Minimal Hough vote count for a line to be considered.
    pub hough_threshold: u64,
    /// Keep at most this many strongest lines (0 keeps all).
    pub hough_limit: usize,
    /// Angle bucket width in degrees.
    pub bucket_size_deg: u32,
    /// Anchor spacing in degrees; half the bucket width gives 50% overlap.
    pub bucket_step_deg: u32,
    /// Buckets with fewer lines cannot describe a 9×9 grid and are skipped.
    pub min_bucket_lines: usize,
    /// Minimal lines on each axis half of a bucket.
    pub min_axis_lines: usize,
    /// How many line groupings per axis to pair into grids.
    pub top_groups: usize,
}

impl Default for DetectorParams {
    fn default() -> Self {
        let bucket_size = 90 / 5;
        Self {
            hough_threshold: 80,
            hough_limit: 200,
            bucket_size_deg: bucket_size,
            bucket_step_deg: bucket_size / 2,
            min_bucket_lines: 20,
            min_axis_lines: 10,
            top_groups: 3,
        }
    }
}

/// Locates the ten-by-ten line grid of a sudoku on a photograph.
#[derive(Clone, Debug, Default)]
pub struct GridDetector {
    params: DetectorParams,
}

impl GridDetector {
    pub fn new(params: DetectorParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// Run the full pipeline on a grayscale image: preprocess to a binary
    /// image, extract lines and search them for the best grid.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, gray), fields(width = gray.width, height = gray.height))
    )]
    pub fn detect(&self, gray: &GrayImageView<'_>) -> Result<LineGrid, DetectError> {
        let binary = preprocess(gray)?;
        self.detect_in_binary(&binary.view())
    }

    /// Search a binary image (nonzero = evidence) for the best grid.
    pub fn detect_in_binary(&self, binary: &GrayImageView<'_>) -> Result<LineGrid, DetectError> {
        let p = &self.params;

        let lines = hough_lines(binary, None, p.hough_threshold, p.hough_limit);
        let lines = remove_duplicate_lines(&lines, binary.width as i64, binary.height as i64);
        info!("{} lines after duplicate removal", lines.len());

        let buckets = generate_angle_buckets(p.bucket_size_deg, p.bucket_step_deg, true);
        let bucketed = put_lines_into_buckets(&buckets, &lines);

        let mut grids = Vec::new();
        for bucket in &bucketed {
            // Not even enough lines for a 9x9 grid, don't bother.
            if bucket.lines.len() < p.min_bucket_lines {
                continue;
            }

            let (vertical, horizontal) = lines_with_similar_angle(&bucket.lines, bucket.anchor);
            if vertical.len() < p.min_axis_lines || horizontal.len() < p.min_axis_lines {
                continue;
            }

            debug!(
                "bucket at {:.2} rad: {} vertical, {} horizontal lines",
                bucket.anchor,
                vertical.len(),
                horizontal.len()
            );
            grids.extend(possible_grids(&horizontal, &vertical, p.top_groups));
        }

        info!("{} candidate grids before evidence scoring", grids.len());
        let grids = evaluate_grids(binary, grids);

        grids.into_iter().next().ok_or(DetectError::NotRecognised)
    }
}
