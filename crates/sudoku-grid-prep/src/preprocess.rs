use crate::threshold::{adaptive_threshold, ThresholdError, ThresholdKind};
use log::debug;
use sudoku_grid_core::{GrayImage, GrayImageView};

/// Odd window size derived from the larger image dimension.
pub fn window_size(width: usize, height: usize, divider: usize) -> usize {
    let max_dim = width.max(height);
    let mut window = max_dim / divider;
    if window % 2 == 0 {
        window += 1;
    }
    window
}

/// Initial threshold producing a binary image: inverted compare against a
/// local mean over ~1/10 of the image.
pub fn binarize(src: &GrayImageView<'_>) -> Result<GrayImage, ThresholdError> {
    let window = window_size(src.width, src.height, 10);
    adaptive_threshold(src, 255, ThresholdKind::BinaryInv, (window as i64 - 1) / 2, 0)
}

/// Strips the body of regions wider than ~1/20 of the image. The negative
/// delta biases the compare so that only thin strokes stay above the local
/// mean.
pub fn remove_blob_bodies(src: &GrayImageView<'_>) -> Result<GrayImage, ThresholdError> {
    let window = window_size(src.width, src.height, 20);
    adaptive_threshold(
        src,
        255,
        ThresholdKind::Binary,
        (window as i64 - 1) / 2,
        -128,
    )
}

/// Prepares a grayscale image for line extraction:
/// threshold to a binary image, then remove large filled areas.
pub fn preprocess(gray: &GrayImageView<'_>) -> Result<GrayImage, ThresholdError> {
    let binary = binarize(gray)?;
    let deblobbed = remove_blob_bodies(&binary.view())?;
    debug!(
        "preprocessed {}x{} image, {} binary pixels",
        gray.width,
        gray.height,
        deblobbed.data.iter().filter(|&&v| v != 0).count()
    );
    Ok(deblobbed)
}
