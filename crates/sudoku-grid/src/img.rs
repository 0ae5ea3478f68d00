use crate::sudoku::Sudoku;
use sudoku_grid_core::{GrayImage, GrayImageView};
use sudoku_grid_detect::{DetectError, GridDetector};

/// Adapt a decoded `image::GrayImage` into the pipeline's borrowed view.
///
/// `image::GrayImage` is already a tightly packed row-major Luma8 buffer, so
/// this is a zero-copy reinterpretation; the view borrows the decoded image
/// for as long as the pipeline reads it.
pub fn gray_view(img: &::image::GrayImage) -> GrayImageView<'_> {
    GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Convert any decoded image into the owned core grayscale buffer.
pub fn gray_from_image(img: &::image::DynamicImage) -> GrayImage {
    let luma = img.to_luma8();
    GrayImage {
        width: luma.width() as usize,
        height: luma.height() as usize,
        data: luma.into_raw(),
    }
}

/// Convert a core grayscale buffer back into an `image::GrayImage`.
///
/// `None` only for dimensions exceeding `u32`.
pub fn image_from_gray(gray: &GrayImage) -> Option<::image::GrayImage> {
    let width = u32::try_from(gray.width).ok()?;
    let height = u32::try_from(gray.height).ok()?;
    ::image::GrayImage::from_raw(width, height, gray.data.clone())
}

/// Locate a sudoku on a decoded image with default parameters.
pub fn find_sudoku(img: &::image::DynamicImage) -> Result<Sudoku, DetectError> {
    find_sudoku_with(img, &GridDetector::default())
}

/// Locate a sudoku on a decoded image with an explicit detector.
pub fn find_sudoku_with(
    img: &::image::DynamicImage,
    detector: &GridDetector,
) -> Result<Sudoku, DetectError> {
    Sudoku::find_with(gray_from_image(img), detector)
}
