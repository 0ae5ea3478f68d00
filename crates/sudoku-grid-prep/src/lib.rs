//! Image preprocessing for sudoku grid detection.
//!
//! Two adaptive passes at different scales turn a grayscale photograph into a
//! binary image carrying line-like evidence: a coarse inverted threshold
//! binarizes against local illumination, a finer biased pass strips the
//! bodies of wide filled regions so only thin strokes remain.

mod preprocess;
mod threshold;

pub use preprocess::{binarize, preprocess, remove_blob_bodies, window_size};
pub use threshold::{adaptive_threshold, otsu_level, ThresholdError, ThresholdKind};
