use sudoku_grid_core::{GrayImageView, Point};

/// Cell edge length the digit classifier expects.
pub const DIGIT_CELL_SIZE: usize = 28;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("invalid cell size {width}x{height}, classifier expects {expected}x{expected}")]
    InvalidCellSize {
        width: usize,
        height: usize,
        expected: usize,
    },
}

/// Guard for classifier implementations: reject cells of the wrong size.
pub fn check_cell_size(cell: &GrayImageView<'_>, expected: usize) -> Result<(), ClassifyError> {
    if cell.width != expected || cell.height != expected {
        return Err(ClassifyError::InvalidCellSize {
            width: cell.width,
            height: cell.height,
            expected,
        });
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DigitPrediction {
    /// Recognised digit, 0 meaning an empty cell.
    pub digit: u8,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
}

/// Recognises a digit on a 28×28 grayscale cell.
///
/// The model behind this is external; the pipeline only hands over the cell
/// crop together with the binarization level of the rectified grid. Handles
/// are injected into [`crate::Sudoku::read_digits`] rather than looked up
/// from globals.
pub trait DigitClassifier {
    fn recognise(
        &self,
        cell: &GrayImageView<'_>,
        level: u8,
    ) -> Result<DigitPrediction, ClassifyError>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellPrediction {
    pub class: u8,
    pub confidence: f64,
    pub alt_confidence: f64,
}

/// Classifies a fixed-size patch anchored at `upper_left` straight on the
/// source image. An alternative to line-based localization; not used by the
/// default pipeline.
pub trait CellClassifier {
    fn classify(&self, img: &GrayImageView<'_>, upper_left: Point) -> CellPrediction;
}

#[cfg(test)]
mod tests {
    use super::*;
    use sudoku_grid_core::GrayImage;

    #[test]
    fn cell_size_guard_accepts_only_the_expected_square() {
        let good = GrayImage::new(28, 28);
        assert!(check_cell_size(&good.view(), DIGIT_CELL_SIZE).is_ok());

        let bad = GrayImage::new(28, 27);
        assert_eq!(
            Err(ClassifyError::InvalidCellSize {
                width: 28,
                height: 27,
                expected: 28
            }),
            check_cell_size(&bad.view(), DIGIT_CELL_SIZE)
        );
    }
}
