use crate::classify::{DigitClassifier, DIGIT_CELL_SIZE};
use serde::{Deserialize, Serialize};
use sudoku_grid_core::{warp_perspective, GrayImage, LineFragment, PointF};
use sudoku_grid_detect::{DetectError, GridDetector, LineGrid};
use sudoku_grid_prep::otsu_level;

/// Errors raised when working with a located grid.
#[derive(thiserror::Error, Debug)]
pub enum SudokuError {
    #[error("grid corners are degenerate")]
    DegenerateGrid,
    #[error(transparent)]
    Classify(#[from] crate::classify::ClassifyError),
}

/// A digit read from one of the 81 cells.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellDigit {
    pub row: usize,
    pub col: usize,
    /// 0 stands for an empty cell.
    pub digit: u8,
    pub confidence: f64,
}

/// A sudoku located on an image: the grayscale source and the winning grid.
///
/// The grid borrows nothing; the handle owns everything needed for the
/// derived views.
#[derive(Clone, Debug)]
pub struct Sudoku {
    gray: GrayImage,
    grid: LineGrid,
}

impl Sudoku {
    /// Locate a sudoku with default parameters.
    pub fn find(gray: GrayImage) -> Result<Self, DetectError> {
        Self::find_with(gray, &GridDetector::default())
    }

    /// Locate a sudoku with an explicitly configured detector.
    pub fn find_with(gray: GrayImage, detector: &GridDetector) -> Result<Self, DetectError> {
        let grid = detector.detect(&gray.view())?;
        Ok(Self { gray, grid })
    }

    /// Wrap a grid that was located by other means.
    pub fn from_parts(gray: GrayImage, grid: LineGrid) -> Self {
        Self { gray, grid }
    }

    #[inline]
    pub fn grid(&self) -> &LineGrid {
        &self.grid
    }

    #[inline]
    pub fn gray(&self) -> &GrayImage {
        &self.gray
    }

    /// The twenty grid line fragments in source-image coordinates.
    pub fn fragments(&self) -> Vec<LineFragment> {
        self.grid.fragments()
    }

    /// Perspective-rectified, top-down crop of the grid as a `size`×`size`
    /// grayscale square.
    pub fn extracted(&self, size: usize) -> Result<GrayImage, SudokuError> {
        let corners = self.grid.corners().ok_or(SudokuError::DegenerateGrid)?;
        let src: [PointF; 4] = corners.map(PointF::from);
        let s = size as f64;
        let dst = [
            PointF::new(0.0, 0.0),
            PointF::new(s, 0.0),
            PointF::new(s, s),
            PointF::new(0.0, s),
        ];

        warp_perspective(&self.gray.view(), &src, &dst).ok_or(SudokuError::DegenerateGrid)
    }

    /// Rectify the grid and run the digit classifier over all 81 cells.
    ///
    /// The binarization level handed to the classifier is the Otsu split of
    /// the rectified crop.
    pub fn read_digits(
        &self,
        classifier: &dyn DigitClassifier,
    ) -> Result<Vec<CellDigit>, SudokuError> {
        let rectified = self.extracted(9 * DIGIT_CELL_SIZE)?;
        let level = otsu_level(&rectified.view());

        let mut digits = Vec::with_capacity(81);
        for row in 0..9 {
            for col in 0..9 {
                let cell = crop_cell(&rectified, col * DIGIT_CELL_SIZE, row * DIGIT_CELL_SIZE);
                let prediction = classifier.recognise(&cell.view(), level)?;
                digits.push(CellDigit {
                    row,
                    col,
                    digit: prediction.digit,
                    confidence: prediction.confidence,
                });
            }
        }

        Ok(digits)
    }
}

fn crop_cell(src: &GrayImage, x0: usize, y0: usize) -> GrayImage {
    let mut cell = GrayImage::new(DIGIT_CELL_SIZE, DIGIT_CELL_SIZE);
    for y in 0..DIGIT_CELL_SIZE {
        for x in 0..DIGIT_CELL_SIZE {
            cell.set(x, y, src.get(x0 + x, y0 + y));
        }
    }
    cell
}
