//! High-level facade crate for the `sudoku-grid-*` workspace.
//!
//! This crate provides:
//! - stable, convenient re-exports of the underlying pipeline crates
//! - the [`Sudoku`] handle tying a located grid to its source image
//! - (feature-gated) `image` integration, overlay rendering and a CLI driver.

pub use sudoku_grid_core as core;
pub use sudoku_grid_detect as detect;
pub use sudoku_grid_hough as hough;
pub use sudoku_grid_prep as prep;

pub use sudoku_grid_core::{GrayImage, GrayImageView, LineFragment, Point, PolarLine};
pub use sudoku_grid_detect::{DetectError, DetectorParams, GridDetector, LineGrid};

mod classify;
mod sudoku;

pub use classify::{
    check_cell_size, CellClassifier, CellPrediction, ClassifyError, DigitClassifier,
    DigitPrediction, DIGIT_CELL_SIZE,
};
pub use sudoku::{CellDigit, Sudoku, SudokuError};

#[cfg(feature = "image")]
mod draw;
#[cfg(feature = "image")]
mod img;

#[cfg(feature = "image")]
pub use draw::overlay_grid;
#[cfg(feature = "image")]
pub use img::{find_sudoku, find_sudoku_with, gray_from_image, gray_view, image_from_gray};
