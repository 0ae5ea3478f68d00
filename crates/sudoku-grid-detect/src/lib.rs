//! Grid hypothesis search for sudoku photographs.
//!
//! Works on the polar lines produced by the Hough stage: groups them by
//! angle bucket, searches each bucket for ten-tuples with near-linear
//! spacing, pairs the two axes into candidate grids and re-scores the
//! candidates against the binary image evidence.

mod detector;
mod hypothesis;
mod score;
mod spacing;

pub use detector::{DetectError, DetectorParams, GridDetector};
pub use hypothesis::{build_scored_lines, possible_grids, LineGrid, ScoredLines};
pub use score::evaluate_grids;
pub use spacing::linear_distances;
