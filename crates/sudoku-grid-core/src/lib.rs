//! Core types and utilities for sudoku grid detection.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete image decoder; callers hand in raw grayscale
//! buffers and get polar lines, homographies and warped buffers back.

mod buckets;
mod homography;
mod image;
mod line;
pub mod logger;
mod warp;

pub use buckets::{
    generate_angle_buckets, lines_with_similar_angle, put_lines_into_buckets, AngleBucket,
    BucketedLines,
};
pub use homography::{homography_from_corners, Homography};
pub use image::{GrayImage, GrayImageView};
pub use line::{
    intersection, points_on_line_fragment, remove_duplicate_lines, similar_angles, LineFragment,
    LineKey, Point, PointF, PolarLine,
};
pub use warp::{warp_perspective, Perspective};
