//! Hough line transform.
//!
//! Every lit pixel of a binary image votes for all (r, θ) cells it could lie
//! on; peaks in the accumulator are emitted as [`PolarLine`]s. Voting is
//! parallel over image columns with plain atomic adds; counts are exact
//! because the adds commute.

use log::debug;
use rayon::prelude::*;
use std::collections::HashSet;
use std::f64::consts::PI;
use std::sync::atomic::{AtomicU64, Ordering};
use sudoku_grid_core::{GrayImageView, LineKey, PolarLine};

/// Inclusive range of angles from `start` to `end` in increments of `step`.
pub fn generate_thetas(start: f64, end: f64, step: f64) -> Vec<f64> {
    let count = ((end - start) / step) as usize + 1;
    let mut thetas = Vec::with_capacity(count);
    let mut theta = start;
    for _ in 0..count {
        thetas.push(theta);
        theta += step;
    }
    thetas
}

/// Find polar lines in a binary image.
///
/// When `thetas` is `None`, angles cover `[−π/2, π/2]` in 1° steps. Cells
/// with negative accumulator distance are re-signed on emission: the distance
/// flips positive and θ gains π, so callers always see `distance >= 0`.
/// Accumulator cells that collapse to the same rounded (θ, r) identity are
/// emitted once (first wins). At least two votes are required regardless of
/// `threshold`.
///
/// The result is sorted by vote count, most to least; a positive `limit`
/// truncates it.
pub fn hough_lines(
    src: &GrayImageView<'_>,
    thetas: Option<&[f64]>,
    threshold: u64,
    limit: usize,
) -> Vec<PolarLine> {
    let default_thetas;
    let thetas = match thetas {
        Some(t) => t,
        None => {
            default_thetas = generate_thetas(-PI / 2.0, PI / 2.0, PI / 180.0);
            &default_thetas
        }
    };

    let (cols, rows) = (src.width, src.height);
    let max_r = 2.0 * (cols as f64).hypot(rows as f64);
    let offset = max_r / 2.0;

    let theta_count = thetas.len();
    let accumulator: Vec<AtomicU64> = (0..max_r as usize * theta_count)
        .map(|_| AtomicU64::new(0))
        .collect();

    let sin: Vec<f64> = thetas.iter().map(|t| t.sin()).collect();
    let cos: Vec<f64> = thetas.iter().map(|t| t.cos()).collect();

    (0..cols).into_par_iter().for_each(|col| {
        for row in 0..rows {
            if src.data[row * cols + col] == 0 {
                continue;
            }

            for i in 0..theta_count {
                let r = col as f64 * cos[i] + row as f64 * sin[i];
                let iry = (r + offset) as usize;
                accumulator[iry * theta_count + i].fetch_add(1, Ordering::Relaxed);
            }
        }
    });

    let mut seen: HashSet<LineKey> = HashSet::new();
    let mut lines = Vec::new();
    for iry in 0..max_r as usize {
        let mut r = iry as i64 - offset as i64;
        let mut theta_offset = 0.0;
        if r < 0 {
            theta_offset = PI;
            r = -r;
        }

        for (j, theta) in thetas.iter().enumerate() {
            let count = accumulator[iry * theta_count + j].load(Ordering::Relaxed);
            if count < 2 || count < threshold {
                continue;
            }

            let line = PolarLine {
                theta: theta + theta_offset,
                distance: r,
                count,
            };
            if seen.insert(line.key()) {
                lines.push(line);
            }
        }
    }

    lines.sort_by(|a, b| b.count.cmp(&a.count));

    if limit > 0 && lines.len() > limit {
        lines.truncate(limit);
    }

    debug!(
        "hough over {}x{} found {} lines (threshold {}, limit {})",
        cols,
        rows,
        lines.len(),
        threshold,
        limit
    );

    lines
}
