use crate::spacing::linear_distances;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use sudoku_grid_core::{intersection, LineFragment, LineKey, Point, PolarLine};

/// Ten lines along one axis plus a fit score in (0.8, 1].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoredLines {
    pub lines: Vec<PolarLine>,
    pub score: f64,
}

impl ScoredLines {
    pub(crate) fn key(&self) -> Vec<LineKey> {
        self.lines.iter().map(PolarLine::key).collect()
    }
}

/// A candidate sudoku grid: ten lines per axis, ordered by distance, and a
/// score where higher is better.
///
/// The axis labels are opaque identifiers; "horizontal" only means the half
/// of the angle bucket that was not similar to the bucket anchor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LineGrid {
    pub horizontal: Vec<PolarLine>,
    pub vertical: Vec<PolarLine>,
    pub score: f64,
}

impl LineGrid {
    /// The twenty line fragments bounded by the outermost lines of the other
    /// axis: each horizontal clipped between the first and last vertical and
    /// vice versa.
    pub fn fragments(&self) -> Vec<LineFragment> {
        let mut fragments = Vec::with_capacity(self.horizontal.len() + self.vertical.len());

        let first_vert = &self.vertical[0];
        let last_vert = &self.vertical[self.vertical.len() - 1];
        for h in &self.horizontal {
            let start = intersection(h, first_vert).unwrap_or_default();
            let end = intersection(h, last_vert).unwrap_or_default();
            fragments.push(LineFragment::new(start, end));
        }

        let first_horiz = &self.horizontal[0];
        let last_horiz = &self.horizontal[self.horizontal.len() - 1];
        for v in &self.vertical {
            let start = intersection(v, first_horiz).unwrap_or_default();
            let end = intersection(v, last_horiz).unwrap_or_default();
            fragments.push(LineFragment::new(start, end));
        }

        fragments
    }

    /// Outer corners of the grid, ordered to trace the boundary:
    /// (first horizontal × first vertical), (first horizontal × last
    /// vertical), (last × last), (last horizontal × first vertical).
    ///
    /// `None` when an outer pair happens to be parallel.
    pub fn corners(&self) -> Option<[Point; 4]> {
        let h0 = self.horizontal.first()?;
        let h9 = self.horizontal.last()?;
        let v0 = self.vertical.first()?;
        let v9 = self.vertical.last()?;

        Some([
            intersection(h0, v0)?,
            intersection(h0, v9)?,
            intersection(h9, v9)?,
            intersection(h9, v0)?,
        ])
    }
}

/// Builds possible line groupings by cutting `primary` with every line of
/// `secondary`. Groups seen through several cutting lines keep the mean of
/// their scores; the best `top` groups survive.
pub fn build_scored_lines(
    primary: &[PolarLine],
    secondary: &[PolarLine],
    top: usize,
) -> Vec<ScoredLines> {
    let mut groups: HashMap<Vec<LineKey>, ScoredLines> = HashMap::new();
    let mut scores: HashMap<Vec<LineKey>, Vec<f64>> = HashMap::new();

    for s in secondary {
        for found in linear_distances(primary, s) {
            let key = found.key();
            scores.entry(key.clone()).or_default().push(found.score);
            groups.entry(key).or_insert(found);
        }
    }

    let mut scored_lines: Vec<ScoredLines> = groups
        .into_iter()
        .map(|(key, mut group)| {
            let observed = &scores[&key];
            group.score = observed.iter().sum::<f64>() / observed.len() as f64;
            group
        })
        .collect();

    scored_lines.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored_lines.truncate(top);
    scored_lines
}

/// Pairs the best horizontal and vertical groupings into candidate grids,
/// scored by the product of the axis scores, best first.
pub fn possible_grids(
    horizontal: &[PolarLine],
    vertical: &[PolarLine],
    top: usize,
) -> Vec<LineGrid> {
    let mut horizontal = horizontal.to_vec();
    let mut vertical = vertical.to_vec();
    horizontal.sort_by_key(|l| l.distance);
    vertical.sort_by_key(|l| l.distance);

    let lines_h = build_scored_lines(&horizontal, &vertical, top);
    let lines_v = build_scored_lines(&vertical, &horizontal, top);

    let mut grids = Vec::with_capacity(lines_h.len() * lines_v.len());
    for h in &lines_h {
        for v in &lines_v {
            grids.push(LineGrid {
                horizontal: h.lines.clone(),
                vertical: v.lines.clone(),
                score: h.score * v.score,
            });
        }
    }

    grids.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    debug!(
        "{} horizontal x {} vertical groupings -> {} candidate grids",
        lines_h.len(),
        lines_v.len(),
        grids.len()
    );

    grids
}
