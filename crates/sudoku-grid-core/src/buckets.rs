use crate::line::{similar_angles, LineKey, PolarLine};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::f64::consts::PI;
use std::fmt;

/// Closed interval `[start, end]` of angles in radians. Intervals may wrap
/// across 0/π; wrapping is represented by emitting extra intervals rather
/// than by `start > end`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AngleBucket {
    pub start: f64,
    pub end: f64,
}

impl AngleBucket {
    #[inline]
    pub fn contains(&self, theta: f64) -> bool {
        self.start <= theta && theta <= self.end
    }
}

impl fmt::Display for AngleBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bucket{{{:.0}, {:.0}}}",
            self.start * 180.0 / PI,
            self.end * 180.0 / PI
        )
    }
}

/// Lines gathered for one anchor angle.
#[derive(Clone, Debug)]
pub struct BucketedLines {
    pub anchor: f64,
    pub lines: Vec<PolarLine>,
}

/// Builds interval sets around anchor angles between 0 and π.
///
/// `bucket_size` and `step` are taken in degrees (easier to reason about).
/// Each anchor maps to `[anchor − size/2, anchor + size/2]` plus wrap-around
/// intervals where the primary range leaves `[0, π]`, and, when `orthogonal`
/// is set, the same interval shifted by π/2 (itself possibly wrapped).
///
/// Example output (bucket_size=20, step=5), values in degrees:
///
/// ```text
/// 45: [(35, 55), (125, 145)]
/// 50: [(40, 60), (130, 150)]
/// ```
pub fn generate_angle_buckets(
    bucket_size: u32,
    step: u32,
    orthogonal: bool,
) -> Vec<(f64, Vec<AngleBucket>)> {
    const DEG_TO_RAD: f64 = PI / 180.0;

    let window = DEG_TO_RAD * f64::from(bucket_size);
    let step_size = DEG_TO_RAD * f64::from(step);

    let window2 = window / 2.0;
    let max_pos = if orthogonal { PI / 2.0 } else { PI } - step_size;

    let mut buckets = Vec::new();
    let mut pos = 0.0;
    loop {
        let b1 = AngleBucket {
            start: pos - window2,
            end: pos + window2,
        };
        let mut bucket = vec![b1];

        if b1.start < 0.0 {
            bucket.push(AngleBucket {
                start: PI + b1.start,
                end: PI,
            });
        }

        if b1.end > PI {
            bucket.push(AngleBucket {
                start: 0.0,
                end: b1.end - PI,
            });
        }

        if orthogonal {
            let b2 = AngleBucket {
                start: b1.start + PI / 2.0,
                end: b1.end + PI / 2.0,
            };
            bucket.push(b2);

            if b2.end > PI {
                bucket.push(AngleBucket {
                    start: 0.0,
                    end: b2.end - PI,
                });
            }
        }

        buckets.push((pos, bucket));

        pos += step_size;
        if pos >= max_pos {
            break;
        }
    }

    buckets
}

/// Splits lines into those with an angle similar to `angle` and the rest.
pub fn lines_with_similar_angle(
    lines: &[PolarLine],
    angle: f64,
) -> (Vec<PolarLine>, Vec<PolarLine>) {
    let mut similar = Vec::new();
    let mut other = Vec::new();

    for line in lines {
        if similar_angles(line.theta, angle) {
            similar.push(*line);
        } else {
            other.push(*line);
        }
    }

    (similar, other)
}

/// Collects, per anchor, every line whose θ falls inside one of the anchor's
/// intervals. Anchors that gather exactly the same ordered line set as an
/// earlier anchor are dropped; overlapping bucket coverings otherwise produce
/// the same work twice.
pub fn put_lines_into_buckets(
    buckets: &[(f64, Vec<AngleBucket>)],
    lines: &[PolarLine],
) -> Vec<BucketedLines> {
    let mut bucketed = Vec::new();
    let mut already_matched: HashSet<Vec<LineKey>> = HashSet::new();

    for (anchor, intervals) in buckets {
        let matches: Vec<PolarLine> = lines
            .iter()
            .filter(|line| intervals.iter().any(|b| b.contains(line.theta)))
            .copied()
            .collect();

        if matches.is_empty() {
            continue;
        }

        let matches_key: Vec<LineKey> = matches.iter().map(PolarLine::key).collect();
        if already_matched.insert(matches_key) {
            bucketed.push(BucketedLines {
                anchor: *anchor,
                lines: matches,
            });
        }
    }

    bucketed
}
