//! Stage-timing logger.
//!
//! The pipeline logs one line per stage; each record is prefixed with the
//! time since startup and the time since the previous record, so slow stages
//! stand out at `-v` without reaching for a profiler. Install once at
//! startup with [`init`].

use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

struct StageTimer {
    level: LevelFilter,
    started: Instant,
    last_micros: AtomicU64,
}

impl StageTimer {
    /// Total elapsed micros and micros since the previous record.
    fn tick(&self) -> (u64, u64) {
        let now = self.started.elapsed().as_micros() as u64;
        let previous = self.last_micros.swap(now, Ordering::Relaxed);
        (now, now.saturating_sub(previous))
    }
}

impl Log for StageTimer {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let (total, delta) = self.tick();
        let _ = writeln!(
            std::io::stderr(),
            "{:8.3}s +{:.1}ms {:5} {}",
            total as f64 / 1e6,
            delta as f64 / 1e3,
            record.level(),
            record.args()
        );
    }

    fn flush(&self) {}
}

static TIMER: OnceLock<StageTimer> = OnceLock::new();

/// Install the stage-timing logger at the given level. Later calls after a
/// successful install are no-ops.
pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if TIMER.get().is_none() {
        let timer = TIMER.get_or_init(|| StageTimer {
            level,
            started: Instant::now(),
            last_micros: AtomicU64::new(0),
        });
        log::set_logger(timer)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// Route the pipeline's `tracing` spans to stderr with uptime stamps,
/// filtered by `RUST_LOG` (default `info`). Span close events carry the
/// per-stage timings that [`init`] derives from record deltas.
#[cfg(feature = "tracing")]
pub fn init_tracing() {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_timer(fmt::time::Uptime::default())
        .with_writer(std::io::stderr)
        .finish()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_reports_monotonic_deltas() {
        let timer = StageTimer {
            level: LevelFilter::Info,
            started: Instant::now(),
            last_micros: AtomicU64::new(0),
        };

        let (first_total, _) = timer.tick();
        let (second_total, delta) = timer.tick();
        assert!(second_total >= first_total);
        assert!(delta <= second_total);
    }
}
