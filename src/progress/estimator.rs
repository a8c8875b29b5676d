//! Smoothed throughput and remaining-time estimate.

use std::fmt;
use std::time::Duration;

use num_bigint::BigUint;
use num_traits::ToPrimitive;

use crate::combination::ProgressReport;

/// Samples needed before an estimate is produced.
pub const MIN_SAMPLES: usize = 3;

/// Samples smoothed with [`WARMUP_ALPHA`] before switching to [`STEADY_ALPHA`].
pub const WARMUP_SAMPLES: usize = 10;

pub const WARMUP_ALPHA: f64 = 0.5;
pub const STEADY_ALPHA: f64 = 0.3;

/// Estimates beyond this many seconds are reported as out of range.
const HORIZON_SECS: f64 = 10.0 * 365.0 * 24.0 * 3600.0;

/// Outcome of [`ProgressEstimator::estimate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RemainingEstimate {
    /// Fewer than [`MIN_SAMPLES`] throughput samples so far.
    InsufficientSamples,
    /// Nothing left to process.
    Finishing,
    Remaining(Duration),
    /// More than ten years, or no measurable throughput.
    BeyondHorizon,
}

impl RemainingEstimate {
    pub fn duration(&self) -> Option<Duration> {
        match self {
            RemainingEstimate::Remaining(d) => Some(*d),
            RemainingEstimate::Finishing => Some(Duration::ZERO),
            _ => None,
        }
    }
}

impl fmt::Display for RemainingEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemainingEstimate::InsufficientSamples => write!(f, "calculating"),
            RemainingEstimate::Finishing => write!(f, "finishing"),
            RemainingEstimate::BeyondHorizon => write!(f, ">10 years"),
            RemainingEstimate::Remaining(d) => {
                let total = d.as_secs_f64().round() as u64;
                let (days, rest) = (total / 86_400, total % 86_400);
                let (hours, rest) = (rest / 3_600, rest % 3_600);
                let (minutes, seconds) = (rest / 60, rest % 60);
                if days > 0 {
                    write!(f, "{days}d {hours:02}h {minutes:02}m")
                } else if hours > 0 {
                    write!(f, "{hours}h {minutes:02}m {seconds:02}s")
                } else if minutes > 0 {
                    write!(f, "{minutes}m {seconds:02}s")
                } else {
                    write!(f, "{seconds}s")
                }
            }
        }
    }
}

/// Exponential moving average of combinations per second.
///
/// The first [`WARMUP_SAMPLES`] samples use a larger smoothing factor so the
/// estimate settles quickly; later samples use a smaller one to damp noise.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use num_bigint::BigUint;
/// use u_loadout::progress::{ProgressEstimator, RemainingEstimate};
///
/// let mut est = ProgressEstimator::new();
/// for s in 1..=3u64 {
///     est.record(s * 1_000, Duration::from_secs(s));
/// }
/// let eta = est.estimate(&BigUint::from(63_000u32), 3_000);
/// assert_eq!(eta, RemainingEstimate::Remaining(Duration::from_secs(60)));
/// assert_eq!(eta.to_string(), "1m 00s");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProgressEstimator {
    speed: Option<f64>,
    samples: usize,
    last_processed: u64,
    last_elapsed: Duration,
}

impl ProgressEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a cumulative `(processed, elapsed)` observation.
    ///
    /// Throughput is measured against the previous observation (or the
    /// origin for the first one). Observations that do not move time
    /// forward, or that go backwards, are ignored.
    pub fn record(&mut self, processed: u64, elapsed: Duration) {
        if elapsed <= self.last_elapsed || processed < self.last_processed {
            return;
        }
        let dt = (elapsed - self.last_elapsed).as_secs_f64();
        let dp = (processed - self.last_processed) as f64;
        self.last_processed = processed;
        self.last_elapsed = elapsed;
        self.record_speed(dp / dt);
    }

    /// Records a run snapshot.
    pub fn observe(&mut self, report: &ProgressReport) {
        self.record(report.processed, report.elapsed);
    }

    /// Folds one throughput sample (combinations per second) into the average.
    pub fn record_speed(&mut self, speed: f64) {
        if !speed.is_finite() || speed < 0.0 {
            return;
        }
        self.samples += 1;
        let alpha = if self.samples <= WARMUP_SAMPLES {
            WARMUP_ALPHA
        } else {
            STEADY_ALPHA
        };
        self.speed = Some(match self.speed {
            Some(prev) => alpha * speed + (1.0 - alpha) * prev,
            None => speed,
        });
    }

    /// Smoothed combinations per second, if any sample was recorded.
    pub fn speed(&self) -> Option<f64> {
        self.speed
    }

    pub fn sample_count(&self) -> usize {
        self.samples
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Estimates the time left to process `total` combinations.
    pub fn estimate(&self, total: &BigUint, processed: u64) -> RemainingEstimate {
        if self.samples < MIN_SAMPLES {
            return RemainingEstimate::InsufficientSamples;
        }
        let done = BigUint::from(processed);
        if *total <= done {
            return RemainingEstimate::Finishing;
        }
        let speed = match self.speed {
            Some(s) if s > 0.0 => s,
            _ => return RemainingEstimate::BeyondHorizon,
        };
        let remaining = match (total - &done).to_f64() {
            Some(r) if r.is_finite() => r,
            _ => return RemainingEstimate::BeyondHorizon,
        };
        let secs = remaining / speed;
        if secs > HORIZON_SECS {
            RemainingEstimate::BeyondHorizon
        } else {
            RemainingEstimate::Remaining(Duration::from_secs_f64(secs))
        }
    }
}
