//! Remaining-time estimation for long enumerations.
//!
//! Feed [`ProgressEstimator`] the [`ProgressReport`](crate::combination::ProgressReport)s
//! a generation run emits and ask it for a [`RemainingEstimate`].

mod estimator;

pub use estimator::{
    ProgressEstimator, RemainingEstimate, MIN_SAMPLES, STEADY_ALPHA, WARMUP_ALPHA,
    WARMUP_SAMPLES,
};
