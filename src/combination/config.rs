//! Generator configuration.
//!
//! [`GeneratorConfig`] holds the parameters that control one enumeration run.

use super::types::FilterStrategy;

/// Configuration for [`CombinationGenerator`](super::CombinationGenerator).
///
/// # Defaults
///
/// ```
/// use u_loadout::combination::{FilterStrategy, GeneratorConfig};
///
/// let config = GeneratorConfig::default();
/// assert_eq!(config.max_valid_to_store, 100_000);
/// assert_eq!(config.filter, FilterStrategy::Comprehensive);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_loadout::combination::{FilterStrategy, GeneratorConfig};
///
/// let config = GeneratorConfig::default()
///     .with_filter(FilterStrategy::Balanced)
///     .with_max_valid_to_store(5_000)
///     .with_progress_interval(10_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratorConfig {
    /// Maximum number of valid combinations kept in memory.
    ///
    /// Valid combinations beyond this cap are still counted.
    pub max_valid_to_store: usize,

    /// Pre-filter applied before the validator.
    pub filter: FilterStrategy,

    /// Number of processed combinations between two progress reports.
    pub progress_interval: u64,

    /// Number of combinations a worker processes between two checks of
    /// the cancellation flag.
    ///
    /// Typical range: 10–100.
    pub cancel_check_interval: usize,

    /// Whether to enumerate shards in parallel using rayon.
    ///
    /// Ignored when the crate is built without the `parallel` feature.
    pub parallel: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_valid_to_store: 100_000,
            filter: FilterStrategy::Comprehensive,
            progress_interval: 50_000,
            cancel_check_interval: 64,
            parallel: true,
        }
    }
}

impl GeneratorConfig {
    /// Upper bound for [`cancel_check_interval`](Self::cancel_check_interval).
    pub const MAX_CANCEL_CHECK_INTERVAL: usize = 4096;

    /// Sets the storage cap for valid combinations.
    pub fn with_max_valid_to_store(mut self, n: usize) -> Self {
        self.max_valid_to_store = n;
        self
    }

    /// Sets the pre-filter strategy.
    pub fn with_filter(mut self, filter: FilterStrategy) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the progress reporting stride.
    pub fn with_progress_interval(mut self, n: u64) -> Self {
        self.progress_interval = n;
        self
    }

    /// Sets the cancellation check stride.
    pub fn with_cancel_check_interval(mut self, n: usize) -> Self {
        self.cancel_check_interval = n;
        self
    }

    /// Enables or disables parallel enumeration.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Preset examining every combination without pre-filtering.
    ///
    /// - Filter: Comprehensive, Storage cap: 1,000,000
    pub fn exhaustive() -> Self {
        Self {
            max_valid_to_store: 1_000_000,
            filter: FilterStrategy::Comprehensive,
            ..Self::default()
        }
    }

    /// Preset requiring at least one tiered item per combination.
    ///
    /// - Filter: Balanced, Storage cap: 100,000
    pub fn balanced() -> Self {
        Self {
            filter: FilterStrategy::Balanced,
            ..Self::default()
        }
    }

    /// Preset requiring every item to be tiered.
    ///
    /// - Filter: Strict, Storage cap: 50,000
    pub fn strict() -> Self {
        Self {
            max_valid_to_store: 50_000,
            filter: FilterStrategy::Strict,
            ..Self::default()
        }
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.progress_interval == 0 {
            return Err("progress_interval must be at least 1".into());
        }
        if self.cancel_check_interval == 0 {
            return Err("cancel_check_interval must be at least 1".into());
        }
        if self.cancel_check_interval > Self::MAX_CANCEL_CHECK_INTERVAL {
            return Err(format!(
                "cancel_check_interval must be at most {}",
                Self::MAX_CANCEL_CHECK_INTERVAL
            ));
        }
        Ok(())
    }
}
