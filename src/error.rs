//! Error types for loadout generation, validation and scoring.
//!
//! Setup errors are reported before any enumeration starts. Evaluation
//! faults abort a run and are returned to the caller unchanged.
//! Cancellation is not an error; see [`RunStatus`](crate::combination::RunStatus).

use thiserror::Error;

/// Main error type for loadout operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadoutError {
    /// The ring pool does not contain two distinct items.
    #[error("ring pool needs at least 2 distinct items, found {distinct}")]
    InsufficientRings {
        /// Number of distinct ring ids in the pool.
        distinct: usize,
    },

    /// A non-ring equipment class has no items, so no combination exists.
    #[error("equipment class '{class}' has no items")]
    EmptyClass {
        /// Class tag of the empty list.
        class: String,
    },

    /// A pre-filter strategy needs the tiered item set but none was given.
    #[error("filter strategy {strategy} requires a tiered item id set")]
    MissingTieredItems {
        /// Name of the strategy that was requested.
        strategy: &'static str,
    },

    /// A stat name does not resolve to a numeric stat.
    #[error("unknown numeric stat '{stat}' in {context}")]
    UnknownStat {
        /// The unresolved property name.
        stat: String,
        /// Where the name was used (validation group or tier).
        context: String,
    },

    /// An operator token from an editor could not be parsed.
    #[error("invalid {kind} operator '{token}'")]
    InvalidOperator {
        /// Operator family ("arithmetic", "comparison", "logical", "bound join").
        kind: &'static str,
        /// The rejected token.
        token: String,
    },

    /// Serialized stat data does not match the stat schema.
    #[error("stat vector holds {found} values, schema has {expected}")]
    StatCountMismatch {
        /// Number of numeric stats in the schema.
        expected: usize,
        /// Number of values supplied.
        found: usize,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The validator failed while evaluating a combination.
    #[error("evaluation failed in {context}: {message}")]
    Evaluation {
        /// The rule or group that faulted.
        context: String,
        /// Failure detail.
        message: String,
    },
}

impl LoadoutError {
    /// Creates an evaluation fault.
    pub fn evaluation(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Evaluation {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Returns `true` for errors detected before enumeration begins.
    pub fn is_setup_error(&self) -> bool {
        !matches!(self, Self::Evaluation { .. })
    }
}

/// Result type alias for loadout operations.
pub type Result<T> = std::result::Result<T, LoadoutError>;
