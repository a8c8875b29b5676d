//! Rule-based validation of combinations.
//!
//! A rule is an ordered list of [`ValidationGroup`]s. Each group folds a
//! few stats per item with `+ - * /`, sums the fold over the combination and
//! checks the sum against optional min/max bounds. Group results are then
//! folded left to right with AND/OR/XOR.
//!
//! # Key Types
//!
//! - [`ValidationGroup`]: the editable definition of one group
//! - [`Validator`]: the compiled rule, usable as a
//!   [`CombinationValidator`](crate::combination::CombinationValidator)

mod evaluator;
mod types;

pub use evaluator::{fold_item, GroupOutcome, Validator};
pub use types::{
    ArithmeticOp, BoundJoin, ComparisonOp, LogicalOp, StatTerm, Threshold, ValidationGroup,
    EQUALITY_EPSILON,
};
