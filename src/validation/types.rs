//! Validation group definitions and their operator enums.
//!
//! Editors hand over operator tokens as strings (`"+"`, `">="`, `"XOR"`).
//! They are parsed here, once, through [`FromStr`]; the evaluator only ever
//! sees the enums.

use std::fmt;
use std::str::FromStr;

use crate::error::LoadoutError;

/// Tolerance used by [`ComparisonOp::Equal`] and [`ComparisonOp::NotEqual`].
pub const EQUALITY_EPSILON: f64 = 1e-9;

/// Step operator of the per-item stat fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArithmeticOp {
    #[default]
    Add,
    Subtract,
    Multiply,
    /// Division by zero leaves the accumulator unchanged.
    Divide,
}

impl ArithmeticOp {
    /// Applies the operator to the running accumulator.
    pub fn apply(self, acc: f64, value: f64) -> f64 {
        match self {
            ArithmeticOp::Add => acc + value,
            ArithmeticOp::Subtract => acc - value,
            ArithmeticOp::Multiply => acc * value,
            ArithmeticOp::Divide => {
                if value == 0.0 {
                    acc
                } else {
                    acc / value
                }
            }
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Subtract => "-",
            ArithmeticOp::Multiply => "*",
            ArithmeticOp::Divide => "/",
        }
    }
}

impl FromStr for ArithmeticOp {
    type Err = LoadoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(ArithmeticOp::Add),
            "-" => Ok(ArithmeticOp::Subtract),
            "*" | "x" | "×" => Ok(ArithmeticOp::Multiply),
            "/" | "÷" => Ok(ArithmeticOp::Divide),
            other => Err(LoadoutError::InvalidOperator {
                kind: "arithmetic",
                token: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Comparison between a group aggregate and a threshold value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComparisonOp {
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    Equal,
    NotEqual,
}

impl ComparisonOp {
    /// Evaluates `lhs <op> rhs`.
    pub fn compare(self, lhs: f64, rhs: f64) -> bool {
        match self {
            ComparisonOp::Greater => lhs > rhs,
            ComparisonOp::GreaterOrEqual => lhs >= rhs,
            ComparisonOp::Less => lhs < rhs,
            ComparisonOp::LessOrEqual => lhs <= rhs,
            ComparisonOp::Equal => (lhs - rhs).abs() <= EQUALITY_EPSILON,
            ComparisonOp::NotEqual => (lhs - rhs).abs() > EQUALITY_EPSILON,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Greater => ">",
            ComparisonOp::GreaterOrEqual => ">=",
            ComparisonOp::Less => "<",
            ComparisonOp::LessOrEqual => "<=",
            ComparisonOp::Equal => "=",
            ComparisonOp::NotEqual => "!=",
        }
    }
}

impl FromStr for ComparisonOp {
    type Err = LoadoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            ">" => Ok(ComparisonOp::Greater),
            ">=" | "≥" => Ok(ComparisonOp::GreaterOrEqual),
            "<" => Ok(ComparisonOp::Less),
            "<=" | "≤" => Ok(ComparisonOp::LessOrEqual),
            "=" | "==" => Ok(ComparisonOp::Equal),
            "!=" | "<>" | "≠" => Ok(ComparisonOp::NotEqual),
            other => Err(LoadoutError::InvalidOperator {
                kind: "comparison",
                token: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Operator joining one group's result with the next group's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogicalOp {
    #[default]
    And,
    Or,
    Xor,
}

impl LogicalOp {
    pub fn apply(self, lhs: bool, rhs: bool) -> bool {
        match self {
            LogicalOp::And => lhs && rhs,
            LogicalOp::Or => lhs || rhs,
            LogicalOp::Xor => lhs ^ rhs,
        }
    }
}

impl FromStr for LogicalOp {
    type Err = LoadoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.eq_ignore_ascii_case("and") || token == "&&" {
            Ok(LogicalOp::And)
        } else if token.eq_ignore_ascii_case("or") || token == "||" {
            Ok(LogicalOp::Or)
        } else if token.eq_ignore_ascii_case("xor") || token == "^" {
            Ok(LogicalOp::Xor)
        } else {
            Err(LoadoutError::InvalidOperator {
                kind: "logical",
                token: token.to_string(),
            })
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
            LogicalOp::Xor => "XOR",
        })
    }
}

/// Operator joining the min and max checks when both are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundJoin {
    #[default]
    And,
    Or,
}

impl BoundJoin {
    pub fn apply(self, min_ok: bool, max_ok: bool) -> bool {
        match self {
            BoundJoin::And => min_ok && max_ok,
            BoundJoin::Or => min_ok || max_ok,
        }
    }
}

impl FromStr for BoundJoin {
    type Err = LoadoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<LogicalOp>() {
            Ok(LogicalOp::And) => Ok(BoundJoin::And),
            Ok(LogicalOp::Or) => Ok(BoundJoin::Or),
            _ => Err(LoadoutError::InvalidOperator {
                kind: "bound join",
                token: s.trim().to_string(),
            }),
        }
    }
}

/// One step of a group's stat fold.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatTerm {
    /// Property name of a numeric stat.
    pub stat: String,
    /// Ignored for the first term of a group.
    pub op: ArithmeticOp,
}

/// A bound on a group aggregate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Threshold {
    pub enabled: bool,
    pub value: f64,
    pub op: ComparisonOp,
}

impl Threshold {
    /// Inclusive lower bound (`aggregate >= value`).
    pub fn at_least(value: f64) -> Self {
        Self {
            enabled: true,
            value,
            op: ComparisonOp::GreaterOrEqual,
        }
    }

    /// Inclusive upper bound (`aggregate <= value`).
    pub fn at_most(value: f64) -> Self {
        Self {
            enabled: true,
            value,
            op: ComparisonOp::LessOrEqual,
        }
    }

    /// A bound that always holds.
    pub fn disabled(op: ComparisonOp) -> Self {
        Self {
            enabled: false,
            value: 0.0,
            op,
        }
    }

    /// `true` when disabled, otherwise the comparison result.
    pub fn check(&self, aggregate: f64) -> bool {
        !self.enabled || self.op.compare(aggregate, self.value)
    }
}

/// A user-defined rule over the summed stats of a combination.
///
/// Each item of a combination is folded left to right over `terms`; the
/// per-item results are summed and compared with `min` / `max`.
///
/// # Examples
///
/// ```
/// use u_loadout::validation::{ArithmeticOp, ValidationGroup};
///
/// // Life + Strength must total at least 500 over the whole loadout.
/// let group = ValidationGroup::new(1)
///     .with_stat("Life")
///     .with_term(ArithmeticOp::Add, "Strength")
///     .with_min(500.0);
/// assert!(group.is_active());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationGroup {
    pub id: u32,
    pub terms: Vec<StatTerm>,
    pub min: Threshold,
    pub max: Threshold,
    /// Used only when both bounds are enabled.
    pub bound_join: BoundJoin,
    /// Joins this group's result with the next active group's.
    pub next: LogicalOp,
}

impl ValidationGroup {
    /// Creates an inactive group with both bounds disabled.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            terms: Vec::new(),
            min: Threshold::disabled(ComparisonOp::GreaterOrEqual),
            max: Threshold::disabled(ComparisonOp::LessOrEqual),
            bound_join: BoundJoin::And,
            next: LogicalOp::And,
        }
    }

    /// Appends a term whose operator is ignored (use for the first stat).
    pub fn with_stat(self, stat: impl Into<String>) -> Self {
        self.with_term(ArithmeticOp::Add, stat)
    }

    /// Appends a fold step.
    pub fn with_term(mut self, op: ArithmeticOp, stat: impl Into<String>) -> Self {
        self.terms.push(StatTerm {
            stat: stat.into(),
            op,
        });
        self
    }

    /// Enables an inclusive lower bound.
    pub fn with_min(mut self, value: f64) -> Self {
        self.min = Threshold::at_least(value);
        self
    }

    /// Enables an inclusive upper bound.
    pub fn with_max(mut self, value: f64) -> Self {
        self.max = Threshold::at_most(value);
        self
    }

    pub fn with_min_threshold(mut self, threshold: Threshold) -> Self {
        self.min = threshold;
        self
    }

    pub fn with_max_threshold(mut self, threshold: Threshold) -> Self {
        self.max = threshold;
        self
    }

    pub fn with_bound_join(mut self, join: BoundJoin) -> Self {
        self.bound_join = join;
        self
    }

    pub fn with_next(mut self, op: LogicalOp) -> Self {
        self.next = op;
        self
    }

    /// A group without terms takes no part in validation.
    pub fn is_active(&self) -> bool {
        !self.terms.is_empty()
    }

    /// Checks an aggregate against the bounds.
    pub fn bounds_hold(&self, aggregate: f64) -> bool {
        let min_ok = self.min.check(aggregate);
        let max_ok = self.max.check(aggregate);
        match (self.min.enabled, self.max.enabled) {
            (true, true) => self.bound_join.apply(min_ok, max_ok),
            (true, false) => min_ok,
            (false, true) => max_ok,
            (false, false) => true,
        }
    }
}
