//! Association-rule recommendations
//!
//! Rules are mined upstream from the user×product purchase matrix and arrive
//! here as an immutable, lift-descending [`RuleSet`]. The [`Recommender`]
//! answers per-user queries with a single pass over that set; it never mines
//! rules itself.

mod engine;
mod types;

pub use engine::Recommender;
pub use types::{MiningConfig, Rule, RuleSet};

use crate::errors::DomainError;

/// Result type for rule and recommendation operations
pub type RuleResult<T> = Result<T, DomainError>;

/// Default minimum support the upstream miner applies (fraction of
/// transactions containing an itemset).
pub const DEFAULT_MIN_SUPPORT: f64 = 0.05;

/// Default minimum lift for a rule to be retained upstream.
pub const DEFAULT_MIN_LIFT: f64 = 1.0;
