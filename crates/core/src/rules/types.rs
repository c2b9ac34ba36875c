//! Types for association rules and their validated, ordered collection.

use std::collections::BTreeSet;
use std::slice;

use serde::{Deserialize, Serialize};

use super::{RuleResult, DEFAULT_MIN_LIFT, DEFAULT_MIN_SUPPORT};
use crate::domain::product::ProductId;
use crate::errors::DomainError;

/// One association rule: antecedent => consequent, with a lift score.
///
/// Produced once by the upstream miner and immutable for the lifetime of a
/// query session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Products that must all be in the basket for the rule to fire.
    pub antecedent: BTreeSet<ProductId>,
    /// Products the rule recommends; the first entry is the candidate the
    /// engine emits.
    pub consequent: Vec<ProductId>,
    /// Confidence-independent association strength; finite and positive.
    pub lift: f64,
}

impl Rule {
    pub fn new(
        antecedent: impl IntoIterator<Item = ProductId>,
        consequent: impl IntoIterator<Item = ProductId>,
        lift: f64,
    ) -> Self {
        Self {
            antecedent: antecedent.into_iter().collect(),
            consequent: consequent.into_iter().collect(),
            lift,
        }
    }

    fn validate(&self) -> RuleResult<()> {
        if self.antecedent.is_empty() {
            return Err(DomainError::DegenerateRule {
                detail: "empty antecedent would match every basket".to_owned(),
            });
        }
        if self.consequent.is_empty() {
            return Err(DomainError::DegenerateRule {
                detail: "empty consequent recommends nothing".to_owned(),
            });
        }
        if let Some(shared) =
            self.consequent.iter().find(|product| self.antecedent.contains(*product))
        {
            return Err(DomainError::DegenerateRule {
                detail: format!("product `{shared}` appears on both sides"),
            });
        }
        let mut seen = BTreeSet::new();
        if let Some(duplicate) = self.consequent.iter().find(|product| !seen.insert(*product)) {
            return Err(DomainError::DegenerateRule {
                detail: format!("product `{duplicate}` repeated in consequent"),
            });
        }
        if !self.lift.is_finite() || self.lift <= 0.0 {
            return Err(DomainError::DegenerateRule {
                detail: format!("lift must be finite and positive, got {}", self.lift),
            });
        }
        Ok(())
    }
}

/// Validated rules in lift-descending order.
///
/// Order is fixed at construction and preserved by all downstream iteration;
/// the engine relies on it to emit best-lift candidates first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Validate every rule, then sort by lift descending. Degenerate rules
    /// (empty or overlapping sides, non-positive lift) are rejected here so
    /// no downstream path has to re-check them.
    pub fn new(mut rules: Vec<Rule>) -> RuleResult<Self> {
        for rule in &rules {
            rule.validate()?;
        }
        rules.sort_by(|a, b| b.lift.total_cmp(&a.lift));
        Ok(Self { rules })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Thresholds the upstream miner used to produce a rule set. Carried with
/// the rules for provenance; the engine itself never filters on them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MiningConfig {
    /// Minimum fraction of transactions containing an itemset.
    #[serde(default = "default_min_support")]
    pub min_support: f64,
    /// Minimum association strength for a rule to be retained.
    #[serde(default = "default_min_lift")]
    pub min_lift: f64,
}

fn default_min_support() -> f64 {
    DEFAULT_MIN_SUPPORT
}

fn default_min_lift() -> f64 {
    DEFAULT_MIN_LIFT
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self { min_support: DEFAULT_MIN_SUPPORT, min_lift: DEFAULT_MIN_LIFT }
    }
}

impl MiningConfig {
    pub fn validate(&self) -> RuleResult<()> {
        if !self.min_support.is_finite() || self.min_support <= 0.0 || self.min_support > 1.0 {
            return Err(DomainError::InvariantViolation(format!(
                "min_support must be in (0, 1], got {}",
                self.min_support
            )));
        }
        if !self.min_lift.is_finite() || self.min_lift <= 0.0 {
            return Err(DomainError::InvariantViolation(format!(
                "min_lift must be finite and positive, got {}",
                self.min_lift
            )));
        }
        Ok(())
    }
}
