//! Recommendation queries over a precomputed rule set.

use std::collections::HashSet;

use super::types::RuleSet;
use super::RuleResult;
use crate::domain::basket::{BasketMap, UserBasket};
use crate::domain::product::{ProductId, UserId};

/// Stateless query engine over precomputed association rules.
///
/// Purely functional: every query reads only its inputs, so concurrent
/// queries need no coordination.
#[derive(Clone, Copy, Debug, Default)]
pub struct Recommender;

impl Recommender {
    pub fn new() -> Self {
        Self
    }

    /// Products recommended for `basket`, one candidate per matching rule,
    /// in the rule set's lift-descending order.
    ///
    /// A rule matches when its antecedent is a subset of the basket; the
    /// candidate is the first product of its consequent. Duplicates are kept
    /// when several matching rules point at the same product. An empty
    /// basket or empty rule set yields an empty sequence.
    pub fn recommend(&self, basket: &UserBasket, rules: &RuleSet) -> Vec<ProductId> {
        rules
            .iter()
            .filter(|rule| basket.contains_all(rule.antecedent.iter()))
            .filter_map(|rule| rule.consequent.first().cloned())
            .collect()
    }

    /// Like [`recommend`](Self::recommend), but each product appears at most
    /// once, keeping its earliest (best-lift) position.
    pub fn recommend_unique(&self, basket: &UserBasket, rules: &RuleSet) -> Vec<ProductId> {
        let mut seen = HashSet::new();
        self.recommend(basket, rules)
            .into_iter()
            .filter(|product| seen.insert(product.clone()))
            .collect()
    }

    /// Resolve the user's basket, then query. An unknown user surfaces
    /// [`DomainError::UnknownUser`](crate::errors::DomainError::UnknownUser)
    /// rather than an empty result.
    pub fn recommend_for_user(
        &self,
        user: UserId,
        baskets: &BasketMap,
        rules: &RuleSet,
    ) -> RuleResult<Vec<ProductId>> {
        let basket = baskets.basket(user)?;
        Ok(self.recommend(basket, rules))
    }
}
