//! User baskets: the set of products each user has interacted with positively.

use std::collections::btree_set;
use std::collections::{BTreeSet, HashMap};

use crate::domain::product::{ProductId, UserId};
use crate::errors::DomainError;

/// Products a single user has purchased (or rated highly enough to count as
/// a purchase). Opaque input to the recommendation engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserBasket {
    items: BTreeSet<ProductId>,
}

impl UserBasket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the product was not already present.
    pub fn insert(&mut self, product: ProductId) -> bool {
        self.items.insert(product)
    }

    pub fn contains(&self, product: &ProductId) -> bool {
        self.items.contains(product)
    }

    /// Subset test: every product yielded by the iterator is in the basket.
    /// An empty iterator is trivially contained.
    pub fn contains_all<'a>(&self, mut products: impl Iterator<Item = &'a ProductId>) -> bool {
        products.all(|product| self.items.contains(product))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, ProductId> {
        self.items.iter()
    }
}

impl FromIterator<ProductId> for UserBasket {
    fn from_iter<I: IntoIterator<Item = ProductId>>(iter: I) -> Self {
        Self { items: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a UserBasket {
    type Item = &'a ProductId;
    type IntoIter = btree_set::Iter<'a, ProductId>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Mapping from user identifier to basket, built once by ingestion and
/// read-only during queries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BasketMap {
    baskets: HashMap<UserId, UserBasket>,
}

impl BasketMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Basket for `user`, inserting an empty one when absent. Ingestion uses
    /// this so that a user whose ratings all fall below the purchase
    /// threshold is still a known user with an empty basket.
    pub fn entry(&mut self, user: UserId) -> &mut UserBasket {
        self.baskets.entry(user).or_default()
    }

    /// Basket for a known user. An unknown user is an error, never an
    /// implicit empty basket.
    pub fn basket(&self, user: UserId) -> Result<&UserBasket, DomainError> {
        self.baskets.get(&user).ok_or(DomainError::UnknownUser(user))
    }

    pub fn get(&self, user: UserId) -> Option<&UserBasket> {
        self.baskets.get(&user)
    }

    pub fn len(&self) -> usize {
        self.baskets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.baskets.is_empty()
    }

    pub fn users(&self) -> impl Iterator<Item = UserId> + '_ {
        self.baskets.keys().copied()
    }
}

impl FromIterator<(UserId, UserBasket)> for BasketMap {
    fn from_iter<I: IntoIterator<Item = (UserId, UserBasket)>>(iter: I) -> Self {
        Self { baskets: iter.into_iter().collect() }
    }
}
