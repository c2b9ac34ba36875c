pub mod config;
pub mod domain;
pub mod errors;
pub mod rules;

pub use domain::basket::{BasketMap, UserBasket};
pub use domain::product::{ProductId, UserId};
pub use errors::{ApplicationError, DomainError};
pub use rules::{MiningConfig, Recommender, Rule, RuleSet};
