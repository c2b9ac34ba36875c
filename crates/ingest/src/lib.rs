//! Ingestion collaborators for lookbook: the ratings CSV that baskets are
//! built from, and the rules document the upstream miner emits.

pub mod baskets;
pub mod ratings;
pub mod rules_doc;

use std::path::PathBuf;

use thiserror::Error;

pub use baskets::build_baskets;
pub use ratings::{read_ratings, RatingRecord};
pub use rules_doc::{load_rules, RulesDocument};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("could not read `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse ratings file `{path}`: {source}")]
    Csv { path: PathBuf, source: csv::Error },
    #[error("could not parse rules document `{path}`: {source}")]
    Json { path: PathBuf, source: serde_json::Error },
    #[error(transparent)]
    Domain(#[from] lookbook_core::DomainError),
}

pub type IngestResult<T> = Result<T, IngestError>;
