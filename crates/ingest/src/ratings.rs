//! Ratings CSV reader.
//!
//! The dataset carries one row per (user, product) rating. Columns beyond
//! the three used here (brand, category, price, ...) are ignored.

use std::path::Path;

use serde::Deserialize;

use crate::{IngestError, IngestResult};

/// One row of the ratings dataset.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RatingRecord {
    #[serde(rename = "User ID")]
    pub user_id: u32,
    #[serde(rename = "Product Name")]
    pub product_name: String,
    #[serde(rename = "Rating")]
    pub rating: f64,
}

pub fn read_ratings(path: &Path) -> IngestResult<Vec<RatingRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| IngestError::Csv { path: path.to_path_buf(), source })?;

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: RatingRecord =
            row.map_err(|source| IngestError::Csv { path: path.to_path_buf(), source })?;
        records.push(record);
    }

    tracing::debug!(path = %path.display(), rows = records.len(), "ratings file loaded");
    Ok(records)
}
