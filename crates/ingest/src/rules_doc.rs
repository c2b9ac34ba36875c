//! Loader for the rules document the upstream miner emits.
//!
//! The miner runs as a batch step (once per refresh cycle) and writes a JSON
//! document with the thresholds it applied and the rules it kept. This module
//! only deserializes and validates; it never mines.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use lookbook_core::{MiningConfig, Rule, RuleSet};

use crate::{IngestError, IngestResult};

/// On-disk shape of the miner output.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RulesDocument {
    /// Thresholds the miner applied; field defaults cover documents from
    /// older miner versions that did not record them.
    #[serde(flatten)]
    pub mining: MiningConfig,
    pub rules: Vec<Rule>,
}

/// Read, validate, and order the rules. The returned [`RuleSet`] is sorted
/// by lift descending regardless of the document's order.
pub fn load_rules(path: &Path) -> IngestResult<(MiningConfig, RuleSet)> {
    let raw = fs::read_to_string(path)
        .map_err(|source| IngestError::ReadFile { path: path.to_path_buf(), source })?;

    let document: RulesDocument = serde_json::from_str(&raw)
        .map_err(|source| IngestError::Json { path: path.to_path_buf(), source })?;

    document.mining.validate()?;
    let rule_set = RuleSet::new(document.rules)?;

    tracing::debug!(path = %path.display(), rules = rule_set.len(), "rules document loaded");
    Ok((document.mining, rule_set))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use lookbook_core::ProductId;

    use super::*;

    fn write_doc(contents: &str) -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("rules.json");
        fs::write(&path, contents).expect("write fixture");
        (dir, path)
    }

    #[test]
    fn loads_and_sorts_a_miner_document() {
        let (_dir, path) = write_doc(
            r#"{
                "min_support": 0.05,
                "min_lift": 1.0,
                "rules": [
                    {"antecedent": ["Dress"], "consequent": ["Scarf"], "lift": 1.2},
                    {"antecedent": ["Boots"], "consequent": ["Jacket"], "lift": 3.1}
                ]
            }"#,
        );

        let (mining, rules) = load_rules(&path).expect("document should load");
        assert!((mining.min_support - 0.05).abs() < 1e-12);
        assert_eq!(rules.len(), 2);

        let first = rules.iter().next().expect("non-empty");
        assert_eq!(first.consequent, vec![ProductId::from("Jacket")]);
    }

    #[test]
    fn missing_thresholds_fall_back_to_miner_defaults() {
        let (_dir, path) = write_doc(
            r#"{"rules": [{"antecedent": ["Dress"], "consequent": ["Scarf"], "lift": 1.2}]}"#,
        );

        let (mining, _rules) = load_rules(&path).expect("document should load");
        assert!((mining.min_support - 0.05).abs() < 1e-12);
        assert!((mining.min_lift - 1.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_rule_in_document_is_rejected() {
        let (_dir, path) = write_doc(
            r#"{"rules": [{"antecedent": [], "consequent": ["Scarf"], "lift": 1.2}]}"#,
        );

        let error = load_rules(&path).expect_err("degenerate rule must fail");
        assert!(matches!(error, IngestError::Domain(_)));
    }

    #[test]
    fn invalid_thresholds_in_document_are_rejected() {
        let (_dir, path) = write_doc(
            r#"{
                "min_support": 2.0,
                "min_lift": 1.0,
                "rules": [{"antecedent": ["Dress"], "consequent": ["Scarf"], "lift": 1.2}]
            }"#,
        );

        let error = load_rules(&path).expect_err("bad thresholds must fail");
        assert!(error.to_string().contains("min_support"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let (_dir, path) = write_doc("{not json");

        let error = load_rules(&path).expect_err("malformed document must fail");
        assert!(matches!(error, IngestError::Json { .. }));
    }
}
