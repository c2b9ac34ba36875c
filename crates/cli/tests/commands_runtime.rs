use std::env;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use lookbook_cli::commands::recommend::{run as recommend, RecommendArgs};
use lookbook_cli::commands::{config, doctor};
use serde_json::Value;
use tempfile::TempDir;

const RATINGS_CSV: &str = "\
User ID,Product Name,Brand,Category,Price,Rating
1,Dress,Adidas,Women's Fashion,40,5
1,Jeans,Nike,Women's Fashion,31,4.5
1,Sweater,Zara,Women's Fashion,53,2
2,Dress,Adidas,Women's Fashion,40,4
3,T-shirt,Gucci,Men's Fashion,99,1
";

const RULES_JSON: &str = r#"{
    "min_support": 0.05,
    "min_lift": 1.0,
    "rules": [
        {"antecedent": ["Dress"], "consequent": ["Scarf"], "lift": 2.0},
        {"antecedent": ["Dress", "Jeans"], "consequent": ["Jacket"], "lift": 1.5},
        {"antecedent": ["Jeans"], "consequent": ["Scarf"], "lift": 1.1}
    ]
}"#;

fn recommend_args(user: u32) -> RecommendArgs {
    RecommendArgs { user, ratings: None, rules: None, unique: false, limit: None }
}

#[test]
fn recommend_returns_rules_in_lift_order_with_duplicates() {
    let fixtures = write_fixtures(RATINGS_CSV, RULES_JSON);
    with_fixture_env(&fixtures, || {
        let result = recommend(recommend_args(1));
        assert_eq!(result.exit_code, 0, "expected successful recommend run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "recommend");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["count"], 3);

        let recommendations: Vec<&str> = payload["recommendations"]
            .as_array()
            .expect("recommendations should be an array")
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(recommendations, vec!["Scarf", "Jacket", "Scarf"]);
    });
}

#[test]
fn recommend_unique_keeps_best_lift_occurrence() {
    let fixtures = write_fixtures(RATINGS_CSV, RULES_JSON);
    with_fixture_env(&fixtures, || {
        let result = recommend(RecommendArgs { unique: true, ..recommend_args(1) });
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let recommendations: Vec<&str> = payload["recommendations"]
            .as_array()
            .expect("recommendations should be an array")
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(recommendations, vec!["Scarf", "Jacket"]);
    });
}

#[test]
fn recommend_limit_caps_the_result() {
    let fixtures = write_fixtures(RATINGS_CSV, RULES_JSON);
    with_fixture_env(&fixtures, || {
        let result = recommend(RecommendArgs { limit: Some(1), ..recommend_args(1) });
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["count"], 1);
        assert_eq!(payload["recommendations"][0], "Scarf");
    });
}

#[test]
fn known_user_with_empty_basket_gets_empty_ok_result() {
    let fixtures = write_fixtures(RATINGS_CSV, RULES_JSON);
    with_fixture_env(&fixtures, || {
        let result = recommend(recommend_args(3));
        assert_eq!(result.exit_code, 0, "empty result is not an error");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["count"], 0);
    });
}

#[test]
fn unknown_user_fails_with_not_found_class() {
    let fixtures = write_fixtures(RATINGS_CSV, RULES_JSON);
    with_fixture_env(&fixtures, || {
        let result = recommend(recommend_args(999));
        assert_eq!(result.exit_code, 4, "expected not-found exit code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "not_found");
    });
}

#[test]
fn missing_ratings_file_fails_with_ingestion_class() {
    let fixtures = write_fixtures(RATINGS_CSV, RULES_JSON);
    with_fixture_env(&fixtures, || {
        env::set_var("LOOKBOOK_RATINGS_PATH", "/nonexistent/ratings.csv");

        let result = recommend(recommend_args(1));
        assert_eq!(result.exit_code, 3, "expected ingestion exit code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "ingestion");
    });
}

#[test]
fn degenerate_rules_document_fails_with_invalid_rules_class() {
    let bad_rules =
        r#"{"rules": [{"antecedent": [], "consequent": ["Scarf"], "lift": 2.0}]}"#;
    let fixtures = write_fixtures(RATINGS_CSV, bad_rules);
    with_fixture_env(&fixtures, || {
        let result = recommend(recommend_args(1));
        assert_eq!(result.exit_code, 5, "expected invalid-rules exit code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "invalid_rules");
    });
}

#[test]
fn doctor_passes_with_valid_inputs() {
    let fixtures = write_fixtures(RATINGS_CSV, RULES_JSON);
    with_fixture_env(&fixtures, || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 0, "expected passing doctor report");

        let report = parse_payload(&result.output);
        assert_eq!(report["overall_status"], "pass");
        let checks = report["checks"].as_array().expect("checks should be an array");
        assert!(checks.iter().all(|check| check["status"] == "pass"));
    });
}

#[test]
fn doctor_fails_when_rules_document_is_missing() {
    let fixtures = write_fixtures(RATINGS_CSV, RULES_JSON);
    with_fixture_env(&fixtures, || {
        env::set_var("LOOKBOOK_RULES_PATH", "/nonexistent/rules.json");

        let result = doctor::run(true);
        assert_eq!(result.exit_code, 6, "expected doctor failure code");

        let report = parse_payload(&result.output);
        assert_eq!(report["overall_status"], "fail");
    });
}

#[test]
fn config_command_attributes_env_sources() {
    let fixtures = write_fixtures(RATINGS_CSV, RULES_JSON);
    with_fixture_env(&fixtures, || {
        let output = config::run();
        assert!(output.contains("ingest.ratings_path"));
        assert!(output.contains("env:LOOKBOOK_RATINGS_PATH"));
        assert!(output.contains("mining.min_support = 0.05 (source: default)"));
    });
}

struct Fixtures {
    _dir: TempDir,
    ratings: String,
    rules: String,
}

fn write_fixtures(ratings_csv: &str, rules_json: &str) -> Fixtures {
    let dir = TempDir::new().expect("tempdir should be created");
    let ratings_path = dir.path().join("ratings.csv");
    let rules_path = dir.path().join("rules.json");
    fs::write(&ratings_path, ratings_csv).expect("ratings fixture should be written");
    fs::write(&rules_path, rules_json).expect("rules fixture should be written");

    Fixtures {
        ratings: path_string(&ratings_path),
        rules: path_string(&rules_path),
        _dir: dir,
    }
}

fn path_string(path: &Path) -> String {
    path.to_str().expect("fixture path should be valid UTF-8").to_owned()
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_fixture_env(fixtures: &Fixtures, test_fn: impl FnOnce()) {
    with_env(
        &[
            ("LOOKBOOK_RATINGS_PATH", &fixtures.ratings),
            ("LOOKBOOK_RULES_PATH", &fixtures.rules),
        ],
        test_fn,
    );
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "LOOKBOOK_RATINGS_PATH",
        "LOOKBOOK_RULES_PATH",
        "LOOKBOOK_RATING_THRESHOLD",
        "LOOKBOOK_MIN_SUPPORT",
        "LOOKBOOK_MIN_LIFT",
        "LOOKBOOK_LOGGING_LEVEL",
        "LOOKBOOK_LOGGING_FORMAT",
        "LOOKBOOK_LOG_LEVEL",
        "LOOKBOOK_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
