use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use lookbook_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "ingest.ratings_path",
        &config.ingest.ratings_path.display().to_string(),
        field_source(
            "ingest.ratings_path",
            Some("LOOKBOOK_RATINGS_PATH"),
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));
    lines.push(render_line(
        "ingest.rules_path",
        &config.ingest.rules_path.display().to_string(),
        field_source(
            "ingest.rules_path",
            Some("LOOKBOOK_RULES_PATH"),
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));
    lines.push(render_line(
        "ingest.rating_threshold",
        &config.ingest.rating_threshold.to_string(),
        field_source(
            "ingest.rating_threshold",
            Some("LOOKBOOK_RATING_THRESHOLD"),
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));
    lines.push(render_line(
        "mining.min_support",
        &config.mining.min_support.to_string(),
        field_source(
            "mining.min_support",
            Some("LOOKBOOK_MIN_SUPPORT"),
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));
    lines.push(render_line(
        "mining.min_lift",
        &config.mining.min_lift.to_string(),
        field_source(
            "mining.min_lift",
            Some("LOOKBOOK_MIN_LIFT"),
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));
    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        field_source(
            "logging.level",
            Some("LOOKBOOK_LOGGING_LEVEL"),
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format).to_ascii_lowercase(),
        field_source(
            "logging.format",
            Some("LOOKBOOK_LOGGING_FORMAT"),
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        ),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("lookbook.toml"), PathBuf::from("config/lookbook.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    field: &str,
    env_var: Option<&str>,
    doc: Option<&Value>,
    config_path: Option<&Path>,
) -> String {
    if let Some(var) = env_var {
        if env::var(var).map(|value| !value.trim().is_empty()).unwrap_or(false) {
            return format!("env:{var}");
        }
    }

    if let (Some(doc), Some(path)) = (doc, config_path) {
        if doc_contains_field(doc, field) {
            return format!("file:{}", path.display());
        }
    }

    "default".to_string()
}

fn doc_contains_field(doc: &Value, field: &str) -> bool {
    let mut current = doc;
    for segment in field.split('.') {
        match current.get(segment) {
            Some(next) => current = next,
            None => return false,
        }
    }
    true
}

fn render_line(field: &str, value: &str, source: String) -> String {
    format!("- {field} = {value} (source: {source})")
}
