use serde::Serialize;

use lookbook_core::config::{AppConfig, LoadOptions};
use lookbook_ingest::{build_baskets, load_rules, read_ratings};

use super::{CommandResult, EXIT_DOCTOR_FAIL};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { EXIT_DOCTOR_FAIL };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_ratings(&config));
            checks.push(check_rules(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "ratings_ingestion",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            checks.push(DoctorCheck {
                name: "rules_document",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_ratings(config: &AppConfig) -> DoctorCheck {
    match read_ratings(&config.ingest.ratings_path) {
        Ok(records) => {
            let baskets = build_baskets(&records, config.ingest.rating_threshold);
            DoctorCheck {
                name: "ratings_ingestion",
                status: CheckStatus::Pass,
                details: format!(
                    "{} rating rows across {} users from `{}`",
                    records.len(),
                    baskets.len(),
                    config.ingest.ratings_path.display()
                ),
            }
        }
        Err(error) => DoctorCheck {
            name: "ratings_ingestion",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn check_rules(config: &AppConfig) -> DoctorCheck {
    match load_rules(&config.ingest.rules_path) {
        Ok((mining, rules)) => DoctorCheck {
            name: "rules_document",
            status: CheckStatus::Pass,
            details: format!(
                "{} rules (min_support={}, min_lift={}) from `{}`",
                rules.len(),
                mining.min_support,
                mining.min_lift,
                config.ingest.rules_path.display()
            ),
        },
        Err(error) => DoctorCheck {
            name: "rules_document",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
