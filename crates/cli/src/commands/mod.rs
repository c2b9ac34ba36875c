pub mod config;
pub mod doctor;
pub mod recommend;

use serde::Serialize;

/// Exit codes per failure class, stable for scripting against the CLI.
pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_INGESTION: u8 = 3;
pub const EXIT_NOT_FOUND: u8 = 4;
pub const EXIT_INVALID_RULES: u8 = 5;
pub const EXIT_DOCTOR_FAIL: u8 = 6;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_payload(&payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(&payload) }
    }

    /// Success with a command-specific payload instead of the generic
    /// outcome envelope.
    pub fn with_payload<T: Serialize>(payload: &T) -> Self {
        Self { exit_code: 0, output: serialize_payload(payload) }
    }
}

pub(crate) fn exit_code_for(error_class: &str) -> u8 {
    match error_class {
        "config" => EXIT_CONFIG,
        "ingestion" => EXIT_INGESTION,
        "not_found" => EXIT_NOT_FOUND,
        "invalid_rules" => EXIT_INVALID_RULES,
        _ => 1,
    }
}

fn serialize_payload<T: Serialize>(payload: &T) -> String {
    serde_json::to_string(payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
