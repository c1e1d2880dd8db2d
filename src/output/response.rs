//! CLI error reporting.
//!
//! Renders errors for humans on stderr and maps error codes to exit statuses.

use std::io::{self, Write};

use hotpot::{Error, ErrorCode};

/// Render an error as the lines printed on stderr.
pub fn render_error(err: &Error) -> String {
    let mut out = format!("Error [{}]: {}\n", err.code.as_str(), err.message);

    let has_details = match &err.details {
        serde_json::Value::Null => false,
        serde_json::Value::Object(map) => !map.is_empty(),
        _ => true,
    };
    if has_details {
        let details = serde_json::to_string_pretty(&err.details)
            .unwrap_or_else(|_| err.details.to_string());
        for line in details.lines() {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
    }

    for hint in &err.hints {
        out.push_str(&format!("Hint: {}\n", hint.message));
    }

    out
}

pub fn print_error(err: &Error) {
    let stderr = io::stderr();
    let mut handle = stderr.lock();
    // Nothing left to report to if stderr itself is gone
    let _ = handle.write_all(render_error(err).as_bytes());
}

pub fn exit_code_for_error(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::ConfigInvalidJson
        | ErrorCode::ConfigInvalidValue
        | ErrorCode::ValidationInvalidArgument => 2,

        ErrorCode::TemplateNotFound => 4,

        ErrorCode::TemplateFetchFailed | ErrorCode::GitCommandFailed => 20,

        ErrorCode::ManifestInvalidJson
        | ErrorCode::InternalIoError
        | ErrorCode::InternalJsonError
        | ErrorCode::InternalUnexpected => 1,
    }
}
