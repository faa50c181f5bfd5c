pub mod activity;
pub mod backend;
pub mod commands;
pub mod config;
pub mod essay;
pub mod init;
pub mod learn;
pub mod portfolio;
pub mod profile;
pub mod status;

pub use commands::*;

use tracing::debug;

use crate::api::ApiClient;
use crate::config::DeskConfig;
use crate::error::DeskError;
use crate::output;

/// Settings shared by every command handler.
pub struct Context {
    pub json: bool,
    pub config: DeskConfig,
}

impl Context {
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.config)
    }

    pub fn student(&self) -> &str {
        &self.config.student_id
    }
}

/// Turn a handler result into an exit code, printing the error envelope.
pub fn report(result: Result<i32, DeskError>, json_output: bool) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            debug!(code = e.code.as_str(), "command failed");
            if json_output {
                output::json::print(&output::json::error(&e));
            } else {
                eprintln!("Error: {}", e.message);
            }
            1
        }
    }
}

/// Split `KEY=VALUE`.
pub(crate) fn parse_pair(raw: &str, what: &str) -> Result<(String, String), DeskError> {
    match raw.split_once('=') {
        Some((k, v)) if !k.trim().is_empty() && !v.trim().is_empty() => {
            Ok((k.trim().to_string(), v.trim().to_string()))
        }
        _ => Err(DeskError::validation(format!("{what} must look like KEY=VALUE, got '{raw}'"))),
    }
}
