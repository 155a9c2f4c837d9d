//! # Host Result
//!
//! The `{ code, data, log }` reply returned by every host entry point
//! (`check_tx`, `deliver_tx`, queries) regardless of transport.

use crate::codes::ResultCode;
use serde::{Deserialize, Serialize};

/// Reply from the replicated state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostResult {
    /// Outcome code.
    pub code: ResultCode,
    /// Optional payload (query results, tx ids).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<u8>,
    /// Human-readable diagnostic.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub log: String,
}

impl HostResult {
    /// A successful reply with no payload.
    pub fn ok() -> Self {
        Self {
            code: ResultCode::Ok,
            data: Vec::new(),
            log: String::new(),
        }
    }

    /// A successful reply carrying `data`.
    pub fn ok_with_data(data: Vec<u8>) -> Self {
        Self {
            code: ResultCode::Ok,
            data,
            log: String::new(),
        }
    }

    pub fn error(code: ResultCode, log: impl Into<String>) -> Self {
        Self {
            code,
            data: Vec::new(),
            log: log.into(),
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code.is_ok()
    }

    /// Append a diagnostic, separated from any existing log by `; `.
    #[must_use]
    pub fn append_log(mut self, log: &str) -> Self {
        if self.log.is_empty() {
            self.log = log.to_string();
        } else {
            self.log = format!("{}; {}", self.log, log);
        }
        self
    }
}
