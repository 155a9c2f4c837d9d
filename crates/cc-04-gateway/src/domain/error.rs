//! Gateway error types.
//!
//! `ActionError` is what a request handler fails with; its HTTP status is
//! derived from the host result code:
//!
//! | Outcome | Status |
//! |---------|--------|
//! | Unparseable request, bad form fields | 400 |
//! | `InvalidInput` `InvalidSequence` `InvalidSignature` `UnknownAddress` `EncodingError` `UnknownTxType` | 400 |
//! | `FindForm` | 404 |
//! | `Unauthorized` | 403 |
//! | `DecodeForm` `FormAlreadyResolved` `DecodingFormID` `UnexpectedData` `AccountAlreadyExists` | 409 |
//! | `MempoolFull` `InternalError` | 503 |
//! | Submission timed out | 504 |

use axum::http::StatusCode;
use serde::Serialize;
use shared_types::{HostResult, ResultCode};
use thiserror::Error;

/// Request-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Request fields could not be parsed or validated.
    #[error("{0}")]
    BadRequest(String),

    /// Query target does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The host replied with a non-OK code.
    #[error("{}", .0.log)]
    Rejected(HostResult),

    /// The host did not reply within the submission timeout.
    #[error("submission timed out")]
    Timeout,
}

/// JSON body of an error reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: Option<u32>,
    pub name: Option<&'static str>,
}

impl ActionError {
    pub fn bad_request(details: impl Into<String>) -> Self {
        ActionError::BadRequest(details.into())
    }

    /// Builds a rejection from a host reply; OK replies are not errors.
    pub fn from_result(result: HostResult) -> Result<HostResult, Self> {
        if result.is_ok() {
            Ok(result)
        } else {
            Err(ActionError::Rejected(result))
        }
    }

    pub fn code(&self) -> Option<ResultCode> {
        match self {
            ActionError::Rejected(result) => Some(result.code),
            _ => None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ActionError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ActionError::NotFound(_) => StatusCode::NOT_FOUND,
            ActionError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ActionError::Rejected(result) => status_for(result.code),
        }
    }

    pub fn body(&self) -> ErrorBody {
        let code = self.code();
        ErrorBody {
            error: self.to_string(),
            code: code.map(ResultCode::as_u32),
            name: code.map(ResultCode::name),
        }
    }
}

fn status_for(code: ResultCode) -> StatusCode {
    match code {
        ResultCode::Ok => StatusCode::OK,
        ResultCode::EncodingError
        | ResultCode::InvalidInput
        | ResultCode::InvalidSequence
        | ResultCode::InvalidSignature
        | ResultCode::UnknownAddress
        | ResultCode::UnknownTxType => StatusCode::BAD_REQUEST,
        ResultCode::FindForm => StatusCode::NOT_FOUND,
        ResultCode::Unauthorized => StatusCode::FORBIDDEN,
        ResultCode::DecodeForm
        | ResultCode::FormAlreadyResolved
        | ResultCode::DecodingFormId
        | ResultCode::UnexpectedData
        | ResultCode::AccountAlreadyExists => StatusCode::CONFLICT,
        ResultCode::MempoolFull | ResultCode::InternalError => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Gateway lifecycle errors
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Server terminated with an error
    #[error("server error: {0}")]
    Server(String),
}
