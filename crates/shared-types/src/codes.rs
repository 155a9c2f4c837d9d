//! # Result Codes
//!
//! The numeric code space carried by every host reply. Codes below 100 are
//! envelope and account level; 100-103 belong to forms; the remaining two are
//! account payload codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every outcome a transaction or query can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
#[repr(u32)]
pub enum ResultCode {
    Ok = 0,
    InternalError = 1,
    EncodingError = 2,
    InvalidInput = 3,
    InvalidSequence = 4,
    InvalidSignature = 5,
    UnknownAddress = 6,
    Unauthorized = 7,
    UnknownTxType = 8,
    MempoolFull = 9,
    DecodeForm = 100,
    FindForm = 101,
    FormAlreadyResolved = 102,
    DecodingFormId = 103,
    UnexpectedData = 1311,
    AccountAlreadyExists = 11311,
}

impl ResultCode {
    pub const ALL: [ResultCode; 16] = [
        ResultCode::Ok,
        ResultCode::InternalError,
        ResultCode::EncodingError,
        ResultCode::InvalidInput,
        ResultCode::InvalidSequence,
        ResultCode::InvalidSignature,
        ResultCode::UnknownAddress,
        ResultCode::Unauthorized,
        ResultCode::UnknownTxType,
        ResultCode::MempoolFull,
        ResultCode::DecodeForm,
        ResultCode::FindForm,
        ResultCode::FormAlreadyResolved,
        ResultCode::DecodingFormId,
        ResultCode::UnexpectedData,
        ResultCode::AccountAlreadyExists,
    ];

    pub fn as_u32(self) -> u32 {
        self as u32
    }

    pub fn from_u32(code: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_u32() == code)
    }

    pub fn is_ok(self) -> bool {
        self == ResultCode::Ok
    }

    pub fn name(self) -> &'static str {
        match self {
            ResultCode::Ok => "OK",
            ResultCode::InternalError => "InternalError",
            ResultCode::EncodingError => "EncodingError",
            ResultCode::InvalidInput => "InvalidInput",
            ResultCode::InvalidSequence => "InvalidSequence",
            ResultCode::InvalidSignature => "InvalidSignature",
            ResultCode::UnknownAddress => "UnknownAddress",
            ResultCode::Unauthorized => "Unauthorized",
            ResultCode::UnknownTxType => "UnknownTxType",
            ResultCode::MempoolFull => "MempoolFull",
            ResultCode::DecodeForm => "DecodeForm",
            ResultCode::FindForm => "FindForm",
            ResultCode::FormAlreadyResolved => "FormAlreadyResolved",
            ResultCode::DecodingFormId => "DecodingFormID",
            ResultCode::UnexpectedData => "UnexpectedData",
            ResultCode::AccountAlreadyExists => "AccountAlreadyExists",
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.as_u32())
    }
}

impl From<ResultCode> for u32 {
    fn from(code: ResultCode) -> Self {
        code.as_u32()
    }
}

impl TryFrom<u32> for ResultCode {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        ResultCode::from_u32(value).ok_or_else(|| format!("unknown result code {value}"))
    }
}
