//! Payload records carried in `Tx::data`, one shape per transaction kind.
//!
//! | Kind | Payload |
//! |------|---------|
//! | CreateAccount | empty (citizen) or `0x01` (admin) |
//! | RemoveAccount | empty (self) or a 20-byte address |
//! | Submit | [`FormRecord`] |
//! | Resolve | [`ResolveRecord`] |

use super::errors::PayloadError;
use super::wire::{WireError, WireReader, WireWriter};
use cc_01_forms::{Form, FormFields};
use shared_types::{Address, FormId, FORM_ID_LEN};

const ADMIN_MARKER: u8 = 0x01;

/// Role requested by a CreateAccount transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountKind {
    #[default]
    Citizen,
    Admin,
}

impl AccountKind {
    pub fn encode(self) -> Vec<u8> {
        match self {
            AccountKind::Citizen => Vec::new(),
            AccountKind::Admin => vec![ADMIN_MARKER],
        }
    }

    pub fn decode(data: &[u8]) -> Result<Self, PayloadError> {
        match data {
            [] => Ok(AccountKind::Citizen),
            [ADMIN_MARKER] => Ok(AccountKind::Admin),
            other => Err(PayloadError::UnexpectedData(format!(
                "create_account expects 0 or 1 marker byte, got {}",
                hex::encode(other)
            ))),
        }
    }

    pub fn is_admin(self) -> bool {
        self == AccountKind::Admin
    }
}

/// Account removed by a RemoveAccount transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveTarget {
    /// The signer's own account.
    Own,
    /// Another account; requires an admin signer.
    Other(Address),
}

impl RemoveTarget {
    pub fn encode(&self) -> Vec<u8> {
        match self {
            RemoveTarget::Own => Vec::new(),
            RemoveTarget::Other(address) => address.to_vec(),
        }
    }

    pub fn decode(data: &[u8]) -> Result<Self, PayloadError> {
        if data.is_empty() {
            return Ok(RemoveTarget::Own);
        }
        Address::try_from(data)
            .map(RemoveTarget::Other)
            .map_err(|_| {
                PayloadError::UnexpectedData(format!(
                    "remove_account expects an empty payload or a 20-byte address, got {} bytes",
                    data.len()
                ))
            })
    }
}

/// Submit payload: the form's fields without status.
///
/// An empty `submitter` marks an anonymous form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRecord {
    pub submitted_at: String,
    pub issue: String,
    pub location: String,
    pub description: String,
    pub submitter: String,
}

impl FormRecord {
    pub fn from_form(form: &Form) -> Self {
        Self {
            submitted_at: form.submitted_at().to_string(),
            issue: form.issue().to_string(),
            location: form.location().to_string(),
            description: form.description().to_string(),
            submitter: form.submitter().unwrap_or_default().to_string(),
        }
    }

    /// Rebuild the unresolved form, rerunning field validation.
    pub fn into_form(self) -> Result<Form, PayloadError> {
        let submitter = (!self.submitter.is_empty()).then_some(self.submitter);
        Form::restore(
            self.submitted_at,
            FormFields {
                issue: self.issue,
                location: self.location,
                description: self.description,
                submitter,
            },
        )
        .map_err(|e| PayloadError::DecodeForm(e.to_string()))
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut w = WireWriter::new();
        w.put_str(&self.submitted_at)
            .put_str(&self.issue)
            .put_str(&self.location)
            .put_str(&self.description)
            .put_str(&self.submitter);
        w.into_bytes()
    }

    pub fn decode(data: &[u8]) -> Result<Self, PayloadError> {
        Self::read(data).map_err(|e| PayloadError::DecodeForm(e.to_string()))
    }

    fn read(data: &[u8]) -> Result<Self, WireError> {
        let mut r = WireReader::new(data);
        let record = Self {
            submitted_at: r.get_string()?,
            issue: r.get_string()?,
            location: r.get_string()?,
            description: r.get_string()?,
            submitter: r.get_string()?,
        };
        r.finish()?;
        Ok(record)
    }
}

/// Resolve payload: which form, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRecord {
    pub form_id: FormId,
    pub resolved_at: String,
}

impl ResolveRecord {
    pub fn encode(&self) -> Vec<u8> {
        let mut w = WireWriter::new();
        w.put_bytes(self.form_id.as_bytes()).put_str(&self.resolved_at);
        w.into_bytes()
    }

    pub fn decode(data: &[u8]) -> Result<Self, PayloadError> {
        let mut r = WireReader::new(data);
        let id = r
            .get_bytes()
            .map_err(|e| PayloadError::DecodingFormId(e.to_string()))?;
        let form_id = FormId::from_slice(&id).map_err(|_| {
            PayloadError::DecodingFormId(format!(
                "expected {FORM_ID_LEN} bytes, got {}",
                id.len()
            ))
        })?;
        let resolved_at = r
            .get_string()
            .map_err(|e| PayloadError::DecodingFormId(e.to_string()))?;
        r.finish()
            .map_err(|e| PayloadError::DecodingFormId(e.to_string()))?;
        Ok(Self {
            form_id,
            resolved_at,
        })
    }
}
