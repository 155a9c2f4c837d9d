//! # Action Requests
//!
//! Parses submitted form fields into typed actions and defines the JSON
//! replies. Field values arrive as a flat string map, so every action is
//! parsed the same way and a malformed request is always a 400.
//!
//! `submit_form` accepts one optional field per service detail, named by
//! the detail question (`pothole location=curb lane`). Each chosen option is
//! appended to the description as `<detail> {<option>}` on its own line.

use super::error::ActionError;
use cc_01_forms::{details_for, write, Form, FormStatus};
use cc_02_transactions::KeyPair;
use cc_03_host::{FormQuery, StatusFilter};
use serde::{Deserialize, Serialize};
use shared_types::{parse_address, Address, FormId};
use std::collections::HashMap;

/// Raw form or query fields.
pub type Fields = HashMap<String, String>;

fn required<'a>(fields: &'a Fields, name: &str) -> Result<&'a str, ActionError> {
    fields
        .get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ActionError::bad_request(format!("missing field: {name}")))
}

fn optional<'a>(fields: &'a Fields, name: &str) -> Option<&'a str> {
    fields.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn flag(fields: &Fields, name: &str) -> bool {
    matches!(optional(fields, name), Some("on" | "true" | "yes" | "1"))
}

fn signing_key(fields: &Fields) -> Result<KeyPair, ActionError> {
    let secret = required(fields, "secret_key")?;
    KeyPair::from_secret_hex(secret).map_err(|e| ActionError::bad_request(e.to_string()))
}

fn form_id(fields: &Fields) -> Result<FormId, ActionError> {
    let raw = required(fields, "form_id")?;
    raw.parse()
        .map_err(|e| ActionError::bad_request(format!("invalid form_id: {e}")))
}

/// `remove_account` and `remove_admin`.
#[derive(Debug)]
pub struct RemoveRequest {
    pub key: KeyPair,
    /// Account to remove; `None` removes the signer's own account.
    pub target: Option<Address>,
}

impl RemoveRequest {
    /// Remove the signer's own account.
    pub fn own(fields: &Fields) -> Result<Self, ActionError> {
        Ok(Self {
            key: signing_key(fields)?,
            target: None,
        })
    }

    /// Remove the account at `address`, signed by an admin.
    pub fn other(fields: &Fields) -> Result<Self, ActionError> {
        let key = signing_key(fields)?;
        let address = required(fields, "address")?;
        let target = parse_address(address)
            .map_err(|e| ActionError::bad_request(format!("invalid address: {e}")))?;
        Ok(Self {
            key,
            target: Some(target),
        })
    }
}

#[derive(Debug)]
pub struct SubmitRequest {
    pub key: KeyPair,
    pub issue: String,
    pub location: String,
    /// Free text with the chosen detail options already embedded.
    pub description: String,
    pub anonymous: bool,
}

impl SubmitRequest {
    pub fn parse(fields: &Fields) -> Result<Self, ActionError> {
        let key = signing_key(fields)?;
        let issue = required(fields, "issue")?.to_string();
        let location = required(fields, "location")?.to_string();
        let mut description = optional(fields, "description")
            .unwrap_or_default()
            .to_string();
        for schema in details_for(&issue) {
            let Some(option) = optional(fields, schema.detail) else {
                continue;
            };
            if !schema.allows(option) {
                return Err(ActionError::bad_request(format!(
                    "invalid option for '{}': {option}",
                    schema.detail
                )));
            }
            if !description.is_empty() {
                description.push('\n');
            }
            description.push_str(&write(option, schema));
        }
        Ok(Self {
            key,
            issue,
            location,
            description,
            anonymous: flag(fields, "anonymous"),
        })
    }

    /// Hex identity recorded on the form; anonymous submissions have none.
    pub fn submitter(&self) -> Option<String> {
        (!self.anonymous).then(|| hex::encode(self.key.public_key()))
    }
}

#[derive(Debug)]
pub struct ResolveRequest {
    pub key: KeyPair,
    pub form_id: FormId,
}

impl ResolveRequest {
    pub fn parse(fields: &Fields) -> Result<Self, ActionError> {
        Ok(Self {
            key: signing_key(fields)?,
            form_id: form_id(fields)?,
        })
    }
}

/// `find_form?form_id=`
pub fn parse_find(fields: &Fields) -> Result<FormId, ActionError> {
    form_id(fields)
}

/// `search_forms?issue=&status=`
pub fn parse_search(fields: &Fields) -> Result<FormQuery, ActionError> {
    let status = optional(fields, "status")
        .map(|s| {
            StatusFilter::parse(s)
                .ok_or_else(|| ActionError::bad_request(format!("invalid status: {s}")))
        })
        .transpose()?;
    Ok(FormQuery {
        issue: optional(fields, "issue").map(str::to_string),
        status,
    })
}

/// Reply to `create_account` and `create_admin`. The secret key is only
/// ever returned here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCreated {
    pub address: String,
    pub public_key: String,
    pub secret_key: String,
    pub tx_id: String,
}

/// Reply to an accepted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxAccepted {
    pub tx_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
}

/// A stored form as returned by the query routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormView {
    pub form_id: String,
    pub submitted_at: String,
    pub issue: String,
    pub location: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitter: Option<String>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<String>,
    /// HTML fragment for the feed and search pages.
    pub summary: String,
}

impl FormView {
    pub fn new(id: &FormId, form: &Form) -> Self {
        let status = match form.status() {
            FormStatus::Unresolved => "unresolved",
            FormStatus::Resolved { .. } => "resolved",
        };
        Self {
            form_id: id.to_hex(),
            submitted_at: form.submitted_at().to_string(),
            issue: form.issue().to_string(),
            location: form.location().to_string(),
            description: form.description().to_string(),
            submitter: form.submitter().map(str::to_string),
            status: status.to_string(),
            resolved_at: form.resolved_at().map(str::to_string),
            resolved_by: form.resolved_by().map(str::to_string),
            summary: form.summary(),
        }
    }
}
