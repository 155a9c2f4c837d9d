//! # Form Entity
//!
//! A civic-issue report. Built by applying an ordered list of field setters
//! to an empty form; the first setter that fails aborts construction and no
//! partially built form is returned.

use super::catalogue::{details_for, Issue, ServiceDetail};
use super::details;
use super::errors::FormError;
use super::time::{format_timestamp, to_the_minute};
use crate::ports::clock::Clock;
use serde::{Deserialize, Serialize};
use shared_types::{FormId, FORM_ID_LEN, SUBMITTER_HEX_LEN};

const FIELD: &str = "<strong style='opacity:0.8;'>{label}</strong> <small>{value}</small><br>";
const MINI_FIELD: &str =
    "<strong style='opacity:0.8;'>{label}</strong> <really-small>{value}</really-small><br>";

/// Resolution state of a form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FormStatus {
    #[default]
    Unresolved,
    Resolved { at: String, by: String },
}

/// User-supplied fields for a new form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    pub issue: String,
    pub location: String,
    pub description: String,
    /// Hex identity of the submitter; `None` submits anonymously.
    pub submitter: Option<String>,
}

/// A civic-issue report.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Form {
    submitted_at: String,
    issue: String,
    location: String,
    description: String,
    submitter: Option<String>,
    status: FormStatus,
}

/// One field setter. Setters run in declaration order, so `Description`
/// sees the issue set by an earlier `Issue`.
enum Field {
    SubmittedAt(String),
    Issue(String),
    Location(String),
    Description(String),
    Submitter(String),
}

impl Field {
    fn apply(self, form: &mut Form) -> Result<(), FormError> {
        match self {
            Field::SubmittedAt(at) => {
                if at.trim().is_empty() {
                    return Err(FormError::MissingTimestamp);
                }
                form.submitted_at = at;
            }
            Field::Issue(issue) => {
                if Issue::parse(&issue).is_none() {
                    return Err(FormError::UnknownIssue(issue));
                }
                form.issue = issue;
            }
            Field::Location(location) => {
                if location.trim().is_empty() {
                    return Err(FormError::EmptyLocation);
                }
                form.location = location;
            }
            Field::Description(description) => {
                for schema in details_for(&form.issue) {
                    if details::mentions(&description, schema)
                        && details::read_option(&description, schema).is_none()
                    {
                        return Err(FormError::InvalidDetailOption {
                            detail: schema.detail,
                        });
                    }
                }
                form.description = description;
            }
            Field::Submitter(submitter) => {
                if submitter.len() != SUBMITTER_HEX_LEN
                    || !submitter.chars().all(|c| c.is_ascii_hexdigit())
                {
                    return Err(FormError::InvalidSubmitter(submitter.len()));
                }
                form.submitter = Some(submitter);
            }
        }
        Ok(())
    }
}

fn new_form(fields: impl IntoIterator<Item = Field>) -> Result<Form, FormError> {
    let mut form = Form::default();
    for field in fields {
        field.apply(&mut form)?;
    }
    Ok(form)
}

fn setters(submitted_at: String, fields: FormFields) -> Vec<Field> {
    let mut setters = vec![
        Field::SubmittedAt(submitted_at),
        Field::Issue(fields.issue),
        Field::Location(fields.location),
        Field::Description(fields.description),
    ];
    if let Some(submitter) = fields.submitter {
        setters.push(Field::Submitter(submitter));
    }
    setters
}

impl Form {
    /// Build an unresolved form stamped with `clock.now()`.
    pub fn make(fields: FormFields, clock: &dyn Clock) -> Result<Self, FormError> {
        Self::restore(format_timestamp(&clock.now()), fields)
    }

    /// Build an anonymous unresolved form stamped with `clock.now()`.
    pub fn make_anonymous(
        issue: impl Into<String>,
        location: impl Into<String>,
        description: impl Into<String>,
        clock: &dyn Clock,
    ) -> Result<Self, FormError> {
        Self::make(
            FormFields {
                issue: issue.into(),
                location: location.into(),
                description: description.into(),
                submitter: None,
            },
            clock,
        )
    }

    /// Build an unresolved form attributed to `submitter`.
    pub fn make_attributed(
        issue: impl Into<String>,
        location: impl Into<String>,
        description: impl Into<String>,
        submitter: impl Into<String>,
        clock: &dyn Clock,
    ) -> Result<Self, FormError> {
        Self::make(
            FormFields {
                issue: issue.into(),
                location: location.into(),
                description: description.into(),
                submitter: Some(submitter.into()),
            },
            clock,
        )
    }

    /// Rebuild an unresolved form from a recorded submission time, running
    /// the same validation as `make`.
    pub fn restore(submitted_at: String, fields: FormFields) -> Result<Self, FormError> {
        new_form(setters(submitted_at, fields))
    }

    pub fn submitted_at(&self) -> &str {
        &self.submitted_at
    }

    pub fn issue(&self) -> &str {
        &self.issue
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn submitter(&self) -> Option<&str> {
        self.submitter.as_deref()
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.status, FormStatus::Resolved { .. })
    }

    pub fn resolved_at(&self) -> Option<&str> {
        match &self.status {
            FormStatus::Resolved { at, .. } => Some(at),
            FormStatus::Unresolved => None,
        }
    }

    pub fn resolved_by(&self) -> Option<&str> {
        match &self.status {
            FormStatus::Resolved { by, .. } => Some(by),
            FormStatus::Unresolved => None,
        }
    }

    /// The submitted fields, without status.
    pub fn fields(&self) -> FormFields {
        FormFields {
            issue: self.issue.clone(),
            location: self.location.clone(),
            description: self.description.clone(),
            submitter: self.submitter.clone(),
        }
    }

    /// Mark the form resolved. The only mutator; succeeds at most once.
    pub fn resolve(&mut self, at: &str, by: &str) -> Result<(), FormError> {
        if self.is_resolved() {
            return Err(FormError::AlreadyResolved);
        }
        if at.trim().is_empty() || by.trim().is_empty() {
            return Err(FormError::MissingResolution);
        }
        self.status = FormStatus::Resolved {
            at: at.to_string(),
            by: by.to_string(),
        };
        Ok(())
    }

    /// XOR of the minute-truncated timestamp and the issue, each zero-padded
    /// or truncated to 16 bytes.
    pub fn id(&self) -> FormId {
        let mut bytes = [0u8; FORM_ID_LEN];
        for item in [to_the_minute(&self.submitted_at), self.issue.as_str()] {
            for (slot, b) in bytes.iter_mut().zip(item.as_bytes()) {
                *slot ^= b;
            }
        }
        FormId(bytes)
    }

    /// Decoded answers for every detail that applies to this form's issue.
    pub fn details(&self) -> Vec<(&'static ServiceDetail, &'static str)> {
        details_for(&self.issue)
            .iter()
            .filter_map(|sd| details::read_option(&self.description, sd).map(|opt| (sd, opt)))
            .collect()
    }

    /// HTML fragment, one line per populated field. Field values are
    /// HTML-escaped before they are placed in the template.
    pub fn summary(&self) -> String {
        let status = match &self.status {
            FormStatus::Unresolved => "unresolved".to_string(),
            FormStatus::Resolved { at, by } => format!(
                "resolved at {} by <really-small>{}</really-small>",
                escape(at),
                escape(by)
            ),
        };
        let mut summary = String::new();
        write_line(&mut summary, FIELD, "submitted", &escape(to_the_minute(&self.submitted_at)));
        write_line(&mut summary, FIELD, "issue", &escape(&self.issue));
        write_line(&mut summary, FIELD, "location", &escape(&self.location));
        write_line(&mut summary, FIELD, "description", &escape(&self.description));
        write_line(&mut summary, FIELD, "status", &status);
        if let Some(submitter) = self
            .submitter
            .as_deref()
            .filter(|s| s.len() == SUBMITTER_HEX_LEN)
        {
            write_line(&mut summary, MINI_FIELD, "submitter", submitter);
        }
        summary
    }
}

fn write_line(out: &mut String, template: &str, label: &str, value: &str) {
    out.push_str(&template.replace("{label}", label).replace("{value}", value));
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
