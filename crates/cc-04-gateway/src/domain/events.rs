//! Live feed events, sent to subscribers as JSON text frames.

use serde::{Deserialize, Serialize};
use shared_types::FormId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedEvent {
    /// A form was committed.
    Submitted {
        form_id: String,
        height: u64,
        summary: String,
    },
    /// An indexed form was resolved.
    Resolved {
        form_id: String,
        height: u64,
        summary: String,
    },
}

impl FeedEvent {
    pub fn submitted(form_id: &FormId, height: u64, summary: String) -> Self {
        FeedEvent::Submitted {
            form_id: form_id.to_hex(),
            height,
            summary,
        }
    }

    pub fn resolved(form_id: &FormId, height: u64, summary: String) -> Self {
        FeedEvent::Resolved {
            form_id: form_id.to_hex(),
            height,
            summary,
        }
    }

    pub fn form_id(&self) -> &str {
        match self {
            FeedEvent::Submitted { form_id, .. } | FeedEvent::Resolved { form_id, .. } => form_id,
        }
    }

    pub fn height(&self) -> u64 {
        match self {
            FeedEvent::Submitted { height, .. } | FeedEvent::Resolved { height, .. } => *height,
        }
    }
}
