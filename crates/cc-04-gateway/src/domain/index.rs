//! # Feed Index
//!
//! In-memory cache of committed forms, keyed by form id. Owned by the commit
//! worker and mutated only from it, so it carries no lock.
//!
//! After a restart it is rebuilt from the host's replayed history before
//! any new commit reaches it.

use super::events::FeedEvent;
use cc_01_forms::Form;
use cc_03_host::{CommittedTx, Effect};
use shared_types::FormId;
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct FeedIndex {
    forms: HashMap<FormId, Form>,
}

impl FeedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one committed transaction into the index, returning the event
    /// to publish, if any.
    pub fn apply(&mut self, committed: &CommittedTx) -> Option<FeedEvent> {
        match &committed.effect {
            Effect::Submit { form_id, form, .. } => {
                if self.forms.insert(*form_id, form.clone()).is_some() {
                    debug!(form_id = %form_id, "Form id collision, replacing indexed form");
                }
                Some(FeedEvent::submitted(form_id, committed.height, form.summary()))
            }
            Effect::Resolve {
                form_id,
                resolved_at,
                resolved_by,
                ..
            } => {
                let Some(form) = self.forms.get_mut(form_id) else {
                    warn!(form_id = %form_id, "Resolved form missing from feed index");
                    return None;
                };
                if let Err(e) = form.resolve(resolved_at, resolved_by) {
                    warn!(form_id = %form_id, error = %e, "Indexed form rejected resolution");
                    return None;
                }
                Some(FeedEvent::resolved(form_id, committed.height, form.summary()))
            }
            Effect::CreateAccount { .. } | Effect::RemoveAccount { .. } => None,
        }
    }

    pub fn get(&self, id: &FormId) -> Option<&Form> {
        self.forms.get(id)
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}
