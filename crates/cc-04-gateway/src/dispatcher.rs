//! # Action Dispatcher
//!
//! Turns parsed actions into signed transactions and submits them to the
//! host.
//!
//! ```text
//! fields ──parse──→ request ──build──→ Tx{type, input, data}
//!                                        │ set_account, sequence, sign
//!                                        ↓
//!                              host.broadcast_tx ──→ TxAccepted | ActionError
//! ```
//!
//! A submission that times out may still commit; the host never forgets a
//! transaction it admitted.

use crate::domain::{
    AccountCreated, ActionError, FormView, RemoveRequest, ResolveRequest, SubmitRequest,
    TxAccepted,
};
use cc_01_forms::{format_timestamp, Clock, Form, FormFields};
use cc_02_transactions::{
    AccountKind, FormRecord, KeyPair, RemoveTarget, ResolveRecord, Tx, TxType,
};
use cc_03_host::{FormQuery, HostApi, HostError, HostInfo};
use shared_types::FormId;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct ActionDispatcher {
    host: Arc<dyn HostApi>,
    chain_id: String,
    clock: Arc<dyn Clock>,
    submission_timeout: Duration,
}

impl ActionDispatcher {
    pub fn new(
        host: Arc<dyn HostApi>,
        chain_id: impl Into<String>,
        clock: Arc<dyn Clock>,
        submission_timeout: Duration,
    ) -> Self {
        Self {
            host,
            chain_id: chain_id.into(),
            clock,
            submission_timeout,
        }
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// Generate a key pair and register it.
    pub async fn create_account(&self, kind: AccountKind) -> Result<AccountCreated, ActionError> {
        let key = KeyPair::generate();
        let tx_id = self
            .submit(&key, TxType::CreateAccount, 1, kind.encode())
            .await?;
        info!(address = %hex::encode(key.address()), admin = kind.is_admin(), "Account submitted");
        Ok(AccountCreated {
            address: hex::encode(key.address()),
            public_key: hex::encode(key.public_key()),
            secret_key: key.secret_hex(),
            tx_id,
        })
    }

    pub async fn remove_account(&self, request: RemoveRequest) -> Result<TxAccepted, ActionError> {
        let target = match request.target {
            Some(address) => RemoveTarget::Other(address),
            None => RemoveTarget::Own,
        };
        let sequence = self.next_sequence(&request.key).await?;
        let tx_id = self
            .submit(&request.key, TxType::RemoveAccount, sequence, target.encode())
            .await?;
        Ok(TxAccepted {
            tx_id,
            form_id: None,
        })
    }

    pub async fn submit_form(&self, request: SubmitRequest) -> Result<TxAccepted, ActionError> {
        let submitter = request.submitter();
        let form = Form::make(
            FormFields {
                issue: request.issue,
                location: request.location,
                description: request.description,
                submitter,
            },
            self.clock.as_ref(),
        )
        .map_err(|e| ActionError::bad_request(e.to_string()))?;
        let form_id = form.id();
        let sequence = self.next_sequence(&request.key).await?;
        let tx_id = self
            .submit(
                &request.key,
                TxType::Submit,
                sequence,
                FormRecord::from_form(&form).encode(),
            )
            .await?;
        info!(form_id = %form_id, issue = form.issue(), "Form submitted");
        Ok(TxAccepted {
            tx_id,
            form_id: Some(form_id.to_hex()),
        })
    }

    /// Resolve a form, stamped with the current time.
    pub async fn resolve_form(&self, request: ResolveRequest) -> Result<TxAccepted, ActionError> {
        let record = ResolveRecord {
            form_id: request.form_id,
            resolved_at: format_timestamp(&self.clock.now()),
        };
        let sequence = self.next_sequence(&request.key).await?;
        let tx_id = self
            .submit(&request.key, TxType::Resolve, sequence, record.encode())
            .await?;
        Ok(TxAccepted {
            tx_id,
            form_id: Some(request.form_id.to_hex()),
        })
    }

    pub async fn find_form(&self, id: &FormId) -> Result<FormView, ActionError> {
        self.host
            .find_form(id)
            .await
            .map(|form| FormView::new(id, &form))
            .ok_or_else(|| ActionError::NotFound(format!("form not found: {id}")))
    }

    pub async fn search_forms(&self, query: &FormQuery) -> Vec<FormView> {
        self.host
            .search_forms(query)
            .await
            .iter()
            .map(|(id, form)| FormView::new(id, form))
            .collect()
    }

    pub async fn info(&self) -> HostInfo {
        self.host.info().await
    }

    async fn next_sequence(&self, key: &KeyPair) -> Result<u64, ActionError> {
        let address = key.address();
        self.host.next_sequence(&address).await.ok_or_else(|| {
            ActionError::Rejected(HostError::UnknownAddress(hex::encode(address)).into())
        })
    }

    /// Sign and broadcast; returns the hex tx id.
    async fn submit(
        &self,
        key: &KeyPair,
        tx_type: TxType,
        sequence: u64,
        data: Vec<u8>,
    ) -> Result<String, ActionError> {
        let mut tx = Tx::new(tx_type, sequence, data);
        tx.set_account(&key.public_key());
        tx.sign(key, &self.chain_id);

        let reply = tokio::time::timeout(self.submission_timeout, self.host.broadcast_tx(tx.encode()))
            .await
            .map_err(|_| {
                warn!(tx_type = %tx_type, timeout = ?self.submission_timeout, "Submission timed out");
                ActionError::Timeout
            })?;
        let reply = ActionError::from_result(reply).map_err(|e| {
            debug!(tx_type = %tx_type, error = %e, "Host rejected tx");
            e
        })?;
        let tx_id = hex::encode(&reply.data);
        debug!(tx_type = %tx_type, sequence, tx_id = %tx_id, "Tx accepted");
        Ok(tx_id)
    }
}
