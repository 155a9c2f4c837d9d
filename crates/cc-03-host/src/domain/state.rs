//! # Application State
//!
//! Accounts keyed by address and forms keyed by form id. Execution is split
//! in two: [`AppState::check`] validates a transaction against the state and
//! returns the [`Effect`] it would have, [`AppState::apply`] performs it.
//! A rejected transaction therefore never changes state.

use super::accounts::Account;
use super::errors::HostError;
use cc_01_forms::Form;
use cc_02_transactions::{
    address_of, AccountKind, FormRecord, RemoveTarget, ResolveRecord, Tx, TxError, TxType,
    ValidationError,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::{Address, FormId, Hash};
use std::collections::BTreeMap;

/// Admission policy knobs that are not part of the data.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rules {
    /// Allow admin registration even once an admin exists.
    pub open_admin_registration: bool,
}

/// The state change a validated transaction performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CreateAccount {
        address: Address,
        account: Account,
    },
    RemoveAccount {
        signer: Address,
        target: Address,
    },
    Submit {
        signer: Address,
        form_id: FormId,
        form: Form,
    },
    Resolve {
        signer: Address,
        form_id: FormId,
        resolved_at: String,
        resolved_by: String,
    },
}

/// Form status filter for searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    Resolved,
    Unresolved,
}

impl StatusFilter {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "resolved" => Some(StatusFilter::Resolved),
            "unresolved" => Some(StatusFilter::Unresolved),
            _ => None,
        }
    }

    fn matches(self, form: &Form) -> bool {
        match self {
            StatusFilter::Resolved => form.is_resolved(),
            StatusFilter::Unresolved => !form.is_resolved(),
        }
    }
}

/// Search criteria; `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormQuery {
    pub issue: Option<String>,
    pub status: Option<StatusFilter>,
}

impl FormQuery {
    pub fn matches(&self, form: &Form) -> bool {
        self.issue.as_deref().map_or(true, |issue| form.issue() == issue)
            && self.status.map_or(true, |status| status.matches(form))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    accounts: BTreeMap<Address, Account>,
    forms: BTreeMap<FormId, Form>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }

    pub fn form(&self, id: &FormId) -> Option<&Form> {
        self.forms.get(id)
    }

    pub fn search(&self, query: &FormQuery) -> Vec<(FormId, Form)> {
        self.forms
            .iter()
            .filter(|(_, form)| query.matches(form))
            .map(|(id, form)| (*id, form.clone()))
            .collect()
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn form_count(&self) -> usize {
        self.forms.len()
    }

    fn has_admin(&self) -> bool {
        self.accounts.values().any(|a| a.admin)
    }

    /// Validate `tx` against this state without changing it.
    pub fn check(&self, tx: &Tx, chain_id: &str, rules: Rules) -> Result<Effect, HostError> {
        tx.validate_basic()?;
        let address: Address = tx.input.address.as_slice().try_into().map_err(|_| {
            TxError::Invalid(ValidationError::InvalidAddressLength(tx.input.address.len()))
        })?;

        match tx.tx_type {
            TxType::CreateAccount => self.check_create(tx, address, chain_id, rules),
            TxType::RemoveAccount => {
                let account = self.signer(tx, &address, chain_id)?;
                self.check_remove(tx, address, account)
            }
            TxType::Submit => check_submit(tx, address, self.signer(tx, &address, chain_id)?),
            TxType::Resolve => {
                let account = self.signer(tx, &address, chain_id)?;
                self.check_resolve(tx, address, account)
            }
        }
    }

    /// The existing account signing `tx`, after sequence and signature checks.
    fn signer(&self, tx: &Tx, address: &Address, chain_id: &str) -> Result<&Account, HostError> {
        let account = self
            .accounts
            .get(address)
            .ok_or_else(|| HostError::UnknownAddress(hex::encode(address)))?;
        let expected = account.next_sequence();
        if tx.input.sequence != expected {
            return Err(HostError::InvalidSequence {
                expected,
                actual: tx.input.sequence,
            });
        }
        tx.verify_signature(&account.public_key, chain_id)?;
        Ok(account)
    }

    fn check_create(
        &self,
        tx: &Tx,
        address: Address,
        chain_id: &str,
        rules: Rules,
    ) -> Result<Effect, HostError> {
        let kind = AccountKind::decode(&tx.data)?;
        if tx.input.sequence != 1 {
            return Err(HostError::InvalidSequence {
                expected: 1,
                actual: tx.input.sequence,
            });
        }
        let public_key = tx
            .input
            .public_key
            .ok_or(TxError::Invalid(ValidationError::MissingPubKey))?;
        if address_of(&public_key) != address {
            return Err(HostError::AddressMismatch);
        }
        tx.verify_signature(&public_key, chain_id)?;
        if self.accounts.contains_key(&address) {
            return Err(HostError::AccountAlreadyExists(hex::encode(address)));
        }
        if kind.is_admin() && !rules.open_admin_registration && self.has_admin() {
            return Err(HostError::Unauthorized(
                "admin registration is closed".to_string(),
            ));
        }
        Ok(Effect::CreateAccount {
            address,
            account: Account::new(public_key, kind.is_admin()),
        })
    }

    fn check_remove(
        &self,
        tx: &Tx,
        signer: Address,
        account: &Account,
    ) -> Result<Effect, HostError> {
        let target = match RemoveTarget::decode(&tx.data)? {
            RemoveTarget::Own => signer,
            RemoveTarget::Other(target) if target == signer => signer,
            RemoveTarget::Other(target) => {
                if !account.admin {
                    return Err(HostError::Unauthorized(
                        "only admins may remove other accounts".to_string(),
                    ));
                }
                if !self.accounts.contains_key(&target) {
                    return Err(HostError::UnknownAddress(hex::encode(target)));
                }
                target
            }
        };
        Ok(Effect::RemoveAccount { signer, target })
    }

    fn check_resolve(
        &self,
        tx: &Tx,
        signer: Address,
        account: &Account,
    ) -> Result<Effect, HostError> {
        let record = ResolveRecord::decode(&tx.data)?;
        if !account.admin {
            return Err(HostError::Unauthorized(
                "only admins may resolve forms".to_string(),
            ));
        }
        let form = self
            .forms
            .get(&record.form_id)
            .ok_or(HostError::FormNotFound(record.form_id))?;
        if form.is_resolved() {
            return Err(HostError::FormAlreadyResolved(record.form_id));
        }
        if record.resolved_at.trim().is_empty() {
            return Err(HostError::InvalidResolution(
                "missing resolution time".to_string(),
            ));
        }
        Ok(Effect::Resolve {
            signer,
            form_id: record.form_id,
            resolved_at: record.resolved_at,
            resolved_by: hex::encode(signer),
        })
    }

    /// Perform an effect produced by [`AppState::check`] on this state.
    pub fn apply(&mut self, effect: &Effect) -> Result<(), HostError> {
        match effect {
            Effect::CreateAccount { address, account } => {
                self.accounts.insert(*address, *account);
            }
            Effect::RemoveAccount { signer, target } => {
                self.bump(signer);
                self.accounts.remove(target);
            }
            Effect::Submit {
                signer,
                form_id,
                form,
            } => {
                self.forms.insert(*form_id, form.clone());
                self.bump(signer);
            }
            Effect::Resolve {
                signer,
                form_id,
                resolved_at,
                resolved_by,
            } => {
                let form = self
                    .forms
                    .get_mut(form_id)
                    .ok_or(HostError::FormNotFound(*form_id))?;
                form.resolve(resolved_at, resolved_by)
                    .map_err(|_| HostError::FormAlreadyResolved(*form_id))?;
                self.bump(signer);
            }
        }
        Ok(())
    }

    /// Check then apply.
    pub fn execute(&mut self, tx: &Tx, chain_id: &str, rules: Rules) -> Result<Effect, HostError> {
        let effect = self.check(tx, chain_id, rules)?;
        self.apply(&effect)?;
        Ok(effect)
    }

    fn bump(&mut self, address: &Address) {
        if let Some(account) = self.accounts.get_mut(address) {
            account.sequence += 1;
        }
    }

    /// SHA-256 over `height` and every account and form in key order.
    pub fn app_hash(&self, height: u64) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(height.to_be_bytes());
        for (address, account) in &self.accounts {
            hasher.update(address);
            hasher.update(account.public_key);
            hasher.update(account.sequence.to_be_bytes());
            hasher.update([account.admin as u8]);
        }
        for (id, form) in &self.forms {
            hasher.update(id.as_bytes());
            for field in [
                form.submitted_at(),
                form.issue(),
                form.location(),
                form.description(),
                form.submitter().unwrap_or_default(),
                form.resolved_at().unwrap_or_default(),
                form.resolved_by().unwrap_or_default(),
            ] {
                hasher.update((field.len() as u64).to_be_bytes());
                hasher.update(field.as_bytes());
            }
        }
        hasher.finalize().into()
    }
}

fn check_submit(tx: &Tx, signer: Address, account: &Account) -> Result<Effect, HostError> {
    let form = FormRecord::decode(&tx.data)?.into_form()?;
    if let Some(submitter) = form.submitter() {
        if !submitter.eq_ignore_ascii_case(&account.public_key_hex()) {
            return Err(HostError::Unauthorized(
                "submitter does not match signer".to_string(),
            ));
        }
    }
    Ok(Effect::Submit {
        signer,
        form_id: form.id(),
        form,
    })
}
