//! # Form and Envelope Scenarios
//!
//! Each scenario builds a domain object in cc-01, carries it through the
//! cc-02 envelope and lets the cc-03 host accept or reject it.
//!
//! | # | Scenario | Crates |
//! |---|----------|--------|
//! | 1 | anonymous pothole form, detail read-back | 01, 02, 03 |
//! | 2 | attributed form, submitter line | 01, 02, 03 |
//! | 3 | resolve once, then `AlreadyResolved` | 01, 02, 03 |
//! | 4 | 19-byte address | 02, 03 |
//! | 5 | key presence vs sequence | 02, 03 |
//! | 6 | sign-bytes leave the signature in place | 02 |

#[cfg(test)]
mod tests {
    use crate::integration::{signed, CHAIN_ID, FIXED_NOW};
    use cc_01_forms::{read, write, FixedClock, Form, FormError, POTHOLE_LOCATION};
    use cc_02_transactions::domain::keys::ripemd160;
    use cc_02_transactions::{
        sign_bytes, tx_id, AccountKind, FormRecord, KeyPair, ResolveRecord, Tx, TxType,
        ValidationError,
    };
    use cc_03_host::{HostApi, HostConfig, HostService};
    use proptest::prelude::*;
    use shared_types::{HostResult, ResultCode};

    // =========================================================================
    // FIXTURES
    // =========================================================================

    fn host() -> HostService {
        HostService::open(HostConfig {
            chain_id: CHAIN_ID.into(),
            ..Default::default()
        })
        .unwrap()
    }

    fn clock() -> FixedClock {
        FixedClock::parse(FIXED_NOW).unwrap()
    }

    /// Create and commit an account for `key`.
    fn open_account(host: &HostService, key: &KeyPair, kind: AccountKind) {
        let tx = signed(TxType::CreateAccount, 1, kind.encode(), key);
        host.deliver(&tx.encode()).unwrap();
        host.commit().unwrap();
    }

    fn submit(host: &HostService, key: &KeyPair, sequence: u64, form: &Form) -> HostResult {
        let tx = signed(TxType::Submit, sequence, FormRecord::from_form(form).encode(), key);
        let result = host.deliver(&tx.encode()).map(|_| ()).map_err(HostResult::from);
        host.commit().unwrap();
        result.err().unwrap_or_else(HostResult::ok)
    }

    fn resolve(host: &HostService, key: &KeyPair, sequence: u64, form: &Form) -> HostResult {
        let record = ResolveRecord {
            form_id: form.id(),
            resolved_at: "2024-01-01 12:00".into(),
        };
        let tx = signed(TxType::Resolve, sequence, record.encode(), key);
        let result = host.deliver(&tx.encode()).map(|_| ()).map_err(HostResult::from);
        host.commit().unwrap();
        result.err().unwrap_or_else(HostResult::ok)
    }

    fn pothole(clock: &FixedClock) -> Form {
        Form::make_anonymous("pothole", "Main St", "pothole location {curb lane}", clock).unwrap()
    }

    // =========================================================================
    // SCENARIO 1: ANONYMOUS FORM
    // =========================================================================

    #[tokio::test]
    async fn test_anonymous_pothole_form() {
        let form = pothole(&clock());
        assert_eq!(write("curb lane", &POTHOLE_LOCATION), form.description());
        assert_eq!(read(form.description(), &POTHOLE_LOCATION), "curb lane");
        assert!(!form.summary().contains("submitter"));

        let host = host();
        let citizen = KeyPair::from_seed([1; 32]);
        open_account(&host, &citizen, AccountKind::Citizen);
        assert!(submit(&host, &citizen, 2, &form).is_ok());

        let stored = host.find_form(&form.id()).await.unwrap();
        assert_eq!(stored.submitter(), None);
        assert_eq!(stored.details(), vec![(&POTHOLE_LOCATION, "curb lane")]);
        assert!(!stored.is_resolved());
    }

    // =========================================================================
    // SCENARIO 2: ATTRIBUTED FORM
    // =========================================================================

    #[tokio::test]
    async fn test_attributed_form_carries_submitter() {
        let host = host();
        let citizen = KeyPair::from_seed([2; 32]);
        let stranger = KeyPair::from_seed([3; 32]);
        open_account(&host, &citizen, AccountKind::Citizen);
        open_account(&host, &stranger, AccountKind::Citizen);

        let submitter = hex::encode(citizen.public_key());
        assert_eq!(submitter.len(), 64);
        let form = Form::make_attributed("graffiti removal", "5th Ave", "", &submitter, &clock())
            .unwrap();
        assert!(form.summary().contains("submitter"));
        assert!(form.summary().contains(&submitter));

        let impostor = submit(&host, &stranger, 2, &form);
        assert_eq!(impostor.code, ResultCode::Unauthorized);

        assert!(submit(&host, &citizen, 2, &form).is_ok());
        let stored = host.find_form(&form.id()).await.unwrap();
        assert_eq!(stored.submitter(), Some(submitter.as_str()));
    }

    // =========================================================================
    // SCENARIO 3: RESOLVE MONOTONICITY
    // =========================================================================

    #[test]
    fn test_resolve_twice_in_domain() {
        let mut form = pothole(&clock());
        form.resolve("2024-01-01 12:00", "0xABCD").unwrap();
        assert_eq!(form.resolve("2024-01-02 09:00", "0xEF01"), Err(FormError::AlreadyResolved));
        assert_eq!(form.resolved_at(), Some("2024-01-01 12:00"));
        assert_eq!(form.resolved_by(), Some("0xABCD"));
    }

    #[tokio::test]
    async fn test_resolve_twice_on_host() {
        let host = host();
        let admin = KeyPair::from_seed([4; 32]);
        let citizen = KeyPair::from_seed([5; 32]);
        open_account(&host, &admin, AccountKind::Admin);
        open_account(&host, &citizen, AccountKind::Citizen);
        let form = pothole(&clock());
        assert!(submit(&host, &citizen, 2, &form).is_ok());

        assert_eq!(resolve(&host, &citizen, 3, &form).code, ResultCode::Unauthorized);
        assert!(resolve(&host, &admin, 2, &form).is_ok());
        let again = resolve(&host, &admin, 3, &form);
        assert_eq!(again.code, ResultCode::FormAlreadyResolved);
        assert_eq!(again.code.as_u32(), 102);

        let stored = host.find_form(&form.id()).await.unwrap();
        assert_eq!(stored.resolved_at(), Some("2024-01-01 12:00"));
        assert_eq!(stored.resolved_by(), Some(hex::encode(admin.address()).as_str()));
    }

    #[tokio::test]
    async fn test_resolve_unknown_form() {
        let host = host();
        let admin = KeyPair::from_seed([6; 32]);
        open_account(&host, &admin, AccountKind::Admin);
        let never_submitted = pothole(&clock());
        assert_eq!(resolve(&host, &admin, 2, &never_submitted).code, ResultCode::FindForm);
    }

    // =========================================================================
    // SCENARIO 4: ADDRESS WIDTH
    // =========================================================================

    #[test]
    fn test_short_address_rejected() {
        let key = KeyPair::from_seed([7; 32]);
        let mut tx = Tx::new(TxType::Submit, 1, FormRecord::from_form(&pothole(&clock())).encode());
        tx.set_account(&key.public_key());
        tx.input.address.truncate(19);
        tx.sign(&key, CHAIN_ID);

        assert_eq!(
            tx.input.validate_basic(),
            Err(ValidationError::InvalidAddressLength(19))
        );

        let err = host().check(&tx.encode()).unwrap_err();
        assert_eq!(err.code(), ResultCode::InvalidInput);
        assert!(HostResult::from(err).log.contains("Invalid address length: 19"));
    }

    // =========================================================================
    // SCENARIO 5: KEY PRESENCE
    // =========================================================================

    #[test]
    fn test_public_key_must_match_sequence() {
        let key = KeyPair::from_seed([8; 32]);

        let mut first = Tx::new(TxType::CreateAccount, 1, AccountKind::Citizen.encode());
        first.set_account(&key.public_key());
        first.input.public_key = None;
        assert_eq!(first.input.validate_basic(), Err(ValidationError::MissingPubKey));

        let mut later = first.clone();
        later.input.sequence = 2;
        later.input.public_key = Some(key.public_key());
        assert_eq!(later.input.validate_basic(), Err(ValidationError::UnexpectedPubKey));

        for tx in [first, later] {
            let err = host().check(&tx.encode()).unwrap_err();
            assert_eq!(err.code(), ResultCode::InvalidInput);
        }
    }

    // =========================================================================
    // SCENARIO 6: SIGN-BYTES
    // =========================================================================

    #[test]
    fn test_sign_bytes_restore_signature() {
        let key = KeyPair::from_seed([9; 32]);
        let tx = signed(TxType::CreateAccount, 1, vec![], &key);
        let signature = tx.input.signature;
        assert!(signature.is_some());

        let bytes = sign_bytes(CHAIN_ID, &tx);
        assert_eq!(tx.input.signature, signature);

        let mut unsigned = tx.clone();
        unsigned.input.signature = None;
        assert!(bytes.ends_with(&unsigned.encode()));
        assert_eq!(bytes, sign_bytes(CHAIN_ID, &unsigned));

        let id = tx_id(CHAIN_ID, &tx);
        assert_eq!(id.as_bytes(), &ripemd160(&bytes));
        tx.verify_signature(&key.public_key(), CHAIN_ID).unwrap();
        assert!(tx.verify_signature(&key.public_key(), "other-chain").is_err());
    }

    proptest! {
        #[test]
        fn prop_sign_bytes_ignore_signature(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
            let key = KeyPair::from_seed([10; 32]);
            let tx = signed(TxType::Submit, 1, a.to_vec(), &key);

            let mut resigned = tx.clone();
            let mut forged = [0u8; 64];
            forged[..32].copy_from_slice(&b);
            resigned.set_signature(forged);

            prop_assert_eq!(tx.sign_bytes(CHAIN_ID), resigned.sign_bytes(CHAIN_ID));
            prop_assert_eq!(tx.id(CHAIN_ID), resigned.id(CHAIN_ID));
        }
    }
}
