//! # Civic-Chain Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | cc-01 Forms | detail write / read, form construction |
//! | cc-02 Transactions | sign-bytes, tx id, Ed25519 verify, decode |
//! | cc-03 Host | deliver + commit of a block of submissions |

use cc_01_forms::{read, write, FixedClock, Form, POTHOLE_LOCATION};
use cc_02_transactions::{AccountKind, FormRecord, KeyPair, Tx, TxType};
use cc_03_host::{HostConfig, HostService};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

const CHAIN_ID: &str = "bench-chain";

fn signed(tx_type: TxType, sequence: u64, data: Vec<u8>, key: &KeyPair) -> Tx {
    let mut tx = Tx::new(tx_type, sequence, data);
    tx.set_account(&key.public_key());
    tx.sign(key, CHAIN_ID);
    tx
}

// ============================================================================
// CC-01: Detail codec and form construction
// ============================================================================

fn bench_forms(c: &mut Criterion) {
    let mut group = c.benchmark_group("cc-01-forms");
    let clock = FixedClock::parse("2024-01-01T12:00:30+00:00").unwrap();
    let description = format!(
        "{} near the school, reported twice already",
        write("curb lane", &POTHOLE_LOCATION)
    );

    group.bench_function("detail_write", |b| {
        b.iter(|| black_box(write(black_box("traffic lane"), &POTHOLE_LOCATION)))
    });
    group.bench_function("detail_read", |b| {
        b.iter(|| black_box(read(black_box(&description), &POTHOLE_LOCATION)))
    });
    group.bench_function("make_anonymous", |b| {
        b.iter(|| {
            black_box(Form::make_anonymous("pothole", "Main St", description.as_str(), &clock))
        })
    });
    group.finish();
}

// ============================================================================
// CC-02: Envelope
// ============================================================================

fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("cc-02-transactions");
    let key = KeyPair::from_seed([1; 32]);
    let clock = FixedClock::parse("2024-01-01T12:00:30+00:00").unwrap();
    let form = Form::make_anonymous("pothole", "Main St", "", &clock).unwrap();
    let tx = signed(TxType::Submit, 2, FormRecord::from_form(&form).encode(), &key);
    let bytes = tx.encode();

    group.bench_function("sign_bytes", |b| b.iter(|| black_box(tx.sign_bytes(CHAIN_ID))));
    group.bench_function("tx_id", |b| b.iter(|| black_box(tx.id(CHAIN_ID))));
    group.bench_function("decode", |b| b.iter(|| black_box(Tx::decode(black_box(&bytes)))));
    group.bench_function("verify_signature", |b| {
        b.iter(|| black_box(tx.verify_signature(&key.public_key(), CHAIN_ID).is_ok()))
    });
    group.finish();
}

// ============================================================================
// CC-03: Host block commit
// ============================================================================

fn bench_host_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("cc-03-host");
    group.measurement_time(Duration::from_secs(10));
    let clock = FixedClock::parse("2024-01-01T12:00:30+00:00").unwrap();

    for size in [10usize, 100] {
        let keys: Vec<KeyPair> = (0..size)
            .map(|i| {
                let mut seed = [0u8; 32];
                seed[..8].copy_from_slice(&(i as u64).to_be_bytes());
                KeyPair::from_seed(seed)
            })
            .collect();
        let creates: Vec<Vec<u8>> = keys
            .iter()
            .map(|k| signed(TxType::CreateAccount, 1, AccountKind::Citizen.encode(), k).encode())
            .collect();
        let submits: Vec<Vec<u8>> = keys
            .iter()
            .enumerate()
            .map(|(i, k)| {
                let location = format!("{i} Main St");
                let form = Form::make_anonymous("graffiti removal", location, "", &clock).unwrap();
                signed(TxType::Submit, 2, FormRecord::from_form(&form).encode(), k).encode()
            })
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("deliver_commit", size), &size, |b, _| {
            b.iter(|| {
                let host = HostService::open(HostConfig {
                    chain_id: CHAIN_ID.into(),
                    ..Default::default()
                })
                .unwrap();
                for tx in creates.iter().chain(&submits) {
                    host.deliver(tx).unwrap();
                }
                black_box(host.commit().unwrap())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_forms, bench_envelope, bench_host_commit);
criterion_main!(benches);
