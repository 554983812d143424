//! # Water-Trace Benchmarks
//!
//! | Path | Expectation |
//! |------|-------------|
//! | wt-01 transition lookup | table scan, sub-microsecond |
//! | wt-01 classification | linear in history length |
//! | wt-03 full dispatch | dominated by ledger hashing |
//! | wt-04 verify | dominated by history clone |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::atomic::{AtomicU64, Ordering};

use shared_types::{Principal, RejectionReason, Role, UnitCommand, UnitStatus, UnitType};
use trace_runtime::{RuntimeConfig, ServiceContainer};
use wt_01_unit_lifecycle::{classify, transition, NewUnit, Unit, UnitHistory};
use wt_03_command_dispatch::CommandApi;
use wt_04_verification::VerificationApi;

// ============================================================================
// WT-01: Unit Lifecycle
// ============================================================================

fn sold_history() -> UnitHistory {
    let (mut unit, created) = Unit::create(
        &NewUnit::with_code("WAT-BENCH", UnitType::Bag, 10),
        &Principal::new("prod-1", Role::Producer),
        1,
    )
    .unwrap();
    let mut records = vec![created];
    let steps = [
        (UnitCommand::SubmitForInspection, Role::Inspector),
        (UnitCommand::Approve, Role::Inspector),
        (UnitCommand::Distribute, Role::Distributor),
        (UnitCommand::Sell, Role::Distributor),
    ];
    for (i, (command, role)) in steps.iter().enumerate() {
        let (next, record) = unit
            .apply(command, &Principal::new("actor", *role), 2 + i as u64)
            .unwrap();
        unit = next;
        records.push(record);
    }
    UnitHistory::new(unit, records)
}

fn bench_unit_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("wt-01-unit-lifecycle");

    let reject = UnitCommand::Reject {
        reason: RejectionReason::Contaminated,
    };
    group.bench_function("transition_legal", |b| {
        b.iter(|| black_box(transition(black_box(UnitStatus::Inspector), &reject)))
    });
    group.bench_function("transition_illegal", |b| {
        b.iter(|| black_box(transition(black_box(UnitStatus::Sold), &UnitCommand::Approve)))
    });

    let history = sold_history();
    group.bench_function("classify_sold", |b| {
        b.iter(|| black_box(classify(black_box(&history))))
    });

    group.finish();
}

// ============================================================================
// WT-03 / WT-04: Through the container
// ============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let container = ServiceContainer::new(RuntimeConfig::default());
    let producer = container
        .credentials
        .issue(Principal::new("prod-1", Role::Producer));
    let counter = AtomicU64::new(0);

    let mut group = c.benchmark_group("wt-03-command-dispatch");
    group.throughput(Throughput::Elements(1));
    group.bench_function("create_unit", |b| {
        b.iter(|| {
            let n = counter.fetch_add(1, Ordering::Relaxed);
            let new = NewUnit::with_code(format!("WAT-B{}", n), UnitType::Pack, 12);
            rt.block_on(container.dispatcher.create_unit(&producer, new))
                .unwrap()
        })
    });
    group.finish();

    let mut group = c.benchmark_group("wt-04-verification");
    for len in [1usize, 3] {
        let code = format!("WAT-V{}", len);
        rt.block_on(async {
            container
                .dispatcher
                .create_unit(&producer, NewUnit::with_code(&code, UnitType::Bag, 1))
                .await
                .unwrap();
            if len == 3 {
                let inspector = container
                    .credentials
                    .issue(Principal::new("insp-1", Role::Inspector));
                let parsed = shared_types::UnitCode::parse(&code).unwrap();
                for command in [UnitCommand::SubmitForInspection, UnitCommand::Approve] {
                    container
                        .dispatcher
                        .dispatch_unit(&inspector, &parsed, command)
                        .await
                        .unwrap();
                }
            }
        });
        group.bench_with_input(BenchmarkId::new("verify", len), &code, |b, code| {
            b.iter(|| rt.block_on(container.verifier.verify(code)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_unit_lifecycle, bench_dispatch);
criterion_main!(benches);
