use chrono::{DateTime, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use reviewmap::collaborators::{GlossaryEntry, StaticGlossary};
use reviewmap::{
    BlacklistEntry, CellValue, FieldStatus, InputFingerprint, MatchMode, Memo, ModificationRecord,
    ModificationType, ReviewEngine, RowStatus, Sheet, SignalMaps, Workbook,
};
use std::hint::black_box;

const STATES: [&str; 4] = ["CA", "NY", "TX", "WA"];

fn create_workbook(rows: usize) -> Workbook {
    let data = (0..rows).map(|i| {
        vec![
            CellValue::text(format!("lease-{}.pdf", i)),
            CellValue::text(format!("http://docs/lease-{}.pdf", i)),
            // Every 25th amount is blank so the missing-value rule has work to do
            if i % 25 == 0 {
                CellValue::Empty
            } else {
                CellValue::Number(1000.0 + i as f64)
            },
            CellValue::text(if i % 40 == 0 { "ZZ" } else { STATES[i % STATES.len()] }),
            CellValue::text(format!("{} Main St", i)),
            CellValue::text(if i % 7 == 0 { "N/A" } else { "Acme Holdings" }),
        ]
    });
    Workbook::new(vec![Sheet::from_positional(
        "Leases",
        ["File", "ContractURL", "Amount", "State", "Address", "Tenant"],
        data,
    )])
}

fn create_signals(rows: usize) -> SignalMaps {
    (0..rows).fold(SignalMaps::new(), |signals, i| {
        let signals = if i % 3 == 0 {
            signals.with_row_status("Leases", i, RowStatus::Complete)
        } else {
            signals
        };
        let signals = if i % 11 == 0 {
            signals.with_field_status("Leases", i, "Amount", FieldStatus::Rfi)
        } else {
            signals
        };
        if i % 13 == 0 {
            signals.with_modification(
                "Leases",
                i,
                "Address",
                ModificationRecord::new(ModificationType::AddressStandardized),
            )
        } else {
            signals
        }
    })
}

fn engine() -> ReviewEngine {
    ReviewEngine::default().with_glossary(StaticGlossary::new(vec![
        GlossaryEntry::new("State").with_allowed_values(STATES)
    ]))
}

fn benchmark_evaluate(c: &mut Criterion) {
    let engine = engine();
    let blacklist = vec![BlacklistEntry::global("bl-1", "acme", MatchMode::Contains)];
    let mut group = c.benchmark_group("evaluate");

    for rows in [100, 1_000, 5_000] {
        let workbook = create_workbook(rows);
        let signals = create_signals(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, _| {
            b.iter(|| {
                engine.evaluate_at(
                    black_box(&workbook),
                    black_box(&signals),
                    &blacklist,
                    &[],
                    DateTime::<Utc>::UNIX_EPOCH,
                )
            })
        });
    }
    group.finish();
}

fn benchmark_memoized_reevaluation(c: &mut Criterion) {
    let engine = engine();
    let workbook = create_workbook(1_000);
    let signals = create_signals(1_000);
    let input = (&workbook, &signals);

    c.bench_function("fingerprint_1000_rows", |b| {
        b.iter(|| InputFingerprint::compute(black_box(&input)))
    });

    let mut memo = Memo::new();
    c.bench_function("memo_hit_1000_rows", |b| {
        b.iter(|| {
            let report = memo
                .get_or_compute(&input, || {
                    engine.evaluate_at(&workbook, &signals, &[], &[], DateTime::<Utc>::UNIX_EPOCH)
                })
                .map(|r| r.total_rows());
            black_box(report)
        })
    });
}

criterion_group!(benches, benchmark_evaluate, benchmark_memoized_reevaluation);
criterion_main!(benches);
