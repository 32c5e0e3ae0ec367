// ─────────────────────────────────────────────────────────────────────
// SCPN VERA Bridge — End-to-End Translation Scenarios
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

use std::collections::BTreeSet;

use serde_json::{json, Value};

use vera_mc::{
    convert, convert_with_tally, BoundaryKind, Fill, SurfaceKind, TargetModel, Universe,
    UniverseId,
};
use vera_model::{Case, CaseBuilder};
use vera_types::{ConverterConfig, IsotopeTable, RawList, VeraError};

fn build_case(doc: Value) -> Case {
    let raw: RawList = serde_json::from_value(doc).unwrap();
    let isotopes = IsotopeTable::builtin();
    CaseBuilder::new(&isotopes).build(&raw).unwrap()
}

fn universes_named<'m>(model: &'m TargetModel, name: &str) -> Vec<&'m Universe> {
    model.universes.iter().filter(|u| u.name == name).collect()
}

fn materials_block(u235: f64) -> Value {
    json!({"name": "MATERIALS", "lists": [
        {"name": "fuel", "params": {"density": 10.257, "enrichment": u235}},
        {"name": "gadfuel", "params": {"density": 10.111, "enrichment": 1.8,
            "gad_frac": 0.05,
            "gad_names": ["Gd00", "O00"], "gad_fracs": [0.8676, 0.1324]}},
        {"name": "he", "params": {"density": 0.0001786,
            "mat_fracs": [1.0], "mat_names": ["He00"]}},
        {"name": "zirc4", "params": {"density": 6.56,
            "mat_fracs": [0.9824, 0.0176], "mat_names": ["Zr00", "Sn00"]}},
        {"name": "ss", "params": {"density": 8.0,
            "mat_fracs": [0.695, 0.19, 0.095, 0.02],
            "mat_names": ["Fe00", "Cr00", "Ni00", "Mn55"]}}
    ]})
}

fn fuel_block(label: &str, mat: &str, axial: Vec<f64>, spans: usize) -> Value {
    let span = json!({"name": "span", "params": {
        "radii": [0.4096, 0.418, 0.475],
        "mats": [mat, "he", "zirc4"]}});
    json!({"name": label, "params": {"axial": axial},
        "lists": (0..spans).map(|_| span.clone()).collect::<Vec<_>>()})
}

fn pincell_doc() -> Value {
    json!({
        "name": "case",
        "params": {"case_id": "1a"},
        "lists": [
            materials_block(3.1),
            {"name": "BLOCKS", "lists": [fuel_block("f31", "fuel", vec![0.0, 10.0], 1)]},
            {"name": "ASSEMBLIES", "lists": [
                {"name": "assy", "params": {"ppitch": 1.26, "cell_map": ["f31"]}}
            ]},
            {"name": "STATES", "lists": [
                {"name": "s1", "params": {"boron": 1300.0, "tinlet": 565.0}}
            ]}
        ]
    })
}

fn lattice_doc(with_gad: bool) -> Value {
    let mut map = vec!["f31".to_string(); 289];
    map[39] = "GT".to_string();
    map[249] = "GT".to_string();
    if with_gad {
        map[18] = "g18".to_string();
        map[270] = "g18".to_string();
    }
    json!({
        "name": "case",
        "params": {"case_id": if with_gad { "2p" } else { "2a" }},
        "lists": [
            materials_block(3.1),
            {"name": "BLOCKS", "lists": [
                fuel_block("f31", "fuel", vec![0.0, 10.0], 1),
                fuel_block("g18", "gadfuel", vec![0.0, 10.0], 1)
            ]},
            {"name": "ASSEMBLIES", "lists": [
                {"name": "assy", "params": {"ppitch": 1.26, "cell_map": map}}
            ]},
            {"name": "STATES", "lists": [
                {"name": "s1", "params": {"boron": 1300.0, "tinlet": 600.0}}
            ]}
        ]
    })
}

fn quarter_core_doc(block_axial: Vec<f64>, block_spans: usize) -> Value {
    json!({
        "name": "case",
        "params": {"case_id": "5a"},
        "lists": [
            materials_block(3.1),
            {"name": "BLOCKS", "lists": [
                fuel_block("f31", "fuel", block_axial, block_spans)
            ]},
            {"name": "ASSEMBLIES", "lists": [
                {"name": "assy", "params": {"ppitch": 1.26,
                    "cell_map": ["f31", "f31", "f31", "f31", "GT",
                                 "f31", "f31", "f31", "f31"]}}
            ]},
            {"name": "CORE", "params": {
                "apitch": 21.5,
                "sym": "qtr",
                "axial": [0.0, 25.0, 50.0, 75.0, 100.0],
                "assm_map": ["assy", "assy", "assy", "-"],
                "bc_bot": "vacuum", "bc_top": "vacuum", "bc_rad": "vacuum",
                "baffle_mat": "ss", "baffle_gap": 0.19, "baffle_thick": 2.85,
                "vessel_radii": [120.0, 130.0],
                "vessel_mats": ["mod", "ss"],
                "lower_plate_mat": "ss", "lower_plate_thick": 5.0,
                "lower_plate_vfrac": 0.5,
                "upper_plate_mat": "ss", "upper_plate_thick": 7.6,
                "upper_plate_vfrac": 0.5
            }},
            {"name": "STATES", "lists": [
                {"name": "s1", "params": {"boron": 600.0, "tinlet": 565.0}}
            ]}
        ]
    })
}

// Scenario 1: a single reflected pin cell.
#[test]
fn test_pincell_single_universe_fully_reflected() {
    let case = build_case(pincell_doc());
    let model = convert(&case, &ConverterConfig::default()).unwrap();

    assert_eq!(universes_named(&model, "f31").len(), 1);
    assert_eq!(model.lattices.len(), 1);
    assert_eq!(model.lattices[0].size(), 1);

    // Four lateral faces and both axial ends reflect.
    let boundary: Vec<_> = model.boundary_surfaces().collect();
    assert_eq!(boundary.len(), 6);
    assert!(boundary
        .iter()
        .all(|s| s.boundary == BoundaryKind::Reflective));
}

// Scenario 2: 17x17 lattice, two guide tubes, one distinct fuel design.
#[test]
fn test_lattice_dedupes_identical_fuel_pins() {
    let case = build_case(lattice_doc(false));
    let model = convert(&case, &ConverterConfig::default()).unwrap();

    let lattice = &model.lattices[0];
    assert_eq!(lattice.size(), 17);

    let distinct: BTreeSet<UniverseId> = lattice.universes.iter().copied().collect();
    // One shared fuel universe plus the guide-tube filler.
    assert_eq!(distinct.len(), 2);
    assert_eq!(universes_named(&model, "f31").len(), 1);

    let fuel = universes_named(&model, "f31")[0].id;
    let fuel_positions = lattice.universes.iter().filter(|&&u| u == fuel).count();
    assert_eq!(fuel_positions, 287);
}

// Scenario 3: gadolinia pins synthesize their own sub-geometry.
#[test]
fn test_gadolinia_pins_stay_distinct() {
    let case = build_case(lattice_doc(true));
    let model = convert(&case, &ConverterConfig::default()).unwrap();

    let lattice = &model.lattices[0];
    let distinct: BTreeSet<UniverseId> = lattice.universes.iter().copied().collect();
    // Fuel, gadolinia fuel, guide-tube filler.
    assert_eq!(distinct.len(), 3);
    assert_eq!(universes_named(&model, "f31").len(), 1);
    assert_eq!(universes_named(&model, "g18").len(), 1);

    // The gadolinia material carries Gd nuclides; the plain fuel does not.
    let gad = model
        .materials
        .iter()
        .find(|m| m.name == "gadfuel")
        .unwrap();
    assert!(gad.nuclides.iter().any(|(n, _)| n.starts_with("Gd")));
    let fuel = model.materials.iter().find(|m| m.name == "fuel").unwrap();
    assert!(fuel.nuclides.iter().all(|(n, _)| !n.starts_with("Gd")));
}

// Scenario 4: quarter-core symmetry puts reflective planes on the two
// symmetry faces and vacuum everywhere else.
#[test]
fn test_quarter_core_boundary_conditions() {
    let case = build_case(quarter_core_doc(vec![0.0, 100.0], 1));
    let model = convert(&case, &ConverterConfig::default()).unwrap();

    let reflective: Vec<_> = model
        .boundary_surfaces()
        .filter(|s| s.boundary == BoundaryKind::Reflective)
        .collect();
    assert_eq!(reflective.len(), 2);
    assert!(reflective.iter().any(|s| matches!(
        s.kind,
        SurfaceKind::XPlane { x } if x.abs() < 1e-12
    )));
    assert!(reflective.iter().any(|s| matches!(
        s.kind,
        SurfaceKind::YPlane { y } if y.abs() < 1e-12
    )));

    // The outermost vessel cylinder leaks.
    assert!(model.boundary_surfaces().any(|s| matches!(
        (s.kind, s.boundary),
        (SurfaceKind::ZCylinder { r }, BoundaryKind::Vacuum) if (r - 130.0).abs() < 1e-9
    )));
    // Axial ends leak through the smeared core plates.
    assert!(model.boundary_surfaces().any(|s| matches!(
        (s.kind, s.boundary),
        (SurfaceKind::ZPlane { z }, BoundaryKind::Vacuum) if (z + 5.0).abs() < 1e-9
    )));
    assert!(model.boundary_surfaces().any(|s| matches!(
        (s.kind, s.boundary),
        (SurfaceKind::ZPlane { z }, BoundaryKind::Vacuum) if (z - 107.6).abs() < 1e-9
    )));

    // Core plates appear as smeared materials.
    assert!(model.materials.iter().any(|m| m.name == "ss-smeared"));
}

// Scenario 5a: a block elevation outside the core span cannot be
// reconciled.
#[test]
fn test_axial_misalignment_outside_span_is_an_error() {
    let case = build_case(quarter_core_doc(vec![0.0, 200.0], 1));
    match convert(&case, &ConverterConfig::default()) {
        Err(VeraError::AxialAlignment(message)) => {
            assert!(message.contains("f31"));
            assert!(message.contains("200"));
        }
        other => panic!("expected AxialAlignment, got {other:?}"),
    }
}

// Scenario 5b: a block grid finer than the core grid reconciles by
// splitting, never by truncation.
#[test]
fn test_axial_misalignment_within_span_reconciles() {
    // Block spans meet at 12.5 cm, between core elevations 0 and 25.
    let mut doc = quarter_core_doc(vec![0.0, 12.5, 100.0], 2);
    // Make the two spans structurally different so the pin is not
    // axially uniform: the upper span is an empty plenum.
    doc["lists"][1]["lists"][0]["lists"][1] = json!({
        "name": "span", "params": {
            "radii": [0.4096, 0.418, 0.475],
            "mats": ["he", "he", "zirc4"]}});
    let case = build_case(doc);
    let model = convert(&case, &ConverterConfig::default()).unwrap();

    // The 12.5 cm elevation survives as an interior plane.
    assert!(model.surfaces.iter().any(|s| matches!(
        s.kind,
        SurfaceKind::ZPlane { z } if (z - 12.5).abs() < 1e-9
    )));
}

// Scenario 5c: an axially uniform block shorter than the core span is
// capped with moderator above its extent, never stretched to full height.
#[test]
fn test_short_uniform_block_capped_with_moderator() {
    let case = build_case(quarter_core_doc(vec![0.0, 50.0], 1));
    let model = convert(&case, &ConverterConfig::default()).unwrap();

    // The block's top elevation survives as an interior plane.
    assert!(model.surfaces.iter().any(|s| matches!(
        s.kind,
        SurfaceKind::ZPlane { z } if (z - 50.0).abs() < 1e-9
    )));

    // Core spans above 50 cm hold plain moderator inside the pin
    // universe.
    let moderator = model
        .materials
        .iter()
        .find(|m| m.name == "mod")
        .unwrap()
        .id;
    let pin = universes_named(&model, "f31")[0];
    for cap in ["f31-z2", "f31-z3"] {
        let cell = pin
            .cells
            .iter()
            .map(|&c| model.cell(c).unwrap())
            .find(|c| c.name == cap)
            .unwrap_or_else(|| panic!("missing moderator span `{cap}`"));
        assert_eq!(cell.fill, Fill::Material(moderator));
    }
}

// Scenario 6: inserts overlay guide-tube positions; identical rods from
// different decks collapse onto one universe.
#[test]
fn test_insert_overlay_replaces_guide_tube_positions() {
    let rod = |name: &str| {
        json!({"name": name, "params": {"radii": [0.2, 0.5], "mats": ["he", "ss"]}})
    };
    let doc = json!({
        "name": "case",
        "params": {"case_id": "2e"},
        "lists": [
            materials_block(3.1),
            {"name": "INSERTS", "lists": [rod("pyA"), rod("pyB")]},
            {"name": "BLOCKS", "lists": [fuel_block("f31", "fuel", vec![0.0, 10.0], 1)]},
            {"name": "ASSEMBLIES", "lists": [
                {"name": "assy", "params": {"ppitch": 1.26,
                    "cell_map": ["f31", "GT", "f31",
                                 "GT", "f31", "f31",
                                 "f31", "GT", "f31"],
                    "insert_map": ["-", "pyA", "-",
                                   "-", "-", "-",
                                   "-", "pyB", "-"]}}
            ]},
            {"name": "STATES", "lists": [
                {"name": "s1", "params": {"boron": 600.0, "tinlet": 565.0}}
            ]}
        ]
    });
    let case = build_case(doc);
    let model = convert(&case, &ConverterConfig::default()).unwrap();

    // The two rods have the same shell stack, so the second memoizes
    // onto the first.
    assert_eq!(universes_named(&model, "pyA").len(), 1);
    assert_eq!(universes_named(&model, "pyB").len(), 0);
    let ring = universes_named(&model, "pyA")[0];

    let lattice = &model.lattices[0];
    assert_eq!(lattice.universes[[0, 1]], ring.id);
    assert_eq!(lattice.universes[[2, 1]], ring.id);
    // The bare guide tube at (1, 0) keeps the moderator filler.
    assert_ne!(lattice.universes[[1, 0]], ring.id);

    // Two shells plus the surrounding moderator cell.
    assert_eq!(ring.cells.len(), 3);
    let distinct: BTreeSet<UniverseId> = lattice.universes.iter().copied().collect();
    assert_eq!(distinct.len(), 3);
}

// Determinism: identical input, structurally identical output.
#[test]
fn test_convert_is_deterministic() {
    let config = ConverterConfig::default();
    let case = build_case(lattice_doc(true));
    let first = convert(&case, &config).unwrap();
    let second = convert(&case, &config).unwrap();
    assert_eq!(first, second);

    let case = build_case(quarter_core_doc(vec![0.0, 100.0], 1));
    let first = convert(&case, &config).unwrap();
    let second = convert(&case, &config).unwrap();
    assert_eq!(first, second);
}

// Referential closure: a valid case never trips a reference error.
#[test]
fn test_referential_closure() {
    for doc in [pincell_doc(), lattice_doc(true), quarter_core_doc(vec![0.0, 100.0], 1)] {
        let case = build_case(doc);
        match convert(&case, &ConverterConfig::default()) {
            Ok(_) => {}
            Err(VeraError::Reference { label, .. }) => {
                panic!("reference error for `{label}` on a valid case")
            }
            Err(other) => panic!("unexpected error {other:?}"),
        }
    }
}

// Footprint invariant: lattice area equals pitch^2 * n^2.
#[test]
fn test_lattice_footprint_invariant() {
    let case = build_case(lattice_doc(false));
    let model = convert(&case, &ConverterConfig::default()).unwrap();
    for lattice in &model.lattices {
        let expected = lattice.pitch * lattice.size() as f64;
        assert!((lattice.width() - expected).abs() < 1e-12);
    }
    assert!((model.lattices[0].width() - 21.42).abs() < 1e-9);
}

// Strict nesting: within each pin universe the cylinder radii bounding
// consecutive shells strictly increase.
#[test]
fn test_pin_shells_strictly_nested() {
    let case = build_case(lattice_doc(true));
    let model = convert(&case, &ConverterConfig::default()).unwrap();
    for name in ["f31", "g18"] {
        let pin = universes_named(&model, name)[0];
        let mut radii = Vec::new();
        for &cell_id in &pin.cells {
            let cell = model.cell(cell_id).unwrap();
            if let Some(r) = innermost_cylinder(&model, &cell.region) {
                radii.push(r);
            }
        }
        assert!(radii.windows(2).all(|w| w[1] > w[0]), "{name}: {radii:?}");
    }
}

fn innermost_cylinder(model: &TargetModel, region: &vera_mc::Region) -> Option<f64> {
    use vera_mc::Region;
    match region {
        Region::Below(id) => match model.surface(*id)?.kind {
            SurfaceKind::ZCylinder { r } => Some(r),
            _ => None,
        },
        Region::Intersection(parts) => parts.iter().find_map(|p| innermost_cylinder(model, p)),
        _ => None,
    }
}

// Tally recipes per benchmark family.
#[test]
fn test_lattice_tally_mesh_is_per_pin() {
    let case = build_case(lattice_doc(false));
    let (_, tally) =
        convert_with_tally(&case, &ConverterConfig::default(), "2a").unwrap();
    assert_eq!(tally.meshes.len(), 1);
    assert_eq!(tally.meshes[0].dimension, [17, 17, 1]);
    let width = tally.meshes[0].upper_right[0] - tally.meshes[0].lower_left[0];
    assert!((width - 21.42).abs() < 1e-9);
}

#[test]
fn test_core_tally_compresses_uniform_axial_spans() {
    let case = build_case(quarter_core_doc(vec![0.0, 100.0], 1));
    let (_, tally) =
        convert_with_tally(&case, &ConverterConfig::default(), "5a").unwrap();
    // Core grid 0..100 in 4 equal spans collapses into one mesh group.
    assert_eq!(tally.meshes.len(), 1);
    assert_eq!(tally.meshes[0].dimension, [6, 6, 4]);
}

#[test]
fn test_unknown_benchmark_is_unsupported() {
    let case = build_case(pincell_doc());
    match convert_with_tally(&case, &ConverterConfig::default(), "9z") {
        Err(VeraError::UnsupportedBenchmark(id)) => assert_eq!(id, "9z"),
        other => panic!("expected UnsupportedBenchmark, got {other:?}"),
    }
}

// Moderator instantiation is per state: boron shows up in the water.
#[test]
fn test_moderator_reflects_state_boron() {
    let case = build_case(pincell_doc());
    let model = convert(&case, &ConverterConfig::default()).unwrap();
    let moderator = model.materials.iter().find(|m| m.name == "mod").unwrap();
    let boron: f64 = moderator
        .nuclides
        .iter()
        .filter(|(n, _)| n.starts_with('B'))
        .map(|(_, w)| w)
        .sum();
    assert!((boron - 1300.0e-6).abs() < 1e-9);
    assert!((moderator.temperature_k - 565.0).abs() < 1e-9);
}
