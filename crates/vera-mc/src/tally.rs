// ─────────────────────────────────────────────────────────────────────
// SCPN VERA Bridge — Tally Builder
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Power-distribution mesh derivation for the benchmark families.
//!
//! Pure derivation from the case model: one mesh cell per pin laterally,
//! axial layers built by run-length compression of the edit grid (runs of
//! equal spacing collapse into one uniform mesh group). The geometry
//! model is never touched.

use vera_model::{Case, Core, PinEntry, Symmetry};
use vera_types::{VeraError, VeraResult};

/// Spacings closer than this [cm] count as equal for run-length grouping.
const SPACING_TOL: f64 = 1e-6;

/// A regular structured mesh over part of the model.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSpec {
    pub name: String,
    /// Mesh cells per axis.
    pub dimension: [usize; 3],
    pub lower_left: [f64; 3],
    pub upper_right: [f64; 3],
}

/// Mesh set plus the scores the external accumulator collects on it.
#[derive(Debug, Clone, PartialEq)]
pub struct TallySpec {
    pub benchmark: String,
    pub meshes: Vec<MeshSpec>,
    pub scores: Vec<String>,
}

/// Uniform-spacing runs of an axial grid: (layer count, z start, z end).
pub fn axial_groups(elevations: &[f64]) -> Vec<(usize, f64, f64)> {
    let mut groups: Vec<(usize, f64, f64)> = Vec::new();
    for w in elevations.windows(2) {
        let spacing = w[1] - w[0];
        match groups.last_mut() {
            Some((count, start, end))
                if ((*end - *start) / *count as f64 - spacing).abs() <= SPACING_TOL =>
            {
                *count += 1;
                *end = w[1];
            }
            _ => groups.push((1, w[0], w[1])),
        }
    }
    groups
}

/// Build the tally recipe for a benchmark identifier. The leading digit
/// selects the family (1 pincell, 2 lattice, 3 assembly, 4/5 core).
pub fn build_tally(case: &Case, benchmark: &str) -> VeraResult<TallySpec> {
    let family = benchmark
        .chars()
        .next()
        .ok_or_else(|| VeraError::UnsupportedBenchmark(benchmark.to_string()))?;
    let meshes = match family {
        '1' => pin_mesh(case, benchmark, false)?,
        '2' => pin_mesh(case, benchmark, true)?,
        '3' | '4' | '5' => {
            let core = case.core.as_ref().ok_or_else(|| {
                VeraError::UnsupportedBenchmark(format!(
                    "`{benchmark}` needs a core map, case has none"
                ))
            })?;
            core_mesh(case, core, benchmark)?
        }
        _ => return Err(VeraError::UnsupportedBenchmark(benchmark.to_string())),
    };
    Ok(TallySpec {
        benchmark: benchmark.to_string(),
        meshes,
        scores: vec!["kappa-fission".to_string(), "flux".to_string()],
    })
}

/// Single-layer lateral mesh over the one assembly of a 2D problem.
fn pin_mesh(case: &Case, benchmark: &str, per_pin: bool) -> VeraResult<Vec<MeshSpec>> {
    let assembly = case.assemblies().first().ok_or_else(|| {
        VeraError::UnsupportedBenchmark(format!("`{benchmark}` declares no assemblies"))
    })?;
    let (zmin, zmax) = assembly_extent(case, assembly)?;
    let n = if per_pin { assembly.npins() } else { 1 };
    let half = assembly.width() / 2.0;
    Ok(vec![MeshSpec {
        name: format!("{benchmark}-pin-powers"),
        dimension: [n, n, 1],
        lower_left: [-half, -half, zmin],
        upper_right: [half, half, zmax],
    }])
}

/// One lateral pin-resolution mesh per uniform axial group.
fn core_mesh(case: &Case, core: &Core, benchmark: &str) -> VeraResult<Vec<MeshSpec>> {
    let npins = case
        .assemblies()
        .iter()
        .map(|a| a.npins())
        .max()
        .ok_or_else(|| {
            VeraError::UnsupportedBenchmark(format!("`{benchmark}` declares no assemblies"))
        })?;
    let n_lat = core.size();
    let pins = n_lat * npins;
    let width = core.pitch * n_lat as f64;
    let lower = match core.symmetry {
        Symmetry::Full => [-width / 2.0, -width / 2.0],
        Symmetry::Half => [-width / 2.0, -core.pitch / 2.0],
        Symmetry::Quarter => [-core.pitch / 2.0, -core.pitch / 2.0],
    };
    let mut meshes = Vec::new();
    for (i, (layers, z0, z1)) in axial_groups(core.axial.elevations()).into_iter().enumerate() {
        meshes.push(MeshSpec {
            name: format!("{benchmark}-pin-powers-{i}"),
            dimension: [pins, pins, layers],
            lower_left: [lower[0], lower[1], z0],
            upper_right: [lower[0] + width, lower[1] + width, z1],
        });
    }
    Ok(meshes)
}

/// Axial extent of the fuel in a core-less assembly.
fn assembly_extent(case: &Case, assembly: &vera_model::Assembly) -> VeraResult<(f64, f64)> {
    let mut extent: Option<(f64, f64)> = None;
    for (_, entry) in assembly.cell_map.iter() {
        if let PinEntry::Fuel(id) = entry {
            let axial = &case.block(*id).axial;
            extent = Some(match extent {
                None => (axial.bottom(), axial.top()),
                Some((lo, hi)) => (lo.min(axial.bottom()), hi.max(axial.top())),
            });
        }
    }
    extent.ok_or_else(|| {
        VeraError::UnsupportedProblemType(format!(
            "assembly `{}` places no fuel pins",
            assembly.label
        ))
    })
}
