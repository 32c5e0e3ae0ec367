// ─────────────────────────────────────────────────────────────────────
// SCPN VERA Bridge — Vera MC
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Synthesis of Monte Carlo CSG/material models from resolved VERA
//! cases.
//!
//! The synthesizer holds a reference to the generic case model rather
//! than extending it; translation-target concerns (surface IDs, universe
//! memoization, boundary tables) never leak back into parsing.

pub mod boundary;
pub mod convert;
pub mod ids;
pub mod materials;
pub mod model;
pub mod synth;
pub mod tally;

pub use boundary::{boundary_table, classify, FaceBoundary, ProblemClass};
pub use convert::{convert, convert_with_tally};
pub use model::{
    BoundaryKind, Cell, CellId, Fill, LatticeId, Material, MaterialId, RectLattice, Region,
    Surface, SurfaceId, SurfaceKind, TargetModel, Universe, UniverseId,
};
pub use synth::Synthesizer;
pub use tally::{build_tally, MeshSpec, TallySpec};
