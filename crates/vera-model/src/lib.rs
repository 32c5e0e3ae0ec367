// ─────────────────────────────────────────────────────────────────────
// SCPN VERA Bridge — Vera Model
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The case model: an immutable, fully cross-reference-resolved
//! representation of one VERA input deck.
//!
//! The raw document is label-referential (pins reference pin designs by ID,
//! cores reference assembly maps by label). The builder resolves every
//! label into an arena index exactly once, so synthesis never performs a
//! string lookup.

pub mod builder;
pub mod case;
pub mod values;

pub use builder::{CaseBuilder, MODERATOR};
pub use case::{
    Assembly, AssemblyId, Baffle, Block, BlockId, BoundaryCond, Case, CompositionId, Core,
    CoreBoundary, CoreEntry, CorePlate, Insert, InsertId, PinEntry, State, Symmetry, VesselRing,
};
pub use values::{AxialGrid, Composition, LatticeMap, ShellStack};
