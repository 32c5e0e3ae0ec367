// ─────────────────────────────────────────────────────────────────────
// SCPN VERA Bridge — Vera Types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Shared types for the VERA translation pipeline.
//!
//! Error taxonomy, converter configuration, isotopic data and the raw
//! parsed-document tree handed over by the XML front-end.

pub mod config;
pub mod error;
pub mod isotopes;
pub mod raw;

pub use config::{ConverterConfig, UnitSystem};
pub use error::{VeraError, VeraResult};
pub use isotopes::IsotopeTable;
pub use raw::{RawList, RawValue};
