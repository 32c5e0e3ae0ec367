// ─────────────────────────────────────────────────────────────────────
// SCPN VERA Bridge — Conversion Entry Points
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The two operations the surrounding wrapper invokes.

use vera_model::Case;
use vera_types::{ConverterConfig, IsotopeTable, VeraResult};

use crate::model::TargetModel;
use crate::synth::Synthesizer;
use crate::tally::{build_tally, TallySpec};

/// Translate a resolved case into the target geometry/material model.
pub fn convert(case: &Case, config: &ConverterConfig) -> VeraResult<TargetModel> {
    let isotopes = load_isotope_table(config)?;
    Synthesizer::new(case, &isotopes)?.synthesize()
}

/// Translate and derive the power-distribution tally recipe for the
/// named benchmark.
pub fn convert_with_tally(
    case: &Case,
    config: &ConverterConfig,
    benchmark: &str,
) -> VeraResult<(TargetModel, TallySpec)> {
    let model = convert(case, config)?;
    let tally = build_tally(case, benchmark)?;
    Ok((model, tally))
}

fn load_isotope_table(config: &ConverterConfig) -> VeraResult<IsotopeTable> {
    match &config.cross_section_library_path {
        Some(path) => IsotopeTable::from_file(path),
        None => Ok(IsotopeTable::builtin()),
    }
}
