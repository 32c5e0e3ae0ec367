// ─────────────────────────────────────────────────────────────────────
// SCPN VERA Bridge — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{VeraError, VeraResult};

/// Unit system for lengths declared in a VERA deck.
///
/// The case model always stores centimeters; `Imperial` decks are scaled
/// at build time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Si,
    Imperial,
}

impl UnitSystem {
    /// Scale factor from a declared length to centimeters.
    pub fn length_to_cm(self) -> f64 {
        match self {
            UnitSystem::Si => 1.0,
            UnitSystem::Imperial => 2.54,
        }
    }

    /// Parse a deck-level unit declaration.
    pub fn parse(decl: &str) -> VeraResult<Self> {
        match decl.to_ascii_lowercase().as_str() {
            "si" | "cm" | "centimeters" => Ok(UnitSystem::Si),
            "imperial" | "in" | "inches" => Ok(UnitSystem::Imperial),
            other => Err(VeraError::Unit(format!(
                "unrecognized unit system `{other}` (expected \"si\" or \"imperial\")"
            ))),
        }
    }
}

/// Converter configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Optional JSON isotope table overriding the built-in one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_section_library_path: Option<PathBuf>,
    /// Unit system assumed when a deck declares none.
    #[serde(default)]
    pub default_units: UnitSystem,
}

impl ConverterConfig {
    /// Load from a JSON file.
    pub fn from_file(path: &str) -> VeraResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }
}
