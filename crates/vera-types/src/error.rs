// ─────────────────────────────────────────────────────────────────────
// SCPN VERA Bridge — Error
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

/// Every failure the translation pipeline can surface.
///
/// The first three variants are user-fixable input problems and abort the
/// pipeline before synthesis. `GeometryOverlap` and `AxialAlignment` are
/// internal-consistency faults: they cannot occur when the case model
/// invariants hold, so they indicate a bug in the synthesis rules or an
/// unsupported geometric configuration. The `Unsupported*` variants are
/// known coverage gaps, reported distinctly so callers can skip the case.
#[derive(Error, Debug)]
pub enum VeraError {
    #[error("Schema error at `{path}`: {message}")]
    Schema { path: String, message: String },

    #[error("Unresolved reference `{label}` in {context}")]
    Reference { label: String, context: String },

    #[error("Unit error: {0}")]
    Unit(String),

    #[error("Geometry overlap at {context}: {message}")]
    GeometryOverlap { context: String, message: String },

    #[error("Axial grids cannot be reconciled: {0}")]
    AxialAlignment(String),

    #[error("Unsupported problem type: {0}")]
    UnsupportedProblemType(String),

    #[error("No tally recipe for benchmark `{0}`")]
    UnsupportedBenchmark(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VeraError {
    /// Shorthand for a schema violation at a named location.
    pub fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        VeraError::Schema {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a dangling label reference.
    pub fn reference(label: impl Into<String>, context: impl Into<String>) -> Self {
        VeraError::Reference {
            label: label.into(),
            context: context.into(),
        }
    }

    /// Shorthand for an overlap fault with coordinate context.
    pub fn overlap(context: impl Into<String>, message: impl Into<String>) -> Self {
        VeraError::GeometryOverlap {
            context: context.into(),
            message: message.into(),
        }
    }
}

pub type VeraResult<T> = Result<T, VeraError>;
