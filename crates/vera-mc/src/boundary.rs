// ─────────────────────────────────────────────────────────────────────
// SCPN VERA Bridge — Problem Classification & Boundaries
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Problem classification and the boundary-condition table.
//!
//! Which outer surfaces get which boundary condition is decided once,
//! from the problem class and the declared symmetry, in a single table.
//! Synthesis code never picks a boundary kind ad hoc.

use vera_model::{BoundaryCond, Case, Symmetry};
use vera_types::{VeraError, VeraResult};

use crate::model::BoundaryKind;

/// The geometric scale of a case, derived from its structure and the
/// declared radial boundary condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemClass {
    /// One assembly of one pin, no core.
    Pincell,
    /// One multi-pin assembly, no core.
    Lattice2D,
    /// A core map holding a single assembly.
    Assembly3D,
    /// Multi-assembly core with a reflective radial boundary.
    MiniCore,
    /// Multi-assembly core with a vacuum radial boundary.
    FullCore,
}

/// Boundary kind per outer face of the synthesized model. The lateral
/// faces are planes for reflected problems and a cylinder for cores with
/// a vessel; `radial` covers the cylindrical case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceBoundary {
    pub min_x: BoundaryKind,
    pub max_x: BoundaryKind,
    pub min_y: BoundaryKind,
    pub max_y: BoundaryKind,
    pub min_z: BoundaryKind,
    pub max_z: BoundaryKind,
    pub radial: BoundaryKind,
}

/// Classify a case. Unknown structural patterns are a coverage gap, not
/// a schema violation.
pub fn classify(case: &Case) -> VeraResult<ProblemClass> {
    match &case.core {
        None => {
            if case.assemblies().len() != 1 {
                return Err(VeraError::UnsupportedProblemType(format!(
                    "{} assemblies without a core map",
                    case.assemblies().len()
                )));
            }
            if case.assemblies()[0].npins() == 1 {
                Ok(ProblemClass::Pincell)
            } else {
                Ok(ProblemClass::Lattice2D)
            }
        }
        Some(core) => {
            let occupied = core
                .shape
                .iter()
                .filter(|(_, e)| matches!(e, vera_model::CoreEntry::Assembly(_)))
                .count();
            if occupied == 0 {
                return Err(VeraError::UnsupportedProblemType(
                    "core map places no assemblies".to_string(),
                ));
            }
            if occupied == 1 {
                Ok(ProblemClass::Assembly3D)
            } else {
                match core.boundary.radial {
                    BoundaryCond::Reflective => Ok(ProblemClass::MiniCore),
                    BoundaryCond::Vacuum => Ok(ProblemClass::FullCore),
                }
            }
        }
    }
}

fn kind(bc: BoundaryCond) -> BoundaryKind {
    match bc {
        BoundaryCond::Reflective => BoundaryKind::Reflective,
        BoundaryCond::Vacuum => BoundaryKind::Vacuum,
    }
}

/// The boundary table. `declared` is the core's boundary block when one
/// exists; 2D problems default to fully reflected with reflective axial
/// ends.
pub fn boundary_table(
    class: ProblemClass,
    symmetry: Symmetry,
    declared: Option<&vera_model::CoreBoundary>,
) -> FaceBoundary {
    let (min_z, max_z) = match declared {
        Some(b) => (kind(b.bottom), kind(b.top)),
        None => (BoundaryKind::Reflective, BoundaryKind::Reflective),
    };
    let radial = match declared {
        Some(b) => kind(b.radial),
        None => BoundaryKind::Reflective,
    };
    match class {
        // Reflected unit problems: every lateral face mirrors.
        ProblemClass::Pincell | ProblemClass::Lattice2D | ProblemClass::Assembly3D
        | ProblemClass::MiniCore => FaceBoundary {
            min_x: BoundaryKind::Reflective,
            max_x: BoundaryKind::Reflective,
            min_y: BoundaryKind::Reflective,
            max_y: BoundaryKind::Reflective,
            min_z,
            max_z,
            radial,
        },
        // Full cores leak radially; declared symmetry folds the model
        // onto reflective planes at the symmetry faces.
        ProblemClass::FullCore => {
            let (min_x, min_y) = match symmetry {
                Symmetry::Full => (BoundaryKind::Vacuum, BoundaryKind::Vacuum),
                Symmetry::Half => (BoundaryKind::Vacuum, BoundaryKind::Reflective),
                Symmetry::Quarter => (BoundaryKind::Reflective, BoundaryKind::Reflective),
            };
            FaceBoundary {
                min_x,
                max_x: BoundaryKind::Vacuum,
                min_y,
                max_y: BoundaryKind::Vacuum,
                min_z,
                max_z,
                radial,
            }
        }
    }
}
