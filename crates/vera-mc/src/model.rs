// ─────────────────────────────────────────────────────────────────────
// SCPN VERA Bridge — Target Model
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The synthesized constructive-solid-geometry and material model.
//!
//! In-memory objects consumed by the transport-code API binding, never a
//! hand-authored file format. Exact identifiers are synthesis-internal;
//! the only contract is that identical input produces a structurally
//! identical model, which is why every type here derives `PartialEq`.

use ndarray::Array2;

/// Identifier of a `Surface`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);

/// Identifier of a `Cell`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CellId(pub u32);

/// Identifier of a `Material`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

/// Identifier of a `Universe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UniverseId(pub u32);

/// Identifier of a `RectLattice`. Drawn from the universe counter, since
/// a lattice fills a cell the same way a universe does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LatticeId(pub u32);

/// Condition imposed on particles crossing a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    Transmission,
    Reflective,
    Vacuum,
}

/// Primitive quadric, axis-aligned. The z-cylinder is always centered on
/// the vertical axis of the sub-geometry that owns it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceKind {
    XPlane { x: f64 },
    YPlane { y: f64 },
    ZPlane { z: f64 },
    ZCylinder { r: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub id: SurfaceId,
    pub kind: SurfaceKind,
    pub boundary: BoundaryKind,
}

/// CSG region over surface half-spaces.
///
/// `Below` is the negative half-space (inside a cylinder, left of a
/// plane), `Above` the positive one.
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    /// All space; the single cell of a homogeneous universe.
    Everywhere,
    Below(SurfaceId),
    Above(SurfaceId),
    Intersection(Vec<Region>),
    Union(Vec<Region>),
    Complement(Box<Region>),
}

impl Region {
    /// Intersection of the given parts, flattening the trivial cases.
    pub fn all(mut parts: Vec<Region>) -> Region {
        if parts.len() == 1 {
            parts.remove(0)
        } else {
            Region::Intersection(parts)
        }
    }
}

/// What occupies a cell's region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Material(MaterialId),
    Universe(UniverseId),
    Lattice(LatticeId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub id: CellId,
    pub name: String,
    pub region: Region,
    pub fill: Fill,
}

/// A reusable sub-geometry: a set of cells that jointly tile all space.
#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    pub id: UniverseId,
    pub name: String,
    pub cells: Vec<CellId>,
}

/// A rectangular 2D lattice of universes, row-major with row 0 at the top
/// (map order) and the origin of lattice coordinates at `lower_left`.
#[derive(Debug, Clone, PartialEq)]
pub struct RectLattice {
    pub id: LatticeId,
    pub name: String,
    /// Element pitch [cm], equal in x and y.
    pub pitch: f64,
    /// Lower-left corner of the lattice footprint [cm].
    pub lower_left: [f64; 2],
    pub universes: Array2<UniverseId>,
    /// Universe seen outside the declared elements.
    pub outer: UniverseId,
}

impl RectLattice {
    /// Elements across one side.
    pub fn size(&self) -> usize {
        self.universes.nrows()
    }

    /// Lateral footprint width [cm].
    pub fn width(&self) -> f64 {
        self.pitch * self.size() as f64
    }
}

/// A fully resolved material instance: one per (composition, temperature
/// role, state).
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub id: MaterialId,
    pub name: String,
    /// Bulk density [g/cc].
    pub density_gcc: f64,
    /// Evaluation temperature [K].
    pub temperature_k: f64,
    /// (nuclide, weight fraction), sorted by nuclide code.
    pub nuclides: Vec<(String, f64)>,
}

/// The complete synthesized model.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetModel {
    pub surfaces: Vec<Surface>,
    pub cells: Vec<Cell>,
    pub universes: Vec<Universe>,
    pub lattices: Vec<RectLattice>,
    pub materials: Vec<Material>,
    /// The universe the transport code starts tracking in.
    pub root: UniverseId,
}

impl TargetModel {
    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.iter().find(|s| s.id == id)
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.iter().find(|c| c.id == id)
    }

    pub fn universe(&self, id: UniverseId) -> Option<&Universe> {
        self.universes.iter().find(|u| u.id == id)
    }

    pub fn lattice(&self, id: LatticeId) -> Option<&RectLattice> {
        self.lattices.iter().find(|l| l.id == id)
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == id)
    }

    /// Surfaces carrying a non-transmission boundary condition.
    pub fn boundary_surfaces(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces
            .iter()
            .filter(|s| s.boundary != BoundaryKind::Transmission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_all_flattens_singleton() {
        let region = Region::all(vec![Region::Below(SurfaceId(100))]);
        assert_eq!(region, Region::Below(SurfaceId(100)));
        let region = Region::all(vec![
            Region::Below(SurfaceId(100)),
            Region::Above(SurfaceId(101)),
        ]);
        assert!(matches!(region, Region::Intersection(ref v) if v.len() == 2));
    }

    #[test]
    fn test_lattice_width() {
        let lattice = RectLattice {
            id: LatticeId(100),
            name: "assy".into(),
            pitch: 1.26,
            lower_left: [-10.71, -10.71],
            universes: Array2::from_elem((17, 17), UniverseId(100)),
            outer: UniverseId(100),
        };
        assert_eq!(lattice.size(), 17);
        assert!((lattice.width() - 21.42).abs() < 1e-9);
    }
}
