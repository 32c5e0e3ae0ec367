// ─────────────────────────────────────────────────────────────────────
// SCPN VERA Bridge — Case Model
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The resolved case model.
//!
//! `Case` exclusively owns everything reachable from it and is read-only
//! after construction. References between entities are arena indices
//! assigned by the builder; there are no label lookups and no cycles here.

use std::collections::BTreeMap;

use vera_types::{UnitSystem, VeraError, VeraResult};

use crate::values::{AxialGrid, Composition, LatticeMap, ShellStack};

/// Index of a `Block` in `Case::blocks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BlockId(pub usize);

/// Index of a `Composition` in `Case::compositions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CompositionId(pub usize);

/// Index of an `Assembly` in `Case::assemblies`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AssemblyId(pub usize);

/// Index of an `Insert` in `Case::inserts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct InsertId(pub usize);

/// An axial pin design: one radial shell stack per axial span.
///
/// Structural equality between blocks is what drives sub-geometry reuse in
/// the synthesizer, so everything here derives `PartialEq`.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub label: String,
    /// n+1 elevations bounding n spans.
    pub axial: AxialGrid,
    /// One shell stack per span, bottom first.
    pub spans: Vec<ShellStack>,
}

impl Block {
    pub fn new(label: impl Into<String>, axial: AxialGrid, spans: Vec<ShellStack>) -> VeraResult<Self> {
        let label = label.into();
        if spans.len() != axial.spans() {
            return Err(VeraError::schema(
                format!("block `{label}`"),
                format!(
                    "{} axial spans but {} shell stacks",
                    axial.spans(),
                    spans.len()
                ),
            ));
        }
        Ok(Block {
            label,
            axial,
            spans,
        })
    }

    /// True if the design has the same shells at every elevation.
    pub fn is_axially_uniform(&self) -> bool {
        self.spans.windows(2).all(|pair| pair[0] == pair[1])
    }
}

/// One position of an assembly cell map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PinEntry {
    Fuel(BlockId),
    GuideTube,
    Instrument,
    Empty,
}

impl PinEntry {
    pub fn is_fuel(&self) -> bool {
        matches!(self, PinEntry::Fuel(_))
    }
}

/// A non-fuel insertion (thimble plug, pyrex/burnable absorber rod)
/// overlaid onto guide-tube positions of an assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub label: String,
    pub rod: ShellStack,
}

/// A fuel assembly: square cell map, pin pitch, optional insert overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub label: String,
    /// Pin pitch [cm].
    pub pitch: f64,
    pub cell_map: LatticeMap<PinEntry>,
    /// (row, col, insert) triples; every coordinate must hold a non-fuel
    /// entry in `cell_map` (checked by the builder).
    pub inserts: Vec<(usize, usize, InsertId)>,
}

impl Assembly {
    /// Pins across one side of the assembly.
    pub fn npins(&self) -> usize {
        self.cell_map.size()
    }

    /// Lateral footprint width [cm].
    pub fn width(&self) -> f64 {
        self.pitch * self.npins() as f64
    }
}

/// One position of the core assembly map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoreEntry {
    Assembly(AssemblyId),
    Reflector,
    Empty,
}

/// Core baffle: plates of `material`, `thick` cm thick, offset `gap` cm
/// from the outermost assemblies.
#[derive(Debug, Clone, PartialEq)]
pub struct Baffle {
    pub material: CompositionId,
    pub thick: f64,
    pub gap: f64,
}

/// One ring of the barrel/vessel radial description.
#[derive(Debug, Clone, PartialEq)]
pub struct VesselRing {
    pub outer_radius: f64,
    pub material: CompositionId,
}

/// Upper or lower core plate, smeared with moderator.
#[derive(Debug, Clone, PartialEq)]
pub struct CorePlate {
    pub thick: f64,
    pub material: CompositionId,
    /// Volume fraction of plate material in the smeared slab.
    pub volume_fraction: f64,
}

/// Boundary condition on one outer face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryCond {
    Reflective,
    Vacuum,
}

impl BoundaryCond {
    pub fn parse(s: &str) -> VeraResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "reflective" | "reflecting" => Ok(BoundaryCond::Reflective),
            "vacuum" => Ok(BoundaryCond::Vacuum),
            other => Err(VeraError::schema(
                "boundary condition",
                format!("unknown boundary type `{other}`"),
            )),
        }
    }
}

/// Declared boundary conditions of the core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoreBoundary {
    pub bottom: BoundaryCond,
    pub top: BoundaryCond,
    pub radial: BoundaryCond,
}

/// Declared core symmetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symmetry {
    Full,
    Half,
    Quarter,
}

impl Symmetry {
    pub fn parse(s: &str) -> VeraResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "full" | "1" => Ok(Symmetry::Full),
            "half" | "2" => Ok(Symmetry::Half),
            "quarter" | "4" | "qtr" => Ok(Symmetry::Quarter),
            other => Err(VeraError::schema(
                "core symmetry",
                format!("unknown symmetry `{other}`"),
            )),
        }
    }
}

/// The reactor core: assembly map plus everything radially and axially
/// outside the fuel.
#[derive(Debug, Clone, PartialEq)]
pub struct Core {
    pub shape: LatticeMap<CoreEntry>,
    /// Assembly pitch [cm].
    pub pitch: f64,
    /// Axial frame of reference shared by all assemblies.
    pub axial: AxialGrid,
    pub baffle: Option<Baffle>,
    /// Concentric rings outside the baffle, strictly increasing radii.
    pub vessel: Vec<VesselRing>,
    pub lower_plate: Option<CorePlate>,
    pub upper_plate: Option<CorePlate>,
    pub boundary: CoreBoundary,
    pub symmetry: Symmetry,
}

impl Core {
    pub fn size(&self) -> usize {
        self.shape.size()
    }

    pub fn height(&self) -> f64 {
        self.axial.height()
    }
}

/// An operating state: one set of thermal-hydraulic conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    /// Soluble boron concentration in the moderator [ppm by weight].
    pub boron_ppm: f64,
    /// Fraction of rated power.
    pub power_fraction: f64,
    /// Coolant inlet temperature [K].
    pub inlet_temp_k: f64,
    /// Volume-average fuel temperature [K].
    pub fuel_temp_k: f64,
    /// Moderator temperature [K].
    pub moderator_temp_k: f64,
    /// Structural (clad, internals) temperature [K].
    pub structural_temp_k: f64,
}

/// A fully resolved VERA case.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub case_id: String,
    pub units: UnitSystem,
    blocks: Vec<Block>,
    block_index: BTreeMap<String, BlockId>,
    compositions: Vec<Composition>,
    composition_index: BTreeMap<String, CompositionId>,
    assemblies: Vec<Assembly>,
    assembly_index: BTreeMap<String, AssemblyId>,
    inserts: Vec<Insert>,
    insert_index: BTreeMap<String, InsertId>,
    pub core: Option<Core>,
    pub states: Vec<State>,
}

impl Case {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn assemble(
        case_id: String,
        units: UnitSystem,
        blocks: Vec<Block>,
        block_index: BTreeMap<String, BlockId>,
        compositions: Vec<Composition>,
        composition_index: BTreeMap<String, CompositionId>,
        assemblies: Vec<Assembly>,
        assembly_index: BTreeMap<String, AssemblyId>,
        inserts: Vec<Insert>,
        insert_index: BTreeMap<String, InsertId>,
        core: Option<Core>,
        states: Vec<State>,
    ) -> Self {
        Case {
            case_id,
            units,
            blocks,
            block_index,
            compositions,
            composition_index,
            assemblies,
            assembly_index,
            inserts,
            insert_index,
            core,
            states,
        }
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.0]
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block_by_label(&self, label: &str) -> Option<BlockId> {
        self.block_index.get(label).copied()
    }

    pub fn composition(&self, id: CompositionId) -> &Composition {
        &self.compositions[id.0]
    }

    pub fn compositions(&self) -> &[Composition] {
        &self.compositions
    }

    pub fn composition_by_label(&self, label: &str) -> Option<CompositionId> {
        self.composition_index.get(label).copied()
    }

    pub fn assembly(&self, id: AssemblyId) -> &Assembly {
        &self.assemblies[id.0]
    }

    pub fn assemblies(&self) -> &[Assembly] {
        &self.assemblies
    }

    pub fn assembly_by_label(&self, label: &str) -> Option<AssemblyId> {
        self.assembly_index.get(label).copied()
    }

    pub fn insert(&self, id: InsertId) -> &Insert {
        &self.inserts[id.0]
    }

    pub fn inserts(&self) -> &[Insert] {
        &self.inserts
    }

    pub fn insert_by_label(&self, label: &str) -> Option<InsertId> {
        self.insert_index.get(label).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_span_count_must_match() {
        let axial = AxialGrid::new(vec![0.0, 100.0, 200.0]).unwrap();
        let stack = ShellStack::new(vec![0.4096, 0.475], vec![0, 1]).unwrap();
        assert!(Block::new("f1", axial.clone(), vec![stack.clone()]).is_err());
        let block = Block::new("f1", axial, vec![stack.clone(), stack]).unwrap();
        assert!(block.is_axially_uniform());
    }

    #[test]
    fn test_assembly_width() {
        let map = LatticeMap::from_flat(vec![PinEntry::GuideTube; 289]).unwrap();
        let assembly = Assembly {
            label: "assy".into(),
            pitch: 1.26,
            cell_map: map,
            inserts: vec![],
        };
        assert_eq!(assembly.npins(), 17);
        assert!((assembly.width() - 21.42).abs() < 1e-9);
    }

    #[test]
    fn test_boundary_and_symmetry_parsing() {
        assert_eq!(
            BoundaryCond::parse("reflecting").unwrap(),
            BoundaryCond::Reflective
        );
        assert_eq!(BoundaryCond::parse("vacuum").unwrap(), BoundaryCond::Vacuum);
        assert!(BoundaryCond::parse("periodic").is_err());
        assert_eq!(Symmetry::parse("qtr").unwrap(), Symmetry::Quarter);
        assert_eq!(Symmetry::parse("full").unwrap(), Symmetry::Full);
    }
}
