// ─────────────────────────────────────────────────────────────────────
// SCPN VERA Bridge — Geometry Synthesizer
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The translation core: case model in, CSG/material model out.
//!
//! Synthesis is one top-down pass — pin universes, then assembly
//! lattices, then the core envelope — with pure structural-equality
//! memoization at every level. Two blocks that compare equal share one
//! pin universe; two identical shell stacks share one ring universe;
//! surfaces with coincident coefficients are emitted once. The pass is
//! single-threaded and allocation order is traversal order, so identical
//! input always yields a structurally identical model.
//!
//! Axial reconciliation: the synthesis grid is the sorted union of the
//! core grid and every placed block's grid. Elevations within `Z_SNAP`
//! of a grid value snap onto it; a block elevation outside the core span
//! is an alignment fault. Splitting only ever adds axial cells, so no
//! declared detail is discarded.

use std::collections::BTreeMap;

use ndarray::Array2;

use vera_model::{
    Assembly, Block, Case, CompositionId, Core, CoreEntry, PinEntry, ShellStack, Symmetry,
    MODERATOR,
};
use vera_types::{IsotopeTable, VeraError, VeraResult};

use crate::boundary::{boundary_table, classify, FaceBoundary};
use crate::ids::Counter;
use crate::materials::{MaterialFactory, TempClass};
use crate::model::{
    BoundaryKind, Cell, CellId, Fill, LatticeId, RectLattice, Region, Surface, SurfaceId,
    SurfaceKind, TargetModel, Universe, UniverseId,
};

/// Elevations closer than this [cm] are the same elevation.
const Z_SNAP: f64 = 1e-6;

/// Surface-coefficient quantum for deduplication [cm].
const SURF_QUANTUM: f64 = 1e-5;

pub struct Synthesizer<'a> {
    case: &'a Case,
    factory: MaterialFactory<'a>,
    surface_ids: Counter,
    cell_ids: Counter,
    universe_ids: Counter,
    surfaces: Vec<Surface>,
    surface_index: BTreeMap<(u8, i64), SurfaceId>,
    cells: Vec<Cell>,
    universes: Vec<Universe>,
    lattices: Vec<RectLattice>,
    pin_memo: Vec<(Block, UniverseId)>,
    ring_memo: Vec<(ShellStack, UniverseId)>,
    assembly_memo: BTreeMap<usize, UniverseId>,
    moderator_universe: Option<UniverseId>,
}

impl<'a> Synthesizer<'a> {
    /// Synthesis targets the first declared state; the caller re-runs the
    /// pipeline per state for multi-state decks.
    pub fn new(case: &'a Case, isotopes: &'a IsotopeTable) -> VeraResult<Self> {
        let state = case
            .states
            .first()
            .ok_or_else(|| VeraError::schema("STATES", "case declares no states"))?;
        Ok(Synthesizer {
            case,
            factory: MaterialFactory::new(case, isotopes, state),
            surface_ids: Counter::new(),
            cell_ids: Counter::new(),
            universe_ids: Counter::new(),
            surfaces: Vec::new(),
            surface_index: BTreeMap::new(),
            cells: Vec::new(),
            universes: Vec::new(),
            lattices: Vec::new(),
            pin_memo: Vec::new(),
            ring_memo: Vec::new(),
            assembly_memo: BTreeMap::new(),
            moderator_universe: None,
        })
    }

    pub fn synthesize(mut self) -> VeraResult<TargetModel> {
        let case = self.case;
        let class = classify(case)?;
        let symmetry = case
            .core
            .as_ref()
            .map(|c| c.symmetry)
            .unwrap_or(Symmetry::Full);
        let faces = boundary_table(class, symmetry, case.core.as_ref().map(|c| &c.boundary));

        let root = match &case.core {
            None => self.synthesize_unit(&case.assemblies()[0], faces)?,
            Some(core) => self.synthesize_core(core, faces)?,
        };

        Ok(TargetModel {
            surfaces: self.surfaces,
            cells: self.cells,
            universes: self.universes,
            lattices: self.lattices,
            materials: self.factory.finish(),
            root,
        })
    }

    // ── surfaces / bookkeeping ──────────────────────────────────────

    /// Interior (transmission) surface, deduplicated on the quantized
    /// coefficient.
    fn surface(&mut self, kind: SurfaceKind) -> SurfaceId {
        let key = surface_key(&kind);
        if let Some(&id) = self.surface_index.get(&key) {
            return id;
        }
        let id = SurfaceId(self.surface_ids.take());
        self.surfaces.push(Surface {
            id,
            kind,
            boundary: BoundaryKind::Transmission,
        });
        self.surface_index.insert(key, id);
        id
    }

    /// Outer surface carrying a boundary condition; never deduplicated
    /// against interior surfaces.
    fn boundary_surface(&mut self, kind: SurfaceKind, boundary: BoundaryKind) -> SurfaceId {
        let id = SurfaceId(self.surface_ids.take());
        self.surfaces.push(Surface { id, kind, boundary });
        id
    }

    fn cell(&mut self, name: impl Into<String>, region: Region, fill: Fill) -> CellId {
        let id = CellId(self.cell_ids.take());
        self.cells.push(Cell {
            id,
            name: name.into(),
            region,
            fill,
        });
        id
    }

    fn universe(&mut self, name: impl Into<String>, cells: Vec<CellId>) -> UniverseId {
        let id = UniverseId(self.universe_ids.take());
        self.universes.push(Universe {
            id,
            name: name.into(),
            cells,
        });
        id
    }

    // ── pin level ───────────────────────────────────────────────────

    /// The all-moderator universe filling guide tubes, instrument tubes
    /// and empty lattice positions.
    fn moderator_universe(&mut self) -> VeraResult<UniverseId> {
        if let Some(u) = self.moderator_universe {
            return Ok(u);
        }
        let moderator = self.factory.moderator()?;
        let cell = self.cell("moderator", Region::Everywhere, Fill::Material(moderator));
        let u = self.universe("moderator", vec![cell]);
        self.moderator_universe = Some(u);
        Ok(u)
    }

    /// One universe per structurally distinct block. Memoized by block
    /// equality with a linear scan; realistic cases hold a handful of
    /// distinct designs.
    fn pin_universe(&mut self, block: &Block, pitch: f64, grid: &[f64]) -> VeraResult<UniverseId> {
        let widest = block
            .spans
            .iter()
            .map(ShellStack::outer_radius)
            .fold(0.0, f64::max);
        if widest >= pitch / 2.0 {
            return Err(VeraError::overlap(
                format!("pin `{}`", block.label),
                format!("outer radius {widest} does not fit pitch {pitch}"),
            ));
        }
        if let Some((_, u)) = self.pin_memo.iter().find(|(b, _)| b == block) {
            return Ok(*u);
        }

        // A single unbounded shell stack is only valid when the block
        // actually covers the whole synthesis grid; a short uniform block
        // still needs moderator spans above and below its extent.
        let covers_grid = (block.axial.bottom() - grid[0]).abs() <= Z_SNAP
            && (block.axial.top() - grid[grid.len() - 1]).abs() <= Z_SNAP;

        let mut cells = Vec::new();
        if block.is_axially_uniform() && covers_grid {
            self.shell_cells(&block.spans[0], &block.label, (None, None), &mut cells)?;
        } else {
            let bottom = block.axial.bottom();
            let top = block.axial.top();
            let spans = grid.len() - 1;
            for i in 0..spans {
                let (lo, hi) = (grid[i], grid[i + 1]);
                let mid = 0.5 * (lo + hi);
                // Outermost synthesis spans extend to infinity so the
                // universe tiles all space.
                let z0 = (i > 0).then_some(lo);
                let z1 = (i + 1 < spans).then_some(hi);
                if mid < bottom || mid > top {
                    let moderator = self.factory.moderator()?;
                    let mut parts = Vec::new();
                    self.z_parts((z0, z1), &mut parts);
                    let region = if parts.is_empty() {
                        Region::Everywhere
                    } else {
                        Region::all(parts)
                    };
                    cells.push(self.cell(
                        format!("{}-z{}", block.label, i),
                        region,
                        Fill::Material(moderator),
                    ));
                } else {
                    let span = block_span_at(block, mid);
                    self.shell_cells(span, &block.label, (z0, z1), &mut cells)?;
                }
            }
        }
        let u = self.universe(block.label.clone(), cells);
        self.pin_memo.push((block.clone(), u));
        Ok(u)
    }

    /// Concentric shell cells plus the outer moderator cell, optionally
    /// bounded by z-planes.
    fn shell_cells(
        &mut self,
        stack: &ShellStack,
        label: &str,
        zbounds: (Option<f64>, Option<f64>),
        cells: &mut Vec<CellId>,
    ) -> VeraResult<()> {
        let cylinders: Vec<SurfaceId> = stack
            .radii()
            .iter()
            .map(|&r| self.surface(SurfaceKind::ZCylinder { r }))
            .collect();
        for (i, &slot) in stack.materials().iter().enumerate() {
            let mut parts = vec![Region::Below(cylinders[i])];
            if i > 0 {
                parts.push(Region::Above(cylinders[i - 1]));
            }
            self.z_parts(zbounds, &mut parts);
            let comp = CompositionId(slot);
            let material = self.factory.material(comp, self.temp_class(comp))?;
            cells.push(self.cell(
                format!("{label}-shell{i}"),
                Region::all(parts),
                Fill::Material(material),
            ));
        }
        let mut parts = vec![Region::Above(cylinders[cylinders.len() - 1])];
        self.z_parts(zbounds, &mut parts);
        let moderator = self.factory.moderator()?;
        cells.push(self.cell(
            format!("{label}-outer"),
            Region::all(parts),
            Fill::Material(moderator),
        ));
        Ok(())
    }

    /// Ring universe for an insert rod, memoized on the shell stack.
    fn ring_universe(
        &mut self,
        stack: &ShellStack,
        label: &str,
        pitch: f64,
    ) -> VeraResult<UniverseId> {
        if stack.outer_radius() >= pitch / 2.0 {
            return Err(VeraError::overlap(
                format!("insert `{label}`"),
                format!(
                    "outer radius {} does not fit pitch {pitch}",
                    stack.outer_radius()
                ),
            ));
        }
        if let Some((_, u)) = self.ring_memo.iter().find(|(s, _)| s == stack) {
            return Ok(*u);
        }
        let mut cells = Vec::new();
        self.shell_cells(stack, label, (None, None), &mut cells)?;
        let u = self.universe(label.to_string(), cells);
        self.ring_memo.push((stack.clone(), u));
        Ok(u)
    }

    fn z_parts(&mut self, zbounds: (Option<f64>, Option<f64>), parts: &mut Vec<Region>) {
        if let Some(z) = zbounds.0 {
            let plane = self.surface(SurfaceKind::ZPlane { z });
            parts.push(Region::Above(plane));
        }
        if let Some(z) = zbounds.1 {
            let plane = self.surface(SurfaceKind::ZPlane { z });
            parts.push(Region::Below(plane));
        }
    }

    /// Which declared temperature a composition evaluates at: heavy-metal
    /// bearing compositions run at fuel temperature, the coolant at
    /// moderator temperature, everything else at structural temperature.
    fn temp_class(&self, comp: CompositionId) -> TempClass {
        let composition = self.case.composition(comp);
        if composition.label() == MODERATOR {
            TempClass::Moderator
        } else if composition
            .nuclides()
            .iter()
            .any(|(n, _)| n.starts_with('U') || n.starts_with("Pu") || n.starts_with("Th"))
        {
            TempClass::Fuel
        } else {
            TempClass::Structural
        }
    }

    // ── lattice / assembly level ────────────────────────────────────

    /// Assembly universe: pin lattice in a square envelope, moderator in
    /// the envelope-to-pitch gap. Memoized per assembly arena index.
    fn assembly_universe(
        &mut self,
        assembly: &Assembly,
        index: usize,
        grid: &[f64],
    ) -> VeraResult<UniverseId> {
        if let Some(&u) = self.assembly_memo.get(&index) {
            return Ok(u);
        }
        let case = self.case;
        let n = assembly.npins();
        let moderator_u = self.moderator_universe()?;

        let mut positions = Vec::with_capacity(n * n);
        for (_, entry) in assembly.cell_map.iter() {
            let u = match entry {
                PinEntry::Fuel(id) => self.pin_universe(case.block(*id), assembly.pitch, grid)?,
                PinEntry::GuideTube | PinEntry::Instrument | PinEntry::Empty => moderator_u,
            };
            positions.push(u);
        }
        let mut universes = Array2::from_shape_vec((n, n), positions)
            .map_err(|e| VeraError::schema("lattice", e.to_string()))?;

        for &(row, col, id) in &assembly.inserts {
            let insert = case.insert(id);
            universes[[row, col]] =
                self.ring_universe(&insert.rod, &insert.label, assembly.pitch)?;
        }

        let width = assembly.width();
        let lattice_id = LatticeId(self.universe_ids.take());
        self.lattices.push(RectLattice {
            id: lattice_id,
            name: assembly.label.clone(),
            pitch: assembly.pitch,
            lower_left: [-width / 2.0, -width / 2.0],
            universes,
            outer: moderator_u,
        });

        let envelope = self.square_prism(width / 2.0);
        let inside = self.cell(
            format!("{}-lattice", assembly.label),
            envelope.clone(),
            Fill::Lattice(lattice_id),
        );
        let moderator = self.factory.moderator()?;
        let gap = self.cell(
            format!("{}-gap", assembly.label),
            Region::Complement(Box::new(envelope)),
            Fill::Material(moderator),
        );
        let u = self.universe(assembly.label.clone(), vec![inside, gap]);
        self.assembly_memo.insert(index, u);
        Ok(u)
    }

    /// x/y planes at ±half, intersected.
    fn square_prism(&mut self, half: f64) -> Region {
        let xm = self.surface(SurfaceKind::XPlane { x: -half });
        let xp = self.surface(SurfaceKind::XPlane { x: half });
        let ym = self.surface(SurfaceKind::YPlane { y: -half });
        let yp = self.surface(SurfaceKind::YPlane { y: half });
        Region::all(vec![
            Region::Above(xm),
            Region::Below(xp),
            Region::Above(ym),
            Region::Below(yp),
        ])
    }

    // ── top level: reflected unit problems ──────────────────────────

    /// Pincell and 2D lattice problems: one assembly, fully reflected.
    fn synthesize_unit(
        &mut self,
        assembly: &Assembly,
        faces: FaceBoundary,
    ) -> VeraResult<UniverseId> {
        let case = self.case;
        let grid = unit_grid(case, assembly)?;
        let index = case
            .assembly_by_label(&assembly.label)
            .map(|id| id.0)
            .unwrap_or(0);
        let inner = self.assembly_universe(assembly, index, &grid)?;

        let half = assembly.width() / 2.0;
        let xm = self.boundary_surface(SurfaceKind::XPlane { x: -half }, faces.min_x);
        let xp = self.boundary_surface(SurfaceKind::XPlane { x: half }, faces.max_x);
        let ym = self.boundary_surface(SurfaceKind::YPlane { y: -half }, faces.min_y);
        let yp = self.boundary_surface(SurfaceKind::YPlane { y: half }, faces.max_y);
        let zb = self.boundary_surface(SurfaceKind::ZPlane { z: grid[0] }, faces.min_z);
        let zt = self.boundary_surface(
            SurfaceKind::ZPlane {
                z: grid[grid.len() - 1],
            },
            faces.max_z,
        );
        let region = Region::all(vec![
            Region::Above(xm),
            Region::Below(xp),
            Region::Above(ym),
            Region::Below(yp),
            Region::Above(zb),
            Region::Below(zt),
        ]);
        let root_cell = self.cell("problem", region, Fill::Universe(inner));
        Ok(self.universe("root", vec![root_cell]))
    }

    // ── top level: cores ────────────────────────────────────────────

    fn synthesize_core(&mut self, core: &Core, faces: FaceBoundary) -> VeraResult<UniverseId> {
        let case = self.case;
        let grid = reconcile_axial(core, case)?;
        let n = core.size();
        let pitch = core.pitch;
        let moderator_u = self.moderator_universe()?;
        let moderator = self.factory.moderator()?;

        // Assembly footprints may not exceed the assembly pitch.
        for assembly in case.assemblies() {
            if assembly.width() > pitch + SURF_QUANTUM {
                return Err(VeraError::overlap(
                    format!("assembly `{}`", assembly.label),
                    format!("width {} exceeds core pitch {pitch}", assembly.width()),
                ));
            }
        }

        let mut positions = Vec::with_capacity(n * n);
        for (_, entry) in core.shape.iter() {
            let u = match entry {
                CoreEntry::Assembly(id) => {
                    self.assembly_universe(case.assembly(*id), id.0, &grid)?
                }
                CoreEntry::Reflector | CoreEntry::Empty => moderator_u,
            };
            positions.push(u);
        }
        let universes = Array2::from_shape_vec((n, n), positions)
            .map_err(|e| VeraError::schema("core map", e.to_string()))?;

        // Symmetry-folded maps keep the central assembly centered on the
        // symmetry planes at x = 0 / y = 0.
        let width = pitch * n as f64;
        let lower_left = match core.symmetry {
            Symmetry::Full => [-width / 2.0, -width / 2.0],
            Symmetry::Half => [-width / 2.0, -pitch / 2.0],
            Symmetry::Quarter => [-pitch / 2.0, -pitch / 2.0],
        };
        let lattice_id = LatticeId(self.universe_ids.take());
        self.lattices.push(RectLattice {
            id: lattice_id,
            name: "core".to_string(),
            pitch,
            lower_left,
            universes,
            outer: moderator_u,
        });

        // Radial reach: the far corner of the farthest occupied position.
        let mut reach: f64 = 0.0;
        for ((row, col), entry) in core.shape.iter() {
            if !matches!(entry, CoreEntry::Assembly(_)) {
                continue;
            }
            let x = lower_left[0] + (col as f64 + 0.5) * pitch;
            let y = lower_left[1] + (row as f64 + 0.5) * pitch;
            let corner =
                ((x.abs() + pitch / 2.0).powi(2) + (y.abs() + pitch / 2.0).powi(2)).sqrt();
            reach = reach.max(corner);
        }

        // Symmetry planes clip the folded model.
        let mut clip = Vec::new();
        if matches!(core.symmetry, Symmetry::Quarter) {
            let x0 = self.boundary_surface(SurfaceKind::XPlane { x: 0.0 }, faces.min_x);
            clip.push(Region::Above(x0));
        }
        if matches!(core.symmetry, Symmetry::Quarter | Symmetry::Half) {
            let y0 = self.boundary_surface(SurfaceKind::YPlane { y: 0.0 }, faces.min_y);
            clip.push(Region::Above(y0));
        }

        // Axial envelope, with plate slabs outside the active grid.
        let active_bottom = grid[0];
        let active_top = grid[grid.len() - 1];
        let model_bottom = active_bottom - core.lower_plate.as_ref().map_or(0.0, |p| p.thick);
        let model_top = active_top + core.upper_plate.as_ref().map_or(0.0, |p| p.thick);
        let zb = self.boundary_surface(SurfaceKind::ZPlane { z: model_bottom }, faces.min_z);
        let zt = self.boundary_surface(SurfaceKind::ZPlane { z: model_top }, faces.max_z);
        let z_lo = if core.lower_plate.is_some() {
            Region::Above(self.surface(SurfaceKind::ZPlane { z: active_bottom }))
        } else {
            Region::Above(zb)
        };
        let z_hi = if core.upper_plate.is_some() {
            Region::Below(self.surface(SurfaceKind::ZPlane { z: active_top }))
        } else {
            Region::Below(zt)
        };

        // Radial shell plan: annulus i spans (radius[i-1], radius[i]];
        // the first radius only bounds the lattice cell, whose outer
        // universe already supplies coolant between the map footprint and
        // that cylinder.
        let mut shells: Vec<(f64, Fill, String)> = Vec::new();
        if let Some(baffle) = &core.baffle {
            let material = self
                .factory
                .material(baffle.material, TempClass::Structural)?;
            shells.push((
                reach + baffle.gap,
                Fill::Material(moderator),
                "core-bound".to_string(),
            ));
            shells.push((
                reach + baffle.gap + baffle.thick,
                Fill::Material(material),
                "baffle".to_string(),
            ));
        }
        for (i, ring) in core.vessel.iter().enumerate() {
            if let Some(&(last, _, _)) = shells.last() {
                if ring.outer_radius <= last {
                    return Err(VeraError::overlap(
                        "core vessel",
                        format!(
                            "ring {i} radius {} inside preceding radius {last}",
                            ring.outer_radius
                        ),
                    ));
                }
            }
            let material = self.factory.material(ring.material, TempClass::Structural)?;
            shells.push((
                ring.outer_radius,
                Fill::Material(material),
                format!("vessel-{i}"),
            ));
        }

        let mut root_cells = Vec::new();
        if shells.is_empty() {
            // Bare core map: rectangular reflected envelope.
            let xm = self.boundary_surface(SurfaceKind::XPlane { x: lower_left[0] }, faces.min_x);
            let xp = self.boundary_surface(
                SurfaceKind::XPlane {
                    x: lower_left[0] + width,
                },
                faces.max_x,
            );
            let ym = self.boundary_surface(SurfaceKind::YPlane { y: lower_left[1] }, faces.min_y);
            let yp = self.boundary_surface(
                SurfaceKind::YPlane {
                    y: lower_left[1] + width,
                },
                faces.max_y,
            );
            let mut parts = vec![
                Region::Above(xm),
                Region::Below(xp),
                Region::Above(ym),
                Region::Below(yp),
                z_lo.clone(),
                z_hi.clone(),
            ];
            parts.extend(clip.iter().cloned());
            root_cells.push(self.cell("core", Region::all(parts), Fill::Lattice(lattice_id)));
            self.plate_cells(core, &clip, None, (zb, zt), (active_bottom, active_top), &mut root_cells)?;
            return Ok(self.universe("root", root_cells));
        }

        // Cylindrical envelope: lattice inside the innermost cylinder,
        // annuli outward, the outermost cylinder carrying the radial
        // boundary condition.
        let mut cylinders = Vec::with_capacity(shells.len());
        for (i, &(radius, _, _)) in shells.iter().enumerate() {
            let cylinder = if i + 1 == shells.len() {
                self.boundary_surface(SurfaceKind::ZCylinder { r: radius }, faces.radial)
            } else {
                self.surface(SurfaceKind::ZCylinder { r: radius })
            };
            cylinders.push(cylinder);
        }

        let mut parts = vec![Region::Below(cylinders[0]), z_lo.clone(), z_hi.clone()];
        parts.extend(clip.iter().cloned());
        root_cells.push(self.cell("core", Region::all(parts), Fill::Lattice(lattice_id)));

        for i in 1..shells.len() {
            let (_, fill, ref name) = shells[i];
            let mut parts = vec![
                Region::Above(cylinders[i - 1]),
                Region::Below(cylinders[i]),
                z_lo.clone(),
                z_hi.clone(),
            ];
            parts.extend(clip.iter().cloned());
            root_cells.push(self.cell(name.clone(), Region::all(parts), fill));
        }

        self.plate_cells(
            core,
            &clip,
            Some(cylinders[cylinders.len() - 1]),
            (zb, zt),
            (active_bottom, active_top),
            &mut root_cells,
        )?;
        Ok(self.universe("root", root_cells))
    }

    /// Smeared upper/lower core-plate slabs between the boundary planes
    /// and the active grid.
    fn plate_cells(
        &mut self,
        core: &Core,
        clip: &[Region],
        radial: Option<SurfaceId>,
        boundary_planes: (SurfaceId, SurfaceId),
        active: (f64, f64),
        cells: &mut Vec<CellId>,
    ) -> VeraResult<()> {
        if let Some(plate) = &core.lower_plate {
            let material = self.factory.smeared(plate.material, plate.volume_fraction)?;
            let top = self.surface(SurfaceKind::ZPlane { z: active.0 });
            let mut parts = vec![Region::Above(boundary_planes.0), Region::Below(top)];
            if let Some(cylinder) = radial {
                parts.push(Region::Below(cylinder));
            }
            parts.extend(clip.iter().cloned());
            cells.push(self.cell("lower-plate", Region::all(parts), Fill::Material(material)));
        }
        if let Some(plate) = &core.upper_plate {
            let material = self.factory.smeared(plate.material, plate.volume_fraction)?;
            let bottom = self.surface(SurfaceKind::ZPlane { z: active.1 });
            let mut parts = vec![Region::Above(bottom), Region::Below(boundary_planes.1)];
            if let Some(cylinder) = radial {
                parts.push(Region::Below(cylinder));
            }
            parts.extend(clip.iter().cloned());
            cells.push(self.cell("upper-plate", Region::all(parts), Fill::Material(material)));
        }
        Ok(())
    }
}

fn surface_key(kind: &SurfaceKind) -> (u8, i64) {
    let quantize = |v: f64| (v / SURF_QUANTUM).round() as i64;
    match kind {
        SurfaceKind::XPlane { x } => (0, quantize(*x)),
        SurfaceKind::YPlane { y } => (1, quantize(*y)),
        SurfaceKind::ZPlane { z } => (2, quantize(*z)),
        SurfaceKind::ZCylinder { r } => (3, quantize(*r)),
    }
}

/// The span containing elevation `z`; callers guarantee `z` lies within
/// the block extent.
fn block_span_at(block: &Block, z: f64) -> &ShellStack {
    let elevations = block.axial.elevations();
    let index = elevations
        .windows(2)
        .position(|w| z >= w[0] && z < w[1])
        .unwrap_or(block.spans.len() - 1);
    &block.spans[index]
}

/// Union grid for core-less problems: every placed block's elevations,
/// snapped and sorted.
fn unit_grid(case: &Case, assembly: &Assembly) -> VeraResult<Vec<f64>> {
    let mut grid: Vec<f64> = Vec::new();
    for (_, entry) in assembly.cell_map.iter() {
        if let PinEntry::Fuel(id) = entry {
            for &z in case.block(*id).axial.elevations() {
                if !grid.iter().any(|&g| (g - z).abs() <= Z_SNAP) {
                    grid.push(z);
                }
            }
        }
    }
    if grid.len() < 2 {
        return Err(VeraError::UnsupportedProblemType(format!(
            "assembly `{}` places no fuel pins",
            assembly.label
        )));
    }
    grid.sort_by(f64::total_cmp);
    Ok(grid)
}

/// Sorted union of the core grid and every placed block's grid. Block
/// elevations within `Z_SNAP` of a core elevation snap onto it; a block
/// elevation outside the core span cannot be reconciled.
fn reconcile_axial(core: &Core, case: &Case) -> VeraResult<Vec<f64>> {
    let mut grid: Vec<f64> = core.axial.elevations().to_vec();
    let bottom = core.axial.bottom();
    let top = core.axial.top();
    for (_, entry) in core.shape.iter() {
        let CoreEntry::Assembly(assembly_id) = entry else {
            continue;
        };
        let assembly = case.assembly(*assembly_id);
        for (_, pin) in assembly.cell_map.iter() {
            let PinEntry::Fuel(block_id) = pin else {
                continue;
            };
            let block = case.block(*block_id);
            for &z in block.axial.elevations() {
                if z < bottom - Z_SNAP || z > top + Z_SNAP {
                    return Err(VeraError::AxialAlignment(format!(
                        "block `{}` elevation {z} outside core span [{bottom}, {top}]",
                        block.label
                    )));
                }
                if !grid.iter().any(|&g| (g - z).abs() <= Z_SNAP) {
                    grid.push(z);
                }
            }
        }
    }
    grid.sort_by(f64::total_cmp);
    Ok(grid)
}
