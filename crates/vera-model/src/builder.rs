// ─────────────────────────────────────────────────────────────────────
// SCPN VERA Bridge — Case Builder
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The Case Model Builder.
//!
//! Walks the raw parsed document and produces a fully resolved `Case` in
//! two phases: first every label→object table is constructed, then every
//! reference is resolved to an arena index. Resolution order follows the
//! dependency chain: compositions and blocks (no forward dependencies),
//! then assemblies, then the core, then states.
//!
//! The raw document is never mutated; on any error the partially built
//! case is dropped.

use std::collections::BTreeMap;

use vera_types::{IsotopeTable, RawList, RawValue, UnitSystem, VeraError, VeraResult};

use crate::case::{
    Assembly, AssemblyId, Baffle, Block, BlockId, BoundaryCond, Case, CompositionId, Core,
    CoreBoundary, CoreEntry, CorePlate, Insert, InsertId, PinEntry, State, Symmetry, VesselRing,
};
use crate::values::{AxialGrid, Composition, LatticeMap, ShellStack};

/// Reserved label for the coolant. The deck never declares it; its
/// composition is computed per state from boron ppm and temperature.
pub const MODERATOR: &str = "mod";

/// U-234 content auto-added to fuel from U-235 enrichment [wt%]:
/// w234 = C·(w235)^E.
const U234_COEFF: f64 = 0.007731;
const U234_EXPONENT: f64 = 1.0837;
/// U-236 content auto-added as a fixed ratio of U-235 [wt%/wt%].
const U236_RATIO: f64 = 0.0046;

/// Nominal hot-zero-power state used when the deck declares no `STATES`
/// section.
const DEFAULT_STATE: State = State {
    boron_ppm: 0.0,
    power_fraction: 1.0,
    inlet_temp_k: 565.0,
    fuel_temp_k: 900.0,
    moderator_temp_k: 565.0,
    structural_temp_k: 565.0,
};

/// Builds a `Case` from a raw parsed document.
pub struct CaseBuilder<'a> {
    isotopes: &'a IsotopeTable,
    default_units: UnitSystem,
}

impl<'a> CaseBuilder<'a> {
    pub fn new(isotopes: &'a IsotopeTable) -> Self {
        CaseBuilder {
            isotopes,
            default_units: UnitSystem::Si,
        }
    }

    pub fn with_default_units(mut self, units: UnitSystem) -> Self {
        self.default_units = units;
        self
    }

    /// Build the immutable case model. See the module docs for the
    /// resolution order.
    pub fn build(&self, raw: &RawList) -> VeraResult<Case> {
        let units = match raw.params.get("units") {
            Some(RawValue::Str(decl)) => UnitSystem::parse(decl)?,
            _ => self.default_units,
        };
        let cm = units.length_to_cm();

        let case_id = if raw.has_param("case_id") {
            raw.str_param("case_id")?.to_string()
        } else {
            "Unnamed VERA Case".to_string()
        };

        // Phase 1a: compositions. The moderator placeholder goes in first
        // so shell stacks may reference it; its real composition is
        // instantiated per state by the synthesizer.
        let mut compositions = vec![Composition::new(
            MODERATOR,
            1.0,
            vec![("H00".to_string(), 0.111915), ("O00".to_string(), 0.888085)],
        )?];
        let mut composition_index = BTreeMap::new();
        composition_index.insert(MODERATOR.to_string(), CompositionId(0));

        for mat in &raw.require_child("MATERIALS")?.lists {
            let composition = self.read_material(mat)?;
            if composition_index.contains_key(composition.label()) {
                return Err(VeraError::schema(
                    "MATERIALS",
                    format!("duplicate material label `{}`", composition.label()),
                ));
            }
            composition_index
                .insert(composition.label().to_string(), CompositionId(compositions.len()));
            compositions.push(composition);
        }

        // Phase 1b: blocks (axial pin designs).
        let mut blocks = Vec::new();
        let mut block_index = BTreeMap::new();
        for raw_block in &raw.require_child("BLOCKS")?.lists {
            let block = read_block(raw_block, &composition_index, cm)?;
            if block_index.contains_key(&block.label) {
                return Err(VeraError::schema(
                    "BLOCKS",
                    format!("duplicate block label `{}`", block.label),
                ));
            }
            block_index.insert(block.label.clone(), BlockId(blocks.len()));
            blocks.push(block);
        }

        // Phase 1c: inserts (optional).
        let mut inserts = Vec::new();
        let mut insert_index = BTreeMap::new();
        if let Some(raw_inserts) = raw.child("INSERTS") {
            for raw_insert in &raw_inserts.lists {
                let insert = read_insert(raw_insert, &composition_index, cm)?;
                if insert_index.contains_key(&insert.label) {
                    return Err(VeraError::schema(
                        "INSERTS",
                        format!("duplicate insert label `{}`", insert.label),
                    ));
                }
                insert_index.insert(insert.label.clone(), InsertId(inserts.len()));
                inserts.push(insert);
            }
        }

        // Phase 2: assemblies reference blocks and inserts.
        let mut assemblies = Vec::new();
        let mut assembly_index = BTreeMap::new();
        for raw_assembly in &raw.require_child("ASSEMBLIES")?.lists {
            let assembly = read_assembly(raw_assembly, &block_index, &insert_index, cm)?;
            if assembly_index.contains_key(&assembly.label) {
                return Err(VeraError::schema(
                    "ASSEMBLIES",
                    format!("duplicate assembly label `{}`", assembly.label),
                ));
            }
            assembly_index.insert(assembly.label.clone(), AssemblyId(assemblies.len()));
            assemblies.push(assembly);
        }

        // Phase 3: the core references assemblies.
        let core = match raw.child("CORE") {
            Some(raw_core) => Some(read_core(
                raw_core,
                &assembly_index,
                &composition_index,
                cm,
            )?),
            None => None,
        };

        // Phase 4: states.
        let states = match raw.child("STATES") {
            Some(raw_states) => {
                let mut states = Vec::new();
                for raw_state in &raw_states.lists {
                    states.push(read_state(raw_state)?);
                }
                if states.is_empty() {
                    return Err(VeraError::schema("STATES", "section declares no states"));
                }
                states
            }
            None => vec![DEFAULT_STATE],
        };

        Ok(Case::assemble(
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
        ))
    }

    /// Read one material list: either a plain `mat` card (density plus
    /// isotope fractions) or a `fuel` card (density plus U-235 enrichment,
    /// from which the full oxide composition is derived).
    fn read_material(&self, mat: &RawList) -> VeraResult<Composition> {
        if mat.has_param("enrichment") {
            return self.read_fuel(mat);
        }
        let density = mat.f64_param("density")?;
        let fracs = mat.f64_array("mat_fracs")?;
        let names = mat.str_array("mat_names")?;
        if fracs.len() != names.len() {
            return Err(VeraError::schema(
                &mat.name,
                format!(
                    "{} isotope names but {} fractions",
                    names.len(),
                    fracs.len()
                ),
            ));
        }
        // Positive fractions are weight fractions; negative are atom
        // fractions and convert via w_i = a_i·M_i / Σ a_j·M_j.
        let total: f64 = fracs.iter().sum();
        let nuclides = if total >= 0.0 {
            names.into_iter().zip(fracs).collect()
        } else {
            let mut weighted: Vec<(String, f64)> = Vec::with_capacity(names.len());
            let mut sum = 0.0;
            for (name, frac) in names.into_iter().zip(fracs) {
                let w = frac.abs() * self.isotopes.mean_mass(&name)?;
                weighted.push((name, w));
                sum += w;
            }
            for pair in &mut weighted {
                pair.1 /= sum;
            }
            weighted
        };
        Composition::new(&mat.name, density, nuclides)
    }

    /// Derive a UO2 (or gadolinia-bearing) composition from a fuel card.
    fn read_fuel(&self, mat: &RawList) -> VeraResult<Composition> {
        let density = mat.f64_param("density")?;
        let w235_pct = mat.f64_param("enrichment")?;
        if !(0.0..=100.0).contains(&w235_pct) {
            return Err(VeraError::schema(
                &mat.name,
                format!("enrichment must be in [0, 100] wt%, got {w235_pct}"),
            ));
        }

        // U-234/U-236 are auto-added from the enrichment; U-238 takes the
        // remainder of the heavy metal.
        let w234_pct = U234_COEFF * w235_pct.powf(U234_EXPONENT);
        let w236_pct = U236_RATIO * w235_pct;
        let w238_pct = 100.0 - w235_pct - w234_pct - w236_pct;
        if w238_pct < 0.0 {
            return Err(VeraError::schema(
                &mat.name,
                "U-234/U-236 auto-addition exceeds 100 wt%",
            ));
        }
        let hm = [
            ("U234", w234_pct / 100.0),
            ("U235", w235_pct / 100.0),
            ("U236", w236_pct / 100.0),
            ("U238", w238_pct / 100.0),
        ];

        // Stoichiometric oxygen: two O per heavy-metal atom. The HM molar
        // mass is the harmonic mean over weight fractions.
        let mut inv_molar = 0.0;
        for (nuclide, w) in hm {
            inv_molar += w / self.isotopes.mass(nuclide)?;
        }
        let hm_molar = 1.0 / inv_molar;
        let o_molar = self.isotopes.element_mean_mass("O")?;
        let w_oxygen = 2.0 * o_molar / (hm_molar + 2.0 * o_molar);

        let mut nuclides: Vec<(String, f64)> = hm
            .iter()
            .map(|(nuclide, w)| (nuclide.to_string(), w * (1.0 - w_oxygen)))
            .collect();
        nuclides.push(("O00".to_string(), w_oxygen));

        // Optional gadolinia admixture, by weight fraction of total fuel.
        if mat.has_param("gad_frac") {
            let gad_frac = mat.f64_param("gad_frac")?;
            if !(0.0..1.0).contains(&gad_frac) {
                return Err(VeraError::schema(
                    &mat.name,
                    format!("gad_frac must be in [0, 1), got {gad_frac}"),
                ));
            }
            let gad_names = mat.str_array("gad_names")?;
            let gad_fracs = mat.f64_array("gad_fracs")?;
            if gad_names.len() != gad_fracs.len() {
                return Err(VeraError::schema(
                    &mat.name,
                    "gad_names and gad_fracs lengths differ",
                ));
            }
            for pair in &mut nuclides {
                pair.1 *= 1.0 - gad_frac;
            }
            for (name, frac) in gad_names.into_iter().zip(gad_fracs) {
                nuclides.push((name, frac * gad_frac));
            }
        }

        Composition::new(&mat.name, density, nuclides)
    }
}

fn resolve_composition(
    label: &str,
    index: &BTreeMap<String, CompositionId>,
    context: &str,
) -> VeraResult<CompositionId> {
    index
        .get(label)
        .copied()
        .ok_or_else(|| VeraError::reference(label, context.to_string()))
}

fn read_shell_stack(
    list: &RawList,
    compositions: &BTreeMap<String, CompositionId>,
    cm: f64,
) -> VeraResult<ShellStack> {
    let radii: Vec<f64> = list
        .f64_array("radii")?
        .into_iter()
        .map(|r| r * cm)
        .collect();
    let names = list.str_array("mats")?;
    let mut materials = Vec::with_capacity(names.len());
    for name in &names {
        materials.push(resolve_composition(name, compositions, &list.name)?.0);
    }
    ShellStack::new(radii, materials)
}

fn read_block(
    raw_block: &RawList,
    compositions: &BTreeMap<String, CompositionId>,
    cm: f64,
) -> VeraResult<Block> {
    let axial = AxialGrid::new(
        raw_block
            .f64_array("axial")?
            .into_iter()
            .map(|z| z * cm)
            .collect(),
    )?;
    let mut spans = Vec::with_capacity(raw_block.lists.len());
    for span in &raw_block.lists {
        spans.push(read_shell_stack(span, compositions, cm)?);
    }
    Block::new(&raw_block.name, axial, spans)
}

fn read_insert(
    raw_insert: &RawList,
    compositions: &BTreeMap<String, CompositionId>,
    cm: f64,
) -> VeraResult<Insert> {
    Ok(Insert {
        label: raw_insert.name.clone(),
        rod: read_shell_stack(raw_insert, compositions, cm)?,
    })
}

fn read_assembly(
    raw_assembly: &RawList,
    blocks: &BTreeMap<String, BlockId>,
    inserts: &BTreeMap<String, InsertId>,
    cm: f64,
) -> VeraResult<Assembly> {
    let pitch = raw_assembly.f64_param("ppitch")? * cm;
    if pitch <= 0.0 {
        return Err(VeraError::schema(
            &raw_assembly.name,
            format!("pin pitch must be positive, got {pitch}"),
        ));
    }
    let context = format!("assembly `{}` cell map", raw_assembly.name);
    let mut entries = Vec::new();
    for key in raw_assembly.str_array("cell_map")? {
        entries.push(match key.as_str() {
            "GT" | "gt" => PinEntry::GuideTube,
            "IT" | "it" => PinEntry::Instrument,
            "-" | "" => PinEntry::Empty,
            label => PinEntry::Fuel(
                blocks
                    .get(label)
                    .copied()
                    .ok_or_else(|| VeraError::reference(label, context.clone()))?,
            ),
        });
    }
    let cell_map = LatticeMap::from_flat(entries)?;

    let mut overlay = Vec::new();
    if raw_assembly.has_param("insert_map") {
        let insert_context = format!("assembly `{}` insert map", raw_assembly.name);
        let map = raw_assembly.str_array("insert_map")?;
        let n = cell_map.size();
        if map.len() != n * n {
            return Err(VeraError::schema(
                &raw_assembly.name,
                format!("insert map has {} entries, cell map {}", map.len(), n * n),
            ));
        }
        for (i, key) in map.iter().enumerate() {
            if key == "-" || key.is_empty() {
                continue;
            }
            let (row, col) = (i / n, i % n);
            let id = inserts
                .get(key.as_str())
                .copied()
                .ok_or_else(|| VeraError::reference(key.clone(), insert_context.clone()))?;
            if cell_map.get(row, col).is_fuel() {
                return Err(VeraError::schema(
                    &raw_assembly.name,
                    format!("insert `{key}` placed on fuel position ({row}, {col})"),
                ));
            }
            overlay.push((row, col, id));
        }
    }

    Ok(Assembly {
        label: raw_assembly.name.clone(),
        pitch,
        cell_map,
        inserts: overlay,
    })
}

fn read_core(
    raw_core: &RawList,
    assemblies: &BTreeMap<String, AssemblyId>,
    compositions: &BTreeMap<String, CompositionId>,
    cm: f64,
) -> VeraResult<Core> {
    let pitch = raw_core.f64_param("apitch")? * cm;
    let axial = AxialGrid::new(
        raw_core
            .f64_array("axial")?
            .into_iter()
            .map(|z| z * cm)
            .collect(),
    )?;

    let context = "core assembly map";
    let mut entries = Vec::new();
    for key in raw_core.str_array("assm_map")? {
        entries.push(match key.as_str() {
            "-" | "" => CoreEntry::Empty,
            "R" | "refl" => CoreEntry::Reflector,
            label => CoreEntry::Assembly(
                assemblies
                    .get(label)
                    .copied()
                    .ok_or_else(|| VeraError::reference(label, context))?,
            ),
        });
    }
    let shape = LatticeMap::from_flat(entries)?;

    let baffle = if raw_core.has_param("baffle_mat") {
        Some(Baffle {
            material: resolve_composition(
                raw_core.str_param("baffle_mat")?,
                compositions,
                "core baffle",
            )?,
            thick: raw_core.f64_param("baffle_thick")? * cm,
            gap: raw_core.f64_param("baffle_gap")? * cm,
        })
    } else {
        None
    };

    let mut vessel = Vec::new();
    if raw_core.has_param("vessel_radii") {
        let radii = raw_core.f64_array("vessel_radii")?;
        let mats = raw_core.str_array("vessel_mats")?;
        if radii.len() != mats.len() {
            return Err(VeraError::schema(
                &raw_core.name,
                format!("{} vessel radii but {} materials", radii.len(), mats.len()),
            ));
        }
        let mut last = 0.0;
        for (radius, mat) in radii.into_iter().zip(mats) {
            let radius = radius * cm;
            if radius <= last {
                return Err(VeraError::schema(
                    &raw_core.name,
                    format!("vessel radii must be strictly increasing at {radius}"),
                ));
            }
            last = radius;
            vessel.push(VesselRing {
                outer_radius: radius,
                material: resolve_composition(&mat, compositions, "core vessel")?,
            });
        }
    }

    let lower_plate = read_plate(raw_core, "lower", compositions, cm)?;
    let upper_plate = read_plate(raw_core, "upper", compositions, cm)?;

    let boundary = CoreBoundary {
        bottom: BoundaryCond::parse(raw_core.str_param("bc_bot")?)?,
        top: BoundaryCond::parse(raw_core.str_param("bc_top")?)?,
        radial: BoundaryCond::parse(raw_core.str_param("bc_rad")?)?,
    };
    let symmetry = if raw_core.has_param("sym") {
        Symmetry::parse(raw_core.str_param("sym")?)?
    } else {
        Symmetry::Full
    };

    Ok(Core {
        shape,
        pitch,
        axial,
        baffle,
        vessel,
        lower_plate,
        upper_plate,
        boundary,
        symmetry,
    })
}

fn read_plate(
    raw_core: &RawList,
    which: &str,
    compositions: &BTreeMap<String, CompositionId>,
    cm: f64,
) -> VeraResult<Option<CorePlate>> {
    let mat_key = format!("{which}_plate_mat");
    if !raw_core.has_param(&mat_key) {
        return Ok(None);
    }
    let thick = raw_core.f64_param(&format!("{which}_plate_thick"))? * cm;
    let volume_fraction = if raw_core.has_param(&format!("{which}_plate_vfrac")) {
        raw_core.f64_param(&format!("{which}_plate_vfrac"))?
    } else {
        0.5
    };
    if !(0.0..=1.0).contains(&volume_fraction) {
        return Err(VeraError::schema(
            &raw_core.name,
            format!("{which} plate volume fraction must be in [0, 1]"),
        ));
    }
    Ok(Some(CorePlate {
        thick,
        material: resolve_composition(
            raw_core.str_param(&mat_key)?,
            compositions,
            "core plate",
        )?,
        volume_fraction,
    }))
}

fn read_state(raw_state: &RawList) -> VeraResult<State> {
    let inlet = if raw_state.has_param("tinlet") {
        raw_state.f64_param("tinlet")?
    } else {
        DEFAULT_STATE.inlet_temp_k
    };
    let optional = |key: &str, fallback: f64| -> VeraResult<f64> {
        if raw_state.has_param(key) {
            raw_state.f64_param(key)
        } else {
            Ok(fallback)
        }
    };
    Ok(State {
        boron_ppm: optional("boron", 0.0)?,
        power_fraction: optional("power", 100.0)? / 100.0,
        inlet_temp_k: inlet,
        fuel_temp_k: optional("tfuel", DEFAULT_STATE.fuel_temp_k)?,
        moderator_temp_k: optional("tmod", inlet)?,
        structural_temp_k: optional("tstruct", inlet)?,
    })
}
