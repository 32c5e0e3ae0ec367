// ─────────────────────────────────────────────────────────────────────
// SCPN VERA Bridge — Material Factory
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! State-resolved material instantiation.
//!
//! Compositions in the case model are state-independent recipes; a
//! `Material` in the target model carries a concrete density, evaluation
//! temperature and fully isotopic nuclide list. The factory owns the
//! material ID counter and caches one instance per (composition,
//! temperature role) for the state being synthesized — instances are
//! never shared across states because the moderator composition and the
//! evaluation temperatures are state-dependent.

use std::collections::BTreeMap;

use vera_model::{Case, CompositionId, State, MODERATOR};
use vera_types::{IsotopeTable, VeraError, VeraResult};

use crate::ids::Counter;
use crate::model::{Material, MaterialId};

/// Water density at temperature T [g/cc], linear fit valid over PWR
/// operating conditions (cold shutdown through hot full power).
fn water_density(temp_k: f64) -> f64 {
    0.9982 - 9.406e-4 * (temp_k - 293.15)
}

/// Which declared state temperature a material evaluates at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TempClass {
    Fuel,
    Moderator,
    Structural,
}

impl TempClass {
    fn temperature(self, state: &State) -> f64 {
        match self {
            TempClass::Fuel => state.fuel_temp_k,
            TempClass::Moderator => state.moderator_temp_k,
            TempClass::Structural => state.structural_temp_k,
        }
    }
}

pub struct MaterialFactory<'a> {
    case: &'a Case,
    isotopes: &'a IsotopeTable,
    state: &'a State,
    counter: Counter,
    materials: Vec<Material>,
    cache: BTreeMap<(usize, TempClass), MaterialId>,
    smear_cache: BTreeMap<(usize, u64), MaterialId>,
}

impl<'a> MaterialFactory<'a> {
    pub fn new(case: &'a Case, isotopes: &'a IsotopeTable, state: &'a State) -> Self {
        MaterialFactory {
            case,
            isotopes,
            state,
            counter: Counter::new(),
            materials: Vec::new(),
            cache: BTreeMap::new(),
            smear_cache: BTreeMap::new(),
        }
    }

    /// The state-resolved material for a composition at one of the three
    /// temperature roles. Cached; repeated calls return the same ID.
    pub fn material(&mut self, comp: CompositionId, class: TempClass) -> VeraResult<MaterialId> {
        if let Some(&id) = self.cache.get(&(comp.0, class)) {
            return Ok(id);
        }
        let composition = self.case.composition(comp);
        let (density, nuclides, name) = if composition.label() == MODERATOR {
            let (density, nuclides) = self.moderator_recipe()?;
            (density, nuclides, MODERATOR.to_string())
        } else {
            (
                composition.density_gcc(),
                self.expand(composition.nuclides())?,
                composition.label().to_string(),
            )
        };
        let id = self.push(name, density, class.temperature(self.state), nuclides);
        self.cache.insert((comp.0, class), id);
        Ok(id)
    }

    /// The coolant for the state being synthesized.
    pub fn moderator(&mut self) -> VeraResult<MaterialId> {
        let comp = self
            .case
            .composition_by_label(MODERATOR)
            .ok_or_else(|| VeraError::reference(MODERATOR, "composition table"))?;
        self.material(comp, TempClass::Moderator)
    }

    /// A volume-fraction smear of a structural composition with the
    /// moderator, used for perforated core plates and similar regions the
    /// coolant flows through.
    pub fn smeared(&mut self, comp: CompositionId, volume_fraction: f64) -> VeraResult<MaterialId> {
        let key = (comp.0, volume_fraction.to_bits());
        if let Some(&id) = self.smear_cache.get(&key) {
            return Ok(id);
        }
        let composition = self.case.composition(comp);
        let solid_density = composition.density_gcc();
        let solid = self.expand(composition.nuclides())?;
        let (mod_density, moderator) = self.moderator_recipe()?;

        let density = volume_fraction * solid_density + (1.0 - volume_fraction) * mod_density;
        let mut nuclides = BTreeMap::new();
        for (code, w) in solid {
            *nuclides.entry(code).or_insert(0.0) += volume_fraction * solid_density * w / density;
        }
        for (code, w) in moderator {
            *nuclides.entry(code).or_insert(0.0) +=
                (1.0 - volume_fraction) * mod_density * w / density;
        }
        let id = self.push(
            format!("{}-smeared", composition.label()),
            density,
            TempClass::Structural.temperature(self.state),
            nuclides.into_iter().collect(),
        );
        self.smear_cache.insert(key, id);
        Ok(id)
    }

    /// All instantiated materials, in allocation order.
    pub fn finish(self) -> Vec<Material> {
        self.materials
    }

    /// Borated light water at the state's moderator temperature and boron
    /// concentration. Boron displaces water weight at ppm-by-weight and
    /// raises the bulk density proportionally.
    fn moderator_recipe(&self) -> VeraResult<(f64, Vec<(String, f64)>)> {
        let boron_wf = self.state.boron_ppm * 1e-6;
        let density = water_density(self.state.moderator_temp_k) * (1.0 + boron_wf);

        let m_h = self.isotopes.element_mean_mass("H")?;
        let m_o = self.isotopes.element_mean_mass("O")?;
        let w_h = 2.0 * m_h / (2.0 * m_h + m_o);
        let water_wf = 1.0 - boron_wf;

        let mut recipe = vec![
            ("H00".to_string(), water_wf * w_h),
            ("O00".to_string(), water_wf * (1.0 - w_h)),
        ];
        if boron_wf > 0.0 {
            recipe.push(("B00".to_string(), boron_wf));
        }
        Ok((density, self.expand(&recipe)?))
    }

    /// Expand natural-element codes ("Zr00") into per-nuclide weight
    /// fractions and merge duplicates, keeping the output sorted.
    fn expand(&self, recipe: &[(String, f64)]) -> VeraResult<Vec<(String, f64)>> {
        let mut merged = BTreeMap::new();
        for (code, weight) in recipe {
            match element_code(code) {
                Some(element) => {
                    for (nuclide, iso_weight) in self.isotopes.expand_element(element)? {
                        *merged.entry(nuclide).or_insert(0.0) += weight * iso_weight;
                    }
                }
                None => {
                    // Unknown-mass nuclides are passed through untouched;
                    // the transport code's own library resolves them.
                    *merged.entry(code.clone()).or_insert(0.0) += weight;
                }
            }
        }
        Ok(merged.into_iter().collect())
    }

    fn push(
        &mut self,
        name: String,
        density_gcc: f64,
        temperature_k: f64,
        nuclides: Vec<(String, f64)>,
    ) -> MaterialId {
        let id = MaterialId(self.counter.take());
        self.materials.push(Material {
            id,
            name,
            density_gcc,
            temperature_k,
            nuclides,
        });
        id
    }
}

/// "Zr00" -> Some("Zr"); plain nuclide codes -> None.
fn element_code(code: &str) -> Option<&str> {
    match code.strip_suffix("00") {
        Some(element)
            if !element.is_empty() && !element.ends_with(|c: char| c.is_ascii_digit()) =>
        {
            Some(element)
        }
        _ => None,
    }
}
