// ─────────────────────────────────────────────────────────────────────
// SCPN VERA Bridge — Isotopes
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Static isotope lookup table.
//!
//! Relative atomic masses from the NIST standard-atomic-weight tables and
//! natural atom-fraction abundances for the elements that appear in PWR
//! structural and coolant materials. The table is a read-only collaborator
//! injected into the synthesizer; a site-specific table can be loaded from
//! JSON via `cross_section_library_path`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{VeraError, VeraResult};

/// Isotope masses and natural abundances, keyed by nuclide code ("U235").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsotopeTable {
    /// Relative atomic mass per nuclide [amu].
    masses: BTreeMap<String, f64>,
    /// Natural atom fractions per element symbol, e.g. "Zr" -> [(Zr90, ..)].
    abundances: BTreeMap<String, Vec<(String, f64)>>,
}

impl IsotopeTable {
    /// The built-in table. Covers the nuclides of the VERA progression
    /// benchmark materials: water, boron, UO2/MOX fuels, gadolinia, zircaloy
    /// and stainless steel.
    pub fn builtin() -> Self {
        let mut masses = BTreeMap::new();
        for (name, mass) in [
            ("H1", 1.007825032239),
            ("H2", 2.014101778122),
            ("H3", 3.016049277924),
            ("He3", 3.016029322043),
            ("He4", 4.002603254130),
            ("B10", 10.0129369541),
            ("B11", 11.0093053645),
            ("C12", 12.0),
            ("C13", 13.0033548351),
            ("O16", 15.9949146196),
            ("O17", 16.9991317565),
            ("O18", 17.9991596129),
            ("Si28", 27.9769265347),
            ("Si29", 28.9764946649),
            ("Si30", 29.9737701136),
            ("Cr50", 49.9460418),
            ("Cr52", 51.9405062),
            ("Cr53", 52.9406481),
            ("Cr54", 53.9388792),
            ("Mn55", 54.9380439),
            ("Fe54", 53.9396090),
            ("Fe56", 55.9349363),
            ("Fe57", 56.9353928),
            ("Fe58", 57.9332744),
            ("Ni58", 57.9353424),
            ("Ni60", 59.9307859),
            ("Ni61", 60.9310556),
            ("Ni62", 61.9283454),
            ("Ni64", 63.9279670),
            ("Zr90", 89.9046977),
            ("Zr91", 90.9056396),
            ("Zr92", 91.9050347),
            ("Zr94", 93.9063108),
            ("Zr96", 95.9082714),
            ("Sn112", 111.9048239),
            ("Sn114", 113.9027827),
            ("Sn115", 114.9033447),
            ("Sn116", 115.9017428),
            ("Sn117", 116.9029540),
            ("Sn118", 117.9016066),
            ("Sn119", 118.9033112),
            ("Sn120", 119.9022016),
            ("Sn122", 121.9034438),
            ("Sn124", 123.9052766),
            ("Gd152", 151.9197995),
            ("Gd154", 153.9208741),
            ("Gd155", 154.9226305),
            ("Gd156", 155.9221312),
            ("Gd157", 156.9239686),
            ("Gd158", 157.9241123),
            ("Gd160", 159.9270624),
            ("Th230", 230.033134119),
            ("Th232", 232.038055821),
            ("U233", 233.039635529),
            ("U234", 234.040952319),
            ("U235", 235.043930119),
            ("U236", 236.045568219),
            ("U238", 238.050788420),
            ("Pu238", 238.049560119),
            ("Pu239", 239.052163619),
            ("Pu240", 240.053813819),
            ("Pu241", 241.056851719),
            ("Pu242", 242.058742820),
            ("Pu244", 244.064205356),
        ] {
            masses.insert(name.to_string(), mass);
        }

        let mut abundances = BTreeMap::new();
        let table: [(&str, &[(&str, f64)]); 13] = [
            ("H", &[("H1", 0.99984426), ("H2", 0.00015574)]),
            ("He", &[("He3", 0.000002), ("He4", 0.999998)]),
            ("B", &[("B10", 0.1982), ("B11", 0.8018)]),
            ("C", &[("C12", 0.988922), ("C13", 0.011078)]),
            ("O", &[("O16", 0.9976206), ("O17", 0.000379), ("O18", 0.0020004)]),
            (
                "Si",
                &[("Si28", 0.9222968), ("Si29", 0.0468316), ("Si30", 0.0308716)],
            ),
            (
                "Cr",
                &[
                    ("Cr50", 0.04345),
                    ("Cr52", 0.83789),
                    ("Cr53", 0.09501),
                    ("Cr54", 0.02365),
                ],
            ),
            ("Mn", &[("Mn55", 1.0)]),
            (
                "Fe",
                &[
                    ("Fe54", 0.05845),
                    ("Fe56", 0.91754),
                    ("Fe57", 0.02119),
                    ("Fe58", 0.00282),
                ],
            ),
            (
                "Ni",
                &[
                    ("Ni58", 0.680769),
                    ("Ni60", 0.262231),
                    ("Ni61", 0.011399),
                    ("Ni62", 0.036345),
                    ("Ni64", 0.009256),
                ],
            ),
            (
                "Zr",
                &[
                    ("Zr90", 0.5145),
                    ("Zr91", 0.1122),
                    ("Zr92", 0.1715),
                    ("Zr94", 0.1738),
                    ("Zr96", 0.0280),
                ],
            ),
            (
                "Sn",
                &[
                    ("Sn112", 0.0097),
                    ("Sn114", 0.0066),
                    ("Sn115", 0.0034),
                    ("Sn116", 0.1454),
                    ("Sn117", 0.0768),
                    ("Sn118", 0.2422),
                    ("Sn119", 0.0859),
                    ("Sn120", 0.3258),
                    ("Sn122", 0.0463),
                    ("Sn124", 0.0579),
                ],
            ),
            (
                "Gd",
                &[
                    ("Gd152", 0.0020),
                    ("Gd154", 0.0218),
                    ("Gd155", 0.1480),
                    ("Gd156", 0.2047),
                    ("Gd157", 0.1565),
                    ("Gd158", 0.2484),
                    ("Gd160", 0.2186),
                ],
            ),
        ];
        for (element, isos) in table {
            abundances.insert(
                element.to_string(),
                isos.iter().map(|(n, a)| (n.to_string(), *a)).collect(),
            );
        }

        IsotopeTable { masses, abundances }
    }

    /// Load a site-specific table from a JSON file.
    pub fn from_file(path: &std::path::Path) -> VeraResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let table: Self = serde_json::from_str(&contents)?;
        Ok(table)
    }

    /// Relative atomic mass of a nuclide [amu].
    pub fn mass(&self, nuclide: &str) -> VeraResult<f64> {
        self.masses.get(nuclide).copied().ok_or_else(|| {
            VeraError::reference(nuclide.to_string(), "isotope mass table")
        })
    }

    /// True if the nuclide code is known to the table.
    pub fn contains(&self, nuclide: &str) -> bool {
        self.masses.contains_key(nuclide)
    }

    /// Abundance-weighted mean atomic mass of a natural element [amu].
    pub fn element_mean_mass(&self, element: &str) -> VeraResult<f64> {
        let isos = self.abundances.get(element).ok_or_else(|| {
            VeraError::reference(element.to_string(), "natural abundance table")
        })?;
        let mut mean = 0.0;
        for (nuclide, atom_frac) in isos {
            mean += atom_frac * self.mass(nuclide)?;
        }
        Ok(mean)
    }

    /// Mean mass for either a nuclide code ("U235") or a natural-element
    /// code ("Zr00").
    pub fn mean_mass(&self, code: &str) -> VeraResult<f64> {
        match code.strip_suffix("00") {
            Some(element) if !element.is_empty() && !element.ends_with(|c: char| c.is_ascii_digit()) => {
                self.element_mean_mass(element)
            }
            _ => self.mass(code),
        }
    }

    /// Expand an element symbol into (nuclide, weight fraction) pairs.
    ///
    /// Natural abundances are stored as atom fractions; the weight fraction
    /// of isotope i is a_i·M_i / Σ a_j·M_j.
    pub fn expand_element(&self, element: &str) -> VeraResult<Vec<(String, f64)>> {
        let isos = self.abundances.get(element).ok_or_else(|| {
            VeraError::reference(element.to_string(), "natural abundance table")
        })?;
        let mut weighted = Vec::with_capacity(isos.len());
        let mut total = 0.0;
        for (nuclide, atom_frac) in isos {
            let w = atom_frac * self.mass(nuclide)?;
            weighted.push((nuclide.clone(), w));
            total += w;
        }
        for pair in &mut weighted {
            pair.1 /= total;
        }
        Ok(weighted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masses_present() {
        let table = IsotopeTable::builtin();
        assert!((table.mass("U235").unwrap() - 235.043930119).abs() < 1e-9);
        assert!((table.mass("H1").unwrap() - 1.007825032239).abs() < 1e-12);
        assert!(table.mass("Xx999").is_err());
    }

    #[test]
    fn test_expand_element_weight_fractions_sum_to_one() {
        let table = IsotopeTable::builtin();
        for element in ["H", "B", "O", "Zr", "Fe", "Gd"] {
            let expanded = table.expand_element(element).unwrap();
            let sum: f64 = expanded.iter().map(|(_, w)| w).sum();
            assert!(
                (sum - 1.0).abs() < 1e-12,
                "{element} weight fractions sum to {sum}"
            );
        }
    }

    #[test]
    fn test_expand_heavier_isotope_gains_weight() {
        // B11 is heavier than B10, so its weight fraction must exceed its
        // atom fraction.
        let table = IsotopeTable::builtin();
        let expanded = table.expand_element("B").unwrap();
        let b11 = expanded.iter().find(|(n, _)| n == "B11").unwrap().1;
        assert!(b11 > 0.8018);
    }

    #[test]
    fn test_mean_mass_handles_element_codes() {
        let table = IsotopeTable::builtin();
        // Natural zirconium sits between Zr90 and Zr96.
        let zr = table.mean_mass("Zr00").unwrap();
        assert!(zr > 89.9 && zr < 95.91, "Zr mean mass {zr}");
        // A plain nuclide code falls through to the mass table.
        assert!((table.mean_mass("U238").unwrap() - 238.050788420).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_element_is_reference_error() {
        let table = IsotopeTable::builtin();
        assert!(matches!(
            table.expand_element("Unobtainium"),
            Err(VeraError::Reference { .. })
        ));
    }
}
