// ─────────────────────────────────────────────────────────────────────
// SCPN VERA Bridge — Value Types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Validated geometric and compositional value objects.
//!
//! Pure data with construction-time invariant checks, no I/O and no
//! cross-object lookups. Equality is structural throughout: the synthesizer
//! deduplicates identical pin designs into one shared sub-geometry, and
//! two values with identical fields must be interchangeable for that.

use ndarray::Array2;

use vera_types::{VeraError, VeraResult};

/// An ordered grid of axial elevations [cm], strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct AxialGrid {
    elevations: Vec<f64>,
}

impl AxialGrid {
    pub fn new(elevations: Vec<f64>) -> VeraResult<Self> {
        if elevations.len() < 2 {
            return Err(VeraError::schema(
                "axial grid",
                "needs at least two elevations",
            ));
        }
        for pair in elevations.windows(2) {
            if pair[1] <= pair[0] {
                return Err(VeraError::schema(
                    "axial grid",
                    format!(
                        "elevations must be strictly increasing ({} then {})",
                        pair[0], pair[1]
                    ),
                ));
            }
        }
        Ok(AxialGrid { elevations })
    }

    pub fn elevations(&self) -> &[f64] {
        &self.elevations
    }

    /// Number of axial spans (one fewer than elevations).
    pub fn spans(&self) -> usize {
        self.elevations.len() - 1
    }

    pub fn bottom(&self) -> f64 {
        self.elevations[0]
    }

    pub fn top(&self) -> f64 {
        self.elevations[self.elevations.len() - 1]
    }

    pub fn height(&self) -> f64 {
        self.top() - self.bottom()
    }
}

/// Concentric radial shells of a pin: strictly increasing radii [cm] with
/// one material composition label slot per shell.
///
/// Shells are stored innermost first. The region outside the last shell is
/// the moderator and carries no entry here.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellStack {
    radii: Vec<f64>,
    materials: Vec<usize>,
}

impl ShellStack {
    /// `materials` holds arena indices (`CompositionId` values) assigned by
    /// the builder; the pairing radii[i] / materials[i] is positional.
    pub fn new(radii: Vec<f64>, materials: Vec<usize>) -> VeraResult<Self> {
        if radii.is_empty() {
            return Err(VeraError::schema("shell stack", "needs at least one shell"));
        }
        if radii.len() != materials.len() {
            return Err(VeraError::schema(
                "shell stack",
                format!(
                    "{} radii but {} materials",
                    radii.len(),
                    materials.len()
                ),
            ));
        }
        if radii[0] <= 0.0 {
            return Err(VeraError::schema(
                "shell stack",
                format!("innermost radius must be positive, got {}", radii[0]),
            ));
        }
        for pair in radii.windows(2) {
            if pair[1] <= pair[0] {
                return Err(VeraError::schema(
                    "shell stack",
                    format!(
                        "radii must be strictly increasing ({} then {})",
                        pair[0], pair[1]
                    ),
                ));
            }
        }
        Ok(ShellStack { radii, materials })
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    pub fn materials(&self) -> &[usize] {
        &self.materials
    }

    pub fn shells(&self) -> usize {
        self.radii.len()
    }

    pub fn outer_radius(&self) -> f64 {
        self.radii[self.radii.len() - 1]
    }
}

/// A square 2D map of labels (pins within an assembly, assemblies within a
/// core). Row-major; `map[[row, col]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeMap<T> {
    entries: Array2<T>,
}

impl<T: Clone> LatticeMap<T> {
    /// Build from a row-major flat vector; the length must be a perfect
    /// square (VERA cell maps are always square).
    pub fn from_flat(entries: Vec<T>) -> VeraResult<Self> {
        let n = (entries.len() as f64).sqrt().round() as usize;
        if n * n != entries.len() || n == 0 {
            return Err(VeraError::schema(
                "lattice map",
                format!("{} entries do not form a square map", entries.len()),
            ));
        }
        let entries = Array2::from_shape_vec((n, n), entries)
            .map_err(|e| VeraError::schema("lattice map", e.to_string()))?;
        Ok(LatticeMap { entries })
    }

    /// Side length of the square map.
    pub fn size(&self) -> usize {
        self.entries.nrows()
    }

    pub fn get(&self, row: usize, col: usize) -> &T {
        &self.entries[[row, col]]
    }

    /// Iterate row-major with coordinates.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &T)> {
        self.entries.indexed_iter()
    }

    pub fn array(&self) -> &Array2<T> {
        &self.entries
    }
}

/// An isotopic composition: nuclide -> weight fraction, plus bulk density.
///
/// Fractions are stored sorted by nuclide code so that structural equality
/// and synthesis output are independent of deck ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    label: String,
    density_gcc: f64,
    nuclides: Vec<(String, f64)>,
}

impl Composition {
    pub fn new(
        label: impl Into<String>,
        density_gcc: f64,
        mut nuclides: Vec<(String, f64)>,
    ) -> VeraResult<Self> {
        let label = label.into();
        if density_gcc <= 0.0 {
            return Err(VeraError::schema(
                format!("material `{label}`"),
                format!("density must be positive, got {density_gcc} g/cc"),
            ));
        }
        if nuclides.is_empty() {
            return Err(VeraError::schema(
                format!("material `{label}`"),
                "composition has no isotopes",
            ));
        }
        nuclides.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(Composition {
            label,
            density_gcc,
            nuclides,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn density_gcc(&self) -> f64 {
        self.density_gcc
    }

    /// Sorted (nuclide, weight fraction) pairs.
    pub fn nuclides(&self) -> &[(String, f64)] {
        &self.nuclides
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_axial_grid_rejects_non_increasing() {
        assert!(AxialGrid::new(vec![0.0, 10.0, 10.0]).is_err());
        assert!(AxialGrid::new(vec![0.0, 10.0, 5.0]).is_err());
        assert!(AxialGrid::new(vec![0.0]).is_err());
        let grid = AxialGrid::new(vec![0.0, 10.0, 365.76]).unwrap();
        assert_eq!(grid.spans(), 2);
        assert!((grid.height() - 365.76).abs() < 1e-12);
    }

    #[test]
    fn test_shell_stack_invariants() {
        // Fuel pellet, gap, clad.
        let stack = ShellStack::new(vec![0.4096, 0.418, 0.475], vec![0, 1, 2]).unwrap();
        assert_eq!(stack.shells(), 3);
        assert!((stack.outer_radius() - 0.475).abs() < 1e-12);

        assert!(ShellStack::new(vec![0.475, 0.418], vec![0, 1]).is_err());
        assert!(ShellStack::new(vec![0.418, 0.418], vec![0, 1]).is_err());
        assert!(ShellStack::new(vec![0.418], vec![0, 1]).is_err());
        assert!(ShellStack::new(vec![], vec![]).is_err());
    }

    #[test]
    fn test_lattice_map_square_only() {
        assert!(LatticeMap::from_flat(vec![1, 2, 3]).is_err());
        let map = LatticeMap::from_flat(vec![1, 2, 3, 4]).unwrap();
        assert_eq!(map.size(), 2);
        assert_eq!(*map.get(1, 0), 3);
    }

    #[test]
    fn test_composition_sorts_nuclides() {
        let a = Composition::new(
            "mod",
            0.743,
            vec![("O16".into(), 0.33), ("H1".into(), 0.67)],
        )
        .unwrap();
        let b = Composition::new(
            "mod",
            0.743,
            vec![("H1".into(), 0.67), ("O16".into(), 0.33)],
        )
        .unwrap();
        // Structural equality must not depend on deck ordering.
        assert_eq!(a, b);
        assert_eq!(a.nuclides()[0].0, "H1");
    }

    #[test]
    fn test_composition_rejects_bad_density() {
        assert!(Composition::new("void", 0.0, vec![("H1".into(), 1.0)]).is_err());
    }

    proptest! {
        #[test]
        fn prop_axial_grid_accepts_any_sorted_distinct(mut elevs in proptest::collection::vec(0.0f64..500.0, 2..12)) {
            elevs.sort_by(|a, b| a.partial_cmp(b).unwrap());
            elevs.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
            prop_assume!(elevs.len() >= 2);
            let grid = AxialGrid::new(elevs.clone()).unwrap();
            prop_assert_eq!(grid.spans(), elevs.len() - 1);
        }

        #[test]
        fn prop_shell_stack_outer_radius_is_max(mut radii in proptest::collection::vec(0.01f64..3.0, 1..6)) {
            radii.sort_by(|a, b| a.partial_cmp(b).unwrap());
            radii.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
            prop_assume!(!radii.is_empty());
            let mats = (0..radii.len()).collect::<Vec<_>>();
            let stack = ShellStack::new(radii.clone(), mats).unwrap();
            prop_assert!((stack.outer_radius() - radii[radii.len() - 1]).abs() < 1e-12);
        }

        #[test]
        fn prop_lattice_map_round_trips_size(n in 1usize..20) {
            let map = LatticeMap::from_flat(vec![0u8; n * n]).unwrap();
            prop_assert_eq!(map.size(), n);
        }
    }
}
