/*
MIT License with NCrystal Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: NCrystal
Copyright (c) 2015-2021 NCrystal developers.
All rights reserved.
*/

//! Atomic composition records and per-material atom indexing

use super::errors::{MaterialError, Result};
use crate::utils::constants::FM2_TO_BARN;
use std::cmp::Ordering;
use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

/// Element symbols indexed by atomic number - 1
const ELEMENT_SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn",
    "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Get the element symbol for an atomic number
pub fn element_symbol(atomic_number: u32) -> Option<&'static str> {
    if (1..=118).contains(&atomic_number) {
        Some(ELEMENT_SYMBOLS[(atomic_number - 1) as usize])
    } else {
        None
    }
}

/// Immutable composition record for one atomic species
///
/// Describes an element or isotope together with its neutron interaction
/// constants. Records are shared via `Arc` across all atom-info, dynamic-info
/// and composition entries referring to the same species.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomData {
    /// Atomic number Z
    atomic_number: u32,
    /// Mass number A (0 for a natural element)
    mass_number: u32,
    /// Atomic mass in amu
    atomic_mass_amu: f64,
    /// Bound coherent scattering length in fm
    coherent_scatt_len_fm: f64,
    /// Incoherent cross-section in barn
    incoherent_xs_barn: f64,
    /// Absorption cross-section at 2200 m/s in barn
    absorption_xs_barn: f64,
}

impl AtomData {
    /// Create a new composition record
    ///
    /// # Arguments
    ///
    /// * `atomic_number` - Z in 1..=118
    /// * `mass_number` - A, or 0 for a natural element
    /// * `atomic_mass_amu` - Atomic mass in amu
    /// * `coherent_scatt_len_fm` - Bound coherent scattering length in fm
    /// * `incoherent_xs_barn` - Incoherent cross-section in barn
    /// * `absorption_xs_barn` - Absorption cross-section at 2200 m/s in barn
    pub fn new(
        atomic_number: u32,
        mass_number: u32,
        atomic_mass_amu: f64,
        coherent_scatt_len_fm: f64,
        incoherent_xs_barn: f64,
        absorption_xs_barn: f64,
    ) -> Result<Self> {
        if !(1..=118).contains(&atomic_number) {
            return Err(MaterialError::InvalidAtomicNumber(atomic_number));
        }
        if mass_number != 0 && mass_number < atomic_number {
            return Err(MaterialError::InvalidInput(format!(
                "Mass number {} below atomic number {}",
                mass_number, atomic_number
            )));
        }
        Ok(Self {
            atomic_number,
            mass_number,
            atomic_mass_amu,
            coherent_scatt_len_fm,
            incoherent_xs_barn,
            absorption_xs_barn,
        })
    }

    /// Create a record for a natural element (A = 0)
    pub fn natural_element(
        atomic_number: u32,
        atomic_mass_amu: f64,
        coherent_scatt_len_fm: f64,
        incoherent_xs_barn: f64,
        absorption_xs_barn: f64,
    ) -> Result<Self> {
        Self::new(
            atomic_number,
            0,
            atomic_mass_amu,
            coherent_scatt_len_fm,
            incoherent_xs_barn,
            absorption_xs_barn,
        )
    }

    /// Get the atomic number Z
    pub fn atomic_number(&self) -> u32 {
        self.atomic_number
    }

    /// Get the mass number A (0 for a natural element)
    pub fn mass_number(&self) -> u32 {
        self.mass_number
    }

    /// Whether this record describes a natural element rather than a
    /// single isotope
    pub fn is_natural_element(&self) -> bool {
        self.mass_number == 0
    }

    /// Get the atomic mass in amu
    pub fn atomic_mass_amu(&self) -> f64 {
        self.atomic_mass_amu
    }

    /// Get the bound coherent scattering length in fm
    pub fn coherent_scatt_len_fm(&self) -> f64 {
        self.coherent_scatt_len_fm
    }

    /// Get the incoherent cross-section in barn
    pub fn incoherent_xs_barn(&self) -> f64 {
        self.incoherent_xs_barn
    }

    /// Get the absorption cross-section at 2200 m/s in barn
    pub fn absorption_xs_barn(&self) -> f64 {
        self.absorption_xs_barn
    }

    /// Coherent cross-section in barn, derived from the scattering length
    pub fn coherent_xs_barn(&self) -> f64 {
        4.0 * PI * self.coherent_scatt_len_fm * self.coherent_scatt_len_fm * FM2_TO_BARN
    }

    /// Total bound scattering cross-section in barn
    pub fn scattering_xs_barn(&self) -> f64 {
        self.coherent_xs_barn() + self.incoherent_xs_barn
    }

    /// Get the element symbol
    pub fn symbol(&self) -> &'static str {
        // constructor guarantees 1 <= Z <= 118
        ELEMENT_SYMBOLS[(self.atomic_number - 1) as usize]
    }

    /// Base display label: "Al" for a natural element, "Al27" for an
    /// isotope, with the conventional "D" and "T" names for heavy hydrogen
    pub fn display_label(&self) -> String {
        if self.is_natural_element() {
            return self.symbol().to_string();
        }
        match (self.atomic_number, self.mass_number) {
            (1, 2) => "D".to_string(),
            (1, 3) => "T".to_string(),
            (_, a) => format!("{}{}", self.symbol(), a),
        }
    }
}

impl fmt::Display for AtomData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Z={})", self.display_label(), self.atomic_number)
    }
}

/// Dense per-material atom index
///
/// Indices are only valid in association with the MaterialInfo instance
/// that assigned them; comparing indices obtained from different instances
/// is meaningless and is not guarded against at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AtomIndex(pub u32);

impl AtomIndex {
    /// Get the raw index value
    pub fn get(&self) -> u32 {
        self.0
    }

    /// Get the index as a usize for table lookups
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AtomIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A shared composition record paired with its per-material index
///
/// The same fundamental atom can play more than one role in a material
/// (e.g. different displacements on different unit-cell positions), so the
/// index rather than the record identifies the role. Equality and ordering
/// are defined by index only and should only be used between values
/// associated with the same MaterialInfo instance.
#[derive(Debug, Clone)]
pub struct IndexedAtom {
    data: Arc<AtomData>,
    index: AtomIndex,
}

impl IndexedAtom {
    /// Pair a shared composition record with an index
    pub fn new(data: Arc<AtomData>, index: AtomIndex) -> Self {
        Self { data, index }
    }

    /// Get the composition record
    pub fn data(&self) -> &AtomData {
        &self.data
    }

    /// Get the shared handle to the composition record
    pub fn data_arc(&self) -> &Arc<AtomData> {
        &self.data
    }

    /// Get the per-material index
    pub fn index(&self) -> AtomIndex {
        self.index
    }

    /// Identity test: same index and the same underlying record instance
    pub fn same_atom(&self, other: &Self) -> bool {
        self.index == other.index && Arc::ptr_eq(&self.data, &other.data)
    }
}

impl PartialEq for IndexedAtom {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for IndexedAtom {}

impl PartialOrd for IndexedAtom {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexedAtom {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}
