/*
MIT License with NCrystal Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: NCrystal
Copyright (c) 2015-2021 NCrystal developers.
All rights reserved.
*/

//! Per-role structural description of atoms in the unit cell

use super::atom_data::{AtomData, IndexedAtom};
use super::errors::{MaterialError, Result};
use crate::utils::Vector3D;

/// Information about one kind of atom in a crystal unit cell
///
/// An entry groups the unit-cell positions sharing both atomic composition
/// and dynamic behaviour (reflected e.g. in mean-squared displacement
/// values and the associated dynamic info). Whether all entries of a
/// material carry msd or Debye-temperature values is a convention upheld by
/// the producing factory: either all entries have them or none do.
#[derive(Debug, Clone)]
pub struct AtomInfo {
    atom: IndexedAtom,
    positions: Vec<Vector3D>,
    debye_temperature: Option<f64>,
    msd: Option<f64>,
    dynamic_info_index: Option<usize>,
}

impl AtomInfo {
    /// Create a new atom info entry
    ///
    /// # Arguments
    ///
    /// * `atom` - Indexed composition record
    /// * `positions` - Unit-cell positions, must be non-empty
    /// * `debye_temperature` - Optional Debye temperature in K
    /// * `msd` - Optional mean-squared displacement in angstrom^2,
    ///   projected onto a linear axis for direct use in isotropic
    ///   Debye-Waller factors
    pub fn new(
        atom: IndexedAtom,
        positions: Vec<Vector3D>,
        debye_temperature: Option<f64>,
        msd: Option<f64>,
    ) -> Result<Self> {
        if positions.is_empty() {
            return Err(MaterialError::EmptyAtomPositions);
        }
        Ok(Self {
            atom,
            positions,
            debye_temperature,
            msd,
            dynamic_info_index: None,
        })
    }

    /// Get the indexed composition record
    pub fn atom(&self) -> &IndexedAtom {
        &self.atom
    }

    /// Get the composition record
    pub fn atom_data(&self) -> &AtomData {
        self.atom.data()
    }

    /// Get the unit-cell positions (always non-empty)
    pub fn unit_cell_positions(&self) -> &[Vector3D] {
        &self.positions
    }

    /// Number of positions this atom occupies per unit cell
    pub fn number_per_unit_cell(&self) -> u32 {
        self.positions.len() as u32
    }

    /// Get the mean-squared displacement in angstrom^2, if available
    pub fn msd(&self) -> Option<f64> {
        self.msd
    }

    /// Get the Debye temperature in K, if available
    pub fn debye_temperature(&self) -> Option<f64> {
        self.debye_temperature
    }

    /// Index of the corresponding dynamic info entry on the same material,
    /// filled in when the material is finalized
    pub fn corresponding_dynamic_info_index(&self) -> Option<usize> {
        self.dynamic_info_index
    }

    pub(crate) fn set_dynamic_info_index(&mut self, index: usize) {
        self.dynamic_info_index = Some(index);
    }
}
