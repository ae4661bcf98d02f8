/*
MIT License with NCrystal Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: NCrystal
Copyright (c) 2015-2021 NCrystal developers.
All rights reserved.
*/

//! Crystal structure description

use serde::{Deserialize, Serialize};

/// Crystal structure of a material
///
/// Plain value type populated by file-parsing factories and set once on the
/// builder; immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StructureInfo {
    /// Spacegroup number, 1-230 if known, 0 if not available
    pub spacegroup: u32,
    /// Lattice length a in angstrom
    pub lattice_a: f64,
    /// Lattice length b in angstrom
    pub lattice_b: f64,
    /// Lattice length c in angstrom
    pub lattice_c: f64,
    /// Lattice angle alpha in degrees
    pub alpha: f64,
    /// Lattice angle beta in degrees
    pub beta: f64,
    /// Lattice angle gamma in degrees
    pub gamma: f64,
    /// Unit-cell volume in angstrom^3
    pub volume: f64,
    /// Number of atoms per unit cell
    pub n_atoms: u32,
}
