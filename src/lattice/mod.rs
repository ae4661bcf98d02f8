/*
MIT License with NCrystal Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: NCrystal
Copyright (c) 2015-2021 NCrystal developers.
All rights reserved.
*/

//! Lattice geometry and reflection-range mathematics
//!
//! This module turns the six lattice parameters of a crystal into real and
//! reciprocal cell matrices, and converts between d-spacing cutoffs and the
//! Miller-index search ranges needed to enumerate reflections.

pub mod errors;
pub mod math;

pub use errors::{LatticeError, Result};
pub use math::{
    cell_volume, check_and_complete_lattice, dspacing_from_hkl, estimate_d_cutoff,
    estimate_hkl_range, lattice_rotation, reciprocal_lattice_rotation,
};
