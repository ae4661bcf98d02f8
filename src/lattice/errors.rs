/*
MIT License with NCrystal Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: NCrystal
Copyright (c) 2015-2021 NCrystal developers.
All rights reserved.
*/

//! Error types for the lattice module

use thiserror::Error;

/// Errors that can occur in lattice calculations
#[derive(Error, Debug)]
pub enum LatticeError {
    #[error("Invalid spacegroup number: {0} (must be in 1..=230)")]
    InvalidSpacegroup(u32),

    #[error("Lattice parameter {name}={provided} contradicts the value {required} mandated by spacegroup {spacegroup}")]
    LatticeMismatch {
        name: &'static str,
        provided: f64,
        required: f64,
        spacegroup: u32,
    },

    #[error("Lattice parameter {name} must be positive (got {value})")]
    NonPositiveLength { name: &'static str, value: f64 },

    #[error("Miller index (0,0,0) has no associated lattice plane")]
    BadHkl,
}

/// Result type for lattice operations
pub type Result<T> = std::result::Result<T, LatticeError>;
