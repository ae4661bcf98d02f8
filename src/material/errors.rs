/*
MIT License with NCrystal Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: NCrystal
Copyright (c) 2015-2021 NCrystal developers.
All rights reserved.
*/

//! Error types for the material module

use crate::lattice::LatticeError;
use thiserror::Error;

/// Errors that can occur while assembling or querying material information
#[derive(Error, Debug)]
pub enum MaterialError {
    #[error("Structure info has already been set")]
    StructureAlreadySet,

    #[error("No structure info available")]
    MissingStructureInfo,

    #[error("AtomInfo requires at least one unit-cell position")]
    EmptyAtomPositions,

    #[error("Invalid atomic number: {0}")]
    InvalidAtomicNumber(u32),

    #[error("Atom index {0} is claimed by two different atom records")]
    InconsistentAtomIndex(u32),

    #[error("No atom record associated with atom index {0}")]
    MissingAtomIndex(u32),

    #[error("Reflection ({h},{k},{l}) has multiplicity {multiplicity} but {n_demi_normals} demi-normals")]
    BrokenDemiNormals {
        h: i32,
        k: i32,
        l: i32,
        multiplicity: u32,
        n_demi_normals: usize,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Scattering kernel construction failed: {0}")]
    KernelBuild(String),

    #[error("Lattice error: {0}")]
    Lattice(#[from] LatticeError),
}

/// Result type for material operations
pub type Result<T> = std::result::Result<T, MaterialError>;
