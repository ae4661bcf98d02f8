/*
MIT License with NCrystal Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: NCrystal
Copyright (c) 2015-2021 NCrystal developers.
All rights reserved.
*/

//! Material description shared between data factories and physics models
//!
//! Instances of [`MaterialInfo`] are typically assembled by dedicated
//! factories from crystallographic data files, then handed read-only to
//! scattering and absorption models, providing a separation layer between
//! data sources and the algorithms working on the data.

pub mod atom_data;
pub mod atom_info;
pub mod dynamic;
pub mod errors;
pub mod hkl;
pub mod info;
pub mod structure;

pub use atom_data::{element_symbol, AtomData, AtomIndex, IndexedAtom};
pub use atom_info::AtomInfo;
pub use dynamic::{
    DynamicInfo, DynamicModel, SabData, ScatKnlDirect, VdosData, VdosDebye, VdosDynamics,
};
pub use errors::{MaterialError, Result};
pub use hkl::{HklInfo, HklList};
pub use info::{CompositionEntry, CustomSection, MaterialInfo, MaterialInfoBuilder, XsectProvider};
pub use structure::StructureInfo;
