/*
MIT License with NCrystal Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: NCrystal
Copyright (c) 2015-2021 NCrystal developers.
All rights reserved.
*/

//! # ncrystal-rs
//!
//! A Rust implementation of the NCrystal material information core for
//! thermal neutron transport calculations.
//!
//! NCrystal models how slow neutrons scatter in crystalline and amorphous
//! materials. This crate provides the shared data contract of that engine:
//! the immutable material description ([`material::MaterialInfo`]) produced
//! by file-parsing factories and consumed by scattering and absorption
//! algorithms, together with the crystallographic lattice mathematics
//! ([`lattice`]) used to derive reciprocal-space quantities from it.
//!
//! Materials are assembled through [`material::MaterialInfoBuilder`] and
//! frozen with [`material::MaterialInfoBuilder::finalize`], after which the
//! resulting [`material::MaterialInfo`] is immutable and safe to share
//! across threads without locking.

pub mod lattice;
pub mod material;
pub mod utils;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

pub use material::{MaterialInfo, MaterialInfoBuilder};
