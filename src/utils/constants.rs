/*
MIT License with NCrystal Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: NCrystal
Copyright (c) 2015-2021 NCrystal developers.
All rights reserved.
*/

//! Physical constants used in neutron scattering calculations

// Values from CODATA 2018

/// Boltzmann constant in eV/K
pub const BOLTZMANN_EV_PER_K: f64 = 8.617333262e-5;

/// Neutron mass in atomic mass units
pub const NEUTRON_MASS_AMU: f64 = 1.00866491595;

/// Conversion from squared scattering length (fm^2) to cross-section (barn)
pub const FM2_TO_BARN: f64 = 0.01;
