/*
MIT License with NCrystal Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: NCrystal
Copyright (c) 2015-2021 NCrystal developers.
All rights reserved.
*/

//! Per-species dynamical descriptions and scattering-kernel access
//!
//! Each dynamic info entry pairs an atomic species with one of several
//! physical models of its motion, from which scattering algorithms derive
//! inelastic cross-sections. Pre-tabulated kernels are converted to
//! [`SabData`] lazily and at most once per entry, safe under concurrent
//! first access.

use super::atom_data::{AtomData, IndexedAtom};
use super::errors::{MaterialError, Result};
use crate::utils::constants::BOLTZMANN_EV_PER_K;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Scattering kernel table S(alpha,beta)
///
/// The dynamic structure factor consumed by scattering-probability
/// algorithms, tabulated on an (alpha, beta) grid. The flattened `sab`
/// table is laid out with beta varying fastest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SabData {
    alpha_grid: Vec<f64>,
    beta_grid: Vec<f64>,
    sab: Vec<f64>,
    /// Temperature in K at which the kernel was tabulated
    temperature: f64,
}

impl SabData {
    /// Create a kernel table, validating the grid layout
    pub fn new(
        alpha_grid: Vec<f64>,
        beta_grid: Vec<f64>,
        sab: Vec<f64>,
        temperature: f64,
    ) -> Result<Self> {
        if alpha_grid.is_empty() || beta_grid.is_empty() {
            return Err(MaterialError::InvalidInput(
                "S(alpha,beta) grids must be non-empty".to_string(),
            ));
        }
        if sab.len() != alpha_grid.len() * beta_grid.len() {
            return Err(MaterialError::InvalidInput(format!(
                "S(alpha,beta) table has {} entries, expected {}x{}",
                sab.len(),
                alpha_grid.len(),
                beta_grid.len()
            )));
        }
        for grid in [&alpha_grid, &beta_grid] {
            if grid.windows(2).any(|w| w[0] >= w[1]) {
                return Err(MaterialError::InvalidInput(
                    "S(alpha,beta) grids must be strictly increasing".to_string(),
                ));
            }
        }
        Ok(Self {
            alpha_grid,
            beta_grid,
            sab,
            temperature,
        })
    }

    /// Get the alpha grid
    pub fn alpha_grid(&self) -> &[f64] {
        &self.alpha_grid
    }

    /// Get the beta grid
    pub fn beta_grid(&self) -> &[f64] {
        &self.beta_grid
    }

    /// Get the flattened S(alpha,beta) table
    pub fn sab(&self) -> &[f64] {
        &self.sab
    }

    /// Get the tabulation temperature in K
    pub fn temperature(&self) -> f64 {
        self.temperature
    }
}

/// Vibrational density of states parameterisation
///
/// A phonon spectrum sampled on a uniform energy grid spanning
/// `[egrid_min, egrid_max]` (eV). Consuming code expands it into a full
/// scattering kernel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VdosData {
    egrid_min: f64,
    egrid_max: f64,
    density: Vec<f64>,
}

impl VdosData {
    /// Create a VDOS curve, validating the energy range and sampling
    pub fn new(egrid_min: f64, egrid_max: f64, density: Vec<f64>) -> Result<Self> {
        if !(egrid_min > 0.0) || !(egrid_max > egrid_min) {
            return Err(MaterialError::InvalidInput(format!(
                "Invalid VDOS energy range [{}, {}]",
                egrid_min, egrid_max
            )));
        }
        if density.len() < 2 {
            return Err(MaterialError::InvalidInput(
                "VDOS density needs at least two samples".to_string(),
            ));
        }
        Ok(Self {
            egrid_min,
            egrid_max,
            density,
        })
    }

    /// Lower edge of the energy grid in eV
    pub fn egrid_min(&self) -> f64 {
        self.egrid_min
    }

    /// Upper edge of the energy grid in eV
    pub fn egrid_max(&self) -> f64 {
        self.egrid_max
    }

    /// Density samples on the uniform energy grid
    pub fn density(&self) -> &[f64] {
        &self.density
    }
}

/// Fallible builder routine producing a completed kernel table
pub type SabBuildFn = Box<dyn Fn() -> Result<SabData> + Send + Sync>;

/// Pre-tabulated scattering kernel with a lazily built [`SabData`]
///
/// The conversion to `SabData` can be expensive, so it is deferred until
/// the first call to [`ensure_build_then_sab`](Self::ensure_build_then_sab)
/// and performed at most once; concurrent first callers serialize on the
/// cache and all receive the same shared table.
pub struct ScatKnlDirect {
    build: SabBuildFn,
    energy_grid: Option<Arc<Vec<f64>>>,
    sab: OnceCell<Arc<SabData>>,
}

impl ScatKnlDirect {
    /// Create a direct kernel around a build routine
    ///
    /// # Arguments
    ///
    /// * `build` - Routine producing the completed table; called at most
    ///   once on success, from whichever thread first requests the kernel
    /// * `energy_grid` - Optional energy grid (eV) dictated by the data
    ///   source for cross-section caching. A grid of exactly 3 entries is
    ///   the placeholder form `[emin, emax, npts]` where any value may be 0
    ///   to leave the choice to consuming code; longer grids are literal.
    pub fn new(
        build: impl Fn() -> Result<SabData> + Send + Sync + 'static,
        energy_grid: Option<Arc<Vec<f64>>>,
    ) -> Self {
        Self {
            build: Box::new(build),
            energy_grid,
            sab: OnceCell::new(),
        }
    }

    /// Get the kernel table, building it on first access
    ///
    /// Concurrent first calls serialize so the build routine runs exactly
    /// once on success; every caller receives the same shared table. If the
    /// build routine fails the cache stays unset and the error is returned;
    /// later callers re-enter the routine and observe the construction
    /// failure rather than a silently empty cache.
    pub fn ensure_build_then_sab(&self) -> Result<Arc<SabData>> {
        self.sab
            .get_or_try_init(|| {
                log::trace!("building S(alpha,beta) table from direct scattering kernel");
                (self.build)().map(Arc::new)
            })
            .map(Arc::clone)
    }

    /// Whether the kernel table has already been built
    ///
    /// Never triggers a build. May answer `false` while a build is in
    /// flight on another thread, but never after one has completed.
    pub fn has_built_sab(&self) -> bool {
        self.sab.get().is_some()
    }

    /// Get the source-dictated energy grid, if any
    pub fn energy_grid(&self) -> Option<&Arc<Vec<f64>>> {
        self.energy_grid.as_ref()
    }
}

impl fmt::Debug for ScatKnlDirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScatKnlDirect")
            .field("built", &self.has_built_sab())
            .field("energy_grid", &self.energy_grid)
            .finish()
    }
}

/// VDOS-based dynamics: a regularised phonon spectrum plus the optional
/// original curves it was derived from
#[derive(Debug)]
pub struct VdosDynamics {
    vdos: VdosData,
    orig_egrid: Vec<f64>,
    orig_density: Vec<f64>,
    energy_grid: Option<Arc<Vec<f64>>>,
}

impl VdosDynamics {
    /// Create VDOS dynamics from a regularised spectrum
    pub fn new(vdos: VdosData, energy_grid: Option<Arc<Vec<f64>>>) -> Self {
        Self {
            vdos,
            orig_egrid: Vec::new(),
            orig_density: Vec::new(),
            energy_grid,
        }
    }

    /// Attach the original (unregularised) curves
    pub fn with_original_curves(mut self, egrid: Vec<f64>, density: Vec<f64>) -> Self {
        self.orig_egrid = egrid;
        self.orig_density = density;
        self
    }

    /// Get the regularised VDOS curve
    pub fn vdos_data(&self) -> &VdosData {
        &self.vdos
    }

    /// Original energy grid before regularisation (empty if unavailable)
    pub fn vdos_orig_egrid(&self) -> &[f64] {
        &self.orig_egrid
    }

    /// Original density before regularisation (empty if unavailable)
    pub fn vdos_orig_density(&self) -> &[f64] {
        &self.orig_density
    }

    /// Get the source-dictated energy grid, if any
    pub fn energy_grid(&self) -> Option<&Arc<Vec<f64>>> {
        self.energy_grid.as_ref()
    }
}

/// Idealised Debye-model phonon spectrum
///
/// The spectrum rises quadratically with phonon energy up to the cutoff
/// k_B * T_Debye. It is cheap to synthesize, so no kernel cache is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct VdosDebye {
    debye_temperature: f64,
}

impl VdosDebye {
    /// Create a Debye spectrum from a Debye temperature in K
    pub fn new(debye_temperature: f64) -> Result<Self> {
        if !(debye_temperature > 0.0) {
            return Err(MaterialError::InvalidInput(format!(
                "Debye temperature must be positive (got {})",
                debye_temperature
            )));
        }
        Ok(Self { debye_temperature })
    }

    /// Get the Debye temperature in K
    pub fn debye_temperature(&self) -> f64 {
        self.debye_temperature
    }

    /// Synthesize the idealised quadratic spectrum on `npts` samples
    ///
    /// The returned curve spans (0, k_B * T_Debye] with density
    /// proportional to E^2, normalised to 1.0 at the cutoff.
    pub fn synthesize_vdos(&self, npts: usize) -> Result<VdosData> {
        if npts < 2 {
            return Err(MaterialError::InvalidInput(
                "Debye spectrum needs at least two samples".to_string(),
            ));
        }
        let cutoff = BOLTZMANN_EV_PER_K * self.debye_temperature;
        let density = (1..=npts)
            .map(|i| {
                let x = i as f64 / npts as f64;
                x * x
            })
            .collect();
        VdosData::new(cutoff / npts as f64, cutoff, density)
    }
}

/// The physical model variants a dynamic info entry can carry
#[derive(Debug)]
pub enum DynamicModel {
    /// Inelastic neutron scattering absent or disabled
    Sterile,
    /// Inelastic scattering modelled as scattering on a free gas
    FreeGas,
    /// Pre-tabulated kernel needing at most a one-time conversion
    ScatKnlDirect(ScatKnlDirect),
    /// Phonon spectrum to be expanded into a kernel by consuming code
    Vdos(VdosDynamics),
    /// Idealised Debye-model spectrum
    VdosDebye(VdosDebye),
}

impl DynamicModel {
    /// Source-dictated energy grid for kernel-capable models, if any
    pub fn energy_grid(&self) -> Option<&Arc<Vec<f64>>> {
        match self {
            DynamicModel::ScatKnlDirect(k) => k.energy_grid(),
            DynamicModel::Vdos(v) => v.energy_grid(),
            _ => None,
        }
    }

    /// Whether this model can directly or indirectly yield a scattering
    /// kernel
    pub fn is_scat_knl(&self) -> bool {
        matches!(
            self,
            DynamicModel::ScatKnlDirect(_) | DynamicModel::Vdos(_) | DynamicModel::VdosDebye(_)
        )
    }
}

/// Per-species dynamical description on a material
#[derive(Debug)]
pub struct DynamicInfo {
    fraction: f64,
    atom: IndexedAtom,
    temperature: f64,
    model: DynamicModel,
    atom_info_index: Option<usize>,
}

impl DynamicInfo {
    /// Create a dynamic info entry
    ///
    /// # Arguments
    ///
    /// * `fraction` - Fractional abundance in (0, 1]
    /// * `atom` - Indexed composition record
    /// * `temperature` - Material temperature in K
    /// * `model` - The physical model for this species
    pub fn new(
        fraction: f64,
        atom: IndexedAtom,
        temperature: f64,
        model: DynamicModel,
    ) -> Result<Self> {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(MaterialError::InvalidInput(format!(
                "Fraction must be in (0, 1] (got {})",
                fraction
            )));
        }
        Ok(Self {
            fraction,
            atom,
            temperature,
            model,
            atom_info_index: None,
        })
    }

    /// Get the fractional abundance
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Adjust the fractional abundance
    ///
    /// Requires mutable access, so only reachable while the material is
    /// still being assembled.
    pub fn set_fraction(&mut self, fraction: f64) {
        self.fraction = fraction;
    }

    /// Get the indexed composition record
    pub fn atom(&self) -> &IndexedAtom {
        &self.atom
    }

    /// Get the composition record
    pub fn atom_data(&self) -> &AtomData {
        self.atom.data()
    }

    /// Get the material temperature in K
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Get the physical model
    pub fn model(&self) -> &DynamicModel {
        &self.model
    }

    /// Index of the corresponding atom info entry on the same material,
    /// filled in when the material is finalized
    pub fn corresponding_atom_info_index(&self) -> Option<usize> {
        self.atom_info_index
    }

    pub(crate) fn set_atom_info_index(&mut self, index: usize) {
        self.atom_info_index = Some(index);
    }
}
