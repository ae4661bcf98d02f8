/*
MIT License with NCrystal Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: NCrystal
Copyright (c) 2015-2021 NCrystal developers.
All rights reserved.
*/

//! The material-information aggregate and its builder
//!
//! [`MaterialInfoBuilder`] is the mutable assembly surface used by
//! file-parsing factories; [`MaterialInfoBuilder::finalize`] consumes it
//! and produces the immutable [`MaterialInfo`] consumed by physics
//! algorithms. Because the builder is consumed, mutation after finalize is
//! impossible by construction and the finished object is safe for
//! unrestricted concurrent reads.

use super::atom_data::{AtomData, AtomIndex, IndexedAtom};
use super::atom_info::AtomInfo;
use super::dynamic::DynamicInfo;
use super::errors::{MaterialError, Result};
use super::hkl::{HklInfo, HklList};
use super::structure::StructureInfo;
use crate::lattice;
use std::collections::HashMap;
use std::sync::Arc;

/// One entry of the basic material composition
#[derive(Debug, Clone)]
pub struct CompositionEntry {
    /// Fraction of this atom in the material
    pub fraction: f64,
    /// The atom, indexed on the owning material
    pub atom: IndexedAtom,
}

/// One free-form named section of custom data
///
/// Sections hold "lines" of whitespace-split words with no schema enforced
/// here; they exist so data files can carry extra information for physics
/// models under development. Several sections may share a name.
#[derive(Debug, Clone, Default)]
pub struct CustomSection {
    /// Section name
    pub name: String,
    /// Ordered lines, each an ordered list of words
    pub lines: Vec<Vec<String>>,
}

/// Evaluator for non-Bragg ("background") scattering cross-sections, as a
/// function of neutron kinetic energy in eV, returning barn
pub type XsectProvider = Box<dyn Fn(f64) -> f64 + Send + Sync>;

/// Builder for [`MaterialInfo`]
///
/// Crystal data arrives piecemeal from file parsers, so the builder accepts
/// any number of uncorrelated set/add calls in any order and defers derived
/// data (sort order, cross-links, lookup tables) to [`finalize`](Self::finalize).
/// No consistency between fields is guaranteed before that point.
#[derive(Default)]
pub struct MaterialInfoBuilder {
    structure: Option<StructureInfo>,
    atom_infos: Vec<AtomInfo>,
    hkl: HklList,
    dynamic_infos: Vec<DynamicInfo>,
    density: Option<f64>,
    number_density: Option<f64>,
    xsect_free: Option<f64>,
    xsect_absorption: Option<f64>,
    temperature: Option<f64>,
    xsect_provider: Option<XsectProvider>,
    composition: Vec<CompositionEntry>,
    custom_sections: Vec<CustomSection>,
}

impl MaterialInfoBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one atom info entry
    pub fn add_atom_info(&mut self, atom_info: AtomInfo) {
        self.atom_infos.push(atom_info);
    }

    /// Declare that HKL info is configured, with the d-spacing window
    /// `[d_lower, d_upper]` (angstrom) used to generate the reflections
    pub fn enable_hkl_info(&mut self, d_lower: f64, d_upper: f64) {
        self.hkl.enable(d_lower, d_upper);
    }

    /// Add one reflection
    pub fn add_hkl(&mut self, hkl: HklInfo) {
        self.hkl.push(hkl);
    }

    /// Replace the whole reflection list
    pub fn set_hkl_list(&mut self, entries: Vec<HklInfo>) {
        self.hkl.set_entries(entries);
    }

    /// Set the crystal structure; fails if already set
    pub fn set_structure_info(&mut self, structure: StructureInfo) -> Result<()> {
        if self.structure.is_some() {
            return Err(MaterialError::StructureAlreadySet);
        }
        self.structure = Some(structure);
        Ok(())
    }

    /// Set the saturated (high-energy limit) scattering cross-section in barn
    pub fn set_xsect_free(&mut self, xsect: f64) {
        self.xsect_free = Some(xsect);
    }

    /// Set the absorption cross-section at 2200 m/s in barn
    pub fn set_xsect_absorption(&mut self, xsect: f64) {
        self.xsect_absorption = Some(xsect);
    }

    /// Set the material temperature in K
    pub fn set_temperature(&mut self, temperature: f64) {
        self.temperature = Some(temperature);
    }

    /// Set the material density in g/cm^3
    pub fn set_density(&mut self, density: f64) {
        self.density = Some(density);
    }

    /// Set the number density in atoms/angstrom^3
    pub fn set_number_density(&mut self, number_density: f64) {
        self.number_density = Some(number_density);
    }

    /// Install the evaluator for non-Bragg scattering cross-sections
    pub fn set_xsect_provider(
        &mut self,
        provider: impl Fn(f64) -> f64 + Send + Sync + 'static,
    ) {
        self.xsect_provider = Some(Box::new(provider));
    }

    /// Add one dynamic info entry
    pub fn add_dynamic_info(&mut self, dynamic_info: DynamicInfo) {
        self.dynamic_infos.push(dynamic_info);
    }

    /// Mutable access to the dynamic info entries added so far, e.g. for
    /// fraction adjustments before finalize
    pub fn dynamic_infos_mut(&mut self) -> &mut [DynamicInfo] {
        &mut self.dynamic_infos
    }

    /// Set the basic composition; consistency with the atom and dynamic
    /// lists is the producer's responsibility
    pub fn set_composition(&mut self, composition: Vec<CompositionEntry>) {
        self.composition = composition;
    }

    /// Set the free-form custom sections
    pub fn set_custom_sections(&mut self, sections: Vec<CustomSection>) {
        self.custom_sections = sections;
    }

    /// Finish assembly and freeze the material
    ///
    /// Sorts the reflection list by d-spacing (then by (h,k,l)), sorts the
    /// atom list by atomic number, cross-links atom and dynamic entries
    /// sharing the same indexed atom, builds the atom-index lookup table
    /// and display labels, and validates the demi-normal multiplicity
    /// relation. Either fully succeeds or returns the first error, in which
    /// case the partially assembled data is dropped with the builder.
    pub fn finalize(mut self) -> Result<MaterialInfo> {
        self.hkl.sort();
        self.hkl.validate_demi_normals()?;

        self.atom_infos
            .sort_by_key(|ai| (ai.atom_data().atomic_number(), ai.atom().index()));

        // Cross-link atom info and dynamic info entries describing the
        // same indexed atom (record identity, not index value alone).
        for (ai_idx, atom_info) in self.atom_infos.iter_mut().enumerate() {
            for (di_idx, dynamic_info) in self.dynamic_infos.iter_mut().enumerate() {
                if atom_info.atom().same_atom(dynamic_info.atom()) {
                    atom_info.set_dynamic_info_index(di_idx);
                    dynamic_info.set_atom_info_index(ai_idx);
                }
            }
        }

        let atom_data_by_index = self.build_atom_index_table()?;
        let display_labels = build_display_labels(&atom_data_by_index);

        log::debug!(
            "finalized material info: {} atom roles, {} dynamic entries, {} reflections",
            self.atom_infos.len(),
            self.dynamic_infos.len(),
            self.hkl.len()
        );

        Ok(MaterialInfo {
            structure: self.structure,
            atom_infos: self.atom_infos,
            hkl: self.hkl,
            dynamic_infos: self.dynamic_infos,
            density: self.density,
            number_density: self.number_density,
            xsect_free: self.xsect_free,
            xsect_absorption: self.xsect_absorption,
            temperature: self.temperature,
            xsect_provider: self.xsect_provider,
            composition: self.composition,
            custom_sections: self.custom_sections,
            atom_data_by_index,
            display_labels,
        })
    }

    /// Gather every indexed atom seen anywhere on the builder into a dense
    /// index -> record table
    fn build_atom_index_table(&self) -> Result<Vec<Arc<AtomData>>> {
        let mut table: Vec<Option<Arc<AtomData>>> = Vec::new();
        let mut note = |atom: &IndexedAtom| -> Result<()> {
            let idx = atom.index().as_usize();
            if table.len() <= idx {
                table.resize(idx + 1, None);
            }
            match &table[idx] {
                Some(existing) if !Arc::ptr_eq(existing, atom.data_arc()) => {
                    Err(MaterialError::InconsistentAtomIndex(atom.index().get()))
                }
                _ => {
                    table[idx] = Some(atom.data_arc().clone());
                    Ok(())
                }
            }
        };

        for atom_info in &self.atom_infos {
            note(atom_info.atom())?;
        }
        for dynamic_info in &self.dynamic_infos {
            note(dynamic_info.atom())?;
        }
        for entry in &self.composition {
            note(&entry.atom)?;
        }

        table
            .into_iter()
            .enumerate()
            .map(|(idx, slot)| slot.ok_or(MaterialError::MissingAtomIndex(idx as u32)))
            .collect()
    }
}

/// Derive per-index display labels, suffixing "-a"/"-b"/... when the same
/// base label plays several roles
fn build_display_labels(atom_data_by_index: &[Arc<AtomData>]) -> Vec<String> {
    let bases: Vec<String> = atom_data_by_index
        .iter()
        .map(|data| data.display_label())
        .collect();

    let mut totals: HashMap<&str, usize> = HashMap::new();
    for base in &bases {
        *totals.entry(base.as_str()).or_default() += 1;
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    bases
        .iter()
        .map(|base| {
            if totals[base.as_str()] == 1 {
                return base.clone();
            }
            let occurrence = seen.entry(base.as_str()).or_default();
            let label = if *occurrence < 26 {
                format!("{}-{}", base, (b'a' + *occurrence as u8) as char)
            } else {
                format!("{}-{}", base, occurrence)
            };
            *occurrence += 1;
            label
        })
        .collect()
}

/// Immutable description of a material
///
/// Produced by [`MaterialInfoBuilder::finalize`] and typically shared via
/// `Arc` across the physics algorithms consuming it. Everything it owns is
/// read-only and safe for unlimited concurrent access; the only interior
/// state is the once-only scattering-kernel cache on
/// [`ScatKnlDirect`](super::dynamic::ScatKnlDirect) entries.
pub struct MaterialInfo {
    structure: Option<StructureInfo>,
    atom_infos: Vec<AtomInfo>,
    hkl: HklList,
    dynamic_infos: Vec<DynamicInfo>,
    density: Option<f64>,
    number_density: Option<f64>,
    xsect_free: Option<f64>,
    xsect_absorption: Option<f64>,
    temperature: Option<f64>,
    xsect_provider: Option<XsectProvider>,
    composition: Vec<CompositionEntry>,
    custom_sections: Vec<CustomSection>,
    atom_data_by_index: Vec<Arc<AtomData>>,
    display_labels: Vec<String>,
}

impl MaterialInfo {
    /// Start building a material
    pub fn builder() -> MaterialInfoBuilder {
        MaterialInfoBuilder::new()
    }

    /// Whether the material is crystalline, i.e. at least one of structure
    /// info, atom positions or HKL info is present
    pub fn is_crystalline(&self) -> bool {
        self.structure.is_some() || self.has_atom_info() || self.hkl.has_hkl_info()
    }

    /// Get the crystal structure, if available
    pub fn structure_info(&self) -> Option<&StructureInfo> {
        self.structure.as_ref()
    }

    /// Calculate the d-spacing of a Miller index from the structure info
    ///
    /// Convenience wrapper incurring the construction of a reciprocal
    /// lattice matrix per call; fails when no structure info is present.
    pub fn dspacing_from_hkl(&self, h: i32, k: i32, l: i32) -> Result<f64> {
        let si = self
            .structure
            .as_ref()
            .ok_or(MaterialError::MissingStructureInfo)?;
        let rec = lattice::reciprocal_lattice_rotation(
            si.lattice_a,
            si.lattice_b,
            si.lattice_c,
            si.alpha.to_radians(),
            si.beta.to_radians(),
            si.gamma.to_radians(),
        );
        Ok(lattice::dspacing_from_hkl(h, k, l, &rec)?)
    }

    /// Get the material temperature in K, if available
    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    /// Get the density in g/cm^3, if available
    pub fn density(&self) -> Option<f64> {
        self.density
    }

    /// Get the number density in atoms/angstrom^3, if available
    pub fn number_density(&self) -> Option<f64> {
        self.number_density
    }

    /// Get the saturated scattering cross-section in barn, if available
    pub fn xsect_free(&self) -> Option<f64> {
        self.xsect_free
    }

    /// Get the absorption cross-section at 2200 m/s in barn, if available
    pub fn xsect_absorption(&self) -> Option<f64> {
        self.xsect_absorption
    }

    /// Whether atom info entries are present
    pub fn has_atom_info(&self) -> bool {
        !self.atom_infos.is_empty()
    }

    /// Get the atom info entries, sorted by atomic number (empty when no
    /// atom info was configured)
    pub fn atom_infos(&self) -> &[AtomInfo] {
        &self.atom_infos
    }

    /// Whether atom info entries carry mean-squared displacements
    ///
    /// Entries either all have them or none do, so only the first entry is
    /// inspected; a list violating that producer convention is reported
    /// per its first entry.
    pub fn has_atom_msd(&self) -> bool {
        self.atom_infos.first().is_some_and(|ai| ai.msd().is_some())
    }

    /// Whether atom info entries carry Debye temperatures
    ///
    /// First-entry check, like [`has_atom_msd`](Self::has_atom_msd).
    pub fn has_atom_debye_temp(&self) -> bool {
        self.atom_infos
            .first()
            .is_some_and(|ai| ai.debye_temperature().is_some())
    }

    /// Whether dynamic info entries are present
    pub fn has_dynamic_info(&self) -> bool {
        !self.dynamic_infos.is_empty()
    }

    /// Get the dynamic info entries
    pub fn dynamic_infos(&self) -> &[DynamicInfo] {
        &self.dynamic_infos
    }

    /// Resolve the dynamic info entry corresponding to an atom info entry
    /// of this material, if one was linked at finalize
    pub fn dynamic_info_for(&self, atom_info: &AtomInfo) -> Option<&DynamicInfo> {
        atom_info
            .corresponding_dynamic_info_index()
            .and_then(|idx| self.dynamic_infos.get(idx))
    }

    /// Resolve the atom info entry corresponding to a dynamic info entry
    /// of this material, if one was linked at finalize
    pub fn atom_info_for(&self, dynamic_info: &DynamicInfo) -> Option<&AtomInfo> {
        dynamic_info
            .corresponding_atom_info_index()
            .and_then(|idx| self.atom_infos.get(idx))
    }

    /// Whether HKL info was configured
    pub fn has_hkl_info(&self) -> bool {
        self.hkl.has_hkl_info()
    }

    /// Get the reflection list (valid and empty when no HKL info was
    /// configured)
    pub fn hkl_list(&self) -> &HklList {
        &self.hkl
    }

    /// Whether a non-Bragg cross-section evaluator is installed
    pub fn provides_non_bragg_xsects(&self) -> bool {
        self.xsect_provider.is_some()
    }

    /// Evaluate the non-Bragg scattering cross-section in barn at a
    /// neutron kinetic energy in eV; `None` when no evaluator is installed
    pub fn xsect_scat_non_bragg(&self, ekin_ev: f64) -> Option<f64> {
        self.xsect_provider.as_ref().map(|provider| provider(ekin_ev))
    }

    /// Whether a basic composition is present
    pub fn has_composition(&self) -> bool {
        !self.composition.is_empty()
    }

    /// Get the basic composition (always consistent with the atom and
    /// dynamic lists when those are present)
    pub fn composition(&self) -> &[CompositionEntry] {
        &self.composition
    }

    /// Get all custom sections in file order
    pub fn custom_sections(&self) -> &[CustomSection] {
        &self.custom_sections
    }

    /// Count the custom sections with a given name
    pub fn count_custom_sections(&self, name: &str) -> usize {
        self.custom_sections
            .iter()
            .filter(|section| section.name == name)
            .count()
    }

    /// Get the lines of the `index`-th custom section with a given name
    pub fn custom_section(&self, name: &str, index: usize) -> Option<&[Vec<String>]> {
        self.custom_sections
            .iter()
            .filter(|section| section.name == name)
            .nth(index)
            .map(|section| section.lines.as_slice())
    }

    /// Number of distinct atom indices on this material
    pub fn n_atom_indices(&self) -> usize {
        self.atom_data_by_index.len()
    }

    /// Get the composition record for an atom index of this material
    pub fn atom_data(&self, index: AtomIndex) -> Option<&Arc<AtomData>> {
        self.atom_data_by_index.get(index.as_usize())
    }

    /// Get the indexed form of an atom index of this material
    pub fn indexed_atom_data(&self, index: AtomIndex) -> Option<IndexedAtom> {
        self.atom_data(index)
            .map(|data| IndexedAtom::new(data.clone(), index))
    }

    /// Get the display label for an atom index of this material ("Al", or
    /// "Al-a"/"Al-b" when the same element plays several roles)
    pub fn display_label(&self, index: AtomIndex) -> Option<&str> {
        self.display_labels
            .get(index.as_usize())
            .map(|label| label.as_str())
    }
}
