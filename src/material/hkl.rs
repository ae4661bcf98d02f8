/*
MIT License with NCrystal Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: NCrystal
Copyright (c) 2015-2021 NCrystal developers.
All rights reserved.
*/

//! Crystallographic reflection (HKL) list

use super::errors::{MaterialError, Result};
use crate::utils::Vector3D;
use rayon::slice::ParallelSliceMut;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// Below this length a serial sort beats the rayon fork-join overhead.
const PAR_SORT_THRESHOLD: usize = 4096;

/// One crystallographic reflection family
///
/// If the producing factory knows the plane normals they are provided as
/// unit vectors in `demi_normals`. Only half of the normals are listed,
/// since if n is a normal so is -n; whenever demi-normals are present,
/// `multiplicity == 2 * demi_normals.len()`.
///
/// If `eqv_hkl` is present it lists the Miller indices corresponding to
/// each demi-normal, packed as short integers, parallel to `demi_normals`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HklInfo {
    /// Miller index h
    pub h: i32,
    /// Miller index k
    pub k: i32,
    /// Miller index l
    pub l: i32,
    /// d-spacing in angstrom
    pub dspacing: f64,
    /// Squared structure factor in barn
    pub fsquared: f64,
    /// Count of symmetry-equivalent reflections
    pub multiplicity: u32,
    /// Half-list of unit plane normals (one of each +-n pair)
    pub demi_normals: Vec<Vector3D>,
    /// Miller indices of the demi-normals, when expanded symmetry data is
    /// available
    pub eqv_hkl: Option<Vec<[i16; 3]>>,
}

fn hkl_order(a: &HklInfo, b: &HklInfo) -> Ordering {
    a.dspacing
        .total_cmp(&b.dspacing)
        .then_with(|| (a.h, a.k, a.l).cmp(&(b.h, b.k, b.l)))
}

/// Sorted list of reflections with the d-spacing window used to generate it
///
/// The window's presence distinguishes "no HKL info configured" from "HKL
/// info configured but no reflection in range": iteration is valid and
/// meaningfully empty in both cases. Demi-normal and expanded-symmetry
/// presence is checked on the first entry only; lists are homogeneous by
/// construction.
#[derive(Debug, Default)]
pub struct HklList {
    entries: Vec<HklInfo>,
    d_window: Option<(f64, f64)>,
}

impl HklList {
    /// Whether HKL info was configured at all
    pub fn has_hkl_info(&self) -> bool {
        self.d_window.is_some()
    }

    /// Lower edge of the generating d-spacing window in angstrom
    pub fn d_lower(&self) -> Option<f64> {
        self.d_window.map(|w| w.0)
    }

    /// Upper edge of the generating d-spacing window in angstrom
    pub fn d_upper(&self) -> Option<f64> {
        self.d_window.map(|w| w.1)
    }

    /// Number of reflections
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list holds no reflections
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the reflections in sorted order
    pub fn iter(&self) -> std::slice::Iter<'_, HklInfo> {
        self.entries.iter()
    }

    /// First reflection (smallest d-spacing after finalize)
    pub fn first(&self) -> Option<&HklInfo> {
        self.entries.first()
    }

    /// Last reflection (largest d-spacing after finalize)
    pub fn last(&self) -> Option<&HklInfo> {
        self.entries.last()
    }

    /// Smallest d-spacing in the list, +infinity when empty
    pub fn d_min(&self) -> f64 {
        self.entries
            .first()
            .map_or(f64::INFINITY, |hkl| hkl.dspacing)
    }

    /// Largest d-spacing in the list, +infinity when empty
    pub fn d_max(&self) -> f64 {
        self.entries
            .last()
            .map_or(f64::INFINITY, |hkl| hkl.dspacing)
    }

    /// Whether reflections carry demi-normals (first-entry check)
    pub fn has_demi_normals(&self) -> bool {
        self.has_hkl_info()
            && self
                .entries
                .first()
                .is_some_and(|hkl| !hkl.demi_normals.is_empty())
    }

    /// Whether reflections carry expanded symmetry-equivalent indices
    /// (first-entry check)
    pub fn has_expanded_info(&self) -> bool {
        self.has_hkl_info() && self.entries.first().is_some_and(|hkl| hkl.eqv_hkl.is_some())
    }

    /// Search the expanded symmetry-equivalent tables for a literal
    /// (h,k,l) triple
    ///
    /// Both (h,k,l) and (-h,-k,-l) match, since each demi-normal represents
    /// a +- pair. Returns `None` when not found or when no expanded
    /// symmetry data is available.
    pub fn search_expanded(&self, h: i16, k: i16, l: i16) -> Option<&HklInfo> {
        self.entries.iter().find(|hkl| {
            hkl.eqv_hkl.as_deref().is_some_and(|eqv| {
                eqv.iter()
                    .any(|&[eh, ek, el]| (eh, ek, el) == (h, k, l) || (eh, ek, el) == (-h, -k, -l))
            })
        })
    }

    pub(crate) fn enable(&mut self, d_lower: f64, d_upper: f64) {
        self.d_window = Some((d_lower, d_upper));
    }

    pub(crate) fn push(&mut self, hkl: HklInfo) {
        self.entries.push(hkl);
    }

    pub(crate) fn set_entries(&mut self, entries: Vec<HklInfo>) {
        self.entries = entries;
    }

    /// Sort by ascending d-spacing, ties broken by (h,k,l)
    pub(crate) fn sort(&mut self) {
        if self.entries.len() >= PAR_SORT_THRESHOLD {
            self.entries.par_sort_unstable_by(hkl_order);
        } else {
            self.entries.sort_unstable_by(hkl_order);
        }
    }

    /// Check `multiplicity == 2 * demi_normals.len()` on every entry that
    /// carries demi-normals
    pub(crate) fn validate_demi_normals(&self) -> Result<()> {
        for hkl in &self.entries {
            if !hkl.demi_normals.is_empty()
                && hkl.multiplicity as usize != 2 * hkl.demi_normals.len()
            {
                return Err(MaterialError::BrokenDemiNormals {
                    h: hkl.h,
                    k: hkl.k,
                    l: hkl.l,
                    multiplicity: hkl.multiplicity,
                    n_demi_normals: hkl.demi_normals.len(),
                });
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a HklList {
    type Item = &'a HklInfo;
    type IntoIter = std::slice::Iter<'a, HklInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reflection(h: i32, k: i32, l: i32, dspacing: f64) -> HklInfo {
        HklInfo {
            h,
            k,
            l,
            dspacing,
            fsquared: 1.0,
            multiplicity: 8,
            ..Default::default()
        }
    }

    #[test]
    fn test_unconfigured_vs_empty() {
        let mut list = HklList::default();
        assert!(!list.has_hkl_info());
        assert!(list.is_empty());
        assert!(list.d_min().is_infinite());
        assert!(list.d_max().is_infinite());
        assert!(list.first().is_none());

        list.enable(0.5, 4.0);
        assert!(list.has_hkl_info());
        assert!(list.is_empty());
        assert_relative_eq!(list.d_lower().unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(list.d_upper().unwrap(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sort_order() {
        let mut list = HklList::default();
        list.enable(0.5, 4.0);
        list.push(reflection(2, 0, 0, 2.0));
        list.push(reflection(1, 1, 1, 2.3));
        list.push(reflection(1, 1, -1, 2.0));
        list.push(reflection(0, 2, 0, 2.0));
        list.sort();

        let order: Vec<(i32, i32, i32)> = list.iter().map(|r| (r.h, r.k, r.l)).collect();
        assert_eq!(order, vec![(0, 2, 0), (1, 1, -1), (2, 0, 0), (1, 1, 1)]);
        assert_relative_eq!(list.d_min(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(list.d_max(), 2.3, epsilon = 1e-12);
        assert_eq!(list.first().unwrap().dspacing, 2.0);
        assert_eq!(list.last().unwrap().dspacing, 2.3);
    }

    #[test]
    fn test_demi_normal_validation() {
        let mut hkl = reflection(1, 1, 1, 2.3);
        hkl.multiplicity = 8;
        hkl.demi_normals = vec![Vector3D::new(1.0, 0.0, 0.0); 4];
        let mut list = HklList::default();
        list.enable(0.5, 4.0);
        list.push(hkl);
        assert!(list.validate_demi_normals().is_ok());
        assert!(list.has_demi_normals());
        assert!(!list.has_expanded_info());

        let mut broken = reflection(2, 0, 0, 2.0);
        broken.multiplicity = 6;
        broken.demi_normals = vec![Vector3D::new(0.0, 0.0, 1.0); 4];
        list.push(broken);
        assert!(matches!(
            list.validate_demi_normals(),
            Err(MaterialError::BrokenDemiNormals { h: 2, .. })
        ));
    }

    #[test]
    fn test_search_expanded() {
        let mut hkl = reflection(1, 1, 1, 2.3);
        hkl.multiplicity = 4;
        hkl.demi_normals = vec![Vector3D::new(1.0, 0.0, 0.0); 2];
        hkl.eqv_hkl = Some(vec![[1, 1, 1], [1, 1, -1]]);
        let mut list = HklList::default();
        list.enable(0.5, 4.0);
        list.push(hkl);
        list.sort();

        assert!(list.has_expanded_info());
        assert!(list.search_expanded(1, 1, -1).is_some());
        // the negated triple identifies the same demi-normal pair
        assert!(list.search_expanded(-1, -1, 1).is_some());
        assert!(list.search_expanded(2, 0, 0).is_none());
    }
}
