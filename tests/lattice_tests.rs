/*
MIT License with NCrystal Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: NCrystal
Copyright (c) 2015-2021 NCrystal developers.
All rights reserved.
*/

use approx::assert_relative_eq;
use ncrystal_rs::lattice::{
    check_and_complete_lattice, dspacing_from_hkl, estimate_d_cutoff, estimate_hkl_range,
    lattice_rotation, reciprocal_lattice_rotation, LatticeError,
};
use rstest::rstest;

const DEG: f64 = std::f64::consts::PI / 180.0;

#[test]
fn test_cubic_silicon_round_trip() {
    // a = 5.43 angstrom silicon-like cell: d(111) must equal a/sqrt(3)
    let a = 5.43;
    let rec = reciprocal_lattice_rotation(a, a, a, 90.0 * DEG, 90.0 * DEG, 90.0 * DEG);
    let d111 = dspacing_from_hkl(1, 1, 1, &rec).unwrap();
    assert_relative_eq!(d111, a / 3f64.sqrt(), epsilon = 1e-10);
}

#[test]
fn test_range_cutoff_inverse_cubic() {
    let rec = reciprocal_lattice_rotation(4.04, 4.04, 4.04, 90.0 * DEG, 90.0 * DEG, 90.0 * DEG);
    for dcutoff in [0.3, 0.5, 0.7, 1.1, 2.0] {
        let (max_h, max_k, max_l) = estimate_hkl_range(dcutoff, &rec);
        assert_eq!(max_h, max_k);
        assert_eq!(max_k, max_l);
        // the recovered cutoff is never looser than requested
        assert!(estimate_d_cutoff(max_h, &rec) >= dcutoff);
    }
}

#[test]
fn test_range_cutoff_inverse_orthorhombic() {
    let rec = reciprocal_lattice_rotation(10.0, 3.0, 5.0, 90.0 * DEG, 90.0 * DEG, 90.0 * DEG);
    for dcutoff in [0.4, 0.8, 1.5] {
        let (max_h, max_k, max_l) = estimate_hkl_range(dcutoff, &rec);
        // the shared axis limit of a uniform box is the smallest of the three
        let uniform = max_h.min(max_k).min(max_l);
        assert!(estimate_d_cutoff(uniform, &rec) >= dcutoff);
    }
}

#[test]
fn test_estimated_range_contains_all_reflections() {
    let rec = reciprocal_lattice_rotation(4.04, 4.04, 4.04, 90.0 * DEG, 90.0 * DEG, 90.0 * DEG);
    let dcutoff = 0.9;
    let (max_h, max_k, max_l) = estimate_hkl_range(dcutoff, &rec);
    // scanning one index beyond the box must find nothing at d >= dcutoff
    for h in -(max_h + 1)..=(max_h + 1) {
        for k in -(max_k + 1)..=(max_k + 1) {
            for l in -(max_l + 1)..=(max_l + 1) {
                if (h, k, l) == (0, 0, 0) {
                    continue;
                }
                let d = dspacing_from_hkl(h, k, l, &rec).unwrap();
                if d >= dcutoff {
                    assert!(h.abs() <= max_h && k.abs() <= max_k && l.abs() <= max_l);
                }
            }
        }
    }
}

#[test]
fn test_hexagonal_dspacing() {
    // graphite-like cell, d(002) = c/2
    let (a, c) = (2.456, 6.696);
    let rec = reciprocal_lattice_rotation(a, a, c, 90.0 * DEG, 90.0 * DEG, 120.0 * DEG);
    assert_relative_eq!(
        dspacing_from_hkl(0, 0, 2, &rec).unwrap(),
        c / 2.0,
        epsilon = 1e-10
    );
}

#[test]
fn test_cell_matrix_convention() {
    // b ends up in the xy-plane, a along x
    let cell = lattice_rotation(3.0, 4.0, 5.0, 90.0 * DEG, 90.0 * DEG, 120.0 * DEG);
    assert_relative_eq!(cell[[1, 0]], 0.0, epsilon = 1e-12);
    assert_relative_eq!(cell[[2, 0]], 0.0, epsilon = 1e-12);
    assert_relative_eq!(cell[[2, 1]], 0.0, epsilon = 1e-12);
    assert_relative_eq!(cell[[0, 0]], 3.0, epsilon = 1e-12);
}

#[rstest]
#[case(195)]
#[case(225)]
#[case(230)]
fn test_cubic_spacegroups_complete_b_and_c(#[case] spacegroup: u32) {
    let mut b = 0.0;
    let mut c = 0.0;
    check_and_complete_lattice(spacegroup, 4.0, &mut b, &mut c).unwrap();
    assert_relative_eq!(b, 4.0, epsilon = 1e-12);
    assert_relative_eq!(c, 4.0, epsilon = 1e-12);
}

#[rstest]
#[case(75)]
#[case(142)]
#[case(167)]
#[case(194)]
fn test_tetragonal_family_completes_b_only(#[case] spacegroup: u32) {
    let mut b = 0.0;
    let mut c = 7.0;
    check_and_complete_lattice(spacegroup, 4.0, &mut b, &mut c).unwrap();
    assert_relative_eq!(b, 4.0, epsilon = 1e-12);
    assert_relative_eq!(c, 7.0, epsilon = 1e-12);
}

#[test]
fn test_spacegroup_contradiction_rejected() {
    let mut b = 3.9;
    let mut c = 0.0;
    assert!(matches!(
        check_and_complete_lattice(225, 4.0, &mut b, &mut c),
        Err(LatticeError::LatticeMismatch { .. })
    ));
}

#[test]
fn test_triclinic_requires_all_lengths() {
    let mut b = 4.0;
    let mut c = 0.0;
    assert!(matches!(
        check_and_complete_lattice(2, 4.0, &mut b, &mut c),
        Err(LatticeError::NonPositiveLength { name: "c", .. })
    ));
}
