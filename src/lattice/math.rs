/*
MIT License with NCrystal Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: NCrystal
Copyright (c) 2015-2021 NCrystal developers.
All rights reserved.
*/

//! Pure lattice-parameter mathematics
//!
//! Cell matrices are 3x3 `ndarray::Array2<f64>` values. The real-space
//! matrix carries the lattice vectors as columns (a along x, b in the
//! xy-plane, c completing the triad); the reciprocal matrix carries the
//! reciprocal basis vectors as rows, so that the scattering vector of a
//! reflection (h,k,l) is `h*row0 + k*row1 + l*row2` in 1/angstrom.
//!
//! Lattice lengths are in angstrom and angles in radians throughout. The
//! matrix constructors do not validate their inputs; NaN or negative
//! parameters propagate silently into the result.

use super::errors::{LatticeError, Result};
use ndarray::{arr1, arr2, Array2};
use std::f64::consts::PI;

const TWO_PI: f64 = 2.0 * PI;

// Relative tolerance when comparing lattice lengths mandated equal by a
// spacegroup.
const LENGTH_EQ_TOL: f64 = 1e-6;

/// Build the real-space cell matrix from the six lattice parameters
///
/// # Arguments
///
/// * `a`, `b`, `c` - Lattice lengths in angstrom
/// * `alpha`, `beta`, `gamma` - Lattice angles in radians
///
/// # Returns
///
/// The 3x3 cell matrix with the lattice vectors as columns
pub fn lattice_rotation(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Array2<f64> {
    let cg = gamma.cos();
    let sg = gamma.sin();
    let cb = beta.cos();
    let ca = alpha.cos();

    let m12 = c * (ca - cb * cg) / sg;
    let m22 = c * (1.0 - cb * cb - ((ca - cb * cg) / sg).powi(2)).sqrt();

    arr2(&[
        [a, b * cg, c * cb],
        [0.0, b * sg, m12],
        [0.0, 0.0, m22],
    ])
}

/// Build the reciprocal lattice matrix from the six lattice parameters
///
/// The result is the inverse of the real-space cell matrix scaled by 2pi;
/// its rows are the reciprocal basis vectors in 1/angstrom, mapping Miller
/// indices to scattering vectors.
pub fn reciprocal_lattice_rotation(
    a: f64,
    b: f64,
    c: f64,
    alpha: f64,
    beta: f64,
    gamma: f64,
) -> Array2<f64> {
    let cell = lattice_rotation(a, b, c, alpha, beta, gamma);
    invert_3x3(&cell).mapv(|x| x * TWO_PI)
}

/// Unit-cell volume in angstrom^3 for a cell matrix from [`lattice_rotation`]
pub fn cell_volume(cell: &Array2<f64>) -> f64 {
    determinant_3x3(cell).abs()
}

/// Estimate the Miller-index search box needed for a d-spacing cutoff
///
/// For a target minimum d-spacing, returns the smallest axis-aligned box of
/// integer Miller indices guaranteed to contain every reflection with
/// d >= `dcutoff`. Each axis limit is `floor(2pi / (dcutoff * |row_i|))`,
/// clamped to zero when `dcutoff` is non-positive or the row norm vanishes.
///
/// # Arguments
///
/// * `dcutoff` - Minimum d-spacing in angstrom
/// * `rec_lat` - Reciprocal matrix from [`reciprocal_lattice_rotation`]
pub fn estimate_hkl_range(dcutoff: f64, rec_lat: &Array2<f64>) -> (i32, i32, i32) {
    let mut max_hkl = [0i32; 3];
    if dcutoff > 0.0 {
        for (i, m) in max_hkl.iter_mut().enumerate() {
            let norm = row_norm(rec_lat, i);
            if norm > 0.0 {
                *m = (TWO_PI / (dcutoff * norm)).floor() as i32;
            }
        }
    }
    (max_hkl[0], max_hkl[1], max_hkl[2])
}

/// Estimate the d-spacing cutoff achievable with a uniform search box
///
/// Inverse of [`estimate_hkl_range`]: the tightest d-spacing guaranteed to
/// be fully enumerated by a uniform +-`max_hkl` search box, computed as the
/// minimum over axes of `2pi / (max_hkl * |row_i|)`. Returns infinity when
/// `max_hkl` is not positive.
pub fn estimate_d_cutoff(max_hkl: i32, rec_lat: &Array2<f64>) -> f64 {
    if max_hkl <= 0 {
        return f64::INFINITY;
    }
    let mut dcutoff = f64::INFINITY;
    for i in 0..3 {
        let norm = row_norm(rec_lat, i);
        if norm > 0.0 {
            dcutoff = dcutoff.min(TWO_PI / (max_hkl as f64 * norm));
        }
    }
    dcutoff
}

/// Validate lattice lengths against a spacegroup and fill in mandated values
///
/// Spacegroups 75-194 (tetragonal, trigonal and hexagonal families on
/// hexagonal axes) mandate b == a, and spacegroups 195-230 (cubic) mandate
/// b == c == a. A zero-valued `b` or `c` is completed to the mandated equal
/// value; a provided non-zero value contradicting the mandate is an error,
/// as is any length that ends up non-positive.
///
/// # Arguments
///
/// * `spacegroup` - Spacegroup number in 1..=230
/// * `a` - Lattice length a in angstrom
/// * `b`, `c` - Lattice lengths, updated in place when completed
pub fn check_and_complete_lattice(spacegroup: u32, a: f64, b: &mut f64, c: &mut f64) -> Result<()> {
    if !(1..=230).contains(&spacegroup) {
        return Err(LatticeError::InvalidSpacegroup(spacegroup));
    }

    if spacegroup >= 75 {
        if *b == 0.0 {
            *b = a;
        } else if (*b - a).abs() > LENGTH_EQ_TOL * a.abs() {
            return Err(LatticeError::LatticeMismatch {
                name: "b",
                provided: *b,
                required: a,
                spacegroup,
            });
        }
        if spacegroup >= 195 {
            if *c == 0.0 {
                *c = a;
            } else if (*c - a).abs() > LENGTH_EQ_TOL * a.abs() {
                return Err(LatticeError::LatticeMismatch {
                    name: "c",
                    provided: *c,
                    required: a,
                    spacegroup,
                });
            }
        }
    }

    for (name, value) in [("a", a), ("b", *b), ("c", *c)] {
        if !(value > 0.0) {
            return Err(LatticeError::NonPositiveLength { name, value });
        }
    }
    Ok(())
}

/// Calculate the d-spacing of a Miller index from the reciprocal matrix
///
/// `d = 2pi / |h*row0 + k*row1 + l*row2|` in angstrom. The null index
/// (0,0,0) identifies no lattice plane and is rejected.
pub fn dspacing_from_hkl(h: i32, k: i32, l: i32, rec_lat: &Array2<f64>) -> Result<f64> {
    if h == 0 && k == 0 && l == 0 {
        return Err(LatticeError::BadHkl);
    }
    let hkl = arr1(&[h as f64, k as f64, l as f64]);
    let q = hkl.dot(rec_lat);
    Ok(TWO_PI / q.dot(&q).sqrt())
}

fn row_norm(m: &Array2<f64>, i: usize) -> f64 {
    let row = m.row(i);
    row.dot(&row).sqrt()
}

fn determinant_3x3(m: &Array2<f64>) -> f64 {
    m[[0, 0]] * (m[[1, 1]] * m[[2, 2]] - m[[1, 2]] * m[[2, 1]])
        - m[[0, 1]] * (m[[1, 0]] * m[[2, 2]] - m[[1, 2]] * m[[2, 0]])
        + m[[0, 2]] * (m[[1, 0]] * m[[2, 1]] - m[[1, 1]] * m[[2, 0]])
}

fn invert_3x3(m: &Array2<f64>) -> Array2<f64> {
    let det = determinant_3x3(m);
    let (a, b, c) = (m[[0, 0]], m[[0, 1]], m[[0, 2]]);
    let (d, e, f) = (m[[1, 0]], m[[1, 1]], m[[1, 2]]);
    let (g, h, i) = (m[[2, 0]], m[[2, 1]], m[[2, 2]]);
    arr2(&[
        [
            (e * i - f * h) / det,
            (c * h - b * i) / det,
            (b * f - c * e) / det,
        ],
        [
            (f * g - d * i) / det,
            (a * i - c * g) / det,
            (c * d - a * f) / det,
        ],
        [
            (d * h - e * g) / det,
            (b * g - a * h) / det,
            (a * e - b * d) / det,
        ],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DEG: f64 = PI / 180.0;

    #[test]
    fn test_cubic_cell_matrix() {
        let cell = lattice_rotation(4.0, 4.0, 4.0, 90.0 * DEG, 90.0 * DEG, 90.0 * DEG);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 4.0 } else { 0.0 };
                assert_relative_eq!(cell[[i, j]], expected, epsilon = 1e-12);
            }
        }
        assert_relative_eq!(cell_volume(&cell), 64.0, epsilon = 1e-9);
    }

    #[test]
    fn test_hexagonal_cell_volume() {
        // V = sqrt(3)/2 * a^2 * c for a hexagonal cell
        let (a, c) = (2.456, 6.696);
        let cell = lattice_rotation(a, a, c, 90.0 * DEG, 90.0 * DEG, 120.0 * DEG);
        let expected = 3f64.sqrt() / 2.0 * a * a * c;
        assert_relative_eq!(cell_volume(&cell), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_reciprocal_is_scaled_inverse() {
        let rec = reciprocal_lattice_rotation(4.0, 5.0, 6.0, 90.0 * DEG, 90.0 * DEG, 90.0 * DEG);
        assert_relative_eq!(rec[[0, 0]], TWO_PI / 4.0, epsilon = 1e-12);
        assert_relative_eq!(rec[[1, 1]], TWO_PI / 5.0, epsilon = 1e-12);
        assert_relative_eq!(rec[[2, 2]], TWO_PI / 6.0, epsilon = 1e-12);
        assert_relative_eq!(rec[[0, 1]], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_dspacing_cubic() {
        let rec = reciprocal_lattice_rotation(4.0, 4.0, 4.0, 90.0 * DEG, 90.0 * DEG, 90.0 * DEG);
        assert_relative_eq!(
            dspacing_from_hkl(1, 0, 0, &rec).unwrap(),
            4.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            dspacing_from_hkl(1, 1, 0, &rec).unwrap(),
            4.0 / 2f64.sqrt(),
            epsilon = 1e-9
        );
        assert!(dspacing_from_hkl(0, 0, 0, &rec).is_err());
    }

    #[test]
    fn test_hkl_range_cubic() {
        let rec = reciprocal_lattice_rotation(4.0, 4.0, 4.0, 90.0 * DEG, 90.0 * DEG, 90.0 * DEG);
        assert_eq!(estimate_hkl_range(0.5, &rec), (8, 8, 8));
        assert_eq!(estimate_hkl_range(0.0, &rec), (0, 0, 0));
        assert_eq!(estimate_hkl_range(-1.0, &rec), (0, 0, 0));
    }

    #[test]
    fn test_d_cutoff_cubic() {
        let rec = reciprocal_lattice_rotation(4.0, 4.0, 4.0, 90.0 * DEG, 90.0 * DEG, 90.0 * DEG);
        assert_relative_eq!(estimate_d_cutoff(8, &rec), 0.5, epsilon = 1e-9);
        assert!(estimate_d_cutoff(0, &rec).is_infinite());
    }

    #[test]
    fn test_complete_lattice_cubic() {
        let mut b = 0.0;
        let mut c = 0.0;
        check_and_complete_lattice(225, 4.0, &mut b, &mut c).unwrap();
        assert_relative_eq!(b, 4.0, epsilon = 1e-12);
        assert_relative_eq!(c, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_complete_lattice_rejects_contradiction() {
        let mut b = 3.9;
        let mut c = 0.0;
        let err = check_and_complete_lattice(225, 4.0, &mut b, &mut c).unwrap_err();
        assert!(matches!(err, LatticeError::LatticeMismatch { name: "b", .. }));
    }

    #[test]
    fn test_complete_lattice_tetragonal_leaves_c_alone() {
        let mut b = 0.0;
        let mut c = 6.0;
        check_and_complete_lattice(100, 4.0, &mut b, &mut c).unwrap();
        assert_relative_eq!(b, 4.0, epsilon = 1e-12);
        assert_relative_eq!(c, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_complete_lattice_rejects_bad_spacegroup_and_lengths() {
        let mut b = 4.0;
        let mut c = 4.0;
        assert!(matches!(
            check_and_complete_lattice(0, 4.0, &mut b, &mut c),
            Err(LatticeError::InvalidSpacegroup(0))
        ));
        assert!(matches!(
            check_and_complete_lattice(231, 4.0, &mut b, &mut c),
            Err(LatticeError::InvalidSpacegroup(231))
        ));
        // orthorhombic spacegroups cannot complete a missing length
        let mut b = 0.0;
        let mut c = 5.0;
        assert!(matches!(
            check_and_complete_lattice(40, 4.0, &mut b, &mut c),
            Err(LatticeError::NonPositiveLength { name: "b", .. })
        ));
    }
}
