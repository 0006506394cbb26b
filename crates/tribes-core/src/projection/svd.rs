//! One-sided Jacobi singular value decomposition.

use tracing::debug;

use crate::error::{TribeError, TribeResult};

/// Singular values below `sigma_max * RANK_EPSILON` count as zero.
pub const RANK_EPSILON: f64 = 1e-10;

/// Columns shorter than this fraction of the Frobenius norm are treated as
/// zero and never rotated. Rounding residue would otherwise keep the sweeps
/// from converging on rank-deficient input.
const NEGLIGIBLE_COLUMN: f64 = 1e-13;

/// Left singular vectors and singular values, in decreasing order.
#[derive(Clone, Debug)]
pub struct LeftSingularVectors {
    /// min(m, n) singular values, descending.
    pub singular_values: Vec<f64>,
    /// One length-m vector per singular value. Vectors past the numerical
    /// rank are all zero.
    pub vectors: Vec<Vec<f64>>,
    /// Number of singular values above the rank threshold.
    pub rank: usize,
    /// Whether the decomposition ran on the transpose.
    pub transposed: bool,
    pub sweeps: usize,
}

/// Hestenes one-sided Jacobi SVD.
///
/// Orthogonalizes the columns of the working matrix with plane rotations.
/// The working matrix is `A` when `m >= n` and `A^T` otherwise, so rotations
/// always act on the shorter dimension.
#[derive(Clone, Debug)]
pub struct JacobiSvd {
    pub max_sweeps: usize,
    /// Column pairs with `|<a_i, a_j>| <= tolerance * |a_i| |a_j|` count as
    /// orthogonal. Raised to `p * f64::EPSILON` for long columns.
    pub tolerance: f64,
}

impl Default for JacobiSvd {
    fn default() -> Self {
        Self {
            max_sweeps: 60,
            tolerance: 1e-15,
        }
    }
}

impl JacobiSvd {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decompose the row-major `m x n` matrix `a`.
    ///
    /// # Errors
    ///
    /// `TribeError::Projection` for a shape mismatch, non-finite input, or
    /// when the sweeps do not converge.
    pub fn decompose(&self, a: &[f64], m: usize, n: usize) -> TribeResult<LeftSingularVectors> {
        if m == 0 || n == 0 || a.len() != m * n {
            return Err(TribeError::projection(format!(
                "matrix shape {}x{} does not match {} values",
                m,
                n,
                a.len()
            )));
        }
        if a.iter().any(|v| !v.is_finite()) {
            return Err(TribeError::projection("matrix contains non-finite values"));
        }

        let transposed = n > m;
        let (p, q) = if transposed { (n, m) } else { (m, n) };

        // Column j of the working matrix, p entries each.
        let mut work: Vec<Vec<f64>> = (0..q)
            .map(|j| {
                (0..p)
                    .map(|i| if transposed { a[j * n + i] } else { a[i * n + j] })
                    .collect()
            })
            .collect();
        let mut rotations: Vec<Vec<f64>> = (0..q)
            .map(|j| {
                let mut e = vec![0.0; q];
                e[j] = 1.0;
                e
            })
            .collect();

        let frobenius = dot(a, a).sqrt();
        let negligible = (NEGLIGIBLE_COLUMN * frobenius).powi(2);
        let tolerance = self.tolerance.max(p as f64 * f64::EPSILON);

        let mut sweeps = 0;
        let mut converged = false;
        while sweeps < self.max_sweeps {
            sweeps += 1;
            let mut rotated = false;

            for i in 0..q {
                for j in (i + 1)..q {
                    let alpha = dot(&work[i], &work[i]);
                    let beta = dot(&work[j], &work[j]);
                    let gamma = dot(&work[i], &work[j]);

                    if alpha <= negligible || beta <= negligible {
                        continue;
                    }
                    if gamma == 0.0 || gamma.abs() <= tolerance * (alpha * beta).sqrt() {
                        continue;
                    }
                    rotated = true;

                    let zeta = (beta - alpha) / (2.0 * gamma);
                    let t = zeta.signum() / (zeta.abs() + 1.0f64.hypot(zeta));
                    let c = 1.0 / (1.0 + t * t).sqrt();
                    let s = c * t;

                    rotate(&mut work, i, j, c, s);
                    rotate(&mut rotations, i, j, c, s);
                }
            }

            if !rotated {
                converged = true;
                break;
            }
        }

        if !converged {
            return Err(TribeError::projection(format!(
                "Jacobi SVD did not converge after {} sweeps ({}x{})",
                sweeps, m, n
            )));
        }

        let norms: Vec<f64> = work.iter().map(|col| dot(col, col).sqrt()).collect();
        let mut order: Vec<usize> = (0..q).collect();
        order.sort_by(|&x, &y| {
            norms[y]
                .partial_cmp(&norms[x])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let sigma_max = order.first().map(|&k| norms[k]).unwrap_or(0.0);
        let threshold = sigma_max * RANK_EPSILON;

        let mut singular_values = Vec::with_capacity(q);
        let mut vectors = Vec::with_capacity(q);
        let mut rank = 0;
        for &k in &order {
            let sigma = norms[k];
            singular_values.push(sigma);
            if sigma > threshold && sigma > 0.0 {
                rank += 1;
                if transposed {
                    // A^T V = U' S  =>  A = V S U'^T, so V holds A's left vectors.
                    vectors.push(rotations[k].clone());
                } else {
                    vectors.push(work[k].iter().map(|x| x / sigma).collect());
                }
            } else {
                vectors.push(vec![0.0; m]);
            }
        }

        debug!(m, n, transposed, sweeps, rank, "Jacobi SVD converged");

        Ok(LeftSingularVectors {
            singular_values,
            vectors,
            rank,
            transposed,
            sweeps,
        })
    }
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Apply the plane rotation to columns `i < j`.
fn rotate(cols: &mut [Vec<f64>], i: usize, j: usize, c: f64, s: f64) {
    let (head, tail) = cols.split_at_mut(j);
    let col_i = &mut head[i];
    let col_j = &mut tail[0];
    for (x, y) in col_i.iter_mut().zip(col_j.iter_mut()) {
        let xi = *x;
        let yj = *y;
        *x = c * xi - s * yj;
        *y = s * xi + c * yj;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Row-major A * A^T * u.
    fn aat_times(a: &[f64], m: usize, n: usize, u: &[f64]) -> Vec<f64> {
        let at_u: Vec<f64> = (0..n)
            .map(|c| (0..m).map(|r| a[r * n + c] * u[r]).sum())
            .collect();
        (0..m)
            .map(|r| (0..n).map(|c| a[r * n + c] * at_u[c]).sum())
            .collect()
    }

    fn assert_left_singular_pairs(a: &[f64], m: usize, n: usize, svd: &LeftSingularVectors) {
        for k in 0..svd.rank {
            let u = &svd.vectors[k];
            let sigma = svd.singular_values[k];
            let lhs = aat_times(a, m, n, u);
            for r in 0..m {
                assert!(
                    (lhs[r] - sigma * sigma * u[r]).abs() < 1e-9,
                    "A A^T u != s^2 u for component {} row {}",
                    k,
                    r
                );
            }
            let norm: f64 = dot(u, u).sqrt();
            assert!((norm - 1.0).abs() < 1e-9, "component {} not unit length", k);
            for other in 0..k {
                assert!(dot(u, &svd.vectors[other]).abs() < 1e-9, "components not orthogonal");
            }
        }
    }

    #[test]
    fn test_known_singular_values() {
        // [[3, 0], [0, 4], [0, 0]]
        let a = [3.0, 0.0, 0.0, 4.0, 0.0, 0.0];
        let svd = JacobiSvd::new().decompose(&a, 3, 2).unwrap();

        assert!(!svd.transposed);
        assert_eq!(svd.rank, 2);
        assert!((svd.singular_values[0] - 4.0).abs() < 1e-12);
        assert!((svd.singular_values[1] - 3.0).abs() < 1e-12);
        // First left vector is +-e_1.
        assert!((svd.vectors[0][1].abs() - 1.0).abs() < 1e-12);
        assert!(svd.vectors[0][0].abs() < 1e-12);

        println!("[VERIFIED] Jacobi SVD recovers diagonal singular values in order");
    }

    #[test]
    fn test_tall_matrix_pairs() {
        let a = [
            1.0, -1.0, 0.0, //
            1.0, 1.0, -1.0, //
            0.0, 1.0, 1.0, //
            -1.0, 0.0, 1.0, //
            1.0, 1.0, 1.0,
        ];
        let svd = JacobiSvd::new().decompose(&a, 5, 3).unwrap();
        assert!(!svd.transposed);
        assert_eq!(svd.singular_values.len(), 3);
        assert!(svd.singular_values.windows(2).all(|w| w[0] >= w[1]));
        assert_left_singular_pairs(&a, 5, 3, &svd);
    }

    #[test]
    fn test_wide_matrix_uses_transpose() {
        let a = [
            1.0, 1.0, -1.0, 0.0, 1.0, //
            -1.0, 0.0, 1.0, 1.0, 1.0, //
            0.0, 1.0, 1.0, -1.0, -1.0,
        ];
        let svd = JacobiSvd::new().decompose(&a, 3, 5).unwrap();
        assert!(svd.transposed);
        assert_eq!(svd.vectors.len(), 3);
        assert!(svd.vectors.iter().all(|v| v.len() == 3));
        assert_left_singular_pairs(&a, 3, 5, &svd);

        println!("[VERIFIED] Auto-transpose yields left singular vectors of the original matrix");
    }

    #[test]
    fn test_rank_deficient_components_are_zero() {
        // Rank 1: every row is +-[1, 1, 1, 1].
        let mut a = Vec::new();
        for sign in [1.0, 1.0, 1.0, -1.0, -1.0, -1.0] {
            a.extend([sign; 4]);
        }
        let svd = JacobiSvd::new().decompose(&a, 6, 4).unwrap();
        assert_eq!(svd.rank, 1);
        assert!((svd.singular_values[0] - 24.0f64.sqrt()).abs() < 1e-9);
        for k in 1..4 {
            assert!(svd.vectors[k].iter().all(|x| *x == 0.0));
        }
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(JacobiSvd::new().decompose(&[1.0, 2.0], 2, 2).is_err());
        assert!(JacobiSvd::new().decompose(&[], 0, 0).is_err());
        let err = JacobiSvd::new()
            .decompose(&[1.0, f64::NAN, 0.0, 1.0], 2, 2)
            .unwrap_err();
        assert!(matches!(err, TribeError::Projection(_)));
    }

    #[test]
    fn test_sweep_limit_reports_projection_error() {
        let svd = JacobiSvd {
            max_sweeps: 1,
            tolerance: 1e-15,
        };
        let a = [
            1.0, 2.0, 3.0, //
            2.0, -1.0, 1.0, //
            3.0, 1.0, -2.0, //
            1.0, 1.0, 1.0,
        ];
        // The only sweep allowed has to rotate, so convergence is never observed.
        let result = svd.decompose(&a, 4, 3);
        assert!(matches!(result, Err(TribeError::Projection(_))));
    }
}
