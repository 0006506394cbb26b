//! Per-user latent coordinates from the vote matrix.

use tracing::debug;

use crate::config::constants::clustering::LATENT_DIMS;
use crate::error::{TribeError, TribeResult};
use crate::matrix::VoteMatrix;

use super::svd::JacobiSvd;

/// Latent coordinates for every matrix row.
#[derive(Clone, Debug)]
pub struct LatentProjection {
    /// One vector of exactly `dims` coordinates per matrix row.
    pub vectors: Vec<Vec<f64>>,
    /// All min(m, n) singular values, descending.
    pub singular_values: Vec<f64>,
    /// Numerical rank of the matrix.
    pub rank: usize,
    pub dims: usize,
}

impl LatentProjection {
    /// Coordinates that carry signal: min(dims, rank).
    pub fn informative_dims(&self) -> usize {
        self.dims.min(self.rank)
    }
}

/// Reduces a [`VoteMatrix`] to `dims` latent coordinates per user.
///
/// No variance threshold is applied: exactly `dims` coordinates are always
/// returned, zero-padded past the matrix rank.
#[derive(Clone, Debug)]
pub struct LatentProjector {
    dims: usize,
    svd: JacobiSvd,
}

impl Default for LatentProjector {
    fn default() -> Self {
        Self::new(LATENT_DIMS)
    }
}

impl LatentProjector {
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            svd: JacobiSvd::new(),
        }
    }

    pub fn with_svd(mut self, svd: JacobiSvd) -> Self {
        self.svd = svd;
        self
    }

    #[inline]
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Project every row of `matrix`.
    ///
    /// # Errors
    ///
    /// `TribeError::Projection` if `dims` is zero or the SVD fails.
    pub fn project(&self, matrix: &VoteMatrix) -> TribeResult<LatentProjection> {
        if self.dims == 0 {
            return Err(TribeError::projection("latent dimensionality must be > 0"));
        }

        let (m, n) = matrix.dims();
        let left = self.svd.decompose(matrix.as_slice(), m, n)?;

        let kept = self.dims.min(left.rank);
        let vectors: Vec<Vec<f64>> = (0..m)
            .map(|row| {
                let mut coords = vec![0.0; self.dims];
                for (d, coord) in coords.iter_mut().enumerate().take(kept) {
                    *coord = left.vectors[d][row];
                }
                coords
            })
            .collect();

        debug!(
            rows = m,
            cols = n,
            rank = left.rank,
            dims = self.dims,
            "Projected vote matrix"
        );

        Ok(LatentProjection {
            vectors,
            singular_values: left.singular_values,
            rank: left.rank,
            dims: self.dims,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::VoteMatrixBuilder;
    use crate::types::{CastVote, PostId, UserId, VoteValue, VoterSnapshot};

    fn voters_from_rows(rows: &[&[i8]]) -> Vec<VoterSnapshot> {
        let posts: Vec<PostId> = (0..rows[0].len()).map(|_| PostId::new()).collect();
        rows.iter()
            .map(|row| {
                let votes = row
                    .iter()
                    .zip(posts.iter())
                    .filter(|(v, _)| **v != 0)
                    .map(|(v, p)| CastVote::new(p.clone(), VoteValue::try_from(*v).unwrap(), vec![]))
                    .collect();
                VoterSnapshot::new(UserId::new(), votes)
            })
            .collect()
    }

    #[test]
    fn test_rank_one_pads_trailing_zeros() {
        let voters = voters_from_rows(&[
            &[1, 1, 1, 1],
            &[1, 1, 1, 1],
            &[1, 1, 1, 1],
            &[-1, -1, -1, -1],
            &[-1, -1, -1, -1],
            &[-1, -1, -1, -1],
        ]);
        let matrix = VoteMatrixBuilder::new().build(&voters).unwrap();
        let projection = LatentProjector::new(3).project(&matrix).unwrap();

        assert_eq!(projection.rank, 1);
        assert_eq!(projection.informative_dims(), 1);
        for coords in &projection.vectors {
            assert_eq!(coords.len(), 3);
            assert!(coords[0].abs() > 0.1);
            assert_eq!(coords[1], 0.0);
            assert_eq!(coords[2], 0.0);
        }
        // Opposite blocks land on opposite sides of the first axis.
        assert!(projection.vectors[0][0] * projection.vectors[3][0] < 0.0);

        println!("[VERIFIED] Rank-1 matrix yields exactly k-1 zero coordinates per row");
    }

    #[test]
    fn test_rank_two_pads_one_zero() {
        let voters = voters_from_rows(&[
            &[1, 1, 0, 0],
            &[1, 1, 0, 0],
            &[0, 0, 1, 1],
            &[0, 0, 1, 1],
            &[1, 1, 0, 0],
        ]);
        let matrix = VoteMatrixBuilder::new().build(&voters).unwrap();
        let projection = LatentProjector::new(3).project(&matrix).unwrap();

        assert_eq!(projection.rank, 2);
        for coords in &projection.vectors {
            assert_eq!(coords[2], 0.0);
        }
    }

    #[test]
    fn test_fewer_rows_than_dims() {
        let voters = voters_from_rows(&[&[1, -1, 1, 1, -1], &[-1, 1, 1, -1, 1]]);
        let matrix = VoteMatrixBuilder::new().build(&voters).unwrap();
        let projection = LatentProjector::new(3).project(&matrix).unwrap();

        assert_eq!(projection.vectors.len(), 2);
        assert_eq!(projection.singular_values.len(), 2);
        for coords in &projection.vectors {
            assert_eq!(coords.len(), 3);
            assert_eq!(coords[2], 0.0);
        }
    }

    #[test]
    fn test_projection_is_deterministic() {
        let voters = voters_from_rows(&[
            &[1, -1, 0, 1],
            &[1, 1, -1, 0],
            &[0, 1, 1, -1],
            &[-1, 0, 1, 1],
            &[1, 1, 1, 1],
        ]);
        let matrix = VoteMatrixBuilder::new().build(&voters).unwrap();
        let projector = LatentProjector::default();
        let first = projector.project(&matrix).unwrap();
        let second = projector.project(&matrix).unwrap();
        assert_eq!(first.vectors, second.vectors);
    }

    #[test]
    fn test_zero_dims_rejected() {
        let voters = voters_from_rows(&[&[1, 1], &[-1, 1]]);
        let matrix = VoteMatrixBuilder::new().build(&voters).unwrap();
        let err = LatentProjector::new(0).project(&matrix).unwrap_err();
        assert!(err.is_scope_local());
    }
}
