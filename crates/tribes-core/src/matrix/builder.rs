//! Vote matrix construction.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{TribeError, TribeResult};
use crate::types::{PostId, UserId, VoterSnapshot};

/// Row-major m x n matrix of vote values with its index mappings.
#[derive(Clone, Debug)]
pub struct VoteMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
    row_users: Vec<UserId>,
    col_posts: Vec<PostId>,
    post_index: HashMap<PostId, usize>,
}

impl VoteMatrix {
    /// (rows, cols).
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell value. Panics on out-of-range indices like slice indexing.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(
            row < self.rows && col < self.cols,
            "cell ({}, {}) out of range for {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Raw row-major values.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn user_at(&self, row: usize) -> Option<&UserId> {
        self.row_users.get(row)
    }

    pub fn users(&self) -> &[UserId] {
        &self.row_users
    }

    pub fn post_at(&self, col: usize) -> Option<&PostId> {
        self.col_posts.get(col)
    }

    pub fn column_of(&self, post_id: &PostId) -> Option<usize> {
        self.post_index.get(post_id).copied()
    }

    pub fn nonzero_count(&self) -> usize {
        self.data.iter().filter(|v| **v != 0.0).count()
    }

    /// Number of distinct rows (users with distinct voting patterns).
    pub fn distinct_row_count(&self) -> usize {
        let mut seen: HashSet<Vec<u64>> = HashSet::with_capacity(self.rows);
        for r in 0..self.rows {
            seen.insert(self.row(r).iter().map(|v| v.to_bits()).collect());
        }
        seen.len()
    }
}

/// Builds a [`VoteMatrix`] from per-user vote lists.
#[derive(Clone, Copy, Debug, Default)]
pub struct VoteMatrixBuilder;

impl VoteMatrixBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the matrix for already-filtered active users.
    ///
    /// # Errors
    ///
    /// `TribeError::EmptyMatrix` if there are no users or their votes
    /// reference no posts. Callers filter scopes before building.
    pub fn build(&self, voters: &[VoterSnapshot]) -> TribeResult<VoteMatrix> {
        let mut col_posts: Vec<PostId> = Vec::new();
        let mut post_index: HashMap<PostId, usize> = HashMap::new();
        for voter in voters {
            for vote in &voter.votes {
                if !post_index.contains_key(&vote.post_id) {
                    post_index.insert(vote.post_id.clone(), col_posts.len());
                    col_posts.push(vote.post_id.clone());
                }
            }
        }

        let rows = voters.len();
        let cols = col_posts.len();
        if rows == 0 || cols == 0 {
            return Err(TribeError::EmptyMatrix { rows, cols });
        }

        let mut data = vec![0.0f64; rows * cols];
        for (r, voter) in voters.iter().enumerate() {
            for vote in &voter.votes {
                // Unindexed posts cannot occur here; skip rather than fail.
                if let Some(&c) = post_index.get(&vote.post_id) {
                    data[r * cols + c] = vote.value.as_f64();
                }
            }
        }

        debug!(rows, cols, "Built vote matrix");

        Ok(VoteMatrix {
            rows,
            cols,
            data,
            row_users: voters.iter().map(|v| v.user_id.clone()).collect(),
            col_posts,
            post_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CastVote, VoteValue};

    fn vote(post: &PostId, value: VoteValue) -> CastVote {
        CastVote::new(post.clone(), value, vec![])
    }

    #[test]
    fn test_dimensions_and_cells_match_votes() {
        let posts: Vec<PostId> = (0..4).map(|_| PostId::new()).collect();
        let voters = vec![
            VoterSnapshot::new(
                UserId::new(),
                vec![vote(&posts[0], VoteValue::Up), vote(&posts[2], VoteValue::Down)],
            ),
            VoterSnapshot::new(
                UserId::new(),
                vec![vote(&posts[1], VoteValue::Down), vote(&posts[3], VoteValue::Up)],
            ),
            VoterSnapshot::new(UserId::new(), vec![vote(&posts[2], VoteValue::Up)]),
        ];

        let matrix = VoteMatrixBuilder::new().build(&voters).unwrap();
        assert_eq!(matrix.dims(), (3, 4));
        assert_eq!(matrix.nonzero_count(), 5);

        for (r, voter) in voters.iter().enumerate() {
            assert_eq!(matrix.user_at(r), Some(&voter.user_id));
            for c in 0..matrix.cols() {
                let post = matrix.post_at(c).unwrap();
                let expected = voter
                    .votes
                    .iter()
                    .find(|v| &v.post_id == post)
                    .map(|v| v.value.as_f64())
                    .unwrap_or(0.0);
                assert_eq!(matrix.get(r, c), expected, "cell ({}, {})", r, c);
            }
        }

        println!("[VERIFIED] Matrix cells equal observed votes, zero elsewhere");
    }

    #[test]
    fn test_columns_follow_first_seen_order() {
        let a = PostId::new();
        let b = PostId::new();
        let c = PostId::new();
        let voters = vec![
            VoterSnapshot::new(UserId::new(), vec![vote(&b, VoteValue::Up), vote(&a, VoteValue::Up)]),
            VoterSnapshot::new(UserId::new(), vec![vote(&c, VoteValue::Up), vote(&b, VoteValue::Down)]),
        ];

        let matrix = VoteMatrixBuilder::new().build(&voters).unwrap();
        assert_eq!(matrix.column_of(&b), Some(0));
        assert_eq!(matrix.column_of(&a), Some(1));
        assert_eq!(matrix.column_of(&c), Some(2));
        assert_eq!(matrix.column_of(&PostId::new()), None);
    }

    #[test]
    fn test_later_vote_on_same_post_overwrites() {
        let post = PostId::new();
        let voters = vec![VoterSnapshot::new(
            UserId::new(),
            vec![vote(&post, VoteValue::Up), vote(&post, VoteValue::Down)],
        )];

        let matrix = VoteMatrixBuilder::new().build(&voters).unwrap();
        assert_eq!(matrix.dims(), (1, 1));
        assert_eq!(matrix.get(0, 0), -1.0);
    }

    #[test]
    fn test_empty_inputs_fail() {
        let err = VoteMatrixBuilder::new().build(&[]).unwrap_err();
        assert!(matches!(err, TribeError::EmptyMatrix { rows: 0, cols: 0 }));

        let voters = vec![VoterSnapshot::new(UserId::new(), vec![])];
        let err = VoteMatrixBuilder::new().build(&voters).unwrap_err();
        assert!(matches!(err, TribeError::EmptyMatrix { rows: 1, cols: 0 }));
        assert!(err.is_scope_local());
    }

    #[test]
    fn test_distinct_row_count() {
        let post = PostId::new();
        let other = PostId::new();
        let voters = vec![
            VoterSnapshot::new(UserId::new(), vec![vote(&post, VoteValue::Up)]),
            VoterSnapshot::new(UserId::new(), vec![vote(&post, VoteValue::Up)]),
            VoterSnapshot::new(UserId::new(), vec![vote(&other, VoteValue::Down)]),
        ];
        let matrix = VoteMatrixBuilder::new().build(&voters).unwrap();
        assert_eq!(matrix.distinct_row_count(), 2);
    }

    #[test]
    #[should_panic(expected = "cell (2, 0) out of range for 2x1 matrix")]
    fn test_get_row_out_of_range_panics_with_bounds() {
        let post = PostId::new();
        let voters = vec![
            VoterSnapshot::new(UserId::new(), vec![vote(&post, VoteValue::Up)]),
            VoterSnapshot::new(UserId::new(), vec![vote(&post, VoteValue::Down)]),
        ];
        let matrix = VoteMatrixBuilder::new().build(&voters).unwrap();
        matrix.get(2, 0);
    }
}
