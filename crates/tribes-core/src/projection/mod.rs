//! Latent projection of the vote matrix.
//!
//! # Algorithm
//!
//! 1. One-sided (Hestenes) Jacobi SVD on the smaller orientation of the
//!    matrix ("auto-transpose")
//! 2. Left singular vectors ordered by decreasing singular value
//! 3. First `dims` coordinates per row; components past the numerical rank
//!    are zero
//!
//! Singular vector signs are not unique. Downstream code must only rely on
//! quantities invariant to a per-axis sign flip.

mod projector;
mod svd;

pub use projector::{LatentProjection, LatentProjector};
pub use svd::{JacobiSvd, LeftSingularVectors};
