//! Dense user x post vote matrix.
//!
//! Rows follow the order of the active users handed to the builder; columns
//! follow the first-seen order of the posts their votes reference. Only cells
//! with an observed vote are non-zero.

mod builder;

pub use builder::{VoteMatrix, VoteMatrixBuilder};
