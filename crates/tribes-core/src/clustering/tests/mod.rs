//! Tests for k-means partitioning.
//!
//! # Test Organization
//!
//! - `helpers` - Point generators
//! - `config_tests` - KMeansConfig validation tests
//! - `partition_tests` - KMeansPartitioner behavior
//! - `edge_cases` - Clamping, degenerate inputs and seeding

mod helpers;

mod config_tests;
