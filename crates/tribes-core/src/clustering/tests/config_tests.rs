//! KMeansConfig validation tests.

use crate::clustering::KMeansConfig;
use crate::config::ClusteringConfig;
use crate::error::TribeError;

#[test]
fn test_config_defaults() {
    let config = KMeansConfig::default();

    assert_eq!(config.max_iterations, 100);
    assert_eq!(config.convergence_threshold, 1e-6);
    assert_eq!(config.seed, Some(42));

    println!("[VERIFIED] KMeansConfig defaults are 100 iterations, 1e-6, seed 42");
}

#[test]
fn test_config_rejects_zero_iterations() {
    let err = KMeansConfig::new(0, 1e-6, None).unwrap_err();

    assert!(matches!(err, TribeError::Config(_)));
    assert!(err.to_string().contains("max_iterations"));

    println!("[VERIFIED] max_iterations=0 rejected: {}", err);
}

#[test]
fn test_config_rejects_bad_threshold() {
    for threshold in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let result = KMeansConfig::new(10, threshold, Some(1));
        assert!(result.is_err(), "threshold {} accepted", threshold);
    }

    println!("[VERIFIED] Non-positive and non-finite thresholds rejected");
}

#[test]
fn test_config_from_clustering_section() {
    let mut section = ClusteringConfig::default();
    section.max_iterations = 7;
    section.seed = None;

    let config = KMeansConfig::from_clustering(&section).unwrap();

    assert_eq!(config.max_iterations, 7);
    assert_eq!(config.seed, None);

    println!("[VERIFIED] KMeansConfig derived from clustering section");
}
