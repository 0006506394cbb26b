//! Helper functions for creating test points (REAL data, NO mocks).

/// Points spread around `center` with a small deterministic offset.
pub fn blob(center: [f64; 3], count: usize, spread: f64) -> Vec<Vec<f64>> {
    (0..count)
        .map(|i| {
            let offset = (i as f64 - count as f64 / 2.0) * spread;
            vec![center[0] + offset, center[1] - offset, center[2] + offset * 0.5]
        })
        .collect()
}

/// Three well separated blobs of five points each.
pub fn three_blobs() -> Vec<Vec<f64>> {
    let mut points = blob([0.0, 0.0, 0.0], 5, 0.01);
    points.extend(blob([5.0, 5.0, 0.0], 5, 0.01));
    points.extend(blob([-5.0, 5.0, 5.0], 5, 0.01));
    points
}
