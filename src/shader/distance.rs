//! Distance functions for spatial calculations.

/// Euclidean distance between two points.
#[inline]
pub fn dist(x: f32, y: f32, cx: f32, cy: f32) -> f32 {
    let dx = x - cx;
    let dy = y - cy;
    (dx * dx + dy * dy).sqrt()
}

/// Squared Euclidean distance (avoids sqrt for comparisons).
#[inline]
pub fn dist_sq(x: f32, y: f32, cx: f32, cy: f32) -> f32 {
    let dx = x - cx;
    let dy = y - cy;
    dx * dx + dy * dy
}

/// Inverse distance weight `1 / d^power`.
///
/// Returns `None` when the distance is zero, meaning the sample sits
/// exactly on the anchor and should take its value outright.
#[inline]
pub fn inverse_distance_weight(d: f32, power: f32) -> Option<f32> {
    if d <= f32::EPSILON {
        None
    } else {
        Some(1.0 / d.powf(power))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dist() {
        assert!((dist(0.0, 0.0, 3.0, 4.0) - 5.0).abs() < 1e-6);
        assert!((dist_sq(1.0, 1.0, 4.0, 5.0) - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_inverse_distance_weight() {
        assert!(inverse_distance_weight(0.0, 2.0).is_none());
        let w = inverse_distance_weight(2.0, 2.0).unwrap();
        assert!((w - 0.25).abs() < 1e-6);
        // Closer anchors weigh more
        assert!(inverse_distance_weight(1.0, 2.0) > inverse_distance_weight(3.0, 2.0));
    }
}
