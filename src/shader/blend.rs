//! Blending and interpolation functions.

/// Linear interpolation between two values.
///
/// Returns `a` when `t=0`, `b` when `t=1`, and linear blend in between.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Ken Perlin's quintic fade curve `6t^5 - 15t^4 + 10t^3`.
///
/// Zero first and second derivatives at 0 and 1, which keeps noise C2
/// continuous across lattice cell borders.
#[inline]
pub fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Clamp an unbounded channel value into `[0, 255]` and truncate.
#[inline]
pub fn clamp_channel(v: f32) -> u8 {
    // NaN saturates to 0 on the cast
    v.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 10.0, 0.0) - 0.0).abs() < 1e-6);
        assert!((lerp(0.0, 10.0, 1.0) - 10.0).abs() < 1e-6);
        assert!((lerp(0.0, 10.0, 0.5) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_fade_endpoints_and_midpoint() {
        assert_eq!(fade(0.0), 0.0);
        assert!((fade(1.0) - 1.0).abs() < 1e-6);
        assert!((fade(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_fade_flat_at_edges() {
        // Quintic has zero slope at both ends
        let h = 1e-3;
        assert!((fade(h) - fade(0.0)) / h < 1e-3);
        assert!((fade(1.0) - fade(1.0 - h)) / h < 1e-3);
    }

    #[test]
    fn test_clamp_channel() {
        assert_eq!(clamp_channel(-1.0), 0);
        assert_eq!(clamp_channel(255.9), 255);
        assert_eq!(clamp_channel(1000.0), 255);
        assert_eq!(clamp_channel(12.7), 12);
        assert_eq!(clamp_channel(f32::NAN), 0);
    }
}
