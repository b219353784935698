//! Depth-response kernel for the Wenner array.
//!
//! The forward model treats the cumulative contribution of the ground above
//! depth `z` to a reading at electrode spacing `a` as:
//!
//! - `F(z, a) = (2/pi) * atan(2z / a)`
//!
//! Properties relied on elsewhere:
//! - `F(0, a) = 0` and `F(z, a) -> 1` as `z -> inf`, so slab weights built
//!   from differences of `F` always sum to exactly 1.
//! - `F(a/2, a) = 1/2`: half of a reading's sensitivity sits above half the
//!   spacing, which is also the depth the closed-form fallback assigns.

/// Epsilon for guarding against degenerate spacings.
const A_EPS: f64 = 1e-12;

/// Fraction of a reading's sensitivity contributed by the ground above depth `z`.
pub fn depth_response(z: f64, spacing_m: f64) -> f64 {
    let a = spacing_m.max(A_EPS);
    let z = z.max(0.0);
    std::f64::consts::FRAC_2_PI * (2.0 * z / a).atan()
}

/// Depth above which half of a reading's sensitivity sits.
pub fn median_depth(spacing_m: f64) -> f64 {
    spacing_m / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_is_zero_at_surface() {
        assert_eq!(depth_response(0.0, 10.0), 0.0);
    }

    #[test]
    fn response_reaches_half_at_median_depth() {
        for &a in &[0.5, 1.0, 10.0, 250.0] {
            let v = depth_response(median_depth(a), a);
            assert!((v - 0.5).abs() < 1e-12, "F(a/2) should be 1/2, got {v}");
        }
    }

    #[test]
    fn response_is_monotone_and_bounded() {
        let a = 15.0;
        let mut prev = 0.0;
        for i in 1..200 {
            let z = i as f64 * 0.5;
            let v = depth_response(z, a);
            assert!(v > prev, "F must increase with depth");
            assert!(v < 1.0);
            prev = v;
        }
        assert!(depth_response(1e9, a) > 0.999_999);
    }

    #[test]
    fn response_survives_degenerate_spacing() {
        let v = depth_response(1.0, 0.0);
        assert!(v.is_finite());
        assert!(v <= 1.0);
    }
}
