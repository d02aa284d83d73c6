//! Severity score arithmetic.
//!
//! Scores live on a 0..=100 scale. The profile's severity multiplier scales
//! impact only; likelihood is never scaled. Multipliers are not clamped —
//! only the resulting score saturates — so an extreme multiplier remains
//! visible in the evaluation it came from.

/// `clamp(base_impact × multiplier, 0, 100)`, rounded to the nearest whole
/// score.
pub fn adjusted_impact(base_impact: u8, multiplier: f64) -> u8 {
    let adjusted = (f64::from(base_impact) * multiplier).clamp(0.0, 100.0);
    adjusted.round() as u8
}

/// `round(adjusted_impact × likelihood / 100)`.
pub fn composite_risk(adjusted_impact: u8, likelihood: u8) -> u8 {
    let composite = f64::from(adjusted_impact) * f64::from(likelihood) / 100.0;
    composite.round() as u8
}

/// Both steps in one: adjust the base impact, then fold in likelihood.
pub fn composite_from_base(base_impact: u8, likelihood: u8, multiplier: f64) -> u8 {
    composite_risk(adjusted_impact(base_impact, multiplier), likelihood)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_of_80_and_70_is_56() {
        assert_eq!(composite_risk(80, 70), 56);
    }

    #[test]
    fn composite_of_60_and_50_is_30() {
        assert_eq!(composite_risk(60, 50), 30);
    }

    #[test]
    fn extreme_multiplier_saturates_at_100() {
        assert_eq!(adjusted_impact(90, 2.0), 100);
        assert_eq!(composite_risk(100, 80), 80);
        assert_eq!(composite_from_base(90, 80, 2.0), 80);
    }

    #[test]
    fn negative_multiplier_saturates_at_zero() {
        assert_eq!(adjusted_impact(80, -1.5), 0);
        assert_eq!(composite_from_base(80, 70, -1.5), 0);
    }

    #[test]
    fn unit_multiplier_is_identity() {
        assert_eq!(adjusted_impact(64, 1.0), 64);
        assert_eq!(composite_from_base(80, 70, 1.0), 56);
    }

    #[test]
    fn fractional_adjustment_rounds_to_nearest() {
        // 60 × 1.1 = 66.0
        assert_eq!(adjusted_impact(60, 1.1), 66);
        // 45 × 1.5 = 67.5 rounds up
        assert_eq!(adjusted_impact(45, 1.5), 68);
    }

    #[test]
    fn likelihood_is_never_scaled() {
        // Same likelihood, doubled multiplier: only the impact leg moves.
        let unscaled = composite_from_base(40, 70, 1.0);
        let scaled = composite_from_base(40, 70, 2.0);
        assert_eq!(unscaled, 28);
        assert_eq!(scaled, 56);
    }
}
