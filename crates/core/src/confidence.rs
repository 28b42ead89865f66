use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// Round to two decimal places, half-to-even.
pub fn round2(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(2))
        .and_then(|d| d.to_f64())
        .unwrap_or(0.0)
}

/// Rescale an engine confidence (0.0–1.0) to a percentage with two decimals.
pub fn to_percent(fraction: f64) -> f64 {
    round2(fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_trims_float_noise() {
        assert_eq!(round2(85.00000000000001), 85.0);
        assert_eq!(round2(12.345678), 12.35);
    }

    #[test]
    fn to_percent_scales_fraction() {
        assert_eq!(to_percent(0.95), 95.0);
        assert_eq!(to_percent(0.0), 0.0);
        assert_eq!(to_percent(1.0), 100.0);
        assert_eq!(to_percent(0.876543210987), 87.65);
    }
}
