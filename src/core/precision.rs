//! Presentation rounding

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Two decimal places (prices, capital, percentages)
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round2(101.456), 101.46);
        assert_eq!(round2(-0.004), -0.0);
        assert_eq!(round_to(0.63683065, 4), 0.6368);
        assert_eq!(round_to(0.0187620173, 6), 0.018762);
        assert_eq!(round2(7500.0), 7500.0);
    }
}
