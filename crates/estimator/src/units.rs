//! Unit constants and output rounding

/// FLOPs or bytes per tera-unit
pub const TERA: f64 = 1e12;

/// Bytes per GiB; memory sizes in GB are binary gigabytes
pub const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Milliseconds per second
pub const MS_PER_SECOND: f64 = 1000.0;

/// Rounds to a fixed number of decimal places, ties to even
pub fn round_to(value: f64, places: i32) -> f64 {
    if places <= 0 {
        return value.round_ties_even();
    }
    let scale = 10f64.powi(places);
    (value * scale).round_ties_even() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2.345_67, 2), 2.35);
        assert_eq!(round_to(13.038_516_044_616_7, 4), 13.0385);
        assert_eq!(round_to(-0.004, 2), -0.0);
    }

    #[test]
    fn test_round_to_ties_to_even() {
        assert_eq!(round_to(2.125, 2), 2.12);
        assert_eq!(round_to(2.375, 2), 2.38);
        assert_eq!(round_to(2.031_25, 4), 2.0312);
        assert_eq!(round_to(77.968_75, 4), 77.9688);
        assert_eq!(round_to(1_234.5, 0), 1_234.0);
        assert_eq!(round_to(1_235.5, 0), 1_236.0);
    }
}
