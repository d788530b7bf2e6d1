//! Pure aggregation and formula code. Nothing in here touches the network
//! or the filesystem, so every metric is testable on plain values.

pub mod baseball;
pub mod basketball;
pub mod goal_diff;
pub mod hockey;
pub mod nba_trends;
pub mod shots;
pub mod trendlens;

/// `count / total`, or 0 when there is nothing to divide by.
pub fn ratio(count: f64, total: f64) -> f64 {
    if total > 0.0 { count / total } else { 0.0 }
}

/// Same as [`ratio`], scaled to a percentage.
pub fn percentage(count: f64, total: f64) -> f64 {
    ratio(count, total) * 100.0
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_totals_never_produce_nan() {
        assert_eq!(ratio(3.0, 0.0), 0.0);
        assert_eq!(percentage(0.0, 0.0), 0.0);
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(12.345, 1), 12.3);
        assert_eq!(round_to(0.6667, 2), 0.67);
    }
}
