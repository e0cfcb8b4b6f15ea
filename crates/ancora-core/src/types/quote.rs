//! Quote sentinels and comparison tolerances.

/// Sentinel value for a price that has never been observed.
///
/// Instruments are constructed with this value on both sides of the quote;
/// they are excluded from fitting until a real price arrives.
pub const UNSET_PRICE: f64 = -99999.0;

/// Tolerance used when testing a price against [`UNSET_PRICE`].
pub const PRICE_EPSILON: f64 = 1e-4;

/// Tolerance used when diffing price vectors during incremental updates.
///
/// Differences at or below this threshold are treated as noise and do not
/// trigger a refit.
pub const QUOTE_DIFF_EPSILON: f64 = 1e-6;

/// Returns true when `price` is the unset sentinel.
#[must_use]
pub fn is_unset_price(price: f64) -> bool {
    (price - UNSET_PRICE).abs() < PRICE_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_price_detection() {
        assert!(is_unset_price(UNSET_PRICE));
        assert!(is_unset_price(UNSET_PRICE + 0.5e-4));
        assert!(!is_unset_price(0.0));
        assert!(!is_unset_price(99.5));
    }
}
