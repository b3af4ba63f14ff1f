//! Decimal-aware token amount backed by a 256-bit unsigned integer.
//!
//! Raw on-chain amounts are integers scaled by `10^decimals`. This type
//! keeps the raw value and the decimal count together so arithmetic and
//! formatting never lose track of the scale. Values are never mutated in
//! place; every operation produces a new amount.

use alloy_primitives::U256;

use super::CoreError;

/// A non-negative token amount: `raw / 10^decimals`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPointAmount {
    raw: U256,
    decimals: u8,
}

fn pow10(n: u8) -> U256 {
    U256::from(10u64).pow(U256::from(n))
}

impl FixedPointAmount {
    /// Create an amount from a raw integer and decimal count.
    pub fn new(raw: U256, decimals: u8) -> Self {
        FixedPointAmount { raw, decimals }
    }

    /// Zero at the given decimal count.
    pub fn zero(decimals: u8) -> Self {
        FixedPointAmount {
            raw: U256::ZERO,
            decimals,
        }
    }

    /// One whole token (`10^decimals` raw units).
    pub fn one(decimals: u8) -> Self {
        FixedPointAmount {
            raw: pow10(decimals),
            decimals,
        }
    }

    /// Parse a raw amount from a base-10 integer string.
    ///
    /// # Errors
    /// `InvalidNumberFormat` if the string is empty, signed, non-numeric,
    /// or overflows 256 bits.
    pub fn from_raw_str(raw: &str, decimals: u8) -> Result<Self, CoreError> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidNumberFormat(raw.to_string()));
        }
        let value = U256::from_str_radix(raw, 10)
            .map_err(|_| CoreError::InvalidNumberFormat(raw.to_string()))?;
        Ok(FixedPointAmount {
            raw: value,
            decimals,
        })
    }

    /// The raw integer value.
    pub fn raw(&self) -> U256 {
        self.raw
    }

    /// The raw integer value as a decimal string.
    pub fn raw_string(&self) -> String {
        self.raw.to_string()
    }

    /// The decimal count.
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Returns true if the raw value is zero.
    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// Re-express this amount at a higher decimal count without changing
    /// its numeric value. Scaling down would truncate, so it is not offered.
    pub fn rescale_up(&self, decimals: u8) -> Self {
        if decimals <= self.decimals {
            return *self;
        }
        FixedPointAmount {
            raw: self.raw * pow10(decimals - self.decimals),
            decimals,
        }
    }

    fn aligned(&self, other: &Self) -> (U256, U256, u8) {
        let decimals = self.decimals.max(other.decimals);
        (
            self.rescale_up(decimals).raw,
            other.rescale_up(decimals).raw,
            decimals,
        )
    }

    /// Add two amounts, expressed at the larger of the two decimal counts.
    pub fn add(&self, other: &Self) -> Self {
        let (a, b, decimals) = self.aligned(other);
        FixedPointAmount {
            raw: a + b,
            decimals,
        }
    }

    /// Subtract, returning `None` on underflow (amounts are unsigned).
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        let (a, b, decimals) = self.aligned(other);
        a.checked_sub(b).map(|raw| FixedPointAmount { raw, decimals })
    }

    /// Multiply two amounts, expressed at the larger of the two decimal
    /// counts. The product is truncated to that scale.
    pub fn mul(&self, other: &Self) -> Self {
        let (a, b, decimals) = self.aligned(other);
        FixedPointAmount {
            raw: a * b / pow10(decimals),
            decimals,
        }
    }

    /// Multiply by a plain integer count (e.g. an eligible-token tally).
    pub fn scale(&self, count: u64) -> Self {
        FixedPointAmount {
            raw: self.raw * U256::from(count),
            decimals: self.decimals,
        }
    }

    /// Divide, expressed at the larger of the two decimal counts.
    ///
    /// # Errors
    /// `DivisionByZero` when the divisor is zero.
    pub fn div(&self, other: &Self) -> Result<Self, CoreError> {
        let (a, b, decimals) = self.aligned(other);
        if b.is_zero() {
            return Err(CoreError::DivisionByZero);
        }
        Ok(FixedPointAmount {
            raw: a * pow10(decimals) / b,
            decimals,
        })
    }

    /// The multiplicative inverse at the same decimal count.
    ///
    /// # Errors
    /// `DivisionByZero` when this amount is zero.
    pub fn reciprocal(&self) -> Result<Self, CoreError> {
        Self::one(self.decimals).div(self)
    }

    /// Render the amount truncated to `display_decimals` fractional digits.
    ///
    /// Trailing fractional zeros are dropped; output is locale-independent
    /// with no grouping separators.
    pub fn format(&self, display_decimals: u8) -> String {
        if self.decimals == 0 {
            return self.raw.to_string();
        }
        let base = pow10(self.decimals);
        let integer = self.raw / base;
        let fraction = self.raw % base;

        let mut frac_str = fraction.to_string();
        // Left-pad to the full decimal width before truncating.
        while frac_str.len() < self.decimals as usize {
            frac_str.insert(0, '0');
        }
        frac_str.truncate(display_decimals as usize);
        let trimmed = frac_str.trim_end_matches('0');

        if trimmed.is_empty() {
            integer.to_string()
        } else {
            format!("{}.{}", integer, trimmed)
        }
    }
}

impl std::fmt::Display for FixedPointAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format(self.decimals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amt(raw: &str, decimals: u8) -> FixedPointAmount {
        FixedPointAmount::from_raw_str(raw, decimals).unwrap()
    }

    #[test]
    fn test_from_raw_str_valid() {
        let a = amt("1000000000000000000", 18);
        assert_eq!(a.decimals(), 18);
        assert_eq!(a.raw_string(), "1000000000000000000");
    }

    #[test]
    fn test_from_raw_str_rejects_garbage() {
        for bad in ["", "-5", "+5", "1.5", "1e18", "0x10", " 42"] {
            let result = FixedPointAmount::from_raw_str(bad, 18);
            assert!(
                matches!(result, Err(CoreError::InvalidNumberFormat(_))),
                "expected InvalidNumberFormat for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_from_raw_str_leading_zeros_ok() {
        assert_eq!(amt("000123", 6), amt("123", 6));
    }

    #[test]
    fn test_format_truncates_and_trims() {
        // 1.23456789 at 8 decimals
        let a = amt("123456789", 8);
        assert_eq!(a.format(4), "1.2345");
        assert_eq!(a.format(8), "1.23456789");
        assert_eq!(a.format(0), "1");

        // 1.50 at 2 decimals: trailing zero dropped
        let b = amt("150", 2);
        assert_eq!(b.format(2), "1.5");
    }

    #[test]
    fn test_format_small_fraction_pads_zeros() {
        // 0.000001 at 6 decimals
        let a = amt("1", 6);
        assert_eq!(a.format(6), "0.000001");
        assert_eq!(a.format(3), "0");
    }

    #[test]
    fn test_format_roundtrip() {
        // format(decimals) rescaled back to raw recovers the original value
        let a = amt("2500000", 6);
        let formatted = a.format(6);
        assert_eq!(formatted, "2.5");

        let (int_part, frac_part) = formatted.split_once('.').unwrap_or((&formatted, ""));
        let mut raw = frac_part.to_string();
        while raw.len() < 6 {
            raw.push('0');
        }
        let reparsed = amt(&format!("{}{}", int_part, raw), 6);
        assert_eq!(a, reparsed);
    }

    #[test]
    fn test_add_aligns_decimals() {
        // 1.0 at 6 decimals + 1.0 at 18 decimals = 2.0 at 18 decimals
        let a = amt("1000000", 6);
        let b = amt("1000000000000000000", 18);
        let sum = a.add(&b);
        assert_eq!(sum.decimals(), 18);
        assert_eq!(sum.raw_string(), "2000000000000000000");
    }

    #[test]
    fn test_checked_sub_underflow() {
        let a = amt("100", 6);
        let b = amt("200", 6);
        assert!(a.checked_sub(&b).is_none());
        assert_eq!(b.checked_sub(&a).unwrap().raw_string(), "100");
    }

    #[test]
    fn test_mul() {
        // 2.0 * 3.5 = 7.0 at 6 decimals
        let a = amt("2000000", 6);
        let b = amt("3500000", 6);
        assert_eq!(a.mul(&b).raw_string(), "7000000");
    }

    #[test]
    fn test_scale() {
        let a = amt("100000000000000000000", 18); // 100
        assert_eq!(a.scale(3).format(0), "300");
    }

    #[test]
    fn test_div_by_zero() {
        let a = amt("100", 6);
        let zero = FixedPointAmount::zero(6);
        assert_eq!(a.div(&zero), Err(CoreError::DivisionByZero));
        assert_eq!(zero.reciprocal(), Err(CoreError::DivisionByZero));
    }

    #[test]
    fn test_div() {
        // 10 / 4 = 2.5 at 6 decimals
        let a = amt("10000000", 6);
        let b = amt("4000000", 6);
        assert_eq!(a.div(&b).unwrap().format(6), "2.5");
    }

    #[test]
    fn test_reciprocal_symmetry() {
        // 1 / (1 / x) == x within truncation tolerance
        let x = amt("4000000000000000000", 18); // 4.0
        let inv = x.reciprocal().unwrap();
        assert_eq!(inv.format(18), "0.25");
        let back = inv.reciprocal().unwrap();
        assert_eq!(back.format(18), "4");
    }

    #[test]
    fn test_zero_raw_is_distinct_from_value() {
        let uncapped = FixedPointAmount::zero(18);
        assert!(uncapped.is_zero());
        assert_eq!(uncapped.format(4), "0");
    }

    #[test]
    fn test_display_uses_full_decimals() {
        let a = amt("1230000", 6);
        assert_eq!(a.to_string(), "1.23");
    }
}
