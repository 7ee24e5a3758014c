//! Normalization of the vendor's quantity and price cells.

use crate::constants::{
    QUANTITY_LAST_UNIT_STOCK, QUANTITY_LAST_UNIT_TOKEN, QUANTITY_MANY_STOCK, QUANTITY_MANY_TOKEN,
};
use crate::errors::{Error, Result};
use crate::models::RawValue;

/// Maps the vendor quantity cell to a stock count.
///
/// Rules, checked against the cell's string form in order:
/// 1. `">10"` becomes 100
/// 2. `"1"` becomes 0 (last unit, treated as unavailable)
/// 3. numeric cells are truncated toward zero; text must parse as a
///    non-negative integer once surrounding whitespace is removed
pub fn normalize_quantity(token: &RawValue) -> Result<u32> {
    let raw = token.to_string();

    if raw == QUANTITY_MANY_TOKEN {
        return Ok(QUANTITY_MANY_STOCK);
    }
    if raw == QUANTITY_LAST_UNIT_TOKEN {
        return Ok(QUANTITY_LAST_UNIT_STOCK);
    }

    match token {
        RawValue::Float(value)
            if value.is_finite() && *value >= 0.0 && *value < f64::from(u32::MAX) + 1.0 =>
        {
            Ok(value.trunc() as u32)
        }
        RawValue::Float(_) => Err(Error::InvalidQuantity(raw)),
        _ => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| Error::InvalidQuantity(raw.clone())),
    }
}

/// Converts the vendor price cell to whole currency units.
///
/// Keeps everything before the first `.` and drops every non-digit, so
/// `"5'990.00 руб."` becomes 5990. A cell without a decimal point keeps all of
/// its digit groups: `"5'990 00"` becomes 599000.
pub fn normalize_price(price: &RawValue) -> Result<u64> {
    let raw = price.to_string();
    let integer_part = raw.split('.').next().unwrap_or_default();
    let digits: String = integer_part.chars().filter(|c| c.is_ascii_digit()).collect();

    digits.parse::<u64>().map_err(|_| Error::InvalidPrice(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_quantity(quantity: impl Into<RawValue>) -> RawValue {
        quantity.into()
    }

    fn with_price(price: impl Into<RawValue>) -> RawValue {
        price.into()
    }

    #[test]
    fn test_quantity_many_sentinel() {
        assert_eq!(normalize_quantity(&with_quantity(">10")).unwrap(), 100);
    }

    #[test]
    fn test_quantity_last_unit_sentinel() {
        assert_eq!(normalize_quantity(&with_quantity("1")).unwrap(), 0);
        assert_eq!(normalize_quantity(&with_quantity(1i64)).unwrap(), 0);
        assert_eq!(normalize_quantity(&with_quantity(1.0)).unwrap(), 0);
    }

    #[test]
    fn test_quantity_plain_integer() {
        assert_eq!(normalize_quantity(&with_quantity("7")).unwrap(), 7);
        assert_eq!(normalize_quantity(&with_quantity(4.0)).unwrap(), 4);
        assert_eq!(normalize_quantity(&with_quantity("0")).unwrap(), 0);
    }

    #[test]
    fn test_quantity_non_numeric_fails() {
        let err = normalize_quantity(&with_quantity("abc")).unwrap_err();
        assert_eq!(err, Error::InvalidQuantity("abc".to_string()));
    }

    #[test]
    fn test_quantity_rejects_negative_and_empty() {
        assert!(normalize_quantity(&with_quantity("-3")).is_err());
        assert!(normalize_quantity(&with_quantity(-2.0)).is_err());
        assert!(normalize_quantity(&with_quantity(RawValue::Empty)).is_err());
        assert!(normalize_quantity(&with_quantity("   ")).is_err());
        assert!(normalize_quantity(&with_quantity("2.5")).is_err());
    }

    #[test]
    fn test_quantity_text_is_trimmed() {
        assert_eq!(normalize_quantity(&with_quantity(" 7")).unwrap(), 7);
        assert_eq!(normalize_quantity(&with_quantity("7 ")).unwrap(), 7);
        assert_eq!(
            normalize_quantity(&with_quantity(" >10")).unwrap_err(),
            Error::InvalidQuantity(" >10".to_string())
        );
    }

    #[test]
    fn test_quantity_numeric_fraction_truncates() {
        assert_eq!(normalize_quantity(&with_quantity(2.5)).unwrap(), 2);
        assert_eq!(normalize_quantity(&with_quantity(0.9)).unwrap(), 0);
        assert!(normalize_quantity(&with_quantity(f64::NAN)).is_err());
    }

    #[test]
    fn test_price_strips_separators_and_suffix() {
        assert_eq!(normalize_price(&with_price("5'990.00 руб.")).unwrap(), 5990);
        assert_eq!(normalize_price(&with_price("100.50")).unwrap(), 100);
        assert_eq!(normalize_price(&with_price("3'000.00 руб.")).unwrap(), 3000);
    }

    #[test]
    fn test_price_numeric_cell() {
        assert_eq!(normalize_price(&with_price(5990.0)).unwrap(), 5990);
        assert_eq!(normalize_price(&with_price(5990.75)).unwrap(), 5990);
    }

    /// Without a decimal point every digit group is concatenated. Preserved
    /// as-is; flagged here so a change in behavior is a conscious one.
    #[test]
    fn test_price_without_decimal_point_concatenates_groups() {
        assert_eq!(normalize_price(&with_price("5'990 00")).unwrap(), 599000);
    }

    #[test]
    fn test_price_without_digits_fails() {
        let err = normalize_price(&with_price("руб.")).unwrap_err();
        assert!(matches!(err, Error::InvalidPrice(_)));
        assert!(normalize_price(&with_price(RawValue::Empty)).is_err());
    }
}
