//! Order total arithmetic.
//!
//! Monetary amounts are `rust_decimal::Decimal` end to end (NUMERIC in the
//! store), so totals never accumulate binary floating point error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A cart line joined with the unit price in effect when it was read.
///
/// The quantity is kept as `i32` to match the storage type; negative
/// quantities never occur in practice but are tolerated by the arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedLine {
    /// Unit price of the product (list price).
    pub unit_price: Decimal,
    /// Units of the product in the cart.
    pub quantity: i32,
}

/// Compute the total of a single line: unit price × quantity.
#[must_use]
pub fn line_total(line: &PricedLine) -> Decimal {
    line.unit_price * Decimal::from(line.quantity)
}

/// Compute an order total: Σ(unit price × quantity) over all lines.
///
/// An empty iterator yields zero; callers decide whether an empty cart is
/// an error.
#[must_use]
pub fn order_total<'a, I>(lines: I) -> Decimal
where
    I: IntoIterator<Item = &'a PricedLine>,
{
    lines.into_iter().map(line_total).sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(mantissa: i64, scale: u32) -> Decimal {
        Decimal::new(mantissa, scale)
    }

    #[test]
    fn test_line_total() {
        let line = PricedLine {
            unit_price: dec(35, 1), // 3.5
            quantity: 2,
        };
        assert_eq!(line_total(&line), dec(70, 1)); // 7.0
    }

    #[test]
    fn test_order_total_two_lines() {
        let lines = [
            PricedLine {
                unit_price: dec(35, 1), // 3.5
                quantity: 2,
            },
            PricedLine {
                unit_price: dec(60, 1), // 6.0
                quantity: 1,
            },
        ];
        assert_eq!(order_total(&lines), dec(130, 1)); // 13.0
    }

    #[test]
    fn test_order_total_empty_is_zero() {
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_order_total_no_float_drift() {
        // 0.1 ten times is exactly 1.0 in decimal arithmetic
        let lines = vec![
            PricedLine {
                unit_price: dec(1, 1),
                quantity: 1,
            };
            10
        ];
        assert_eq!(order_total(&lines), Decimal::ONE);
    }
}
