//! Shared monetary computation.
//!
//! All amounts are `rust_decimal::Decimal`, exact to the precision of their
//! inputs. VAT is a flat illustration rate; the extension is computed in a
//! single step with no intermediate rounding, so totals are re-derivable
//! byte-for-byte from the line amounts at any time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Flat VAT rate (21%).
pub const VAT_RATE: Decimal = Decimal::from_parts(21, 0, 0, false, 2);

/// Cached order totals: always a pure function of the line totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub ex_vat: Decimal,
    pub vat_amount: Decimal,
    pub inc_vat: Decimal,
}

impl OrderTotals {
    /// Derive totals from line totals: ex-VAT sum, VAT extension, inc-VAT.
    pub fn from_line_totals<I: IntoIterator<Item = Decimal>>(line_totals: I) -> Self {
        let ex_vat: Decimal = line_totals.into_iter().sum();
        let vat_amount = ex_vat * VAT_RATE;
        Self {
            ex_vat,
            vat_amount,
            inc_vat: ex_vat + vat_amount,
        }
    }

    pub fn zero() -> Self {
        Self::from_line_totals(std::iter::empty())
    }
}

/// Line total: unit price × quantity, decimal-exact.
pub fn line_total(unit_price: Decimal, quantity: i64) -> Decimal {
    unit_price * Decimal::from(quantity)
}
