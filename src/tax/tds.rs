//! TDS (tax deducted at source) computation

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use super::gst::TaxComputation;

/// Withholding figures for one expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TdsComputation {
    /// Rate percentage used for the computation, 0 when TDS does not apply
    pub rate: BigDecimal,
    /// Amount withheld
    pub tds_amount: BigDecimal,
    /// Total amount minus the amount withheld
    pub payable_amount: BigDecimal,
}

impl TdsComputation {
    /// Compute TDS against the taxable base of `tax`, never its tax-inclusive total.
    ///
    /// The rate is held within `[0, 100]` so the payable amount cannot go
    /// negative.
    pub fn compute(tax: &TaxComputation, tds_applicable: bool, tds_percentage: &BigDecimal) -> Self {
        let rate = if tds_applicable {
            clamp_percentage(tds_percentage)
        } else {
            BigDecimal::from(0)
        };

        let tds_amount = (&tax.taxable_base * &rate) / BigDecimal::from(100);
        let payable_amount = &tax.total_amount - &tds_amount;

        Self {
            rate,
            tds_amount,
            payable_amount,
        }
    }
}

fn clamp_percentage(value: &BigDecimal) -> BigDecimal {
    if *value < BigDecimal::from(0) {
        BigDecimal::from(0)
    } else if *value > BigDecimal::from(100) {
        BigDecimal::from(100)
    } else {
        value.clone()
    }
}
