//! GST rate selection and tax-inclusive/exclusive computation

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{ExpenseFinancialInput, TaxType};

/// Rate percentages as stored on an expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRates {
    /// Total tax rate percentage
    pub tax_percentage: BigDecimal,
    /// CGST rate percentage (Central GST)
    pub cgst_percentage: BigDecimal,
    /// SGST rate percentage (State GST)
    pub sgst_percentage: BigDecimal,
}

impl TaxRates {
    /// Rates of an intra-state supply: the total split evenly into CGST and SGST
    pub fn intra_state(total_rate: BigDecimal) -> Self {
        let half_rate = &total_rate / BigDecimal::from(2);
        Self {
            tax_percentage: total_rate,
            cgst_percentage: half_rate.clone(),
            sgst_percentage: half_rate,
        }
    }

    /// Rates where only the total is meaningful
    pub fn single(total_rate: BigDecimal) -> Self {
        Self {
            tax_percentage: total_rate,
            cgst_percentage: BigDecimal::from(0),
            sgst_percentage: BigDecimal::from(0),
        }
    }

    pub fn from_input(input: &ExpenseFinancialInput) -> Self {
        Self {
            tax_percentage: input.tax_percentage.clone(),
            cgst_percentage: input.cgst_percentage.clone(),
            sgst_percentage: input.sgst_percentage.clone(),
        }
    }

    /// The rate that applies under `tax_type`.
    ///
    /// | tax type            | source            |
    /// |---------------------|-------------------|
    /// | NoTax               | 0                 |
    /// | SGST                | `sgst_percentage` |
    /// | CGST                | `cgst_percentage` |
    /// | CGST_SGST           | `tax_percentage`  |
    /// | GST / IGST / Custom | `tax_percentage`  |
    pub fn effective_rate(&self, tax_type: TaxType) -> BigDecimal {
        match tax_type {
            TaxType::NoTax => BigDecimal::from(0),
            TaxType::Sgst => self.sgst_percentage.clone(),
            TaxType::Cgst => self.cgst_percentage.clone(),
            TaxType::CgstSgst | TaxType::Gst | TaxType::Igst | TaxType::Custom => {
                self.tax_percentage.clone()
            }
        }
    }

    /// Sum of the CGST and SGST halves
    pub fn split_total(&self) -> BigDecimal {
        &self.cgst_percentage + &self.sgst_percentage
    }
}

/// Default total rate per tax type, consulted only when the tax type changes
///
/// Serialized as a map keyed by tax type label (`"GST"`, `"CGST_SGST"`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "HashMap<String, BigDecimal>",
    into = "HashMap<String, BigDecimal>"
)]
pub struct DefaultRateTable {
    rates: HashMap<TaxType, BigDecimal>,
}

impl TryFrom<HashMap<String, BigDecimal>> for DefaultRateTable {
    type Error = String;

    fn try_from(raw: HashMap<String, BigDecimal>) -> Result<Self, Self::Error> {
        let mut table = Self::empty();
        for (label, rate) in raw {
            table.set_rate(label.parse()?, rate);
        }
        Ok(table)
    }
}

impl From<DefaultRateTable> for HashMap<String, BigDecimal> {
    fn from(table: DefaultRateTable) -> Self {
        table
            .rates
            .into_iter()
            .map(|(tax_type, rate)| (tax_type.to_string(), rate))
            .collect()
    }
}

impl DefaultRateTable {
    /// An empty table; every tax type defaults to 0
    pub fn empty() -> Self {
        Self {
            rates: HashMap::new(),
        }
    }

    /// Default rate for `tax_type`, 0 when none is configured
    pub fn rate(&self, tax_type: TaxType) -> BigDecimal {
        self.rates
            .get(&tax_type)
            .cloned()
            .unwrap_or_else(|| BigDecimal::from(0))
    }

    pub fn set_rate(&mut self, tax_type: TaxType, rate: BigDecimal) {
        self.rates.insert(tax_type, rate);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TaxType, &BigDecimal)> {
        self.rates.iter()
    }

    /// Rates a freshly switched-to tax type starts with
    pub fn rates_for(&self, tax_type: TaxType) -> TaxRates {
        let rate = self.rate(tax_type);
        match tax_type {
            TaxType::NoTax => TaxRates::single(BigDecimal::from(0)),
            TaxType::CgstSgst => TaxRates::intra_state(rate),
            TaxType::Sgst => TaxRates {
                tax_percentage: rate.clone(),
                cgst_percentage: BigDecimal::from(0),
                sgst_percentage: rate,
            },
            TaxType::Cgst => TaxRates {
                tax_percentage: rate.clone(),
                cgst_percentage: rate,
                sgst_percentage: BigDecimal::from(0),
            },
            TaxType::Gst | TaxType::Igst | TaxType::Custom => TaxRates::single(rate),
        }
    }
}

impl Default for DefaultRateTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.set_rate(TaxType::NoTax, BigDecimal::from(0));
        table.set_rate(TaxType::Sgst, BigDecimal::from(9));
        table.set_rate(TaxType::Cgst, BigDecimal::from(9));
        table.set_rate(TaxType::CgstSgst, BigDecimal::from(18));
        table.set_rate(TaxType::Gst, BigDecimal::from(18));
        table.set_rate(TaxType::Igst, BigDecimal::from(18));
        table.set_rate(TaxType::Custom, BigDecimal::from(0));
        table
    }
}

/// Switch `input` to `tax_type`, resetting its rates from the default table.
///
/// Prior custom rates are discarded even when switching back to a type used
/// earlier.
pub fn switch_tax_type(input: &mut ExpenseFinancialInput, tax_type: TaxType, defaults: &DefaultRateTable) {
    let rates = defaults.rates_for(tax_type);
    input.tax_type = tax_type;
    input.tax_percentage = rates.tax_percentage;
    input.cgst_percentage = rates.cgst_percentage;
    input.sgst_percentage = rates.sgst_percentage;
}

/// Re-derive `tax_percentage` from the component rate(s) of the current tax type.
///
/// GST, IGST and Custom take `tax_percentage` as their source and are left
/// untouched.
pub fn sync_total_rate(input: &mut ExpenseFinancialInput) {
    match input.tax_type {
        TaxType::NoTax => input.tax_percentage = BigDecimal::from(0),
        TaxType::Sgst => input.tax_percentage = input.sgst_percentage.clone(),
        TaxType::Cgst => input.tax_percentage = input.cgst_percentage.clone(),
        TaxType::CgstSgst => {
            input.tax_percentage = &input.cgst_percentage + &input.sgst_percentage;
        }
        TaxType::Gst | TaxType::Igst | TaxType::Custom => {}
    }
}

/// Set the total rate; under CGST_SGST the total is split evenly into halves
pub fn set_total_rate(input: &mut ExpenseFinancialInput, rate: BigDecimal) {
    if input.tax_type.is_split() {
        let rates = TaxRates::intra_state(rate);
        input.cgst_percentage = rates.cgst_percentage;
        input.sgst_percentage = rates.sgst_percentage;
        input.tax_percentage = rates.tax_percentage;
    } else {
        input.tax_percentage = rate;
        sync_total_rate(input);
    }
}

/// Tax figures for one amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxComputation {
    /// Pre-tax amount
    pub taxable_base: BigDecimal,
    /// Rate percentage used for the computation
    pub rate: BigDecimal,
    /// Tax on the taxable base
    pub tax_amount: BigDecimal,
    /// Taxable base plus tax
    pub total_amount: BigDecimal,
}

impl TaxComputation {
    /// Compute tax on top of a pre-tax amount
    pub fn exclusive(base_amount: BigDecimal, rate: BigDecimal) -> Self {
        let base_amount = non_negative(base_amount);
        let rate = non_negative(rate);

        let tax_amount = (&base_amount * &rate) / BigDecimal::from(100);
        let total_amount = &base_amount + &tax_amount;

        Self {
            taxable_base: base_amount,
            rate,
            tax_amount,
            total_amount,
        }
    }

    /// Split a tax-inclusive amount into base and tax
    pub fn inclusive(total_amount: BigDecimal, rate: BigDecimal) -> Self {
        let total_amount = non_negative(total_amount);
        let rate = non_negative(rate);

        if rate == BigDecimal::from(0) {
            return Self {
                taxable_base: total_amount.clone(),
                rate,
                tax_amount: BigDecimal::from(0),
                total_amount,
            };
        }

        let divisor = BigDecimal::from(100) + &rate;
        let taxable_base = (&total_amount * BigDecimal::from(100)) / divisor;
        let tax_amount = &total_amount - &taxable_base;

        Self {
            taxable_base,
            rate,
            tax_amount,
            total_amount,
        }
    }

    /// Compute tax figures for an expense snapshot
    pub fn compute(input: &ExpenseFinancialInput) -> Self {
        let rate = TaxRates::from_input(input).effective_rate(input.tax_type);
        if input.tax_inclusive {
            Self::inclusive(input.entered_amount.clone(), rate)
        } else {
            Self::exclusive(input.entered_amount.clone(), rate)
        }
    }
}

/// Negative amounts and rates are computed as 0; validation reports them
pub(crate) fn non_negative(value: BigDecimal) -> BigDecimal {
    if value < BigDecimal::from(0) {
        BigDecimal::from(0)
    } else {
        value
    }
}
