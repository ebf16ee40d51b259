//! Core types and data structures for expense financial computation

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Tax regime applied to an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TaxType {
    /// No tax - effective rate is always 0
    #[default]
    NoTax,
    /// State GST only
    #[serde(rename = "SGST")]
    Sgst,
    /// Central GST only
    #[serde(rename = "CGST")]
    Cgst,
    /// Intra-state supply split into CGST + SGST halves
    #[serde(rename = "CGST_SGST")]
    CgstSgst,
    /// Single combined GST rate
    #[serde(rename = "GST")]
    Gst,
    /// Integrated GST for inter-state supply
    #[serde(rename = "IGST")]
    Igst,
    /// Any other rate-based tax entered by hand
    Custom,
}

impl TaxType {
    /// All tax types, in the order a form would list them
    pub const ALL: [TaxType; 7] = [
        TaxType::NoTax,
        TaxType::Sgst,
        TaxType::Cgst,
        TaxType::CgstSgst,
        TaxType::Gst,
        TaxType::Igst,
        TaxType::Custom,
    ];

    /// Whether the total rate is made of separate CGST and SGST halves
    pub fn is_split(&self) -> bool {
        matches!(self, TaxType::CgstSgst)
    }

    /// Label used in payloads and configuration
    pub fn label(&self) -> &'static str {
        match self {
            TaxType::NoTax => "NoTax",
            TaxType::Sgst => "SGST",
            TaxType::Cgst => "CGST",
            TaxType::CgstSgst => "CGST_SGST",
            TaxType::Gst => "GST",
            TaxType::Igst => "IGST",
            TaxType::Custom => "Custom",
        }
    }
}

impl fmt::Display for TaxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaxType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaxType::ALL
            .into_iter()
            .find(|tax_type| tax_type.label() == s)
            .ok_or_else(|| format!("unknown tax type: {}", s))
    }
}

/// Payment status of an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Nothing paid yet
    #[default]
    Unpaid,
    /// Some, but not all, of the payable amount has been paid
    PartiallyPaid,
    /// The full payable amount has been paid
    Paid,
}

impl PaymentStatus {
    /// Whether this status requires a payment profile to be selected
    pub fn requires_payment_profile(&self) -> bool {
        !matches!(self, PaymentStatus::Unpaid)
    }
}

/// User-entered financial values of an expense draft.
///
/// The engine never keeps a reference to this; every call receives a full
/// snapshot and returns a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseFinancialInput {
    /// The figure typed into the amount field; tax-inclusive or not per `tax_inclusive`
    pub entered_amount: BigDecimal,
    /// Whether `entered_amount` already contains tax
    pub tax_inclusive: bool,
    /// Tax regime
    pub tax_type: TaxType,
    /// Total tax rate percentage
    pub tax_percentage: BigDecimal,
    /// Central GST rate percentage
    pub cgst_percentage: BigDecimal,
    /// State GST rate percentage
    pub sgst_percentage: BigDecimal,
    /// Whether tax is deducted at source
    pub tds_applicable: bool,
    /// TDS rate percentage, applied to the taxable base
    pub tds_percentage: BigDecimal,
    /// Payment status
    pub payment_status: PaymentStatus,
    /// Amount already paid
    pub paid_amount: BigDecimal,
    /// Payment profile used to pay; required unless unpaid
    pub payment_profile_id: Option<Uuid>,
}

impl Default for ExpenseFinancialInput {
    fn default() -> Self {
        Self {
            entered_amount: BigDecimal::from(0),
            tax_inclusive: false,
            tax_type: TaxType::NoTax,
            tax_percentage: BigDecimal::from(0),
            cgst_percentage: BigDecimal::from(0),
            sgst_percentage: BigDecimal::from(0),
            tds_applicable: false,
            tds_percentage: BigDecimal::from(0),
            payment_status: PaymentStatus::Unpaid,
            paid_amount: BigDecimal::from(0),
            payment_profile_id: None,
        }
    }
}

/// Monetary figures derived from an [`ExpenseFinancialInput`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseFinancialDerived {
    /// Pre-tax amount
    pub taxable_base: BigDecimal,
    /// Tax on the taxable base
    pub tax_amount: BigDecimal,
    /// Taxable base plus tax
    pub total_amount: BigDecimal,
    /// Tax deducted at source
    pub tds_amount: BigDecimal,
    /// Total minus TDS
    pub payable_amount: BigDecimal,
    /// Payable minus paid
    pub due_amount: BigDecimal,
}

impl ExpenseFinancialDerived {
    /// Round every figure to `scale` fractional digits
    pub fn rounded(&self, scale: i64) -> Self {
        Self {
            taxable_base: self.taxable_base.round(scale),
            tax_amount: self.tax_amount.round(scale),
            total_amount: self.total_amount.round(scale),
            tds_amount: self.tds_amount.round(scale),
            payable_amount: self.payable_amount.round(scale),
            due_amount: self.due_amount.round(scale),
        }
    }
}

/// Logical form section a validation rule belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormSection {
    /// Amount and general details
    Basic,
    /// Tax regime, rates and TDS
    Tax,
    /// Payment status, paid amount and profile
    Payment,
}

/// A single field-level validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    /// Name of the offending field, as used in the payload
    pub field: String,
    /// Section the field lives in
    pub section: FormSection,
    /// Human-readable message
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, section: FormSection, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            section,
            message: message.into(),
        }
    }
}

/// Section the user should be routed to first, if there are any errors.
///
/// Sections are visited in form order: basic, tax, payment.
pub fn first_error_section(errors: &[FieldError]) -> Option<FormSection> {
    errors.iter().map(|e| e.section).min()
}

/// Result of one full recomputation pass
#[derive(Debug, Clone, PartialEq)]
pub struct Recomputation {
    /// Snapshot after side effects and payment reconciliation
    pub input: ExpenseFinancialInput,
    /// Derived figures for `input`
    pub derived: ExpenseFinancialDerived,
    /// Every validation finding for `input`
    pub errors: Vec<FieldError>,
}

impl Recomputation {
    /// Whether the snapshot can be submitted
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Flat persistence payload: raw inputs plus derived figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpensePayload {
    #[serde(flatten)]
    pub input: ExpenseFinancialInput,
    #[serde(flatten)]
    pub derived: ExpenseFinancialDerived,
}

impl ExpensePayload {
    /// Build a payload with monetary figures rounded to `scale` digits
    pub fn new(mut input: ExpenseFinancialInput, derived: &ExpenseFinancialDerived, scale: i64) -> Self {
        input.entered_amount = input.entered_amount.round(scale);
        input.paid_amount = input.paid_amount.round(scale);
        Self {
            input,
            derived: derived.rounded(scale),
        }
    }
}

/// A submitted expense as handed to storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    /// Unique identifier for the expense
    pub id: Uuid,
    /// Inputs and derived figures
    #[serde(flatten)]
    pub payload: ExpensePayload,
    /// When the expense was last submitted
    pub submitted_at: NaiveDateTime,
}

/// Errors that can occur outside of field validation
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("Expense has {} validation error(s)", .0.len())]
    Validation(Vec<FieldError>),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Expense not found: {0}")]
    ExpenseNotFound(Uuid),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
