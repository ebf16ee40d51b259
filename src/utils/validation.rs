//! Field-level validation of expense financial inputs

use bigdecimal::BigDecimal;

use crate::payment::{PaymentState, PaymentStateMachine, PaymentTrigger};
use crate::types::*;

/// Field names as they appear in the persistence payload
pub mod fields {
    pub const TAXABLE_AMOUNT: &str = "taxableAmount";
    pub const TAX_PERCENTAGE: &str = "taxPercentage";
    pub const CGST_PERCENTAGE: &str = "cgstPercentage";
    pub const SGST_PERCENTAGE: &str = "sgstPercentage";
    pub const TDS_PERCENTAGE: &str = "tdsPercentage";
    pub const PAID_AMOUNT: &str = "paidAmount";
    pub const PAYMENT_PROFILE_ID: &str = "paymentProfileId";
}

/// Validate that an amount is positive
pub fn validate_positive_amount(
    amount: &BigDecimal,
    field: &str,
    section: FormSection,
    errors: &mut Vec<FieldError>,
) {
    if *amount <= BigDecimal::from(0) {
        errors.push(FieldError::new(field, section, "Amount must be greater than 0"));
    }
}

/// Validate that a rate percentage lies within `[0, 100]`
pub fn validate_percentage(rate: &BigDecimal, field: &str, errors: &mut Vec<FieldError>) {
    if *rate < BigDecimal::from(0) {
        errors.push(FieldError::new(
            field,
            FormSection::Tax,
            "Percentage cannot be negative",
        ));
    } else if *rate > BigDecimal::from(100) {
        errors.push(FieldError::new(
            field,
            FormSection::Tax,
            "Percentage cannot exceed 100",
        ));
    }
}

/// Check the amount entered in the basic section
pub fn validate_basic(input: &ExpenseFinancialInput, errors: &mut Vec<FieldError>) {
    validate_positive_amount(
        &input.entered_amount,
        fields::TAXABLE_AMOUNT,
        FormSection::Basic,
        errors,
    );
}

/// Check the rate fields that apply to the current tax type, and the TDS rate
pub fn validate_tax(input: &ExpenseFinancialInput, errors: &mut Vec<FieldError>) {
    match input.tax_type {
        TaxType::NoTax => {}
        TaxType::Sgst => validate_percentage(&input.sgst_percentage, fields::SGST_PERCENTAGE, errors),
        TaxType::Cgst => validate_percentage(&input.cgst_percentage, fields::CGST_PERCENTAGE, errors),
        TaxType::CgstSgst => {
            validate_percentage(&input.cgst_percentage, fields::CGST_PERCENTAGE, errors);
            validate_percentage(&input.sgst_percentage, fields::SGST_PERCENTAGE, errors);

            let split_total = &input.cgst_percentage + &input.sgst_percentage;
            if split_total != input.tax_percentage {
                errors.push(FieldError::new(
                    fields::TAX_PERCENTAGE,
                    FormSection::Tax,
                    format!(
                        "Tax percentage must equal CGST + SGST: {} != {}",
                        input.tax_percentage, split_total
                    ),
                ));
            }
            if split_total > BigDecimal::from(100) {
                errors.push(FieldError::new(
                    fields::TAX_PERCENTAGE,
                    FormSection::Tax,
                    "Combined CGST + SGST percentage cannot exceed 100",
                ));
            }
        }
        TaxType::Gst | TaxType::Igst | TaxType::Custom => {
            validate_percentage(&input.tax_percentage, fields::TAX_PERCENTAGE, errors)
        }
    }

    if input.tds_applicable {
        validate_percentage(&input.tds_percentage, fields::TDS_PERCENTAGE, errors);
    }
}

/// Check payment fields against the status and the derived payable amount.
///
/// The rules run on the payment state as [`compute_derived`](crate::compute_derived)
/// reconciles it, so a raw snapshot (UNPAID with an amount typed in, or a
/// partial amount covering the payable figure) is judged by the status it
/// resolves to.
pub fn validate_payment(
    input: &ExpenseFinancialInput,
    derived: &ExpenseFinancialDerived,
    errors: &mut Vec<FieldError>,
) {
    let payment = PaymentStateMachine::reconcile(
        &derived.payable_amount,
        PaymentState::from_input(input),
        PaymentTrigger::Recompute,
    );

    if payment.status.requires_payment_profile() && payment.payment_profile_id.is_none() {
        errors.push(FieldError::new(
            fields::PAYMENT_PROFILE_ID,
            FormSection::Payment,
            "Payment profile is required",
        ));
    }

    if payment.status == PaymentStatus::PartiallyPaid {
        if payment.paid_amount <= BigDecimal::from(0) {
            errors.push(FieldError::new(
                fields::PAID_AMOUNT,
                FormSection::Payment,
                "Paid amount must be greater than 0",
            ));
        } else if payment.paid_amount >= derived.payable_amount {
            errors.push(FieldError::new(
                fields::PAID_AMOUNT,
                FormSection::Payment,
                format!(
                    "Paid amount must be less than payable amount {}",
                    derived.payable_amount
                ),
            ));
        }
    }
}

/// Run every rule and return all findings, in form order
pub fn validate(input: &ExpenseFinancialInput, derived: &ExpenseFinancialDerived) -> Vec<FieldError> {
    let mut errors = Vec::new();
    validate_basic(input, &mut errors);
    validate_tax(input, &mut errors);
    validate_payment(input, derived, &mut errors);
    errors
}
