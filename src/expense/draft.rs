//! Expense drafts and the edits applied to them

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::expense::ExpenseEngine;
use crate::payment::PaymentTrigger;
use crate::tax::{self, DefaultRateTable};
use crate::types::*;

/// A single user edit to an expense form
#[derive(Debug, Clone, PartialEq)]
pub enum ExpenseEdit {
    EnteredAmount(BigDecimal),
    TaxInclusive(bool),
    TaxType(TaxType),
    TaxPercentage(BigDecimal),
    CgstPercentage(BigDecimal),
    SgstPercentage(BigDecimal),
    TdsApplicable(bool),
    TdsPercentage(BigDecimal),
    PaymentStatus(PaymentStatus),
    PaidAmount(BigDecimal),
    PaymentProfile(Option<Uuid>),
}

impl ExpenseEdit {
    /// Write the edit into `input` along with its immediate side effects.
    ///
    /// Returns the trigger the payment state machine must reconcile with.
    pub(crate) fn apply_to(
        self,
        input: &mut ExpenseFinancialInput,
        defaults: &DefaultRateTable,
    ) -> PaymentTrigger {
        match self {
            ExpenseEdit::EnteredAmount(amount) => input.entered_amount = amount,
            ExpenseEdit::TaxInclusive(inclusive) => input.tax_inclusive = inclusive,
            ExpenseEdit::TaxType(tax_type) => {
                if tax_type != input.tax_type {
                    tax::switch_tax_type(input, tax_type, defaults);
                }
            }
            ExpenseEdit::TaxPercentage(rate) => tax::set_total_rate(input, rate),
            ExpenseEdit::CgstPercentage(rate) => {
                input.cgst_percentage = rate;
                tax::sync_total_rate(input);
            }
            ExpenseEdit::SgstPercentage(rate) => {
                input.sgst_percentage = rate;
                tax::sync_total_rate(input);
            }
            ExpenseEdit::TdsApplicable(applicable) => {
                input.tds_applicable = applicable;
                if !applicable {
                    input.tds_percentage = BigDecimal::from(0);
                }
            }
            ExpenseEdit::TdsPercentage(rate) => {
                if input.tds_applicable {
                    input.tds_percentage = rate;
                } else {
                    debug!(tds_percentage = %rate, "ignoring TDS rate while TDS is not applicable");
                }
            }
            ExpenseEdit::PaymentStatus(status) => {
                input.payment_status = status;
                return PaymentTrigger::StatusSet;
            }
            ExpenseEdit::PaidAmount(amount) => {
                input.paid_amount = amount;
                return PaymentTrigger::PaidAmountEdited;
            }
            ExpenseEdit::PaymentProfile(profile) => input.payment_profile_id = profile,
        }
        PaymentTrigger::Recompute
    }
}

/// An expense being created or edited.
///
/// Dropping a draft discards it; only [`ExpenseRegister::submit`](crate::ExpenseRegister::submit)
/// persists anything.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    expense_id: Option<Uuid>,
    opened_at: NaiveDateTime,
    state: Recomputation,
}

impl ExpenseDraft {
    /// Open a blank draft: no tax, exclusive, unpaid
    pub fn new(engine: &ExpenseEngine) -> Self {
        Self {
            expense_id: None,
            opened_at: chrono::Utc::now().naive_utc(),
            state: engine.recompute(ExpenseFinancialInput::default()),
        }
    }

    /// Open a draft for editing a submitted expense
    pub fn from_record(engine: &ExpenseEngine, record: &ExpenseRecord) -> Self {
        Self {
            expense_id: Some(record.id),
            opened_at: chrono::Utc::now().naive_utc(),
            state: engine.recompute(record.payload.input.clone()),
        }
    }

    /// Apply one edit and recompute
    pub fn apply(&mut self, engine: &ExpenseEngine, edit: ExpenseEdit) -> &Recomputation {
        self.state = engine.apply_edit(&self.state.input, edit);
        &self.state
    }

    /// Id of the submitted expense this draft edits, if any
    pub fn expense_id(&self) -> Option<Uuid> {
        self.expense_id
    }

    pub fn opened_at(&self) -> NaiveDateTime {
        self.opened_at
    }

    pub fn input(&self) -> &ExpenseFinancialInput {
        &self.state.input
    }

    pub fn derived(&self) -> &ExpenseFinancialDerived {
        &self.state.derived
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.state.errors
    }

    /// Latest recomputation
    pub fn state(&self) -> &Recomputation {
        &self.state
    }
}
