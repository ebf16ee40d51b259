//! Payment status state machine
//!
//! ```text
//! UNPAID ──paid > 0──▶ PARTIALLY_PAID ──paid >= payable──▶ PAID
//!    ▲                       │                              │
//!    └────────paid = 0───────┴──────────────────────────────┘
//! ```
//!
//! Status and paid amount drive each other. Every recomputation runs a
//! single [`PaymentStateMachine::reconcile`] step with a [`PaymentTrigger`]
//! naming what changed; an explicit status edit wins over the transition the
//! paid amount alone would imply.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::tax::gst::non_negative;
use crate::types::{ExpenseFinancialInput, PaymentStatus};

/// Payment fields of an expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentState {
    pub status: PaymentStatus,
    pub paid_amount: BigDecimal,
    pub payment_profile_id: Option<Uuid>,
}

impl PaymentState {
    pub fn from_input(input: &ExpenseFinancialInput) -> Self {
        Self {
            status: input.payment_status,
            paid_amount: input.paid_amount.clone(),
            payment_profile_id: input.payment_profile_id,
        }
    }

    /// Write this state back into `input`
    pub fn apply_to(self, input: &mut ExpenseFinancialInput) {
        input.payment_status = self.status;
        input.paid_amount = self.paid_amount;
        input.payment_profile_id = self.payment_profile_id;
    }

    fn unpaid(payment_profile_id: Option<Uuid>) -> Self {
        if payment_profile_id.is_some() {
            warn!("payment profile cleared for unpaid expense");
        }
        Self {
            status: PaymentStatus::Unpaid,
            paid_amount: BigDecimal::from(0),
            payment_profile_id: None,
        }
    }
}

/// What changed since the last reconciled snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentTrigger {
    /// The caller set the status explicitly
    StatusSet,
    /// The caller edited the paid amount
    PaidAmountEdited,
    /// Anything else: payable amount changed, or a raw snapshot is recomputed
    Recompute,
}

/// Enforces legal `(status, paid amount)` combinations against a payable amount
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentStateMachine;

impl PaymentStateMachine {
    /// Reconcile `state` with `payable_amount`.
    ///
    /// The returned state always satisfies `0 <= paid_amount <= payable_amount`,
    /// `Paid => paid_amount == payable_amount` and
    /// `Unpaid => paid_amount == 0 && payment_profile_id.is_none()`.
    pub fn reconcile(
        payable_amount: &BigDecimal,
        state: PaymentState,
        trigger: PaymentTrigger,
    ) -> PaymentState {
        let payable = non_negative(payable_amount.clone());

        match trigger {
            PaymentTrigger::StatusSet => Self::on_status_set(&payable, state),
            PaymentTrigger::PaidAmountEdited => Self::on_paid_amount_edited(&payable, state),
            PaymentTrigger::Recompute => Self::on_recompute(&payable, state),
        }
    }

    fn on_status_set(payable: &BigDecimal, state: PaymentState) -> PaymentState {
        match state.status {
            PaymentStatus::Unpaid => PaymentState::unpaid(state.payment_profile_id),
            PaymentStatus::Paid => PaymentState {
                paid_amount: payable.clone(),
                ..state
            },
            // an amount already covering the payable figure is clamped by
            // promoting to paid; nothing entered yet stays partially paid
            PaymentStatus::PartiallyPaid => Self::reclamp_partial(payable, state),
        }
    }

    fn on_paid_amount_edited(payable: &BigDecimal, state: PaymentState) -> PaymentState {
        if state.paid_amount <= BigDecimal::from(0) {
            return PaymentState::unpaid(state.payment_profile_id);
        }

        if state.paid_amount >= *payable {
            if state.paid_amount > *payable {
                warn!(
                    paid_amount = %state.paid_amount,
                    payable_amount = %payable,
                    "paid amount exceeds payable amount; clamping"
                );
            }
            return PaymentState {
                status: PaymentStatus::Paid,
                paid_amount: payable.clone(),
                payment_profile_id: state.payment_profile_id,
            };
        }

        PaymentState {
            status: PaymentStatus::PartiallyPaid,
            ..state
        }
    }

    fn on_recompute(payable: &BigDecimal, state: PaymentState) -> PaymentState {
        match state.status {
            PaymentStatus::Paid => PaymentState {
                paid_amount: payable.clone(),
                ..state
            },
            PaymentStatus::PartiallyPaid => Self::reclamp_partial(payable, state),
            // a reconciled unpaid snapshot has nothing paid, so a nonzero
            // amount here was typed in since
            PaymentStatus::Unpaid if state.paid_amount > BigDecimal::from(0) => {
                Self::on_paid_amount_edited(payable, state)
            }
            PaymentStatus::Unpaid => PaymentState::unpaid(state.payment_profile_id),
        }
    }

    /// Keep a partial amount within `[0, payable)`, promoting to paid when it
    /// reaches the payable figure
    fn reclamp_partial(payable: &BigDecimal, state: PaymentState) -> PaymentState {
        let paid_amount = non_negative(state.paid_amount);
        if paid_amount > BigDecimal::from(0) && paid_amount >= *payable {
            warn!(
                paid_amount = %paid_amount,
                payable_amount = %payable,
                "partial payment covers payable amount; promoting to paid"
            );
            return PaymentState {
                status: PaymentStatus::Paid,
                paid_amount: payable.clone(),
                payment_profile_id: state.payment_profile_id,
            };
        }

        PaymentState {
            paid_amount,
            ..state
        }
    }

    /// Amount still owed, never negative
    pub fn due_amount(payable_amount: &BigDecimal, paid_amount: &BigDecimal) -> BigDecimal {
        non_negative(payable_amount - paid_amount)
    }
}
