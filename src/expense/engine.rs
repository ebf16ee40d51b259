//! Recomputation orchestrator tying tax, TDS, payment and validation together

use bigdecimal::BigDecimal;
use tracing::debug;

use crate::config::EngineConfig;
use crate::expense::ExpenseEdit;
use crate::payment::{PaymentState, PaymentStateMachine, PaymentTrigger};
use crate::tax::{self, TaxComputation, TdsComputation};
use crate::traits::*;
use crate::types::*;

/// Derive every figure for `input` and reconcile its payment fields.
///
/// Returns the reconciled snapshot alongside the figures. Nothing is cached;
/// each call starts from the snapshot alone.
pub(crate) fn derive(
    mut input: ExpenseFinancialInput,
    trigger: PaymentTrigger,
) -> (ExpenseFinancialInput, ExpenseFinancialDerived) {
    if !input.tds_applicable {
        input.tds_percentage = BigDecimal::from(0);
    }
    tax::sync_total_rate(&mut input);

    let tax = TaxComputation::compute(&input);
    let tds = TdsComputation::compute(&tax, input.tds_applicable, &input.tds_percentage);

    let payment = PaymentStateMachine::reconcile(
        &tds.payable_amount,
        PaymentState::from_input(&input),
        trigger,
    );
    payment.apply_to(&mut input);

    let due_amount = PaymentStateMachine::due_amount(&tds.payable_amount, &input.paid_amount);

    debug!(
        tax_type = %input.tax_type,
        total_amount = %tax.total_amount,
        payable_amount = %tds.payable_amount,
        payment_status = ?input.payment_status,
        "expense recomputed"
    );

    let derived = ExpenseFinancialDerived {
        taxable_base: tax.taxable_base,
        tax_amount: tax.tax_amount,
        total_amount: tax.total_amount,
        tds_amount: tds.tds_amount,
        payable_amount: tds.payable_amount,
        due_amount,
    };

    (input, derived)
}

/// Recompute all derived figures of a snapshot. Never fails.
pub fn compute_derived(input: &ExpenseFinancialInput) -> ExpenseFinancialDerived {
    derive(input.clone(), PaymentTrigger::Recompute).1
}

/// Expense computation engine
///
/// Holds configuration only; every operation is a pure function of its
/// arguments, so one engine can serve any number of drafts concurrently.
pub struct ExpenseEngine {
    config: EngineConfig,
    validator: Box<dyn ExpenseValidator>,
}

impl Default for ExpenseEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseEngine {
    /// Create an engine with the built-in configuration
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            validator: Box::new(DefaultExpenseValidator),
        }
    }

    /// Create an engine with a custom configuration
    pub fn with_config(config: EngineConfig) -> EngineResult<Self> {
        Self::with_validator(config, Box::new(DefaultExpenseValidator))
    }

    /// Create an engine with a custom configuration and validator
    pub fn with_validator(
        config: EngineConfig,
        validator: Box<dyn ExpenseValidator>,
    ) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config, validator })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Recompute a raw snapshot with no knowledge of what was edited
    pub fn recompute(&self, input: ExpenseFinancialInput) -> Recomputation {
        self.run(input, PaymentTrigger::Recompute)
    }

    /// Apply one edit to `input` and recompute everything
    pub fn apply_edit(&self, input: &ExpenseFinancialInput, edit: ExpenseEdit) -> Recomputation {
        let mut next = input.clone();
        let trigger = edit.apply_to(&mut next, &self.config.default_rates);
        self.run(next, trigger)
    }

    /// Persistence payload for a recomputed snapshot
    pub fn payload(&self, recomputation: &Recomputation) -> ExpensePayload {
        ExpensePayload::new(
            recomputation.input.clone(),
            &recomputation.derived,
            self.config.persisted_scale,
        )
    }

    fn run(&self, input: ExpenseFinancialInput, trigger: PaymentTrigger) -> Recomputation {
        let (input, derived) = derive(input, trigger);
        let errors = self.validator.validate_expense(&input, &derived);
        Recomputation {
            input,
            derived,
            errors,
        }
    }
}
