//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use uuid::Uuid;

use crate::types::*;
use crate::utils::validation;

/// Storage abstraction for submitted expenses
///
/// The engine itself never persists anything; the backend behind this trait
/// (an HTTP API, a database, in-memory) is the system of record.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Save a new expense
    async fn save_expense(&mut self, record: &ExpenseRecord) -> EngineResult<()>;

    /// Get an expense by ID
    async fn get_expense(&self, expense_id: &Uuid) -> EngineResult<Option<ExpenseRecord>>;

    /// Replace an existing expense
    async fn update_expense(&mut self, record: &ExpenseRecord) -> EngineResult<()>;

    /// Delete an expense
    async fn delete_expense(&mut self, expense_id: &Uuid) -> EngineResult<()>;

    /// List expenses, optionally filtered by payment status
    async fn list_expenses(&self, status: Option<PaymentStatus>) -> EngineResult<Vec<ExpenseRecord>>;
}

/// Trait for implementing expense validation rules
pub trait ExpenseValidator: Send + Sync {
    /// Validate a reconciled snapshot against its derived figures
    fn validate_expense(
        &self,
        input: &ExpenseFinancialInput,
        derived: &ExpenseFinancialDerived,
    ) -> Vec<FieldError>;
}

/// Standard basic, tax and payment rules
pub struct DefaultExpenseValidator;

impl ExpenseValidator for DefaultExpenseValidator {
    fn validate_expense(
        &self,
        input: &ExpenseFinancialInput,
        derived: &ExpenseFinancialDerived,
    ) -> Vec<FieldError> {
        validation::validate(input, derived)
    }
}
