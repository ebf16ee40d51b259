//! Expense register: drafts in, stored records out

use tracing::info;
use uuid::Uuid;

use crate::expense::{ExpenseDraft, ExpenseEngine};
use crate::traits::*;
use crate::types::*;

/// Coordinates the engine with a storage backend
pub struct ExpenseRegister<S: ExpenseStore> {
    engine: ExpenseEngine,
    storage: S,
}

impl<S: ExpenseStore> ExpenseRegister<S> {
    /// Create a register with the default engine
    pub fn new(storage: S) -> Self {
        Self::with_engine(ExpenseEngine::new(), storage)
    }

    /// Create a register with a configured engine
    pub fn with_engine(engine: ExpenseEngine, storage: S) -> Self {
        Self { engine, storage }
    }

    pub fn engine(&self) -> &ExpenseEngine {
        &self.engine
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Open a blank draft
    pub fn open_draft(&self) -> ExpenseDraft {
        ExpenseDraft::new(&self.engine)
    }

    /// Open a draft for a stored expense
    pub async fn open_expense(&self, expense_id: &Uuid) -> EngineResult<ExpenseDraft> {
        let record = self
            .storage
            .get_expense(expense_id)
            .await?
            .ok_or(EngineError::ExpenseNotFound(*expense_id))?;
        Ok(ExpenseDraft::from_record(&self.engine, &record))
    }

    /// Recompute, validate and store a draft.
    ///
    /// A draft opened from a stored expense replaces it; any other draft is
    /// stored under a new id. Nothing is stored when validation fails.
    pub async fn submit(&mut self, draft: &ExpenseDraft) -> EngineResult<ExpenseRecord> {
        let recomputation = self.engine.recompute(draft.input().clone());
        if !recomputation.is_valid() {
            return Err(EngineError::Validation(recomputation.errors));
        }

        let record = ExpenseRecord {
            id: draft.expense_id().unwrap_or_else(Uuid::new_v4),
            payload: self.engine.payload(&recomputation),
            submitted_at: chrono::Utc::now().naive_utc(),
        };

        match draft.expense_id() {
            Some(_) => self.storage.update_expense(&record).await?,
            None => self.storage.save_expense(&record).await?,
        }

        info!(
            expense_id = %record.id,
            payable_amount = %record.payload.derived.payable_amount,
            payment_status = ?record.payload.input.payment_status,
            "expense submitted"
        );

        Ok(record)
    }

    /// Get a stored expense by ID
    pub async fn get_expense(&self, expense_id: &Uuid) -> EngineResult<Option<ExpenseRecord>> {
        self.storage.get_expense(expense_id).await
    }

    /// List stored expenses, optionally by payment status
    pub async fn list_expenses(
        &self,
        status: Option<PaymentStatus>,
    ) -> EngineResult<Vec<ExpenseRecord>> {
        self.storage.list_expenses(status).await
    }

    /// Delete a stored expense
    pub async fn delete_expense(&mut self, expense_id: &Uuid) -> EngineResult<()> {
        self.storage.delete_expense(expense_id).await?;
        info!(expense_id = %expense_id, "expense deleted");
        Ok(())
    }
}
