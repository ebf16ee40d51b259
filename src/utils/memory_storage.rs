//! In-memory storage implementation for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

use crate::traits::*;
use crate::types::*;

fn poisoned<T>(_: PoisonError<T>) -> EngineError {
    EngineError::Storage("expense store lock poisoned".to_string())
}

/// In-memory expense store for testing and development
#[derive(Debug, Clone)]
pub struct MemoryExpenseStore {
    expenses: Arc<RwLock<HashMap<Uuid, ExpenseRecord>>>,
}

impl MemoryExpenseStore {
    /// Create a new memory store instance
    pub fn new() -> Self {
        Self {
            expenses: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored expenses
    pub fn len(&self) -> EngineResult<usize> {
        Ok(self.expenses.read().map_err(poisoned)?.len())
    }

    pub fn is_empty(&self) -> EngineResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> EngineResult<()> {
        self.expenses.write().map_err(poisoned)?.clear();
        Ok(())
    }
}

impl Default for MemoryExpenseStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExpenseStore for MemoryExpenseStore {
    async fn save_expense(&mut self, record: &ExpenseRecord) -> EngineResult<()> {
        self.expenses
            .write()
            .map_err(poisoned)?
            .insert(record.id, record.clone());
        Ok(())
    }

    async fn get_expense(&self, expense_id: &Uuid) -> EngineResult<Option<ExpenseRecord>> {
        Ok(self.expenses.read().map_err(poisoned)?.get(expense_id).cloned())
    }

    async fn update_expense(&mut self, record: &ExpenseRecord) -> EngineResult<()> {
        let mut expenses = self.expenses.write().map_err(poisoned)?;
        match expenses.get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(EngineError::ExpenseNotFound(record.id)),
        }
    }

    async fn delete_expense(&mut self, expense_id: &Uuid) -> EngineResult<()> {
        if self
            .expenses
            .write()
            .map_err(poisoned)?
            .remove(expense_id)
            .is_some()
        {
            Ok(())
        } else {
            Err(EngineError::ExpenseNotFound(*expense_id))
        }
    }

    async fn list_expenses(&self, status: Option<PaymentStatus>) -> EngineResult<Vec<ExpenseRecord>> {
        let expenses = self.expenses.read().map_err(poisoned)?;
        let mut filtered: Vec<ExpenseRecord> = expenses
            .values()
            .filter(|record| {
                status
                    .as_ref()
                    .is_none_or(|s| &record.payload.input.payment_status == s)
            })
            .cloned()
            .collect();
        filtered.sort_by_key(|record| record.submitted_at);
        Ok(filtered)
    }
}
