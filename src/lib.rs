//! # Expense Engine
//!
//! Financial computation for expense records: turns the handful of values a
//! user enters on an expense form into a consistent set of derived figures,
//! and keeps the payment status in step with them.
//!
//! ## Features
//!
//! - **Tax computation**: NoTax, SGST, CGST, CGST + SGST, GST, IGST and custom
//!   rates, in tax-inclusive or tax-exclusive mode
//! - **TDS**: tax deducted at source on the taxable base
//! - **Payment status**: unpaid / partially paid / paid, reconciled against the
//!   payable amount on every change
//! - **Validation**: every field error at once, tagged with its form section
//! - **Storage abstraction**: submitted expenses go through a trait-based store
//!
//! ## Quick Start
//!
//! ```rust
//! use expense_engine::{compute_derived, validate, ExpenseFinancialInput, TaxType};
//! use bigdecimal::BigDecimal;
//!
//! let input = ExpenseFinancialInput {
//!     entered_amount: BigDecimal::from(1000),
//!     tax_type: TaxType::Gst,
//!     tax_percentage: BigDecimal::from(18),
//!     ..Default::default()
//! };
//!
//! let derived = compute_derived(&input);
//! assert_eq!(derived.total_amount, BigDecimal::from(1180));
//! assert!(validate(&input, &derived).is_empty());
//! ```

pub mod config;
pub mod expense;
pub mod payment;
pub mod tax;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use expense::*;
pub use payment::*;
pub use tax::*;
pub use traits::*;
pub use types::*;
pub use utils::validation::validate;
