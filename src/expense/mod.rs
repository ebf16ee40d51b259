//! Expense module containing the computation engine, drafts and the register

pub mod engine;
pub mod draft;
pub mod register;

pub use engine::*;
pub use draft::*;
pub use register::*;
