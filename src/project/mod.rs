/// Project management module
///
/// Handles the budget data model: projects, their expense categories and expenses,
/// slug derivation for URLs, and SQLite persistence.

pub mod database;
pub mod slug;
pub mod storage;
pub mod types;

pub use storage::{ProjectStorage, StorageError};
pub use types::{Category, Expense, ExpenseRow, NewExpense, NewProject, Project};
