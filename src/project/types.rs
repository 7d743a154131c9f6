/// Budget domain types
///
/// A project owns a budget, a fixed set of expense categories and the expenses
/// recorded against them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A named budget allocation, addressed in URLs by its slug
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Database identifier
    pub id: i64,
    /// Human-readable project name (e.g., "Summer Trip")
    pub name: String,
    /// URL-safe identifier derived from the name (e.g., "summer-trip")
    pub slug: String,
    /// Total amount allocated to the project
    pub budget: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Budget minus everything spent so far. Negative when over budget.
    pub fn budget_left(&self, expenses: &[ExpenseRow]) -> Decimal {
        let spent: Decimal = expenses.iter().map(|row| row.expense.amount).sum();
        self.budget - spent
    }

    /// Number of expenses recorded against the project
    pub fn total_transactions(&self, expenses: &[ExpenseRow]) -> usize {
        expenses.len()
    }
}

/// Expense category, scoped to a single project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub project_id: i64,
    pub category_id: i64,
    pub title: String,
    pub amount: Decimal,
}

/// Expense joined with its category name for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseRow {
    pub expense: Expense,
    pub category_name: String,
}

/// Validated input for project creation
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub name: String,
    pub slug: String,
    pub budget: Decimal,
    /// Category names, trimmed and de-duplicated
    pub categories: Vec<String>,
}

/// Validated input for expense creation
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub project_id: i64,
    pub category_id: i64,
    pub title: String,
    pub amount: Decimal,
}

/// Render a money amount with exactly two decimal places ("10000" -> "10000.00")
pub fn format_money(amount: Decimal) -> String {
    let mut rounded = amount.round_dp(2);
    rounded.rescale(2);
    rounded.to_string()
}
