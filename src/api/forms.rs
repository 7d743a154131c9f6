/// Form payloads and validation for project and expense creation
///
/// Fields arrive as raw strings so that missing or malformed values become
/// per-field messages on the re-rendered page instead of extractor rejections.

use crate::project::{
    slug::{is_reserved, slugify},
    NewProject, ProjectStorage,
};
use anyhow::Result;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_CATEGORY_LEN: usize = 50;
/// Expense amounts: 8 digits in total, 2 of them decimals
pub const MAX_AMOUNT_DIGITS: u32 = 8;
pub const MAX_DECIMAL_PLACES: u32 = 2;

const REQUIRED: &str = "This field is required.";

/// Field -> messages, kept in insertion order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormErrors {
    fields: Vec<(&'static str, Vec<String>)>,
}

impl FormErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, messages)) => messages.push(message.into()),
            None => self.fields.push((field, vec![message.into()])),
        }
    }

    /// Messages for one field (empty when the field is valid)
    pub fn get(&self, field: &str) -> Vec<String> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, messages)| messages.clone())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// POST /add body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectForm {
    pub name: String,
    pub budget: String,
    /// Comma-separated category names
    #[serde(rename = "categoriesString")]
    pub categories_string: String,
}

impl ProjectForm {
    /// Validate the form; slug uniqueness is checked against storage.
    ///
    /// The outer `Result` carries storage failures, the inner one validation errors.
    pub async fn clean(&self, storage: &ProjectStorage) -> Result<Result<NewProject, FormErrors>> {
        let mut errors = FormErrors::default();

        let name = self.name.trim();
        let slug = slugify(name);
        if name.is_empty() {
            errors.add("name", REQUIRED);
        } else if name.chars().count() > MAX_NAME_LEN {
            errors.add("name", format!("Ensure this value has at most {MAX_NAME_LEN} characters."));
        } else if slug.is_empty() {
            errors.add("name", "Name must contain at least one letter or digit.");
        } else if is_reserved(&slug) {
            errors.add("name", format!("'{name}' is a reserved name."));
        } else if storage.slug_exists(&slug).await? {
            errors.add("name", "Project with this name already exists.");
        }

        let budget = match parse_decimal_field(&self.budget, &mut errors, "budget") {
            Some(budget) if budget.is_sign_negative() && !budget.is_zero() => {
                errors.add("budget", "Ensure this value is greater than or equal to 0.");
                None
            }
            other => other,
        };

        let categories = parse_categories(&self.categories_string);
        for category in &categories {
            if category.chars().count() > MAX_CATEGORY_LEN {
                errors.add(
                    "categoriesString",
                    format!("Category '{category}' is longer than {MAX_CATEGORY_LEN} characters."),
                );
            }
        }

        match budget {
            Some(budget) if errors.is_empty() => Ok(Ok(NewProject {
                name: name.to_string(),
                slug,
                budget,
                categories,
            })),
            _ => Ok(Err(errors)),
        }
    }
}

/// POST /{project_slug} body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExpenseForm {
    pub title: String,
    pub amount: String,
    /// Category name within the project
    pub category: String,
}

/// Expense input that passed validation; the category still has to be looked up
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedExpense {
    pub title: String,
    pub amount: Decimal,
    pub category: String,
}

impl ExpenseForm {
    pub fn clean(&self) -> Result<CleanedExpense, FormErrors> {
        let mut errors = FormErrors::default();

        let title = self.title.trim();
        if title.is_empty() {
            errors.add("title", REQUIRED);
        } else if title.chars().count() > MAX_TITLE_LEN {
            errors.add("title", format!("Ensure this value has at most {MAX_TITLE_LEN} characters."));
        }

        let amount = match parse_decimal_field(&self.amount, &mut errors, "amount") {
            Some(amount) if amount <= Decimal::ZERO => {
                errors.add("amount", "Ensure this value is greater than 0.");
                None
            }
            Some(amount) if integer_digits(amount) > MAX_AMOUNT_DIGITS - MAX_DECIMAL_PLACES => {
                errors.add(
                    "amount",
                    format!("Ensure that there are no more than {MAX_AMOUNT_DIGITS} digits in total."),
                );
                None
            }
            other => other,
        };

        let category = self.category.trim();
        if category.is_empty() {
            errors.add("category", REQUIRED);
        }

        match amount {
            Some(amount) if errors.is_empty() => Ok(CleanedExpense {
                title: title.to_string(),
                amount,
                category: category.to_string(),
            }),
            _ => Err(errors),
        }
    }
}

/// Split "food, travel,,Food" into distinct trimmed names, keeping first occurrence order
pub fn parse_categories(raw: &str) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        if !categories.iter().any(|existing| existing == name) {
            categories.push(name.to_string());
        }
    }
    categories
}

fn parse_decimal_field(raw: &str, errors: &mut FormErrors, field: &'static str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    match Decimal::from_str(raw) {
        Ok(value) if value.normalize().scale() > MAX_DECIMAL_PLACES => {
            errors.add(
                field,
                format!("Ensure that there are no more than {MAX_DECIMAL_PLACES} decimal places."),
            );
            None
        }
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(field, "Enter a number.");
            None
        }
    }
}

fn integer_digits(value: Decimal) -> u32 {
    let whole = value.trunc().abs().to_string();
    if whole == "0" {
        0
    } else {
        whole.len() as u32
    }
}
