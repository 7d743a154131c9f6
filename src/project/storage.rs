/// SQLite persistence for projects, categories and expenses
///
/// Decimal columns are stored as TEXT and parsed back with rust_decimal, so rows
/// are mapped by hand rather than through FromRow.

use crate::project::types::{Category, Expense, ExpenseRow, NewExpense, NewProject, Project};
use anyhow::Result;
use rust_decimal::Decimal;
use sqlx::{
    sqlite::{SqlitePool, SqliteRow},
    Row,
};
use std::str::FromStr;

/// Failures creating a project
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Another project already owns this slug
    #[error("a project with slug '{0}' already exists")]
    DuplicateSlug(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Storage handle shared by all request handlers
#[derive(Debug, Clone)]
pub struct ProjectStorage {
    /// SQLite connection pool
    pool: SqlitePool,
}

impl ProjectStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a project together with its categories in one transaction
    pub async fn create_project(&self, new_project: &NewProject) -> Result<Project, StorageError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO projects (name, slug, budget, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, slug, budget, created_at
            "#,
        )
        .bind(&new_project.name)
        .bind(&new_project.slug)
        .bind(new_project.budget.to_string())
        .bind(chrono::Utc::now())
        .fetch_one(&mut *tx)
        .await;

        let row = match inserted {
            Ok(row) => row,
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(StorageError::DuplicateSlug(new_project.slug.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        let project = project_from_row(&row)?;

        for name in &new_project.categories {
            sqlx::query("INSERT INTO categories (project_id, name) VALUES (?, ?)")
                .bind(project.id)
                .bind(name)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "📁 Created project '{}' ({}) with {} categories",
            project.name,
            project.slug,
            new_project.categories.len()
        );

        Ok(project)
    }

    /// All projects, oldest first
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let rows = sqlx::query(
            "SELECT id, name, slug, budget, created_at FROM projects ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let projects = rows
            .iter()
            .map(project_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(projects)
    }

    pub async fn get_project_by_slug(&self, slug: &str) -> Result<Option<Project>> {
        let row = sqlx::query("SELECT id, name, slug, budget, created_at FROM projects WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(project_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn slug_exists(&self, slug: &str) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM projects WHERE slug = ?) AS taken")
            .bind(slug)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get::<i64, _>("taken") != 0)
    }

    /// Categories of a project, by name
    pub async fn list_categories(&self, project_id: i64) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT id, project_id, name FROM categories WHERE project_id = ? ORDER BY name")
            .bind(project_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(category_from_row).collect())
    }

    pub async fn get_category_by_name(&self, project_id: i64, name: &str) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT id, project_id, name FROM categories WHERE project_id = ? AND name = ?")
            .bind(project_id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(category_from_row))
    }

    pub async fn create_expense(&self, new_expense: &NewExpense) -> Result<Expense> {
        let row = sqlx::query(
            r#"
            INSERT INTO expenses (project_id, category_id, title, amount)
            VALUES (?, ?, ?, ?)
            RETURNING id, project_id, category_id, title, amount
            "#,
        )
        .bind(new_expense.project_id)
        .bind(new_expense.category_id)
        .bind(&new_expense.title)
        .bind(new_expense.amount.to_string())
        .fetch_one(&self.pool)
        .await?;

        let expense = expense_from_row(&row)?;
        tracing::info!("💸 Recorded expense {} '{}' ({})", expense.id, expense.title, expense.amount);

        Ok(expense)
    }

    /// Expenses of a project with their category names, largest amount first
    pub async fn list_expenses(&self, project_id: i64) -> Result<Vec<ExpenseRow>> {
        let rows = sqlx::query(
            r#"
            SELECT e.id, e.project_id, e.category_id, e.title, e.amount, c.name AS category_name
            FROM expenses e
            JOIN categories c ON c.id = e.category_id
            WHERE e.project_id = ?
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        let mut expenses = Vec::with_capacity(rows.len());
        for row in &rows {
            expenses.push(ExpenseRow {
                expense: expense_from_row(row)?,
                category_name: row.get("category_name"),
            });
        }
        expenses.sort_by(|a, b| {
            b.expense
                .amount
                .cmp(&a.expense.amount)
                .then(a.expense.id.cmp(&b.expense.id))
        });

        Ok(expenses)
    }

    /// Delete one expense of a project. Returns false if it does not exist there.
    pub async fn delete_expense(&self, project_id: i64, expense_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ? AND project_id = ?")
            .bind(expense_id)
            .bind(project_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn parse_decimal(row: &SqliteRow, column: &str) -> Result<Decimal, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    Decimal::from_str(&raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

fn project_from_row(row: &SqliteRow) -> Result<Project, sqlx::Error> {
    Ok(Project {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        slug: row.try_get("slug")?,
        budget: parse_decimal(row, "budget")?,
        created_at: row.try_get("created_at")?,
    })
}

fn category_from_row(row: &SqliteRow) -> Category {
    Category {
        id: row.get("id"),
        project_id: row.get("project_id"),
        name: row.get("name"),
    }
}

fn expense_from_row(row: &SqliteRow) -> Result<Expense, sqlx::Error> {
    Ok(Expense {
        id: row.try_get("id")?,
        project_id: row.try_get("project_id")?,
        category_id: row.try_get("category_id")?,
        title: row.try_get("title")?,
        amount: parse_decimal(row, "amount")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::database::connect_in_memory;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    async fn storage() -> ProjectStorage {
        ProjectStorage::new(connect_in_memory().await.unwrap())
    }

    fn new_project(name: &str, slug: &str, categories: &[&str]) -> NewProject {
        NewProject {
            name: name.to_string(),
            slug: slug.to_string(),
            budget: dec("10000"),
            categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn create_and_fetch_project_by_slug() {
        let storage = storage().await;
        let created = storage
            .create_project(&new_project("Summer Trip", "summer-trip", &["food", "travel"]))
            .await
            .unwrap();

        let fetched = storage.get_project_by_slug("summer-trip").await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.name, "Summer Trip");
        assert_eq!(fetched.budget, dec("10000"));

        let categories: Vec<String> = storage
            .list_categories(created.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(categories, vec!["food", "travel"]);
    }

    #[tokio::test]
    async fn duplicate_slug_is_rejected_and_rolled_back() {
        let storage = storage().await;
        storage.create_project(&new_project("Trip", "trip", &["food"])).await.unwrap();

        let err = storage
            .create_project(&new_project("trip", "trip", &["fuel"]))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::DuplicateSlug(ref slug) if slug == "trip"));
        assert_eq!(storage.list_projects().await.unwrap().len(), 1);
        assert!(storage.slug_exists("trip").await.unwrap());
        assert!(!storage.slug_exists("other").await.unwrap());
    }

    #[tokio::test]
    async fn missing_slug_is_none() {
        let storage = storage().await;
        assert!(storage.get_project_by_slug("nope").await.unwrap().is_none());
        assert!(storage.list_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn expenses_are_listed_largest_first_and_deleted_per_project() {
        let storage = storage().await;
        let trip = storage.create_project(&new_project("Trip", "trip", &["food"])).await.unwrap();
        let home = storage.create_project(&new_project("Home", "home", &["tools"])).await.unwrap();
        let food = storage.get_category_by_name(trip.id, "food").await.unwrap().unwrap();
        assert!(storage.get_category_by_name(home.id, "food").await.unwrap().is_none());

        for (title, amount) in [("lunch", "12.50"), ("dinner", "45"), ("coffee", "3.20")] {
            storage
                .create_expense(&NewExpense {
                    project_id: trip.id,
                    category_id: food.id,
                    title: title.to_string(),
                    amount: dec(amount),
                })
                .await
                .unwrap();
        }

        let rows = storage.list_expenses(trip.id).await.unwrap();
        let titles: Vec<&str> = rows.iter().map(|r| r.expense.title.as_str()).collect();
        assert_eq!(titles, vec!["dinner", "lunch", "coffee"]);
        assert!(rows.iter().all(|r| r.category_name == "food"));
        assert_eq!(trip.budget_left(&rows), dec("9939.30"));

        let dinner_id = rows[0].expense.id;
        assert!(!storage.delete_expense(home.id, dinner_id).await.unwrap());
        assert!(storage.delete_expense(trip.id, dinner_id).await.unwrap());
        assert!(!storage.delete_expense(trip.id, dinner_id).await.unwrap());
        assert_eq!(storage.list_expenses(trip.id).await.unwrap().len(), 2);
    }
}
