/// Page templates for the budget tracker
///
/// Each struct binds one file under `templates/`. Money and dates arrive already
/// formatted, so the HTML only loops and branches.

use askama::Template;
use askama_web::WebTemplate;

use crate::api::forms::FormErrors;

/// Project list page; shows an empty-state alert when there are no projects.
#[derive(Template, WebTemplate)]
#[template(path = "project-list.html")]
pub struct ProjectListTemplate {
    pub projects: Vec<ProjectCard>,
    pub add_url: String,
}

/// One project on the list page.
pub struct ProjectCard {
    pub name: String,
    pub budget: String,
    pub detail_url: String,
}

/// Project creation form.
#[derive(Template, WebTemplate, Default)]
#[template(path = "add-project.html")]
pub struct AddProjectTemplate {
    pub list_url: String,
    pub name: String,
    pub budget: String,
    pub categories_string: String,
    pub name_errors: Vec<String>,
    pub budget_errors: Vec<String>,
    pub categories_errors: Vec<String>,
}

impl AddProjectTemplate {
    pub fn with_errors(mut self, errors: &FormErrors) -> Self {
        self.name_errors = errors.get("name");
        self.budget_errors = errors.get("budget");
        self.categories_errors = errors.get("categoriesString");
        self
    }
}

/// Project detail page with the expense table and the add-expense form.
#[derive(Template, WebTemplate)]
#[template(path = "project-detail.html")]
pub struct ProjectDetailTemplate {
    pub list_url: String,
    pub detail_url: String,
    pub name: String,
    pub created_on: String,
    pub budget: String,
    pub budget_left: String,
    pub over_budget: bool,
    pub total_transactions: usize,
    pub expenses: Vec<ExpenseLine>,
    pub categories: Vec<String>,
    pub form: ExpenseFormState,
}

/// One row of the expense table.
pub struct ExpenseLine {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub amount: String,
}

/// Submitted values and messages of the add-expense form.
#[derive(Default)]
pub struct ExpenseFormState {
    pub title: String,
    pub amount: String,
    pub category: String,
    pub title_errors: Vec<String>,
    pub amount_errors: Vec<String>,
    pub category_errors: Vec<String>,
}

impl ExpenseFormState {
    pub fn with_errors(mut self, errors: &FormErrors) -> Self {
        self.title_errors = errors.get("title");
        self.amount_errors = errors.get("amount");
        self.category_errors = errors.get("category");
        self
    }

    pub fn has_errors(&self) -> bool {
        !(self.title_errors.is_empty() && self.amount_errors.is_empty() && self.category_errors.is_empty())
    }
}

/// Fallback page for unknown URLs and missing projects.
#[derive(Template, WebTemplate)]
#[template(path = "not-found.html")]
pub struct NotFoundTemplate {
    pub list_url: String,
}
