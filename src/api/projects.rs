/// Project pages: list, create form, detail with expense management
///
/// HTML views render askama templates; form posts follow post/redirect/get and
/// re-render with 422 when validation fails.

use crate::{
    api::{
        forms::{ExpenseForm, ProjectForm},
        urls::{reverse, View},
    },
    project::{ExpenseRow, NewExpense, Project, ProjectStorage, StorageError},
    project::{slug::is_valid_slug, types::format_money},
    templates::{
        AddProjectTemplate, ExpenseFormState, ExpenseLine, NotFoundTemplate, ProjectCard,
        ProjectDetailTemplate, ProjectListTemplate,
    },
};
use axum::{
    extract::{Form, Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Router,
};
use serde::Deserialize;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Project, category and expense persistence
    pub storage: ProjectStorage,
}

/// Body of the expense deletion request sent by the detail page
#[derive(Debug, Deserialize)]
pub struct DeleteExpenseRequest {
    pub id: i64,
}

/// Create the page routes from the named route table
pub fn create_project_routes() -> Router<AppState> {
    View::ALL
        .into_iter()
        .fold(Router::new(), |router, view| router.route(view.pattern(), view.method_router()))
}

/// List every project
///
/// GET /
pub async fn project_list(State(state): State<AppState>) -> Result<Response, StatusCode> {
    let projects = state.storage.list_projects().await.map_err(|e| {
        tracing::error!("Failed to list projects: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let mut cards = Vec::with_capacity(projects.len());
    for project in projects {
        cards.push(ProjectCard {
            detail_url: url_for("detail", &[project.slug.as_str()])?,
            budget: format_money(project.budget),
            name: project.name,
        });
    }

    tracing::debug!("📋 Rendering project list with {} projects", cards.len());

    Ok(ProjectListTemplate {
        projects: cards,
        add_url: url_for("add", &[])?,
    }
    .into_response())
}

/// Empty project creation form
///
/// GET /add
pub async fn project_create_form() -> Result<Response, StatusCode> {
    Ok(AddProjectTemplate {
        list_url: url_for("list", &[])?,
        ..Default::default()
    }
    .into_response())
}

/// Create a project and its categories, then redirect to its detail page
///
/// POST /add
/// Body: name=...&budget=...&categoriesString=food,travel
pub async fn project_create(
    State(state): State<AppState>,
    Form(form): Form<ProjectForm>,
) -> Result<Response, StatusCode> {
    let cleaned = form.clean(&state.storage).await.map_err(|e| {
        tracing::error!("Failed to validate project form: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let new_project = match cleaned {
        Ok(new_project) => new_project,
        Err(errors) => {
            tracing::debug!("❌ Project form rejected: {:?}", errors);
            return render_add_form(&form, |template| template.with_errors(&errors));
        }
    };

    match state.storage.create_project(&new_project).await {
        Ok(project) => Ok(Redirect::to(&url_for("detail", &[project.slug.as_str()])?).into_response()),
        Err(StorageError::DuplicateSlug(slug)) => {
            tracing::warn!("Project slug '{}' was taken concurrently", slug);
            render_add_form(&form, |mut template| {
                template.name_errors = vec!["Project with this name already exists.".to_string()];
                template
            })
        }
        Err(e) => {
            tracing::error!("Failed to create project {}: {}", new_project.slug, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Project detail with expenses and the add-expense form
///
/// GET /{project_slug}
pub async fn project_detail(
    State(state): State<AppState>,
    Path(project_slug): Path<String>,
) -> Result<Response, StatusCode> {
    let Some(project) = find_project(&state.storage, &project_slug).await? else {
        return Ok(not_found_page());
    };

    render_detail(&state.storage, &project, ExpenseFormState::default(), StatusCode::OK).await
}

/// Record an expense against one of the project's categories
///
/// POST /{project_slug}
/// Body: title=...&amount=...&category=...
pub async fn expense_create(
    State(state): State<AppState>,
    Path(project_slug): Path<String>,
    Form(form): Form<ExpenseForm>,
) -> Result<Response, StatusCode> {
    let Some(project) = find_project(&state.storage, &project_slug).await? else {
        return Ok(not_found_page());
    };

    let cleaned = match form.clean() {
        Ok(cleaned) => cleaned,
        Err(errors) => {
            tracing::debug!("❌ Expense form rejected for {}: {:?}", project.slug, errors);
            let form_state = ExpenseFormState {
                title: form.title,
                amount: form.amount,
                category: form.category,
                ..Default::default()
            }
            .with_errors(&errors);
            return render_detail(&state.storage, &project, form_state, StatusCode::UNPROCESSABLE_ENTITY).await;
        }
    };

    let category = state
        .storage
        .get_category_by_name(project.id, &cleaned.category)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up category {}: {}", cleaned.category, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    let Some(category) = category else {
        tracing::warn!("Unknown category '{}' for project {}", cleaned.category, project.slug);
        return Ok(not_found_page());
    };

    let new_expense = NewExpense {
        project_id: project.id,
        category_id: category.id,
        title: cleaned.title,
        amount: cleaned.amount,
    };
    if let Err(e) = state.storage.create_expense(&new_expense).await {
        tracing::error!("Failed to create expense for {}: {}", project.slug, e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    Ok(Redirect::to(&url_for("detail", &[project.slug.as_str()])?).into_response())
}

/// Delete an expense of the project
///
/// DELETE /{project_slug}
/// Body: { "id": 42 }
pub async fn expense_delete(
    State(state): State<AppState>,
    Path(project_slug): Path<String>,
    Json(payload): Json<DeleteExpenseRequest>,
) -> Result<StatusCode, StatusCode> {
    let project = find_project(&state.storage, &project_slug)
        .await?
        .ok_or(StatusCode::NOT_FOUND)?;

    match state.storage.delete_expense(project.id, payload.id).await {
        Ok(true) => {
            tracing::info!("🗑️ Deleted expense {} from {}", payload.id, project.slug);
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(false) => {
            tracing::warn!("Expense {} not found in project {}", payload.id, project.slug);
            Err(StatusCode::NOT_FOUND)
        }
        Err(e) => {
            tracing::error!("Failed to delete expense {}: {}", payload.id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Health check endpoint handler
pub async fn health_check() -> &'static str {
    "ok"
}

/// Fallback for paths outside the route table
pub async fn not_found() -> Response {
    not_found_page()
}

fn not_found_page() -> Response {
    let list_url = reverse("list", &[]).unwrap_or_else(|_| "/".to_string());
    (StatusCode::NOT_FOUND, NotFoundTemplate { list_url }).into_response()
}

/// Look up a project by URL slug; malformed slugs never match
async fn find_project(storage: &ProjectStorage, project_slug: &str) -> Result<Option<Project>, StatusCode> {
    if !is_valid_slug(project_slug) {
        tracing::warn!("Rejected malformed project slug: {:?}", project_slug);
        return Ok(None);
    }

    let project = storage.get_project_by_slug(project_slug).await.map_err(|e| {
        tracing::error!("Failed to load project {}: {}", project_slug, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    if project.is_none() {
        tracing::warn!("Project not found: {}", project_slug);
    }

    Ok(project)
}

fn url_for(name: &str, args: &[&str]) -> Result<String, StatusCode> {
    reverse(name, args).map_err(|e| {
        tracing::error!("Failed to build URL: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

fn render_add_form(
    form: &ProjectForm,
    decorate: impl FnOnce(AddProjectTemplate) -> AddProjectTemplate,
) -> Result<Response, StatusCode> {
    let template = AddProjectTemplate {
        list_url: url_for("list", &[])?,
        name: form.name.clone(),
        budget: form.budget.clone(),
        categories_string: form.categories_string.clone(),
        ..Default::default()
    };

    Ok((StatusCode::UNPROCESSABLE_ENTITY, decorate(template)).into_response())
}

async fn render_detail(
    storage: &ProjectStorage,
    project: &Project,
    form: ExpenseFormState,
    status: StatusCode,
) -> Result<Response, StatusCode> {
    let expenses: Vec<ExpenseRow> = storage.list_expenses(project.id).await.map_err(|e| {
        tracing::error!("Failed to list expenses for {}: {}", project.slug, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let categories = storage.list_categories(project.id).await.map_err(|e| {
        tracing::error!("Failed to list categories for {}: {}", project.slug, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let budget_left = project.budget_left(&expenses);
    let template = ProjectDetailTemplate {
        list_url: url_for("list", &[])?,
        detail_url: url_for("detail", &[project.slug.as_str()])?,
        name: project.name.clone(),
        created_on: project.created_at.format("%B %d, %Y").to_string(),
        budget: format_money(project.budget),
        budget_left: format_money(budget_left),
        over_budget: budget_left.is_sign_negative() && !budget_left.is_zero(),
        total_transactions: project.total_transactions(&expenses),
        expenses: expenses
            .into_iter()
            .map(|row| ExpenseLine {
                id: row.expense.id,
                title: row.expense.title,
                category: row.category_name,
                amount: format_money(row.expense.amount),
            })
            .collect(),
        categories: categories.into_iter().map(|c| c.name).collect(),
        form,
    };

    if template.form.has_errors() {
        tracing::debug!("Re-rendering {} with expense form errors", project.slug);
    }

    Ok((status, template).into_response())
}
