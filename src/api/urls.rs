/// Named route table
///
/// Every page has a route name (`list`, `add`, `detail`) and a URL pattern. The same
/// table drives the axum router, `reverse` (name + args -> path) and `resolve`
/// (path -> view), so links rendered in templates always hit the view they name.

use crate::api::projects::{self, AppState};
use crate::project::slug::{is_reserved, is_valid_slug};
use axum::routing::{get, MethodRouter};

/// Page views served by the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// GET `/`
    ProjectList,
    /// GET/POST `/add`
    ProjectCreate,
    /// GET/POST/DELETE `/{project_slug}`
    ProjectDetail,
}

impl View {
    /// Resolution order: fixed paths before the slug catch-all
    pub const ALL: [View; 3] = [View::ProjectList, View::ProjectCreate, View::ProjectDetail];

    pub fn route_name(self) -> &'static str {
        match self {
            View::ProjectList => "list",
            View::ProjectCreate => "add",
            View::ProjectDetail => "detail",
        }
    }

    /// URL pattern in axum syntax
    pub fn pattern(self) -> &'static str {
        match self {
            View::ProjectList => "/",
            View::ProjectCreate => "/add",
            View::ProjectDetail => "/{project_slug}",
        }
    }

    /// Handlers serving this view
    pub fn method_router(self) -> MethodRouter<AppState> {
        match self {
            View::ProjectList => get(projects::project_list),
            View::ProjectCreate => get(projects::project_create_form).post(projects::project_create),
            View::ProjectDetail => get(projects::project_detail)
                .post(projects::expense_create)
                .delete(projects::expense_delete),
        }
    }

    fn by_name(name: &str) -> Option<View> {
        View::ALL.into_iter().find(|view| view.route_name() == name)
    }
}

/// Failure to build a URL from a route name
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UrlError {
    #[error("reverse for '{name}' with arguments {args:?} not found")]
    NoReverseMatch { name: String, args: Vec<String> },
}

/// Result of resolving a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverMatch {
    pub route_name: &'static str,
    pub view: View,
    /// Captured path parameters, in pattern order
    pub args: Vec<String>,
}

/// Build the path for a named route
pub fn reverse(name: &str, args: &[&str]) -> Result<String, UrlError> {
    let no_match = || UrlError::NoReverseMatch {
        name: name.to_string(),
        args: args.iter().map(|a| a.to_string()).collect(),
    };

    let view = View::by_name(name).ok_or_else(no_match)?;
    let pattern = segments(view.pattern()).ok_or_else(no_match)?;

    let mut remaining = args.iter();
    let mut path = String::new();
    for segment in pattern {
        path.push('/');
        if is_placeholder(segment) {
            let arg = remaining.next().ok_or_else(no_match)?;
            if !is_valid_slug(arg) {
                return Err(no_match());
            }
            path.push_str(arg);
        } else {
            path.push_str(segment);
        }
    }
    if remaining.next().is_some() {
        return Err(no_match());
    }
    if path.is_empty() {
        path.push('/');
    }

    Ok(path)
}

/// Find the view serving `path`, if any
pub fn resolve(path: &str) -> Option<ResolverMatch> {
    let requested = segments(path)?;

    View::ALL.into_iter().find_map(|view| {
        let pattern = segments(view.pattern())?;
        if pattern.len() != requested.len() {
            return None;
        }

        let mut args = Vec::new();
        for (expected, actual) in pattern.iter().zip(&requested) {
            if is_placeholder(expected) {
                // Reserved slugs belong to routes outside this table
                if !is_valid_slug(actual) || is_reserved(actual) {
                    return None;
                }
                args.push(actual.to_string());
            } else if expected != actual {
                return None;
            }
        }

        Some(ResolverMatch {
            route_name: view.route_name(),
            view,
            args,
        })
    })
}

/// Split an absolute path into segments; `/` has none. A trailing slash leaves an
/// empty segment, which no pattern matches.
fn segments(path: &str) -> Option<Vec<&str>> {
    let rest = path.strip_prefix('/')?;
    if rest.is_empty() {
        return Some(Vec::new());
    }
    Some(rest.split('/').collect())
}

fn is_placeholder(segment: &str) -> bool {
    segment.starts_with('{') && segment.ends_with('}')
}
