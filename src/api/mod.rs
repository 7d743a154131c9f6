/// HTTP layer
///
/// This module provides the page routes of the budget tracker. It handles:
/// - The named route table shared by routing, `reverse` and `resolve`
/// - Form payloads and their validation
/// - Project list/create/detail views and expense add/delete

// Named route table (list, add, detail)
pub mod urls;

// Project and expense form validation
pub mod forms;

// Page handlers and application state
pub mod projects;

// Re-export router builder and lookups
pub use projects::{create_project_routes, AppState};
pub use urls::{resolve, reverse, ResolverMatch, UrlError, View};
