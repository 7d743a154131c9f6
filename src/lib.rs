/// Budget: a small project budget tracker
///
/// Projects carry a budget and a set of expense categories; expenses recorded
/// against them are shown on server-rendered pages backed by SQLite.

// Core configuration and setup
pub mod config;

// Data model, slugs and SQLite persistence
pub mod project;

// HTTP layer - named routes, forms and page handlers
pub mod api;

// Askama page templates
pub mod templates;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use api::{resolve, reverse, View};
pub use project::{Project, ProjectStorage};
pub use server::{build_router, start_server};
