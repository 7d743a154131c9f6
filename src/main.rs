/// Budget: a small project budget tracker
///
/// Main entry point. Loads configuration from the environment and serves:
/// - Project list at /
/// - Project creation form at /add
/// - Project detail and expenses at /{project_slug}
/// - Health check at /healthz

use budget::{config::Config, server::start_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to 0.0.0.0:8000 and data/budget.db
    let config = Config::default();

    start_server(config).await?;

    Ok(())
}
