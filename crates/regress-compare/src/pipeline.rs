//! Top-level run: store, configuration, token, then every use case

use regress_config::load_config;
use regress_store::UseCaseStore;
use std::path::PathBuf;
use tracing::info;

use crate::client::ApiClient;
use crate::error::SetupError;
use crate::harness::{RunSummary, Runner};
use crate::session::HttpSession;
use crate::token::acquire_token;

/// Files a run reads and writes
#[derive(Debug, Clone)]
pub struct RunPaths {
    /// YAML configuration (endpoints and OAuth2 credentials)
    pub config: PathBuf,
    /// Use-case fixtures, never written
    pub use_cases: PathBuf,
    /// Recorded results, rewritten after every use case
    pub results: PathBuf,
}

/// Run the whole regression pass
///
/// Setup failures (unreadable store or configuration, no token) abort before
/// any use case is processed. Per-use-case failures only show up in the
/// returned summary.
pub async fn run_regression(paths: &RunPaths) -> Result<RunSummary, SetupError> {
    let store = UseCaseStore::load(&paths.use_cases, &paths.results).await?;
    let config = load_config(&paths.config)?;
    info!(
        "Loaded {} use cases and configuration from {:?}",
        store.len(),
        config.source()
    );

    let session = HttpSession::from_config(&config)?;

    println!("Récupération du token...");
    let token = acquire_token(&session, &config).await?;
    println!("Token récupéré avec succès.");

    let client = ApiClient::new(session, token, config.analyses_path());
    let mut runner = Runner::new(&config, client, store);
    let summary = runner.run().await;

    summary.print();
    info!(
        "Run complete: {} use cases, {} failures",
        summary.total(),
        summary.failures()
    );
    Ok(summary)
}
