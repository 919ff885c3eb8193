//! Deploy run loop for the command line

use std::future::Future;
use std::sync::Arc;

use tracing::{error, info};

use crate::app::options::AppOptions;
use crate::deploy::poller::{DeployOutcome, DeployPoller};
use crate::errors::NavError;
use crate::http::client::HttpClient;
use crate::services::prompter::Prompter;

/// Run one deploy cycle, cancelling it when `shutdown_signal` resolves
pub async fn run_deploy(
    options: &AppOptions,
    environment: &str,
    prompter: Arc<dyn Prompter>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<DeployOutcome, NavError> {
    info!("Using admin at {}", options.client.base_url);

    let http_client = Arc::new(HttpClient::new(&options.client)?);
    let poller = Arc::new(DeployPoller::new(
        http_client,
        prompter,
        options.poller.clone(),
    ));

    let handle = poller.spawn_deploy(environment);
    let cancel = handle.cancellation_token();

    // Cancel on shutdown, the cycle reports Cancelled on its own
    let watcher = tokio::spawn(async move {
        tokio::select! {
            _ = shutdown_signal => {
                info!("Shutdown signal received, cancelling deploy...");
                cancel.cancel();
            }
            _ = cancel.cancelled() => {}
        }
    });

    let outcome = handle.wait().await;
    watcher.abort();

    if let Err(e) = &outcome {
        error!("Deploy of {} failed: {}", environment, e);
    }
    outcome
}
