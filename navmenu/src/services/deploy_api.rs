//! Deploy endpoints seam

use async_trait::async_trait;
use openapi_client::models::DeployStatusResponse;

use crate::errors::NavError;

/// Deploy API trait for testability
#[async_trait]
pub trait DeployApi: Send + Sync {
    /// Trigger a deployment of `environment`
    async fn trigger(&self, environment: &str) -> Result<DeployStatusResponse, NavError>;

    /// Fetch the current deployment status
    async fn status(&self) -> Result<DeployStatusResponse, NavError>;
}
