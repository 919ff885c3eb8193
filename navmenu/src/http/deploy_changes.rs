//! Deploy-changes API client

use async_trait::async_trait;
use openapi_client::models::{DeployStatusResponse, DeployTriggerBody};

use crate::errors::NavError;
use crate::http::client::HttpClient;
use crate::services::deploy_api::DeployApi;

const DEPLOY_CHANGES: &str = "deploy-changes";

impl HttpClient {
    /// Trigger a deployment of the given environment
    pub async fn trigger_deploy(&self, environment: &str) -> Result<DeployStatusResponse, NavError> {
        let url = self.endpoint(&[DEPLOY_CHANGES, environment])?;
        self.post(url, &DeployTriggerBody::default()).await
    }

    /// Get the status of the running deployment
    pub async fn deploy_status(&self) -> Result<DeployStatusResponse, NavError> {
        let url = self.endpoint(&[DEPLOY_CHANGES, ""])?;
        self.get(url).await
    }
}

#[async_trait]
impl DeployApi for HttpClient {
    async fn trigger(&self, environment: &str) -> Result<DeployStatusResponse, NavError> {
        self.trigger_deploy(environment).await
    }

    async fn status(&self) -> Result<DeployStatusResponse, NavError> {
        self.deploy_status().await
    }
}
