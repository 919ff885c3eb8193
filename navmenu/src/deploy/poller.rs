//! Deploy-status poller
//!
//! Confirms with the user, triggers a deployment and then polls the status
//! endpoint on a fixed interval until the backend reports completion.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use openapi_client::models::DeployStatus;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::deploy::fsm::{DeployCycleEvent, DeployCycleFsm, DeployCycleState};
use crate::errors::NavError;
use crate::services::deploy_api::DeployApi;
use crate::services::prompter::Prompter;
use crate::utils::{calc_exp_backoff, CooldownOptions};

/// Poller options
#[derive(Debug, Clone)]
pub struct Options {
    /// Delay before each status poll
    pub poll_interval: Duration,

    /// Consecutive failed polls tolerated before the cycle gives up
    pub max_consecutive_failures: u32,

    /// Upper bound for the backoff after a failed poll
    pub max_backoff: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(2000),
            max_consecutive_failures: 3,
            max_backoff: Duration::from_secs(30),
        }
    }
}

/// How a deploy cycle ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    /// The user did not confirm, nothing was sent
    Declined,

    /// Another cycle is still running, nothing was sent
    AlreadyRunning,

    /// The backend reported completion with this message
    Completed { message: String },

    /// The cycle was cancelled before completion
    Cancelled,
}

/// Handle to a spawned deploy cycle
pub struct DeployHandle {
    cancel: CancellationToken,
    join: JoinHandle<Result<DeployOutcome, NavError>>,
}

impl DeployHandle {
    /// Stop polling at the next opportunity
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the cycle to end
    pub async fn wait(self) -> Result<DeployOutcome, NavError> {
        self.join
            .await
            .map_err(|e| NavError::Internal(format!("Deploy task failed: {}", e)))?
    }
}

/// Fire-and-poll deploy driver
pub struct DeployPoller {
    api: Arc<dyn DeployApi>,
    prompter: Arc<dyn Prompter>,
    options: Options,
    fsm: Mutex<DeployCycleFsm>,
}

impl DeployPoller {
    pub fn new(api: Arc<dyn DeployApi>, prompter: Arc<dyn Prompter>, options: Options) -> Self {
        Self {
            api,
            prompter,
            options,
            fsm: Mutex::new(DeployCycleFsm::new()),
        }
    }

    /// Current cycle state
    pub fn state(&self) -> DeployCycleState {
        self.lock_fsm().state()
    }

    /// Last error recorded by a cycle
    pub fn last_error(&self) -> Option<String> {
        self.lock_fsm().error().map(str::to_string)
    }

    /// Spawn a deploy cycle on the runtime and return immediately
    pub fn spawn_deploy(self: &Arc<Self>, environment: impl Into<String>) -> DeployHandle {
        let cancel = CancellationToken::new();
        let poller = self.clone();
        let environment = environment.into();
        let token = cancel.clone();

        let join = tokio::spawn(async move {
            poller
                .start_deploy(&environment, tokio::time::sleep, token)
                .await
        });

        DeployHandle { cancel, join }
    }

    /// Run a full deploy cycle: confirm, trigger, then poll until complete
    pub async fn start_deploy<S, F>(
        &self,
        environment: &str,
        sleep_fn: S,
        cancel: CancellationToken,
    ) -> Result<DeployOutcome, NavError>
    where
        S: Fn(Duration) -> F,
        F: Future<Output = ()>,
    {
        {
            let mut fsm = self.lock_fsm();
            if fsm.is_active() {
                info!(
                    "Deploy of {} ignored, a cycle is already {:?}",
                    environment,
                    fsm.state()
                );
                return Ok(DeployOutcome::AlreadyRunning);
            }
            fsm.process(DeployCycleEvent::Confirm)
                .map_err(NavError::InvalidTransition)?;
        }
        let _guard = CycleGuard { fsm: &self.fsm };

        if cancel.is_cancelled() {
            return self.cancelled();
        }

        let question = format!("Do you want to deploy the code on {}?", environment);
        let confirmed = tokio::select! {
            biased;
            _ = cancel.cancelled() => return self.cancelled(),
            confirmed = self.prompter.confirm(&question) => confirmed,
        };
        if !confirmed {
            debug!("Deploy of {} declined", environment);
            self.transition(DeployCycleEvent::Declined)?;
            return Ok(DeployOutcome::Declined);
        }

        // Cancelled while the prompt was answered
        if cancel.is_cancelled() {
            return self.cancelled();
        }

        self.transition(DeployCycleEvent::Trigger)?;
        info!("Triggering deploy of {}", environment);

        let response = match self.api.trigger(environment).await {
            Ok(response) => response,
            Err(e) => {
                error!("Deploy trigger for {} failed: {}", environment, e);
                self.transition(DeployCycleEvent::Failed(e.to_string()))?;
                self.prompter
                    .notify(&format!("Deploy failed to start: {}", e))
                    .await;
                return Err(e);
            }
        };

        self.prompter.notify(&response.msg).await;
        self.transition(DeployCycleEvent::Triggered)?;

        self.poll_status(sleep_fn, cancel).await
    }

    async fn poll_status<S, F>(
        &self,
        sleep_fn: S,
        cancel: CancellationToken,
    ) -> Result<DeployOutcome, NavError>
    where
        S: Fn(Duration) -> F,
        F: Future<Output = ()>,
    {
        let backoff = CooldownOptions {
            base_delay: self.options.poll_interval,
            max_delay: self.options.max_backoff,
            multiplier: 2.0,
        };
        let mut delay = self.options.poll_interval;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return self.cancelled(),
                _ = sleep_fn(delay) => {}
            }

            debug!("Polling deploy status...");

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return self.cancelled(),
                result = self.api.status() => result,
            };

            match result {
                Ok(response) => match response.status {
                    DeployStatus::Complete => {
                        self.transition(DeployCycleEvent::Complete)?;
                        info!("Deploy complete: {}", response.msg);
                        self.prompter.notify(&response.msg).await;
                        return Ok(DeployOutcome::Completed {
                            message: response.msg,
                        });
                    }
                    DeployStatus::Pending => {
                        self.transition(DeployCycleEvent::Pending)?;
                        delay = self.options.poll_interval;
                    }
                    DeployStatus::Unrecognized(value) => {
                        warn!("Unrecognized deploy status {}, polling again", value);
                        self.transition(DeployCycleEvent::Pending)?;
                        delay = self.options.poll_interval;
                    }
                },
                Err(e) => {
                    self.transition(DeployCycleEvent::PollFailed(e.to_string()))?;
                    let failures = {
                        let fsm = self.lock_fsm();
                        if !fsm.can_retry(self.options.max_consecutive_failures) {
                            None
                        } else {
                            Some(fsm.consecutive_failures())
                        }
                    };

                    match failures {
                        Some(failures) => {
                            delay = calc_exp_backoff(&backoff, failures);
                            warn!(
                                "Deploy status poll failed ({} in a row), retrying in {:?}: {}",
                                failures, delay, e
                            );
                        }
                        None => {
                            error!("Giving up on deploy status: {}", e);
                            self.transition(DeployCycleEvent::Failed(e.to_string()))?;
                            self.prompter
                                .notify(&format!("Deploy status unavailable: {}", e))
                                .await;
                            return Err(e);
                        }
                    }
                }
            }
        }
    }

    fn cancelled(&self) -> Result<DeployOutcome, NavError> {
        info!("Deploy cycle cancelled");
        self.transition(DeployCycleEvent::Cancel)?;
        Ok(DeployOutcome::Cancelled)
    }

    fn transition(&self, event: DeployCycleEvent) -> Result<(), NavError> {
        self.lock_fsm()
            .process(event)
            .map_err(NavError::InvalidTransition)
    }

    fn lock_fsm(&self) -> MutexGuard<'_, DeployCycleFsm> {
        self.fsm.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Returns the machine to idle if a cycle is dropped half way
struct CycleGuard<'a> {
    fsm: &'a Mutex<DeployCycleFsm>,
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        let mut fsm = self.fsm.lock().unwrap_or_else(|e| e.into_inner());
        if fsm.is_active() {
            debug!("Deploy cycle dropped while {:?}", fsm.state());
            fsm.reset();
        }
    }
}
