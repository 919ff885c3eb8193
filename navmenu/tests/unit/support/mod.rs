//! Test doubles shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::{ready, Ready};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use navmenu::errors::NavError;
use navmenu::services::admin::{Billing, Explore, MembersStats, Modal, Modals, Router};
use navmenu::services::deploy_api::DeployApi;
use navmenu::services::prompter::Prompter;
use openapi_client::models::DeployStatusResponse;
use serde_json::{json, Value};

/// Ordered record of everything the collaborators saw
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.events().iter().filter(|e| e.starts_with(prefix)).count()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.events()
            .iter()
            .filter_map(|e| e.strip_prefix("notify: ").map(str::to_string))
            .collect()
    }

    pub fn sleeps(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.starts_with("sleep "))
            .collect()
    }
}

pub fn response(status: Value, msg: &str) -> DeployStatusResponse {
    serde_json::from_value(json!({"status": status, "msg": msg})).unwrap()
}

pub fn bad_gateway() -> NavError {
    NavError::HttpStatus {
        status: 502,
        body: "bad gateway".to_string(),
    }
}

/// Sleep that returns immediately and logs the requested delay
pub fn recording_sleep(log: &EventLog) -> impl Fn(Duration) -> Ready<()> {
    let log = log.clone();
    move |delay| {
        log.push(format!("sleep {}ms", delay.as_millis()));
        ready(())
    }
}

/// Deploy API answering from a script, pending once the script runs out
pub struct ScriptedDeployApi {
    log: EventLog,
    trigger: Mutex<Option<Result<DeployStatusResponse, NavError>>>,
    statuses: Mutex<VecDeque<Result<DeployStatusResponse, NavError>>>,
}

impl ScriptedDeployApi {
    pub fn new(
        log: &EventLog,
        trigger: Result<DeployStatusResponse, NavError>,
        statuses: Vec<Result<DeployStatusResponse, NavError>>,
    ) -> Self {
        Self {
            log: log.clone(),
            trigger: Mutex::new(Some(trigger)),
            statuses: Mutex::new(statuses.into()),
        }
    }
}

#[async_trait]
impl DeployApi for ScriptedDeployApi {
    async fn trigger(&self, environment: &str) -> Result<DeployStatusResponse, NavError> {
        self.log.push(format!("POST {}", environment));
        self.trigger
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(response(json!(0), "starting")))
    }

    async fn status(&self) -> Result<DeployStatusResponse, NavError> {
        self.log.push("GET");
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(response(json!(0), "still deploying")))
    }
}

/// Prompter with a fixed answer
pub struct RecordingPrompter {
    log: EventLog,
    answer: bool,
}

impl RecordingPrompter {
    pub fn new(log: &EventLog, answer: bool) -> Self {
        Self {
            log: log.clone(),
            answer,
        }
    }
}

#[async_trait]
impl Prompter for RecordingPrompter {
    async fn confirm(&self, message: &str) -> bool {
        self.log.push(format!("confirm: {}", message));
        self.answer
    }

    async fn notify(&self, message: &str) {
        self.log.push(format!("notify: {}", message));
    }
}

/// Records router, modal, billing and explore calls
pub struct RecordingServices {
    log: EventLog,
}

impl RecordingServices {
    pub fn new(log: &EventLog) -> Self {
        Self { log: log.clone() }
    }
}

impl Router for RecordingServices {
    fn transition_to(&self, route_name: &str) {
        self.log.push(format!("transition: {}", route_name));
    }

    fn refresh_route(&self, route_name: &str) -> Result<(), NavError> {
        self.log.push(format!("refresh: {}", route_name));
        Ok(())
    }
}

impl Modals for RecordingServices {
    fn open(&self, modal: Modal) {
        self.log.push(format!("modal: {:?}", modal));
    }
}

impl Billing for RecordingServices {
    fn open_billing_window(&self, current_url: &str) {
        self.log.push(format!("billing: {}", current_url));
    }
}

impl Explore for RecordingServices {
    fn open_explore_window(&self) {
        self.log.push("explore");
    }
}

/// Member stats returning a fixed count or failing
pub struct FakeMembersStats {
    pub count: Option<u64>,
}

#[async_trait]
impl MembersStats for FakeMembersStats {
    async fn fetch_member_count(&self) -> Result<u64, NavError> {
        self.count
            .ok_or_else(|| NavError::CollaboratorError("members api unavailable".to_string()))
    }
}
