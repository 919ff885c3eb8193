//! Finite State Machine for a deploy cycle

use serde::{Deserialize, Serialize};

/// Deploy cycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployCycleState {
    /// No cycle running
    Idle,

    /// Waiting for the user to confirm
    Confirming,

    /// Trigger request in flight
    Triggering,

    /// Polling the status endpoint
    Polling,
}

/// Deploy cycle event
#[derive(Debug, Clone)]
pub enum DeployCycleEvent {
    /// Ask the user for confirmation
    Confirm,

    /// User declined
    Declined,

    /// User confirmed, send the trigger
    Trigger,

    /// Trigger response received
    Triggered,

    /// Status poll reported pending
    Pending,

    /// Status poll reported complete
    Complete,

    /// A single status poll failed
    PollFailed(String),

    /// The cycle failed for good
    Failed(String),

    /// The cycle was cancelled
    Cancel,
}

/// Deploy cycle FSM
#[derive(Debug, Clone)]
pub struct DeployCycleFsm {
    state: DeployCycleState,
    error: Option<String>,
    poll_count: u32,
    consecutive_failures: u32,
}

impl DeployCycleFsm {
    /// Create a new FSM in idle state
    pub fn new() -> Self {
        Self {
            state: DeployCycleState::Idle,
            error: None,
            poll_count: 0,
            consecutive_failures: 0,
        }
    }

    /// Get current state
    pub fn state(&self) -> DeployCycleState {
        self.state
    }

    /// Get the last error message if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Number of answered status polls in the current cycle
    pub fn poll_count(&self) -> u32 {
        self.poll_count
    }

    /// Number of status polls that failed in a row
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Whether a cycle is in progress
    pub fn is_active(&self) -> bool {
        self.state != DeployCycleState::Idle
    }

    /// Process an event and transition state
    pub fn process(&mut self, event: DeployCycleEvent) -> Result<(), String> {
        let new_state = match (&self.state, &event) {
            // From Idle
            (DeployCycleState::Idle, DeployCycleEvent::Confirm) => {
                self.error = None;
                self.poll_count = 0;
                self.consecutive_failures = 0;
                DeployCycleState::Confirming
            }

            // From Confirming
            (DeployCycleState::Confirming, DeployCycleEvent::Declined) => DeployCycleState::Idle,
            (DeployCycleState::Confirming, DeployCycleEvent::Trigger) => {
                DeployCycleState::Triggering
            }
            (DeployCycleState::Confirming, DeployCycleEvent::Cancel) => DeployCycleState::Idle,

            // From Triggering
            (DeployCycleState::Triggering, DeployCycleEvent::Triggered) => {
                DeployCycleState::Polling
            }
            (DeployCycleState::Triggering, DeployCycleEvent::Failed(err)) => {
                self.error = Some(err.clone());
                DeployCycleState::Idle
            }
            (DeployCycleState::Triggering, DeployCycleEvent::Cancel) => DeployCycleState::Idle,

            // From Polling
            (DeployCycleState::Polling, DeployCycleEvent::Pending) => {
                self.poll_count += 1;
                self.consecutive_failures = 0;
                DeployCycleState::Polling
            }
            (DeployCycleState::Polling, DeployCycleEvent::Complete) => {
                self.poll_count += 1;
                self.consecutive_failures = 0;
                DeployCycleState::Idle
            }
            (DeployCycleState::Polling, DeployCycleEvent::PollFailed(err)) => {
                self.error = Some(err.clone());
                self.consecutive_failures += 1;
                DeployCycleState::Polling
            }
            (DeployCycleState::Polling, DeployCycleEvent::Failed(err)) => {
                self.error = Some(err.clone());
                DeployCycleState::Idle
            }
            (DeployCycleState::Polling, DeployCycleEvent::Cancel) => DeployCycleState::Idle,

            // Invalid transitions
            (state, event) => {
                return Err(format!("Invalid transition: {:?} -> {:?}", state, event));
            }
        };

        self.state = new_state;
        Ok(())
    }

    /// Check if another failed poll may be retried
    pub fn can_retry(&self, max_failures: u32) -> bool {
        self.state == DeployCycleState::Polling && self.consecutive_failures < max_failures
    }

    /// Force the machine back to idle, keeping the last error
    pub fn reset(&mut self) {
        self.state = DeployCycleState::Idle;
    }
}

impl Default for DeployCycleFsm {
    fn default() -> Self {
        Self::new()
    }
}
