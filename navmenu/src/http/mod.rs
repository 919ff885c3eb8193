//! Admin API HTTP access

pub mod client;
pub mod deploy_changes;
