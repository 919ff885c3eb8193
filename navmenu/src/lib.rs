//! Admin navigation menu
//!
//! Icon resolution, visibility flags, shortcuts and the deploy-status poller
//! behind the admin navigation bar.

pub mod app;
pub mod deploy;
pub mod errors;
pub mod http;
pub mod logs;
pub mod nav;
pub mod services;
pub mod storage;
pub mod utils;
