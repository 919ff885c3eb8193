//! Admin application services consumed by the menu

use async_trait::async_trait;

use crate::errors::NavError;

/// Modals the menu can open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Search,
}

/// Application router
pub trait Router: Send + Sync {
    /// Navigate to a named route
    fn transition_to(&self, route_name: &str);

    /// Re-run the model hooks of the active route
    fn refresh_route(&self, route_name: &str) -> Result<(), NavError>;
}

/// Modal manager
pub trait Modals: Send + Sync {
    fn open(&self, modal: Modal);
}

/// Billing window
pub trait Billing: Send + Sync {
    /// Open the billing window, returning to `current_url` when it closes
    fn open_billing_window(&self, current_url: &str);
}

/// Explore window
pub trait Explore: Send + Sync {
    fn open_explore_window(&self);
}

/// Member statistics backend
#[async_trait]
pub trait MembersStats: Send + Sync {
    async fn fetch_member_count(&self) -> Result<u64, NavError>;
}
