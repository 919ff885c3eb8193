//! Navigation visibility flags
//!
//! Flags are a pure function of a [`NavSnapshot`], recomputed whenever the
//! router, session or config changes.

use serde::{Deserialize, Serialize};

/// Staff role of the signed in user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Administrator,
    Editor,
    Author,
    Contributor,
}

/// Session user as seen by the menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub role: Role,
}

impl SessionUser {
    pub fn new(role: Role) -> Self {
        Self { role }
    }

    /// Owners are administrators too
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Owner | Role::Administrator)
    }

    pub fn is_owner_only(&self) -> bool {
        self.role == Role::Owner
    }

    pub fn is_editor(&self) -> bool {
        self.role == Role::Editor
    }

    pub fn is_contributor(&self) -> bool {
        self.role == Role::Contributor
    }
}

/// Config values the menu depends on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavConfig {
    pub client_extensions_menu: bool,
    pub billing_enabled: bool,
}

/// Router, session and config state at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavSnapshot {
    pub route_name: String,
    pub current_url: String,
    pub user: Option<SessionUser>,
    pub config: NavConfig,
}

/// Derived navigation flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NavFlags {
    pub is_integration_route: bool,
    pub is_on_site: bool,
    pub show_tags_navigation: bool,
    pub show_menu_extension: bool,
    pub show_billing: bool,
}

impl NavFlags {
    pub fn from_snapshot(snapshot: &NavSnapshot) -> Self {
        let user = snapshot.user.as_ref();

        Self {
            is_integration_route: snapshot.route_name.starts_with("settings.integration"),
            // link-to does not mark the site link active right after login
            is_on_site: snapshot.route_name == "site",
            show_tags_navigation: user.is_some_and(|u| u.is_admin() || u.is_editor()),
            show_menu_extension: snapshot.config.client_extensions_menu
                && user.is_some_and(SessionUser::is_owner_only),
            show_billing: snapshot.config.billing_enabled,
        }
    }
}
