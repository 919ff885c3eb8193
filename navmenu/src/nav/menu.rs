//! The navigation menu

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::deploy::poller::{DeployHandle, DeployPoller};
use crate::errors::NavError;
use crate::nav::flags::{NavFlags, NavSnapshot};
use crate::nav::icon::{IconResolver, IconStyle};
use crate::nav::shortcuts::{KeyEvent, NavAction, Shortcuts};
use crate::services::admin::{Billing, Explore, MembersStats, Modal, Modals, Router};

/// Services the menu delegates to
#[derive(Clone)]
pub struct NavServices {
    pub router: Arc<dyn Router>,
    pub modals: Arc<dyn Modals>,
    pub billing: Arc<dyn Billing>,
    pub explore: Arc<dyn Explore>,
    pub members_stats: Arc<dyn MembersStats>,
}

/// Navigation menu state and actions
pub struct NavMenu {
    services: NavServices,
    deploy_poller: Arc<DeployPoller>,
    icon: IconResolver,
    snapshot: NavSnapshot,
    flags: NavFlags,
    shortcuts: Shortcuts,
    member_count_loading: Arc<AtomicBool>,
}

impl NavMenu {
    pub fn new(services: NavServices, deploy_poller: Arc<DeployPoller>) -> Result<Self, NavError> {
        Ok(Self {
            services,
            deploy_poller,
            icon: IconResolver::new(),
            snapshot: NavSnapshot::default(),
            flags: NavFlags::default(),
            shortcuts: Shortcuts::with_defaults()?,
            member_count_loading: Arc::new(AtomicBool::new(true)),
        })
    }

    pub fn icon_style(&self) -> &IconStyle {
        self.icon.current()
    }

    pub fn flags(&self) -> NavFlags {
        self.flags
    }

    pub fn snapshot(&self) -> &NavSnapshot {
        &self.snapshot
    }

    pub fn shortcuts(&self) -> &Shortcuts {
        &self.shortcuts
    }

    pub fn member_count_loading(&self) -> bool {
        self.member_count_loading.load(Ordering::SeqCst)
    }

    /// Replace the router/session/config snapshot and recompute flags
    pub fn update_snapshot(&mut self, snapshot: NavSnapshot) {
        self.flags = NavFlags::from_snapshot(&snapshot);
        self.snapshot = snapshot;
    }

    /// Attribute update from the host.
    ///
    /// The icon style is only recomputed when the icon changes. Admins get a
    /// member count refresh, whose task handle is returned.
    pub fn did_receive_attrs(
        &mut self,
        icon: Option<&str>,
        snapshot: NavSnapshot,
    ) -> Option<JoinHandle<bool>> {
        if let Some(style) = self.icon.resolve(icon) {
            debug!("Icon style updated: {}", style.style);
        }
        self.update_snapshot(snapshot);

        let is_admin = self.snapshot.user.as_ref().is_some_and(|u| u.is_admin());
        is_admin.then(|| self.load_member_counts())
    }

    /// Fetch the member count in the background.
    ///
    /// The loading flag is cleared on success only; the task yields `false`
    /// when the fetch fails.
    pub fn load_member_counts(&self) -> JoinHandle<bool> {
        let loading = self.member_count_loading.clone();
        let members_stats = self.services.members_stats.clone();

        tokio::spawn(async move {
            loading.store(true, Ordering::SeqCst);
            match members_stats.fetch_member_count().await {
                Ok(count) => {
                    debug!("Member count loaded: {}", count);
                    loading.store(false, Ordering::SeqCst);
                    true
                }
                Err(e) => {
                    error!("Failed to load member count: {}", e);
                    false
                }
            }
        })
    }

    pub fn did_insert_element(&mut self) {
        self.shortcuts.register();
    }

    pub fn will_destroy_element(&mut self) {
        self.shortcuts.remove();
    }

    /// Route a key press through the registered shortcuts
    pub fn handle_key(&self, event: &KeyEvent) -> Option<NavAction> {
        let action = self.shortcuts.dispatch(event)?;
        self.perform(action);
        Some(action)
    }

    pub fn perform(&self, action: NavAction) {
        match action {
            NavAction::OpenSearchModal => self.open_search_modal(),
        }
    }

    pub fn transition_to_or_refresh_site(&self) -> Result<(), NavError> {
        let route_name = self.snapshot.route_name.as_str();
        if route_name == "site" {
            return self.services.router.refresh_route(route_name);
        }

        let is_contributor = self
            .snapshot
            .user
            .as_ref()
            .is_some_and(|u| u.is_contributor());
        if is_contributor {
            self.services.router.transition_to("posts");
        } else {
            self.services.router.transition_to("site");
        }
        Ok(())
    }

    pub fn open_search_modal(&self) {
        self.services.modals.open(Modal::Search);
    }

    pub fn toggle_billing_modal(&self) {
        self.services
            .billing
            .open_billing_window(&self.snapshot.current_url);
    }

    pub fn toggle_explore_window(&self) {
        self.services.explore.open_explore_window();
    }

    /// Start a deploy of `environment` without waiting for it
    pub fn deploy_changes(&self, environment: &str) -> DeployHandle {
        info!("Deploy of {} requested from the menu", environment);
        self.deploy_poller.spawn_deploy(environment)
    }
}
