// Portal client state (PortalState)

use crate::api::client::AuthClient;
use crate::core::config::Config;
use crate::session::context::SessionContext;
use crate::session::storage::SessionStorage;
use crate::ui::alert::AlertService;
use crate::ui::page::Page;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Everything a page needs to talk to the portal.
///
/// Built once per page load and handed to the session and form operations
/// instead of relying on page-wide globals. Cloning is cheap.
#[derive(Clone)]
pub struct PortalState {
    /// Configuration
    pub config: Arc<Config>,

    /// Durable storage the session was loaded from
    pub storage: Arc<dyn SessionStorage>,

    /// Token and current user, read once at startup
    pub session: Arc<SessionContext>,

    /// HTTP client carrying the session headers
    pub client: AuthClient,

    /// The page being driven
    pub page: Arc<dyn Page>,

    /// Alert banner renderer for `page`
    pub alerts: AlertService,
}

impl PortalState {
    pub fn new(config: Config, storage: Arc<dyn SessionStorage>, page: Arc<dyn Page>) -> Result<Self> {
        let config = Arc::new(config);

        let session = Arc::new(
            SessionContext::load(storage.as_ref()).context("Failed to load persisted session")?,
        );

        let client = AuthClient::new(&config.portal, Arc::clone(&session))?;

        let alerts = AlertService::new(Arc::clone(&page), &config.alerts);

        Ok(Self {
            config,
            storage,
            session,
            client,
            page,
            alerts,
        })
    }
}
