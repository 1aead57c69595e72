use crate::core::state::PortalState;
use tracing::{debug, info};

/// What page-load bootstrapping did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The login view needs no session
    LoginView,
    /// No token: sent to the login view, nothing else initialized
    RedirectedToLogin,
    Ready {
        /// Whether the user's name was written into the page
        user_name_shown: bool,
        /// Whether the page offers a logout trigger
        logout_available: bool,
    },
}

/// Check the session on page load.
///
/// Any page other than the login view requires a token; without one the
/// page is sent to the login view before anything else happens.
pub fn bootstrap(state: &PortalState) -> BootstrapOutcome {
    let path = state.page.current_path();

    if is_login_view(&path) {
        debug!(path = %path, "Login view, skipping session check");
        return BootstrapOutcome::LoginView;
    }

    if !state.session.is_authenticated() {
        info!(path = %path, "No session token, redirecting to login");
        state.page.navigate(&state.config.portal.login_path);
        return BootstrapOutcome::RedirectedToLogin;
    }

    let user = state.session.user();
    let user_name_shown = match user.display_name() {
        Some(name) => state
            .page
            .set_text_content(&state.config.page.current_user_element, name),
        None => false,
    };

    let logout_available = state
        .page
        .has_element(&state.config.page.logout_trigger_element);

    debug!(path = %path, user_name_shown, logout_available, "Session bootstrap complete");

    BootstrapOutcome::Ready {
        user_name_shown,
        logout_available,
    }
}

fn is_login_view(path: &str) -> bool {
    path.contains("login")
}
