use crate::api::client::RequestOptions;
use crate::core::state::PortalState;
use reqwest::Method;
use tracing::{debug, error, info, warn};

/// Sign out: notify the server, then always clear the session and go to login.
///
/// The server call is best effort; its outcome never blocks local sign-out.
pub async fn logout(state: &PortalState) {
    let endpoint = &state.config.portal.logout_endpoint;

    match state
        .client
        .fetch(endpoint, RequestOptions::new(Method::POST))
        .await
    {
        Ok(response) if response.status().is_success() => {
            info!(endpoint = %endpoint, "Server acknowledged logout");
        }
        Ok(response) => {
            warn!(endpoint = %endpoint, status = %response.status(), "Logout call rejected, clearing session anyway");
        }
        Err(e) => {
            warn!(endpoint = %endpoint, error = %e, "Logout call failed, clearing session anyway");
        }
    }

    if let Err(e) = state.session.clear(state.storage.as_ref()) {
        error!(error = %e, "Failed to clear persisted session");
    }

    state.page.navigate(&state.config.portal.login_path);
}

/// Handle activation (a click) of a page element.
///
/// Signs out when the element is the configured logout trigger and the page
/// actually has it; any other element is ignored. Returns whether logout ran.
pub async fn activate(state: &PortalState, element_id: &str) -> bool {
    let trigger = &state.config.page.logout_trigger_element;
    if element_id != trigger {
        return false;
    }

    if !state.page.has_element(trigger) {
        debug!(element = %trigger, "Logout trigger not on this page");
        return false;
    }

    logout(state).await;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_server;
    use crate::core::state::test_support::state_with;
    use crate::session::storage::{MemoryStorage, SessionStorage, AUTH_TOKEN_KEY, CURRENT_USER_KEY};
    use crate::ui::page::{MemoryPage, Page};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn signed_in_storage() -> Arc<MemoryStorage> {
        Arc::new(MemoryStorage::with_entries([
            (AUTH_TOKEN_KEY, "tok"),
            (CURRENT_USER_KEY, r#"{"full_name":"Dr. Jane Doe"}"#),
        ]))
    }

    fn assert_signed_out(storage: &MemoryStorage, page: &MemoryPage) {
        assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get(CURRENT_USER_KEY).unwrap(), None);
        assert_eq!(page.current_path(), "/login");
        assert_eq!(page.history(), vec!["/login".to_string()]);
    }

    #[tokio::test]
    async fn test_logout_notifies_server_with_token() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let router = Router::new().route(
            "/api/v1/auth/logout",
            post(move |headers: HeaderMap| {
                let seen = Arc::clone(&seen);
                async move {
                    if headers.get("authorization").map(|v| v == "Bearer tok").unwrap_or(false) {
                        seen.fetch_add(1, Ordering::SeqCst);
                    }
                    axum::Json(serde_json::json!({"message": "Successfully logged out"}))
                }
            }),
        );
        let base_url = test_server::spawn(router).await;

        let storage = signed_in_storage();
        let page = Arc::new(MemoryPage::new("/patients"));
        let state = state_with(&base_url, storage.clone(), page.clone());

        logout(&state).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!state.session.is_authenticated());
        assert_signed_out(&storage, &page);
    }

    #[tokio::test]
    async fn test_logout_clears_on_server_error() {
        let router = Router::new().route(
            "/api/v1/auth/logout",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let base_url = test_server::spawn(router).await;

        let storage = signed_in_storage();
        let page = Arc::new(MemoryPage::new("/patients"));
        let state = state_with(&base_url, storage.clone(), page.clone());

        logout(&state).await;

        assert_signed_out(&storage, &page);
    }

    #[tokio::test]
    async fn test_logout_clears_when_unreachable() {
        let storage = signed_in_storage();
        let page = Arc::new(MemoryPage::new("/patients"));
        let state = state_with("http://127.0.0.1:9", storage.clone(), page.clone());

        logout(&state).await;

        assert!(!state.session.is_authenticated());
        assert_signed_out(&storage, &page);
    }

    #[tokio::test]
    async fn test_trigger_activation_signs_out() {
        let storage = signed_in_storage();
        let page = Arc::new(MemoryPage::new("/patients").with_element("logout-btn"));
        let state = state_with("http://127.0.0.1:9", storage.clone(), page.clone());

        assert!(activate(&state, "logout-btn").await);
        assert_signed_out(&storage, &page);
    }

    #[tokio::test]
    async fn test_other_elements_are_ignored() {
        let storage = signed_in_storage();
        let page = Arc::new(
            MemoryPage::new("/patients")
                .with_element("logout-btn")
                .with_element("save-btn"),
        );
        let state = state_with("http://127.0.0.1:9", storage.clone(), page.clone());

        assert!(!activate(&state, "save-btn").await);
        assert!(state.session.is_authenticated());
        assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("tok"));
        assert!(page.history().is_empty());
    }

    #[tokio::test]
    async fn test_missing_trigger_is_ignored() {
        let storage = signed_in_storage();
        let page = Arc::new(MemoryPage::new("/patients"));
        let state = state_with("http://127.0.0.1:9", storage.clone(), page.clone());

        assert!(!activate(&state, "logout-btn").await);
        assert!(state.session.is_authenticated());
        assert!(page.history().is_empty());
    }
}
