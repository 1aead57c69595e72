use crate::api::client::{RequestOptions, JSON_CONTENT_TYPE};
use crate::core::error::{SubmitError, GENERIC_ERROR_MESSAGE};
use crate::core::state::PortalState;
use crate::forms::serialize::serialize_fields;
use crate::ui::alert::Severity;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde_json::Value;
use std::sync::Mutex;
use tracing::{debug, error};

pub type SuccessHandler = Box<dyn Fn(&Value) + Send + Sync>;
pub type ErrorHandler = Box<dyn Fn(&SubmitError) + Send + Sync>;

/// Where a form is in its submit cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Submits a form's fields as JSON to a portal endpoint.
///
/// Each submission ends in exactly one handler call: the success handler with
/// the parsed response body, or the error handler. Without an error handler,
/// failures are shown as a danger alert.
pub struct FormSubmitter {
    portal: PortalState,
    endpoint: String,
    method: Method,
    on_success: Option<SuccessHandler>,
    on_error: Option<ErrorHandler>,
    state: Mutex<SubmitState>,
}

impl FormSubmitter {
    pub fn new(portal: PortalState, endpoint: impl Into<String>) -> Self {
        Self {
            portal,
            endpoint: endpoint.into(),
            method: Method::POST,
            on_success: None,
            on_error: None,
            state: Mutex::new(SubmitState::Idle),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn on_success(mut self, handler: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(handler));
        self
    }

    pub fn on_error(mut self, handler: impl Fn(&SubmitError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(handler));
        self
    }

    pub fn state(&self) -> SubmitState {
        self.state
            .lock()
            .map(|state| *state)
            .unwrap_or(SubmitState::Idle)
    }

    fn set_state(&self, next: SubmitState) {
        if let Ok(mut state) = self.state.lock() {
            *state = next;
        }
    }

    /// Submit `fields`, run the matching handler, and return to idle
    pub async fn submit<K, V>(&self, fields: &[(K, V)]) -> Result<Value, SubmitError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.set_state(SubmitState::Submitting);

        let result = self.send(Value::Object(serialize_fields(fields))).await;

        match &result {
            Ok(data) => {
                self.set_state(SubmitState::Succeeded);
                debug!(endpoint = %self.endpoint, "Form submitted");

                if let Some(handler) = &self.on_success {
                    handler(data);
                }
            }
            Err(e) => {
                self.set_state(SubmitState::Failed);
                error!(endpoint = %self.endpoint, method = %self.method, error = %e, "Form submission error");

                match &self.on_error {
                    Some(handler) => handler(e),
                    None => {
                        self.portal.alerts.show(e.message(), Severity::Danger);
                    }
                }
            }
        }

        self.set_state(SubmitState::Idle);
        result
    }

    async fn send(&self, body: Value) -> Result<Value, SubmitError> {
        let options = RequestOptions::new(self.method.clone())
            .header(CONTENT_TYPE.as_str(), JSON_CONTENT_TYPE)
            .json(&body)
            .map_err(|e| SubmitError::InvalidResponse(e.to_string()))?;

        let response = self.portal.client.fetch(&self.endpoint, options).await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| error_message(&body))
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());

            return Err(SubmitError::Rejected { status, message });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SubmitError::InvalidResponse(e.to_string()))
    }
}

/// The non-empty `message` string of an error body
fn error_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_server;
    use crate::core::state::test_support::state_with;
    use crate::session::storage::{MemoryStorage, AUTH_TOKEN_KEY};
    use crate::ui::page::MemoryPage;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{post, put};
    use axum::{Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn portal(base_url: &str) -> (PortalState, Arc<MemoryPage>) {
        let storage = Arc::new(MemoryStorage::with_entries([(AUTH_TOKEN_KEY, "tok")]));
        let page = Arc::new(MemoryPage::new("/patients/new").with_element("alert-container"));
        (state_with(base_url, storage, page.clone()), page)
    }

    async fn server() -> String {
        let router = Router::new()
            .route(
                "/api/v1/patients",
                post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                    let authorized = headers
                        .get("authorization")
                        .map(|v| v == "Bearer tok")
                        .unwrap_or(false);
                    (
                        StatusCode::CREATED,
                        Json(json!({"id": 12, "received": body, "authorized": authorized})),
                    )
                }),
            )
            .route(
                "/api/v1/patients/12",
                put(|| async {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({"error": "Bad Request", "message": "Phone number is required"})),
                    )
                }),
            )
            .route(
                "/api/v1/broken",
                post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "Traceback...") }),
            )
            .route(
                "/api/v1/no-message",
                post(|| async { (StatusCode::FORBIDDEN, Json(json!({"error": "Forbidden"}))) }),
            );
        test_server::spawn(router).await
    }

    fn counting() -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
        (Arc::new(AtomicUsize::new(0)), Arc::new(AtomicUsize::new(0)))
    }

    #[tokio::test]
    async fn test_success_calls_success_handler_once() {
        let base_url = server().await;
        let (state, page) = portal(&base_url);
        let (successes, failures) = counting();
        let received = Arc::new(Mutex::new(Value::Null));

        let submitter = {
            let successes = Arc::clone(&successes);
            let failures = Arc::clone(&failures);
            let received = Arc::clone(&received);
            FormSubmitter::new(state, "/api/v1/patients")
                .on_success(move |data| {
                    successes.fetch_add(1, Ordering::SeqCst);
                    *received.lock().unwrap() = data.clone();
                })
                .on_error(move |_| {
                    failures.fetch_add(1, Ordering::SeqCst);
                })
        };

        let result = submitter
            .submit(&[("first_name", "Alice"), ("address[city]", "Springfield")])
            .await;

        assert!(result.is_ok());
        assert_eq!(successes.load(Ordering::SeqCst), 1);
        assert_eq!(failures.load(Ordering::SeqCst), 0);
        assert_eq!(submitter.state(), SubmitState::Idle);

        let data = received.lock().unwrap().clone();
        assert_eq!(data["id"], 12);
        assert_eq!(data["authorized"], true);
        assert_eq!(
            data["received"],
            json!({"first_name": "Alice", "address": {"city": "Springfield"}})
        );
        assert!(page.banners_in("alert-container").is_empty());
    }

    #[tokio::test]
    async fn test_rejection_uses_server_message() {
        let base_url = server().await;
        let (state, _page) = portal(&base_url);
        let (successes, failures) = counting();
        let last_error = Arc::new(Mutex::new(None));

        let submitter = {
            let successes = Arc::clone(&successes);
            let failures = Arc::clone(&failures);
            let last_error = Arc::clone(&last_error);
            FormSubmitter::new(state, "/api/v1/patients/12")
                .method(Method::PUT)
                .on_success(move |_| {
                    successes.fetch_add(1, Ordering::SeqCst);
                })
                .on_error(move |e| {
                    failures.fetch_add(1, Ordering::SeqCst);
                    *last_error.lock().unwrap() = Some(e.clone());
                })
        };

        let err = submitter.submit(&[("phone", "")]).await.unwrap_err();

        assert_eq!(err.message(), "Phone number is required");
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(successes.load(Ordering::SeqCst), 0);
        assert_eq!(failures.load(Ordering::SeqCst), 1);
        assert_eq!(
            last_error.lock().unwrap().as_ref().map(|e| e.message()),
            Some("Phone number is required".to_string())
        );
    }

    #[tokio::test]
    async fn test_unparseable_error_body_uses_fallback() {
        let base_url = server().await;
        let (state, _page) = portal(&base_url);

        let submitter = FormSubmitter::new(state, "/api/v1/broken").on_error(|_| {});
        let err = submitter.submit(&[("a", "b")]).await.unwrap_err();

        assert_eq!(err.message(), GENERIC_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_missing_message_field_uses_fallback() {
        let base_url = server().await;
        let (state, _page) = portal(&base_url);

        let submitter = FormSubmitter::new(state, "/api/v1/no-message").on_error(|_| {});
        let err = submitter.submit(&[("a", "b")]).await.unwrap_err();

        assert_eq!(err.message(), GENERIC_ERROR_MESSAGE);
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    }

    #[tokio::test]
    async fn test_failure_without_handler_shows_danger_alert() {
        let base_url = server().await;
        let (state, page) = portal(&base_url);

        let submitter = FormSubmitter::new(state, "/api/v1/patients/12").method(Method::PUT);
        let result = submitter.submit(&[("phone", "")]).await;
        assert!(result.is_err());

        let banners = page.banners_in("alert-container");
        assert_eq!(banners.len(), 1);
        assert!(banners[0].has_class("alert-danger"));
        assert!(banners[0].html.starts_with("Phone number is required"));
    }

    #[tokio::test]
    async fn test_network_failure_reaches_error_handler() {
        let (state, _page) = portal("http://127.0.0.1:9");
        let (_, failures) = counting();

        let submitter = {
            let failures = Arc::clone(&failures);
            FormSubmitter::new(state, "/api/v1/patients").on_error(move |e| {
                assert!(matches!(e, SubmitError::Network(_)));
                failures.fetch_add(1, Ordering::SeqCst);
            })
        };

        assert!(submitter.submit(&[("a", "b")]).await.is_err());
        assert_eq!(failures.load(Ordering::SeqCst), 1);
        assert_eq!(submitter.state(), SubmitState::Idle);
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(&json!({"message": "Nope"})).as_deref(), Some("Nope"));
        assert_eq!(error_message(&json!({"message": ""})), None);
        assert_eq!(error_message(&json!({"error": "Nope"})), None);
        assert_eq!(error_message(&json!("plain")), None);
    }
}
