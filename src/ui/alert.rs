use crate::core::config::AlertConfig;
use crate::ui::page::Page;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Class that keeps a banner visible; removing it starts the fade-out
pub const SHOW_CLASS: &str = "show";

/// Handle to a banner inserted into a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BannerId(pub u64);

/// Banner severity, rendered as `alert-<severity>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Severity {
    Success,
    Danger,
    Warning,
    #[default]
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Danger => "danger",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Banner body. Plain text is escaped; trusted markup is inserted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertContent {
    Text(String),
    Trusted(String),
}

impl AlertContent {
    pub fn to_html(&self) -> String {
        match self {
            AlertContent::Text(text) => escape_html(text),
            AlertContent::Trusted(markup) => markup.clone(),
        }
    }
}

impl From<&str> for AlertContent {
    fn from(text: &str) -> Self {
        AlertContent::Text(text.to_string())
    }
}

impl From<String> for AlertContent {
    fn from(text: String) -> Self {
        AlertContent::Text(text)
    }
}

/// A dismissible alert element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub classes: Vec<String>,
    pub role: String,
    pub html: String,
}

impl Banner {
    pub fn new(content: &AlertContent, severity: &Severity) -> Self {
        let classes = [
            "alert".to_string(),
            format!("alert-{}", severity),
            "alert-dismissible".to_string(),
            "fade".to_string(),
            SHOW_CLASS.to_string(),
        ];

        Self {
            classes: classes.to_vec(),
            role: "alert".to_string(),
            html: format!(
                "{}<button type=\"button\" class=\"btn-close\" data-bs-dismiss=\"alert\" aria-label=\"Close\"></button>",
                content.to_html()
            ),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Renders transient alert banners into a page
#[derive(Clone)]
pub struct AlertService {
    page: Arc<dyn Page>,
    container_id: String,
    duration: Duration,
    fade: Duration,
}

impl AlertService {
    pub fn new(page: Arc<dyn Page>, config: &AlertConfig) -> Self {
        Self {
            page,
            container_id: config.container_id.clone(),
            duration: Duration::from_millis(config.duration_ms),
            fade: Duration::from_millis(config.fade_ms),
        }
    }

    /// Show a banner in the default container with the default duration
    pub fn show(&self, content: impl Into<AlertContent>, severity: Severity) -> Option<BannerId> {
        self.show_in(content, severity, &self.container_id, self.duration)
    }

    /// Show a banner in `container_id`.
    ///
    /// A zero `duration` keeps the banner until dismissed. A missing container
    /// is logged and nothing is inserted.
    pub fn show_in(
        &self,
        content: impl Into<AlertContent>,
        severity: Severity,
        container_id: &str,
        duration: Duration,
    ) -> Option<BannerId> {
        let banner = Banner::new(&content.into(), &severity);

        let Some(id) = self.page.append_banner(container_id, banner) else {
            error!(container_id, "Alert container not found");
            return None;
        };

        debug!(banner = id.0, %severity, container_id, "Alert shown");

        if !duration.is_zero() {
            self.schedule_removal(id, duration);
        }

        Some(id)
    }

    fn schedule_removal(&self, id: BannerId, duration: Duration) {
        let page = Arc::clone(&self.page);
        let fade = self.fade;

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(duration).await;
                    page.remove_banner_class(id, SHOW_CLASS);

                    tokio::time::sleep(fade).await;
                    page.remove_banner(id);
                    debug!(banner = id.0, "Alert removed");
                });
            }
            Err(_) => {
                warn!(banner = id.0, "No async runtime available, alert will not auto-hide");
            }
        }
    }
}
