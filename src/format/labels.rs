//! Display labels and CSS classes for the portal's domain enums.
//!
//! Each enum is a closed set plus `Unknown(raw)` for values this client
//! does not know yet. Unknown values are labelled with [`humanize`] and get
//! no CSS class.

use std::fmt;

/// Capitalize the first character and replace the first underscore after it
/// with a space.
///
/// Only one underscore is replaced: `"home_visit_call"` becomes
/// `"Home visit_call"`. Existing labels depend on this exact output.
pub fn humanize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.as_str().replacen('_', " ", 1);
            format!("{}{}", first.to_uppercase(), rest)
        }
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProtocolType {
    Cancer,
    HeartFailure,
    Copd,
    General,
    Unknown(String),
}

impl ProtocolType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "cancer" => ProtocolType::Cancer,
            "heart_failure" => ProtocolType::HeartFailure,
            "copd" => ProtocolType::Copd,
            "general" => ProtocolType::General,
            other => ProtocolType::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ProtocolType::Cancer => "cancer",
            ProtocolType::HeartFailure => "heart_failure",
            ProtocolType::Copd => "copd",
            ProtocolType::General => "general",
            ProtocolType::Unknown(raw) => raw,
        }
    }

    pub fn label(&self) -> String {
        match self {
            ProtocolType::Cancer => "Cancer".to_string(),
            ProtocolType::HeartFailure => "Heart Failure".to_string(),
            ProtocolType::Copd => "COPD".to_string(),
            ProtocolType::General => "General".to_string(),
            ProtocolType::Unknown(raw) => humanize(raw),
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ProtocolType::Cancer => "protocol-cancer",
            ProtocolType::HeartFailure => "protocol-heart-failure",
            ProtocolType::Copd => "protocol-copd",
            ProtocolType::General => "protocol-general",
            ProtocolType::Unknown(_) => "",
        }
    }

    /// Full name the care team uses for the protocol, where one is defined
    pub fn standard_name(&self) -> Option<&'static str> {
        match self {
            ProtocolType::Cancer => Some("Cancer Palliative Care Protocol"),
            ProtocolType::HeartFailure => Some("Heart Failure Palliative Care Protocol"),
            ProtocolType::Copd => Some("COPD Palliative Care Protocol"),
            ProtocolType::General => None,
            ProtocolType::Unknown(raw) => match raw.to_lowercase().as_str() {
                "fit" => Some("FIT Protocol - Wellness Monitoring"),
                _ => None,
            },
        }
    }

    /// Standard name for a raw value or enum name (`"copd"`, `"HEART_FAILURE"`)
    pub fn standard_name_for(raw: &str) -> Option<&'static str> {
        Self::parse(&raw.to_lowercase()).standard_name()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CallType {
    Assessment,
    FollowUp,
    MedicationCheck,
    Unknown(String),
}

impl CallType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "assessment" => CallType::Assessment,
            "follow_up" => CallType::FollowUp,
            "medication_check" => CallType::MedicationCheck,
            other => CallType::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CallType::Assessment => "assessment",
            CallType::FollowUp => "follow_up",
            CallType::MedicationCheck => "medication_check",
            CallType::Unknown(raw) => raw,
        }
    }

    pub fn label(&self) -> String {
        match self {
            CallType::Assessment => "Assessment".to_string(),
            CallType::FollowUp => "Follow-up".to_string(),
            CallType::MedicationCheck => "Medication Check".to_string(),
            CallType::Unknown(raw) => humanize(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CallStatus {
    Scheduled,
    InProgress,
    Completed,
    Missed,
    Cancelled,
    Unknown(String),
}

impl CallStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "scheduled" => CallStatus::Scheduled,
            "in_progress" => CallStatus::InProgress,
            "completed" => CallStatus::Completed,
            "missed" => CallStatus::Missed,
            "cancelled" => CallStatus::Cancelled,
            other => CallStatus::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CallStatus::Scheduled => "scheduled",
            CallStatus::InProgress => "in_progress",
            CallStatus::Completed => "completed",
            CallStatus::Missed => "missed",
            CallStatus::Cancelled => "cancelled",
            CallStatus::Unknown(raw) => raw,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            CallStatus::Scheduled => "call-scheduled",
            CallStatus::InProgress => "call-in-progress",
            CallStatus::Completed => "call-completed",
            CallStatus::Missed => "call-missed",
            CallStatus::Cancelled => "call-cancelled",
            CallStatus::Unknown(_) => "",
        }
    }
}

macro_rules! impl_from_str_and_display {
    ($($ty:ty),*) => {$(
        impl From<&str> for $ty {
            fn from(raw: &str) -> Self {
                Self::parse(raw)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    )*};
}

impl_from_str_and_display!(ProtocolType, CallType, CallStatus);

// Raw-value helpers: a missing or empty value renders as an empty string.

pub fn format_protocol_type(raw: Option<&str>) -> String {
    present(raw).map(|r| ProtocolType::parse(r).label()).unwrap_or_default()
}

pub fn protocol_class(raw: Option<&str>) -> &'static str {
    present(raw).map(|r| ProtocolType::parse(r).css_class()).unwrap_or("")
}

pub fn format_call_type(raw: Option<&str>) -> String {
    present(raw).map(|r| CallType::parse(r).label()).unwrap_or_default()
}

pub fn call_status_class(raw: Option<&str>) -> &'static str {
    present(raw).map(|r| CallStatus::parse(r).css_class()).unwrap_or("")
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.filter(|r| !r.is_empty())
}
