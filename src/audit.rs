//! OCSF (Open Cybersecurity Schema Framework) authentication audit events.
//!
//! Emitted through `tracing` on the `ocsf` target as one JSON line each.
//! Events carry the user's email at most; token values never appear.

use serde_json::{Value, json};
use std::time::{SystemTime, UNIX_EPOCH};

pub const CLASS_AUTHENTICATION: u32 = 3001;

pub const SEVERITY_INFORMATIONAL: u32 = 1;
pub const SEVERITY_MEDIUM: u32 = 3;

pub const STATUS_SUCCESS: u32 = 1;
pub const STATUS_FAILURE: u32 = 2;

/// Bearer tokens issued by the upstream; OCSF has no closer protocol id.
const AUTH_PROTOCOL_OTHER: u32 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Logon,
    Logoff,
    /// Token refresh.
    ServiceTicket,
}

impl Activity {
    fn id(self) -> u32 {
        match self {
            Activity::Logon => 1,
            Activity::Logoff => 2,
            Activity::ServiceTicket => 4,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Activity::Logon => "Logon",
            Activity::Logoff => "Logoff",
            Activity::ServiceTicket => "Service Ticket",
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Build an OCSF Authentication (3001) event.
pub fn build_event(
    activity: Activity,
    success: bool,
    user_email: Option<&str>,
    message: &str,
) -> Value {
    let (status_id, status, severity_id, severity) = if success {
        (STATUS_SUCCESS, "Success", SEVERITY_INFORMATIONAL, "Informational")
    } else {
        (STATUS_FAILURE, "Failure", SEVERITY_MEDIUM, "Medium")
    };

    let mut event = json!({
        "class_uid": CLASS_AUTHENTICATION,
        "class_name": "Authentication",
        "activity_id": activity.id(),
        "activity_name": activity.name(),
        "severity_id": severity_id,
        "severity": severity,
        "status_id": status_id,
        "status": status,
        "time": now_millis(),
        "metadata": {
            "product": {
                "name": "auth-relay",
                "version": env!("CARGO_PKG_VERSION"),
            }
        },
        "auth_protocol_id": AUTH_PROTOCOL_OTHER,
        "auth_protocol": "Bearer",
        "message": message,
    });

    if let Some(email) = user_email.filter(|e| !e.is_empty()) {
        event["actor"] = json!({
            "user": {
                "email_addr": email,
                "type_id": 1,
                "type": "User"
            }
        });
    }

    event
}

/// Emit an authentication event. Never panics.
pub fn authentication_event(
    activity: Activity,
    success: bool,
    user_email: Option<&str>,
    message: &str,
) {
    let event = build_event(activity, success, user_email, message);
    if let Ok(json) = serde_json::to_string(&event) {
        tracing::info!(target: "ocsf", "{}", json);
    }
}
