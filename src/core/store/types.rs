use serde::{Deserialize, Serialize};

use crate::core::status::StatusValue;

/// One user-submitted task, as persisted in the `requests` table. The content
/// fields are immutable after creation; only the agent rewrites `status` and
/// `summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub callback_number: String,
    pub number_to_call: Option<String>,
    pub preferred_time: String,
    pub status: StatusValue,
    pub summary: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Owner-supplied fields for a new request. Status is deliberately absent:
/// the store forces `queued` no matter what the caller sends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRequest {
    pub title: String,
    pub description: String,
    pub callback_number: String,
    pub number_to_call: Option<String>,
    pub preferred_time: String,
}

/// One append-only timeline entry written by the agent while it works a
/// request. Never updated, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub request_id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub message: String,
    pub created_at: String,
}

/// Per-user contact defaults, upserted by user id and forwarded to the agent
/// when a request is escalated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub username: String,
    pub default_callback_number: String,
    pub street: String,
    pub house_number: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
    pub calendar_connected: bool,
}
