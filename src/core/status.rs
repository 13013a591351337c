use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// The closed set of lifecycle states a request can be in. Only the external
/// calling agent moves a request past `Queued`; the rest of the system treats
/// whatever it observes as authoritative and never rejects a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Queued,
    OutsideBusinessHours,
    Calling,
    InProgress,
    WaitingForCallback,
    Booked,
    Failed,
    Canceled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown request status '{0}'")]
pub struct UnknownStatus(pub String);

/// Which kanban column a status belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Open,
    InProgress,
    Completed,
}

/// Display semantics for a status: badge label, narrative line for the detail
/// view, and an intent class the UI maps to colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusPresentation {
    pub label: &'static str,
    pub narrative: &'static str,
    pub intent: Intent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Neutral,
    Info,
    Active,
    Warning,
    Success,
    Danger,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 8] = [
        RequestStatus::Queued,
        RequestStatus::OutsideBusinessHours,
        RequestStatus::Calling,
        RequestStatus::InProgress,
        RequestStatus::WaitingForCallback,
        RequestStatus::Booked,
        RequestStatus::Failed,
        RequestStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Queued => "queued",
            RequestStatus::OutsideBusinessHours => "outside_business_hours",
            RequestStatus::Calling => "calling",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::WaitingForCallback => "waiting_for_callback",
            RequestStatus::Booked => "booked",
            RequestStatus::Failed => "failed",
            RequestStatus::Canceled => "canceled",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, UnknownStatus> {
        match raw {
            "queued" => Ok(RequestStatus::Queued),
            "outside_business_hours" => Ok(RequestStatus::OutsideBusinessHours),
            "calling" => Ok(RequestStatus::Calling),
            "in_progress" => Ok(RequestStatus::InProgress),
            "waiting_for_callback" => Ok(RequestStatus::WaitingForCallback),
            "booked" => Ok(RequestStatus::Booked),
            "failed" => Ok(RequestStatus::Failed),
            "canceled" => Ok(RequestStatus::Canceled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }

    /// Terminal states: once reached, the agent stops reporting.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestStatus::Booked | RequestStatus::Failed | RequestStatus::Canceled
        )
    }

    pub fn bucket(&self) -> Bucket {
        match self {
            RequestStatus::Queued | RequestStatus::OutsideBusinessHours => Bucket::Open,
            RequestStatus::Calling
            | RequestStatus::InProgress
            | RequestStatus::WaitingForCallback => Bucket::InProgress,
            RequestStatus::Booked | RequestStatus::Failed | RequestStatus::Canceled => {
                Bucket::Completed
            }
        }
    }

    pub fn presentation(&self) -> StatusPresentation {
        match self {
            RequestStatus::Queued => StatusPresentation {
                label: "Queued",
                narrative: "Your request has been queued and will be processed soon.",
                intent: Intent::Neutral,
            },
            RequestStatus::OutsideBusinessHours => StatusPresentation {
                label: "Outside Business Hours",
                narrative:
                    "Your request will be processed outside business hours. Expected start at 08:00 AM.",
                intent: Intent::Info,
            },
            RequestStatus::Calling => StatusPresentation {
                label: "Calling",
                narrative: "The agent is calling...",
                intent: Intent::Active,
            },
            RequestStatus::InProgress => StatusPresentation {
                label: "In Progress",
                narrative: "The agent is processing your request.",
                intent: Intent::Active,
            },
            RequestStatus::WaitingForCallback => StatusPresentation {
                label: "Waiting for Callback",
                narrative: "The call was unsuccessful. The agent is waiting for a callback.",
                intent: Intent::Warning,
            },
            RequestStatus::Booked => StatusPresentation {
                label: "Booked",
                narrative: "Appointment successfully booked!",
                intent: Intent::Success,
            },
            RequestStatus::Failed => StatusPresentation {
                label: "Failed",
                narrative: "The request could not be completed successfully.",
                intent: Intent::Danger,
            },
            RequestStatus::Canceled => StatusPresentation {
                label: "Canceled",
                narrative: "The request has been canceled.",
                intent: Intent::Neutral,
            },
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status value as read off the wire or out of the store. The agent owns
/// this column, so an out-of-set string is possible and must be carried
/// through as a data error instead of defaulted away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusValue {
    Known(RequestStatus),
    Unknown(String),
}

impl StatusValue {
    pub fn from_wire(raw: &str) -> Self {
        match RequestStatus::parse(raw) {
            Ok(status) => StatusValue::Known(status),
            Err(UnknownStatus(other)) => StatusValue::Unknown(other),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StatusValue::Known(status) => status.as_str(),
            StatusValue::Unknown(raw) => raw,
        }
    }

    pub fn known(&self) -> Option<RequestStatus> {
        match self {
            StatusValue::Known(status) => Some(*status),
            StatusValue::Unknown(_) => None,
        }
    }
}

impl From<RequestStatus> for StatusValue {
    fn from(status: RequestStatus) -> Self {
        StatusValue::Known(status)
    }
}

impl Serialize for StatusValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StatusValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(StatusValue::from_wire(&raw))
    }
}
