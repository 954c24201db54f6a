use std::fmt;

use serde::{Deserialize, Serialize};

/// Execution state of a deployment or runbook run as reported by the platform.
///
/// Matching is exact and case-sensitive; anything the platform adds later lands
/// in `Other` and renders with the default icon.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExecutionState {
    Executing,
    Success,
    Failed,
    Canceled,
    TimedOut,
    Cancelling,
    Queued,
    Other(String),
}

impl ExecutionState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Executing => "Executing",
            Self::Success => "Success",
            Self::Failed => "Failed",
            Self::Canceled => "Canceled",
            Self::TimedOut => "TimedOut",
            Self::Cancelling => "Cancelling",
            Self::Queued => "Queued",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for ExecutionState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Executing" => Self::Executing,
            "Success" => Self::Success,
            "Failed" => Self::Failed,
            "Canceled" => Self::Canceled,
            "TimedOut" => Self::TimedOut,
            "Cancelling" => Self::Cancelling,
            "Queued" => Self::Queued,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for ExecutionState {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ExecutionState> for String {
    fn from(value: ExecutionState) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `status` of a GitHub Actions workflow run.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CiStatus {
    Queued,
    InProgress,
    Completed,
    Other(String),
}

impl CiStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Other(value) => value,
        }
    }

    /// The platform reports "no status" as an empty string as often as it omits the field.
    pub fn is_present(&self) -> bool {
        !self.as_str().trim().is_empty()
    }
}

impl From<String> for CiStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "queued" => Self::Queued,
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for CiStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<CiStatus> for String {
    fn from(value: CiStatus) -> Self {
        value.as_str().to_string()
    }
}

/// `conclusion` of a completed GitHub Actions workflow run.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CiConclusion {
    Success,
    Failure,
    TimedOut,
    ActionRequired,
    Cancelled,
    Neutral,
    Skipped,
    Other(String),
}

impl CiConclusion {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::TimedOut => "timed_out",
            Self::ActionRequired => "action_required",
            Self::Cancelled => "cancelled",
            Self::Neutral => "neutral",
            Self::Skipped => "skipped",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for CiConclusion {
    fn from(value: String) -> Self {
        match value.as_str() {
            "success" => Self::Success,
            "failure" => Self::Failure,
            "timed_out" => Self::TimedOut,
            "action_required" => Self::ActionRequired,
            "cancelled" => Self::Cancelled,
            "neutral" => Self::Neutral,
            "skipped" => Self::Skipped,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for CiConclusion {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<CiConclusion> for String {
    fn from(value: CiConclusion) -> Self {
        value.as_str().to_string()
    }
}
