use crate::domain::state::{CiConclusion, CiStatus, ExecutionState};

pub const ICON_RUNNING: &str = "🔵";
pub const ICON_WARNING: &str = "🟡";
pub const ICON_SUCCESS: &str = "🟢";
pub const ICON_FAILED: &str = "🔴";
pub const ICON_NEUTRAL: &str = "⚪";
pub const ICON_QUEUED: &str = "🟣";
pub const ICON_ACTION_REQUIRED: &str = "🟠";

/// Icon for a deployment or runbook run. Warnings only matter on success.
pub fn state_icon(state: &ExecutionState, has_warnings: bool) -> &'static str {
    match state {
        ExecutionState::Executing => ICON_RUNNING,
        ExecutionState::Success if has_warnings => ICON_WARNING,
        ExecutionState::Success => ICON_SUCCESS,
        ExecutionState::Failed => ICON_FAILED,
        ExecutionState::Canceled => ICON_NEUTRAL,
        ExecutionState::TimedOut | ExecutionState::Cancelling => ICON_FAILED,
        ExecutionState::Queued => ICON_QUEUED,
        ExecutionState::Other(_) => ICON_NEUTRAL,
    }
}

/// Icon for a GitHub Actions run.
///
/// `status` wins while the run is queued or in progress; anything else is
/// treated as completed and the conclusion decides.
pub fn ci_icon(status: Option<&CiStatus>, conclusion: Option<&CiConclusion>) -> &'static str {
    match status {
        Some(CiStatus::InProgress) => return ICON_RUNNING,
        Some(CiStatus::Queued) => return ICON_QUEUED,
        _ => {}
    }

    match conclusion {
        Some(CiConclusion::Success) => ICON_SUCCESS,
        Some(CiConclusion::Failure | CiConclusion::TimedOut) => ICON_FAILED,
        Some(CiConclusion::ActionRequired) => ICON_ACTION_REQUIRED,
        Some(CiConclusion::Cancelled | CiConclusion::Neutral | CiConclusion::Skipped) => {
            ICON_NEUTRAL
        }
        Some(CiConclusion::Other(_)) | None => ICON_NEUTRAL,
    }
}
