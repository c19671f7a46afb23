use crate::error::ReachaiError;
use crate::models::TaskStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    View,
    Execute,
    Ignore,
}

impl Transition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Execute => "execute",
            Self::Ignore => "ignore",
        }
    }
}

/// Target status for `transition`, or an error if the move is not allowed.
///
/// Viewing is only meaningful for pending tasks; callers treat a repeated
/// view as a no-op rather than an error.
pub fn validate_transition(
    current: TaskStatus,
    transition: Transition,
) -> Result<TaskStatus, ReachaiError> {
    match (current, transition) {
        (TaskStatus::Pending, Transition::View) => Ok(TaskStatus::Viewed),
        (TaskStatus::Viewed, Transition::Execute) => Ok(TaskStatus::Executed),
        (TaskStatus::Viewed, Transition::Ignore) => Ok(TaskStatus::Ignored),
        _ => Err(ReachaiError::invalid_transition(
            current.as_str(),
            transition.as_str(),
        )),
    }
}
