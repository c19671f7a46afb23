use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Created,
    Reused,
    CopyRegenerated,
    Executed,
    Ignored,
}

/// Human-readable message for a successful mutation. The presentation layer
/// decides whether and how to show it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub task_id: String,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, task_id: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            task_id: task_id.to_string(),
            message: message.into(),
        }
    }
}
