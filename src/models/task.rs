use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Viewed,
    Executed,
    Ignored,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Viewed => "viewed",
            Self::Executed => "executed",
            Self::Ignored => "ignored",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Executed | Self::Ignored)
    }

    /// Still waiting on an operator decision.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Viewed)
    }
}

/// Urgency tier. `P0` sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    P0,
    P1,
    P2,
    P3,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P0 => "P0",
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "P0" => Some(Self::P0),
            "P1" => Some(Self::P1),
            "P2" => Some(Self::P2),
            "P3" => Some(Self::P3),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Push,
    Edm,
    Sms,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Edm => "edm",
            Self::Sms => "sms",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "push" => Some(Self::Push),
            "edm" => Some(Self::Edm),
            "sms" => Some(Self::Sms),
            _ => None,
        }
    }

    /// Operator-facing name of the channel.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Push => "Push推送",
            Self::Edm => "邮件",
            Self::Sms => "短信",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub priority: Priority,
    pub priority_reason: String,
    pub title: String,
    pub segment: String,
    pub channel: Option<Channel>,
    pub copy_title: String,
    pub copy_content: String,
    pub benefits: Vec<String>,
    pub status: TaskStatus,
    pub is_manually_edited: bool,
    pub created_at: DateTime<Utc>,
    pub viewed_at: Option<DateTime<Utc>>,
    pub executed_at: Option<DateTime<Utc>>,
    pub ignored_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn is_live(&self) -> bool {
        self.status != TaskStatus::Ignored
    }
}

/// A single editable field of a task together with its new value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Channel(Option<Channel>),
    Benefits(Vec<String>),
    CopyTitle(String),
    CopyContent(String),
    Title(String),
    Priority(Priority),
}

impl FieldUpdate {
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Channel(_) => "channel",
            Self::Benefits(_) => "benefits",
            Self::CopyTitle(_) => "copy_title",
            Self::CopyContent(_) => "copy_content",
            Self::Title(_) => "title",
            Self::Priority(_) => "priority",
        }
    }
}

/// Removes repeated labels, keeping first occurrence order.
pub fn dedup_benefits(benefits: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for b in benefits {
        let b = b.trim().to_string();
        if !b.is_empty() && !out.contains(&b) {
            out.push(b);
        }
    }
    out
}
