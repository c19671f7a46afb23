//! The task engine: creation, lifecycle, copy override rules.

pub mod lifecycle;
pub mod notice;
pub mod task_engine;

pub use lifecycle::{validate_transition, Transition};
pub use notice::{Notice, NoticeKind};
pub use task_engine::{NewTask, TaskEngine, TaskOrigin, WorkspaceSummary};
