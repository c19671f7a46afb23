use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};
use ulid::{Generator, Ulid};

use crate::config::AgentConfig;
use crate::engine::lifecycle::{validate_transition, Transition};
use crate::engine::notice::{Notice, NoticeKind};
use crate::error::ReachaiError;
use crate::models::{
    dedup_benefits, Channel, FieldUpdate, FunnelPair, Priority, Segment, Task, TaskStatus,
};
use crate::rules::{generate_copy, priority_for, priority_reason_for};

/// Copy is generated for this channel when a task has none.
const FALLBACK_CHANNEL: Channel = Channel::Push;

/// Where a task request came from. Only affects the creation notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOrigin {
    Seed,
    Segment,
    Funnel,
    Manual,
}

/// Everything needed to create a task.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub segment: String,
    pub title: String,
    /// Segment size, used for the priority rationale of unlisted segments.
    pub count: u64,
    pub channel: Option<Channel>,
    pub benefits: Vec<String>,
    pub priority: Option<Priority>,
    pub origin: TaskOrigin,
}

impl NewTask {
    pub fn for_segment(segment: &Segment, channel: Option<Channel>, benefits: &[String]) -> Self {
        Self {
            segment: segment.name.clone(),
            title: format!("{}召回任务", segment.name),
            count: segment.count,
            channel,
            benefits: benefits.to_vec(),
            priority: None,
            origin: TaskOrigin::Segment,
        }
    }

    pub fn for_funnel_pair(pair: &FunnelPair, channel: Option<Channel>, benefits: &[String]) -> Self {
        Self {
            segment: pair.segment_name(),
            title: pair.task_title(),
            count: 0,
            channel,
            benefits: benefits.to_vec(),
            priority: None,
            origin: TaskOrigin::Funnel,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_origin(mut self, origin: TaskOrigin) -> Self {
        self.origin = origin;
        self
    }
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct WorkspaceSummary {
    pub total: usize,
    pub live: usize,
    /// Pending or viewed.
    pub open: usize,
    pub pending: usize,
    pub viewed: usize,
    pub executed: usize,
    pub ignored: usize,
}

impl WorkspaceSummary {
    pub fn describe(&self) -> String {
        if self.live == 0 {
            "暂无任务".to_string()
        } else {
            format!("共 {} 个任务，{} 个待处理", self.live, self.open)
        }
    }
}

/// Owns every task of a workspace session. All mutation goes through the
/// methods below so that status only moves forward and each segment has at
/// most one live task.
pub struct TaskEngine {
    tasks: Vec<Task>,
    selected: Option<String>,
    ids: Generator,
    notices: Vec<Notice>,
}

impl Default for TaskEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskEngine {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            selected: None,
            ids: Generator::new(),
            notices: Vec::new(),
        }
    }

    /// Build an engine seeded from the catalog the way `config` asks for.
    pub fn from_config(config: &AgentConfig, segments: &[Segment]) -> Self {
        let mut engine = Self::new();
        if config.seed_on_start {
            engine.seed(segments, config.default_channel, &config.default_benefits);
            let initial = config
                .initial_selection
                .as_deref()
                .and_then(|name| engine.live_index_for_segment(name));
            if let Some(idx) = initial {
                engine.select_index(idx);
            }
        }
        engine
    }

    /// Create one task per catalog segment that has no live task yet.
    pub fn seed(&mut self, segments: &[Segment], channel: Channel, benefits: &[String]) -> usize {
        let mut created = 0;
        for segment in segments {
            if self.live_task_for_segment(&segment.name).is_some() {
                continue;
            }
            let draft = NewTask::for_segment(segment, Some(channel), benefits)
                .with_origin(TaskOrigin::Seed);
            self.create_task(draft);
            created += 1;
        }
        info!(created, "seeded workspace from catalog");
        created
    }

    fn next_id(&mut self) -> String {
        self.ids
            .generate()
            .unwrap_or_else(|_| Ulid::new())
            .to_string()
    }

    fn index_of(&self, id: &str) -> Result<usize, ReachaiError> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| ReachaiError::task_not_found(id))
    }

    fn notify(&mut self, kind: NoticeKind, task_id: &str, message: impl Into<String>) {
        self.notices.push(Notice::new(kind, task_id, message));
    }

    /// Always appends a new task, even if the segment already has one.
    pub fn create_task(&mut self, draft: NewTask) -> &Task {
        let id = self.next_id();
        let benefits = dedup_benefits(draft.benefits);
        let copy = generate_copy(
            &draft.segment,
            draft.channel.unwrap_or(FALLBACK_CHANNEL),
            &benefits,
        );
        let task = Task {
            id: id.clone(),
            priority: draft.priority.unwrap_or_else(|| priority_for(&draft.segment)),
            priority_reason: priority_reason_for(&draft.segment, draft.count),
            title: draft.title,
            segment: draft.segment,
            channel: draft.channel,
            copy_title: copy.title,
            copy_content: copy.content,
            benefits,
            status: TaskStatus::Pending,
            is_manually_edited: false,
            created_at: Utc::now(),
            viewed_at: None,
            executed_at: None,
            ignored_at: None,
        };
        info!(
            task_id = %task.id,
            segment = %task.segment,
            priority = task.priority.as_str(),
            "task created"
        );

        let message = match draft.origin {
            TaskOrigin::Seed => None,
            TaskOrigin::Segment => Some(format!("已为{}生成任务", task.segment)),
            TaskOrigin::Funnel => Some(format!("已生成{}", task.title)),
            TaskOrigin::Manual => Some("任务已加入工作台".to_string()),
        };
        self.tasks.push(task);
        if let Some(message) = message {
            self.notify(NoticeKind::Created, &id, message);
        }
        &self.tasks[self.tasks.len() - 1]
    }

    /// Move the selection to `id`. A pending task becomes viewed in the same step.
    pub fn select_task(&mut self, id: &str) -> Result<&Task, ReachaiError> {
        let idx = self.index_of(id)?;
        Ok(self.select_index(idx))
    }

    fn select_index(&mut self, idx: usize) -> &Task {
        self.selected = Some(self.tasks[idx].id.clone());
        self.mark_viewed(idx);
        debug!(task_id = %self.tasks[idx].id, "task selected");
        &self.tasks[idx]
    }

    fn mark_viewed(&mut self, idx: usize) {
        let task = &mut self.tasks[idx];
        if let Ok(next) = validate_transition(task.status, Transition::View) {
            task.status = next;
            task.viewed_at = Some(Utc::now());
        }
    }

    pub fn update_field(&mut self, id: &str, update: FieldUpdate) -> Result<&Task, ReachaiError> {
        let idx = self.index_of(id)?;
        let field = update.field_name();
        let task = &mut self.tasks[idx];
        // Once copy has been hand-edited it is never overwritten again.
        let regenerate = matches!(update, FieldUpdate::Channel(_) | FieldUpdate::Benefits(_))
            && !task.is_manually_edited;

        match update {
            FieldUpdate::Channel(channel) => task.channel = channel,
            FieldUpdate::Benefits(benefits) => task.benefits = dedup_benefits(benefits),
            FieldUpdate::CopyTitle(value) => {
                task.copy_title = value;
                task.is_manually_edited = true;
            }
            FieldUpdate::CopyContent(value) => {
                task.copy_content = value;
                task.is_manually_edited = true;
            }
            FieldUpdate::Title(value) => task.title = value,
            FieldUpdate::Priority(priority) => task.priority = priority,
        }

        if regenerate {
            let channel = task.channel.unwrap_or(FALLBACK_CHANNEL);
            let copy = generate_copy(&task.segment, channel, &task.benefits);
            task.copy_title = copy.title;
            task.copy_content = copy.content;
            self.notify(
                NoticeKind::CopyRegenerated,
                id,
                format!("文案已按{}重新生成", channel.label()),
            );
        }
        debug!(task_id = id, field, regenerated = regenerate, "task field updated");
        Ok(&self.tasks[idx])
    }

    pub fn execute(&mut self, id: &str) -> Result<&Task, ReachaiError> {
        let idx = self.index_of(id)?;
        self.finish(idx, Transition::Execute)?;
        self.notify(NoticeKind::Executed, id, "任务已执行");
        info!(task_id = id, "task executed");
        Ok(&self.tasks[idx])
    }

    pub fn ignore(&mut self, id: &str) -> Result<&Task, ReachaiError> {
        let idx = self.index_of(id)?;
        self.finish(idx, Transition::Ignore)?;
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.notify(NoticeKind::Ignored, id, "任务已忽略");
        info!(task_id = id, "task ignored");
        Ok(&self.tasks[idx])
    }

    /// Apply a terminal transition. A pending task is viewed first so that it
    /// never skips the viewed state.
    fn finish(&mut self, idx: usize, transition: Transition) -> Result<(), ReachaiError> {
        let current = self.tasks[idx].status;
        if current.is_terminal() {
            return Err(ReachaiError::invalid_transition(
                current.as_str(),
                transition.as_str(),
            ));
        }
        self.mark_viewed(idx);
        let task = &mut self.tasks[idx];
        task.status = validate_transition(task.status, transition)?;
        let now = Some(Utc::now());
        match transition {
            Transition::Execute => task.executed_at = now,
            Transition::Ignore => task.ignored_at = now,
            Transition::View => {}
        }
        Ok(())
    }

    /// Select the live task for the draft's segment, or create one.
    pub fn find_or_create_for_segment(&mut self, draft: NewTask) -> &Task {
        match self.live_index_for_segment(&draft.segment) {
            Some(idx) => {
                let message = format!("已选中{}的现有任务", draft.segment);
                let id = self.tasks[idx].id.clone();
                self.notify(NoticeKind::Reused, &id, message);
                self.select_index(idx)
            }
            None => self.create_task(draft),
        }
    }

    fn live_index_for_segment(&self, segment: &str) -> Option<usize> {
        self.tasks
            .iter()
            .position(|t| t.is_live() && t.segment == segment)
    }

    pub fn live_task_for_segment(&self, segment: &str) -> Option<&Task> {
        self.live_index_for_segment(segment).map(|idx| &self.tasks[idx])
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Resolve an exact task id, or a unique id prefix or suffix. Text
    /// listings show the suffix, since ids from one burst share a prefix.
    pub fn resolve(&self, reference: &str) -> Result<&Task, ReachaiError> {
        if let Some(task) = self.get(reference) {
            return Ok(task);
        }
        let matches: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| {
                !reference.is_empty()
                    && (t.id.starts_with(reference) || t.id.ends_with(reference))
            })
            .collect();
        match matches.as_slice() {
            [] => Err(ReachaiError::task_not_found(reference)),
            [task] => Ok(*task),
            _ => {
                let candidates: Vec<String> = matches
                    .iter()
                    .map(|t| format!("{} ({})", t.title, t.id))
                    .collect();
                Err(ReachaiError::ambiguous_ref(reference, &candidates))
            }
        }
    }

    pub fn selected(&self) -> Option<&Task> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Every task in creation order, ignored ones included.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Non-ignored tasks, P0 first. Equal tiers keep creation order.
    pub fn live_tasks(&self) -> Vec<&Task> {
        let mut live: Vec<&Task> = self.tasks.iter().filter(|t| t.is_live()).collect();
        live.sort_by_key(|t| t.priority);
        live
    }

    pub fn summary(&self) -> WorkspaceSummary {
        let mut summary = WorkspaceSummary {
            total: self.tasks.len(),
            ..Default::default()
        };
        for task in &self.tasks {
            match task.status {
                TaskStatus::Pending => summary.pending += 1,
                TaskStatus::Viewed => summary.viewed += 1,
                TaskStatus::Executed => summary.executed += 1,
                TaskStatus::Ignored => summary.ignored += 1,
            }
            if task.status.is_open() {
                summary.open += 1;
            }
            if task.is_live() {
                summary.live += 1;
            }
        }
        summary
    }

    /// Drain notices produced since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
