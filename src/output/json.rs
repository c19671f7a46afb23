use serde_json::{json, Value};

use crate::catalog::ActionablePairs;
use crate::engine::{Notice, WorkspaceSummary};
use crate::error::ReachaiError;
use crate::importer::HeaderReport;
use crate::models::{FunnelPair, FunnelStep, Segment, Task};
use crate::rules::{priority_for, priority_reason_for, GeneratedCopy};

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &ReachaiError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

pub fn task_summary(t: &Task) -> Value {
    json!({
        "id": t.id,
        "title": t.title,
        "segment": t.segment,
        "status": t.status.as_str(),
        "priority": t.priority.as_str()
    })
}

pub fn task_detail(t: &Task) -> Value {
    json!({
        "id": t.id,
        "title": t.title,
        "segment": t.segment,
        "status": t.status.as_str(),
        "priority": t.priority.as_str(),
        "priority_reason": t.priority_reason,
        "channel": t.channel.map(|c| c.as_str()),
        "benefits": t.benefits,
        "copy_title": t.copy_title,
        "copy_content": t.copy_content,
        "is_manually_edited": t.is_manually_edited,
        "created_at": t.created_at.to_rfc3339(),
        "viewed_at": t.viewed_at.map(|d| d.to_rfc3339()),
        "executed_at": t.executed_at.map(|d| d.to_rfc3339()),
        "ignored_at": t.ignored_at.map(|d| d.to_rfc3339())
    })
}

pub fn summary_json(s: &WorkspaceSummary) -> Value {
    json!({
        "total": s.total,
        "live": s.live,
        "open": s.open,
        "pending": s.pending,
        "viewed": s.viewed,
        "executed": s.executed,
        "ignored": s.ignored,
        "text": s.describe()
    })
}

pub fn notices_json(notices: &[Notice]) -> Value {
    json!(notices
        .iter()
        .map(|n| json!({ "kind": n.kind, "task_id": n.task_id, "message": n.message }))
        .collect::<Vec<_>>())
}

pub fn segment_json(s: &Segment) -> Value {
    json!({
        "id": s.id,
        "name": s.name,
        "count": s.count,
        "change_7d": s.change_7d,
        "description": s.description,
        "priority": priority_for(&s.name).as_str(),
        "priority_reason": priority_reason_for(&s.name, s.count)
    })
}

pub fn funnel_step_json(step: &FunnelStep) -> Value {
    json!({
        "step": step.step,
        "value": step.value,
        "rate": step.rate
    })
}

pub fn funnel_pair_json(p: &FunnelPair, actionable: &ActionablePairs) -> Value {
    json!({
        "from": p.from,
        "to": p.to,
        "segment": p.segment_name(),
        "drop_off_rate": (p.drop_off_rate() * 10.0).round() / 10.0,
        "actionable": actionable.is_actionable(p)
    })
}

pub fn copy_json(segment: &str, channel: &str, benefits: &[String], copy: &GeneratedCopy) -> Value {
    json!({
        "segment": segment,
        "channel": channel,
        "benefits": benefits,
        "title": copy.title,
        "content": copy.content
    })
}

pub fn report_json(r: &HeaderReport) -> Value {
    json!({
        "valid": r.is_valid(),
        "headers": r.headers,
        "missing": r.missing,
        "optional_present": r.optional_present
    })
}
