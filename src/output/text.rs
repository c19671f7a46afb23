use crate::catalog::ActionablePairs;
use crate::engine::{Notice, WorkspaceSummary};
use crate::importer::HeaderReport;
use crate::models::{FunnelPair, FunnelStep, Segment, Task};
use crate::rules::{priority_for, priority_reason_for, GeneratedCopy};

/// Id as shown in listings. `TaskEngine::resolve` accepts it back.
pub fn short_id(id: &str) -> &str {
    // ULIDs share their timestamp prefix, so show the tail.
    &id[id.len().saturating_sub(8)..]
}

pub fn print_task(t: &Task) {
    println!("Task: {} ({})", t.title, t.id);
    println!("  Segment: {}", t.segment);
    println!("  Status: {}", t.status.as_str());
    println!("  Priority: {} ({})", t.priority.as_str(), t.priority_reason);
    match t.channel {
        Some(c) => println!("  Channel: {} [{}]", c.label(), c.as_str()),
        None => println!("  Channel: -"),
    }
    if t.benefits.is_empty() {
        println!("  Benefits: -");
    } else {
        println!("  Benefits: {}", t.benefits.join(", "));
    }
    println!("  Copy title: {}", t.copy_title);
    println!("  Copy: {}", t.copy_content);
    if t.is_manually_edited {
        println!("  (copy edited by hand)");
    }
    println!("  Created: {}", t.created_at.format("%Y-%m-%d %H:%M:%S"));
    if let Some(ref viewed) = t.viewed_at {
        println!("  Viewed: {}", viewed.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(ref executed) = t.executed_at {
        println!("  Executed: {}", executed.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(ref ignored) = t.ignored_at {
        println!("  Ignored: {}", ignored.format("%Y-%m-%d %H:%M:%S"));
    }
}

pub fn print_task_list(tasks: &[&Task], selected: Option<&str>) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    for t in tasks {
        let marker = if Some(t.id.as_str()) == selected { " *" } else { "" };
        println!(
            "  [{}] {} {} ({}){}",
            t.priority.as_str(),
            t.status.as_str(),
            t.title,
            short_id(&t.id),
            marker
        );
    }
}

pub fn print_summary(s: &WorkspaceSummary) {
    println!("{}", s.describe());
    println!(
        "  pending={} viewed={} executed={} ignored={}",
        s.pending, s.viewed, s.executed, s.ignored
    );
}

pub fn print_notices(notices: &[Notice]) {
    for n in notices {
        println!("» {}", n.message);
    }
}

fn trend_marker(change: f64) -> &'static str {
    if change > 0.0 {
        "↑"
    } else if change < 0.0 {
        "↓"
    } else {
        "→"
    }
}

pub fn print_segments(segments: &[Segment]) {
    for s in segments {
        let trend = trend_marker(s.change_7d);
        println!(
            "  {} {} users={} 7d={}{:.1}% [{}] {}",
            s.id,
            s.name,
            s.count,
            trend,
            s.change_7d.abs(),
            priority_for(&s.name).as_str(),
            priority_reason_for(&s.name, s.count)
        );
        println!("      {}", s.description);
    }
}

pub fn print_funnel(steps: &[FunnelStep], pairs: &[FunnelPair], actionable: &ActionablePairs) {
    for (i, step) in steps.iter().enumerate() {
        println!("  {} {} ({}%)", step.step, step.value, step.rate);
        if let Some(p) = pairs.get(i) {
            let flag = if actionable.is_actionable(p) { " [actionable]" } else { "" };
            println!("    ↓ {:.1}% 流失{}", p.drop_off_rate(), flag);
        }
    }
}

pub fn print_copy(copy: &GeneratedCopy) {
    println!("Title: {}", copy.title);
    println!("{}", copy.content);
}

pub fn print_report(r: &HeaderReport) {
    println!("Headers: {}", r.headers.join(", "));
    if r.is_valid() {
        println!("Header check passed.");
    } else {
        println!("Missing required fields: {}", r.missing.join(", "));
    }
    if !r.optional_present.is_empty() {
        println!("Optional fields: {}", r.optional_present.join(", "));
    }
}
