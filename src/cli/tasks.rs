use serde_json::json;

use crate::catalog::Catalog;
use crate::config::AgentConfig;
use crate::engine::TaskEngine;
use crate::models::Task;
use crate::output;

pub fn run(config: &AgentConfig, all: bool, json_output: bool) -> i32 {
    let catalog = Catalog::demo();
    let engine = TaskEngine::from_config(config, &catalog.segments);
    let tasks = listed_tasks(&engine, all);
    let summary = engine.summary();

    if json_output {
        let tasks_json: Vec<_> = tasks.iter().map(|t| output::json::task_detail(t)).collect();
        println!(
            "{:#}",
            output::json::success(json!({
                "tasks": tasks_json,
                "selected": engine.selected_id(),
                "summary": output::json::summary_json(&summary)
            }))
        );
    } else {
        output::text::print_summary(&summary);
        output::text::print_task_list(&tasks, engine.selected_id());
        if let Some(task) = engine.selected() {
            println!();
            output::text::print_task(task);
        }
    }
    0
}

/// Live tasks in priority order, followed by ignored ones when `all` is set.
pub fn listed_tasks(engine: &TaskEngine, all: bool) -> Vec<&Task> {
    let mut tasks = engine.live_tasks();
    if all {
        tasks.extend(engine.tasks().iter().filter(|t| !t.is_live()));
    }
    tasks
}
