use std::io::{self, BufRead};

use clap::error::ErrorKind;
use clap::Parser;
use serde_json::json;

use crate::catalog::Catalog;
use crate::cli::catalog::{parse_benefits, parse_channel};
use crate::cli::commands::{SessionCommands, SessionLine};
use crate::cli::report_error;
use crate::cli::tasks::listed_tasks;
use crate::config::AgentConfig;
use crate::engine::{NewTask, TaskEngine, TaskOrigin};
use crate::error::ReachaiError;
use crate::models::{FieldUpdate, Priority};
use crate::output;

pub fn run(config: &AgentConfig, json_output: bool) -> i32 {
    let stdin = io::stdin();
    run_with(config, stdin.lock(), json_output)
}

enum Flow {
    Continue,
    Quit,
}

struct Session {
    catalog: Catalog,
    config: AgentConfig,
    engine: TaskEngine,
    json_output: bool,
}

/// Run session commands from `input` until EOF or `quit`.
pub fn run_with(config: &AgentConfig, input: impl BufRead, json_output: bool) -> i32 {
    let catalog = Catalog::demo();
    let engine = TaskEngine::from_config(config, &catalog.segments);
    let mut session = Session {
        catalog,
        config: config.clone(),
        engine,
        json_output,
    };

    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => return report_error(&ReachaiError::from(e), json_output),
        };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parsed = match SessionLine::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => parsed,
            Err(e) if e.kind() == ErrorKind::DisplayHelp => {
                print!("{e}");
                continue;
            }
            Err(e) => {
                session.report(&ReachaiError::validation(clap_message(&e)));
                continue;
            }
        };
        match session.dispatch(parsed.command) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => session.report(&e),
        }
    }
    0
}

/// First line of a clap error without the `error:` prefix.
fn clap_message(e: &clap::Error) -> String {
    let rendered = e.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.trim_start_matches("error: ").to_string()
}

pub fn parse_field_update(field: &str, values: &[String]) -> Result<FieldUpdate, ReachaiError> {
    let joined = values.join(" ");
    let update = match field.replace('-', "_").as_str() {
        "channel" => match joined.as_str() {
            "" | "none" => FieldUpdate::Channel(None),
            other => FieldUpdate::Channel(Some(parse_channel(other)?)),
        },
        "benefits" => match joined.as_str() {
            "none" => FieldUpdate::Benefits(Vec::new()),
            _ => FieldUpdate::Benefits(parse_benefits(values)),
        },
        "copy_title" => FieldUpdate::CopyTitle(joined),
        "copy_content" => FieldUpdate::CopyContent(joined),
        "title" => {
            if joined.is_empty() {
                return Err(ReachaiError::validation("Task title cannot be empty"));
            }
            FieldUpdate::Title(joined)
        }
        "priority" => FieldUpdate::Priority(parse_priority(&joined)?),
        "id" | "segment" | "status" | "priority_reason" | "is_manually_edited" | "created_at"
        | "viewed_at" | "executed_at" | "ignored_at" => {
            return Err(ReachaiError::validation(format!(
                "Field '{field}' is not editable"
            )))
        }
        _ => return Err(ReachaiError::validation(format!("Unknown field '{field}'"))),
    };
    Ok(update)
}

fn parse_priority(value: &str) -> Result<Priority, ReachaiError> {
    Priority::from_str(value).ok_or_else(|| {
        ReachaiError::validation(format!("Unknown priority '{value}'. Use P0, P1, P2 or P3."))
    })
}

impl Session {
    fn report(&self, err: &ReachaiError) {
        if self.json_output {
            println!("{}", output::json::error(err));
        } else {
            eprintln!("Error: {}", err.message);
        }
    }

    /// Explicit reference, else the current selection.
    fn target(&self, reference: Option<&str>) -> Result<String, ReachaiError> {
        match reference {
            Some(r) => Ok(self.engine.resolve(r)?.id.clone()),
            None => self
                .engine
                .selected_id()
                .map(str::to_string)
                .ok_or_else(ReachaiError::no_selection),
        }
    }

    fn dispatch(&mut self, cmd: SessionCommands) -> Result<Flow, ReachaiError> {
        match cmd {
            SessionCommands::List { all } => self.list(all),
            SessionCommands::Show { id } => {
                let id = self.target(id.as_deref())?;
                self.show(&id)?;
            }
            SessionCommands::Select { id } => {
                let id = self.target(Some(id.as_str()))?;
                self.engine.select_task(&id)?;
                self.emit_task(&id)?;
            }
            SessionCommands::Segment { name } => {
                let segment = self.catalog.segment(&name)?.clone();
                let draft = NewTask::for_segment(
                    &segment,
                    Some(self.config.default_channel),
                    &self.config.default_benefits,
                );
                self.open(draft)?;
            }
            SessionCommands::Funnel { from, to } => {
                let pair = self.catalog.pair(&from, &to)?;
                if !self.config.funnel.is_actionable(&pair) {
                    return Err(ReachaiError::validation(format!(
                        "Funnel step {from}→{to} is not actionable"
                    )));
                }
                let draft = NewTask::for_funnel_pair(
                    &pair,
                    Some(self.config.default_channel),
                    &self.config.default_benefits,
                );
                self.open(draft)?;
            }
            SessionCommands::Add {
                segment,
                channel,
                benefits,
                priority,
            } => {
                let segment = self.catalog.segment(&segment)?.clone();
                let channel = parse_channel(&channel)?;
                let priority = match priority {
                    Some(p) => parse_priority(&p)?,
                    None => Priority::P0,
                };
                let draft = NewTask::for_segment(&segment, Some(channel), &parse_benefits(&benefits))
                    .with_priority(priority)
                    .with_origin(TaskOrigin::Manual);
                self.open(draft)?;
            }
            SessionCommands::Set { field, value, id } => {
                let id = self.target(id.as_deref())?;
                let update = parse_field_update(&field, &value)?;
                self.engine.update_field(&id, update)?;
                self.emit_task(&id)?;
            }
            SessionCommands::Execute { id } => {
                let id = self.target(id.as_deref())?;
                self.engine.execute(&id)?;
                self.emit_task(&id)?;
            }
            SessionCommands::Ignore { id } => {
                let id = self.target(id.as_deref())?;
                self.engine.ignore(&id)?;
                self.emit_task(&id)?;
            }
            SessionCommands::Summary => {
                let summary = self.engine.summary();
                if self.json_output {
                    println!(
                        "{}",
                        output::json::success(json!({
                            "summary": output::json::summary_json(&summary)
                        }))
                    );
                } else {
                    output::text::print_summary(&summary);
                }
            }
            SessionCommands::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Reuse the segment's live task or create it, then select it.
    fn open(&mut self, draft: NewTask) -> Result<(), ReachaiError> {
        let id = self.engine.find_or_create_for_segment(draft).id.clone();
        self.engine.select_task(&id)?;
        self.emit_task(&id)
    }

    fn list(&self, all: bool) {
        let tasks = listed_tasks(&self.engine, all);
        let selected = self.engine.selected_id();
        if self.json_output {
            let tasks_json: Vec<_> = tasks.iter().map(|t| output::json::task_summary(t)).collect();
            println!(
                "{}",
                output::json::success(json!({
                    "tasks": tasks_json,
                    "selected": selected,
                    "summary": output::json::summary_json(&self.engine.summary())
                }))
            );
        } else {
            output::text::print_task_list(&tasks, selected);
        }
    }

    fn show(&self, id: &str) -> Result<(), ReachaiError> {
        let task = self
            .engine
            .get(id)
            .ok_or_else(|| ReachaiError::task_not_found(id))?;
        if self.json_output {
            println!(
                "{}",
                output::json::success(json!({ "task": output::json::task_detail(task) }))
            );
        } else {
            output::text::print_task(task);
        }
        Ok(())
    }

    /// Print a task after a mutation together with the notices it produced.
    fn emit_task(&mut self, id: &str) -> Result<(), ReachaiError> {
        let notices = self.engine.take_notices();
        let task = self
            .engine
            .get(id)
            .ok_or_else(|| ReachaiError::task_not_found(id))?;
        if self.json_output {
            println!(
                "{}",
                output::json::success(json!({
                    "task": output::json::task_detail(task),
                    "selected": self.engine.selected_id(),
                    "notices": output::json::notices_json(&notices)
                }))
            );
        } else {
            output::text::print_notices(&notices);
            output::text::print_task_list(&[task], self.engine.selected_id());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::models::Channel;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_editable_fields() {
        assert_eq!(
            parse_field_update("channel", &words(&["sms"])).unwrap(),
            FieldUpdate::Channel(Some(Channel::Sms))
        );
        assert_eq!(
            parse_field_update("channel", &[]).unwrap(),
            FieldUpdate::Channel(None)
        );
        assert_eq!(
            parse_field_update("benefits", &words(&["券,积分"])).unwrap(),
            FieldUpdate::Benefits(words(&["券", "积分"]))
        );
        assert_eq!(
            parse_field_update("benefits", &words(&["none"])).unwrap(),
            FieldUpdate::Benefits(Vec::new())
        );
        assert_eq!(
            parse_field_update("copy-content", &words(&["限时", "回归"])).unwrap(),
            FieldUpdate::CopyContent("限时 回归".to_string())
        );
        assert_eq!(
            parse_field_update("priority", &words(&["p2"])).unwrap(),
            FieldUpdate::Priority(Priority::P2)
        );
    }

    #[test]
    fn rejects_derived_and_unknown_fields() {
        for field in ["status", "priority_reason", "segment"] {
            let err = parse_field_update(field, &words(&["x"])).unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationFailed);
            assert!(err.message.contains("not editable"));
        }
        let err = parse_field_update("colour", &words(&["x"])).unwrap_err();
        assert!(err.message.contains("Unknown field"));
        assert!(parse_field_update("title", &[]).is_err());
    }

    fn text_session() -> Session {
        let config = AgentConfig::default();
        let catalog = Catalog::demo();
        let engine = TaskEngine::from_config(&config, &catalog.segments);
        Session {
            catalog,
            config,
            engine,
            json_output: false,
        }
    }

    #[test]
    fn listed_short_id_selects_task() {
        let mut session = text_session();
        session.dispatch(SessionCommands::List { all: false }).unwrap();

        let target = session
            .engine
            .live_tasks()
            .into_iter()
            .find(|t| t.status == crate::models::TaskStatus::Pending)
            .unwrap()
            .id
            .clone();
        let shown = output::text::short_id(&target).to_string();
        session
            .dispatch(SessionCommands::Select { id: shown.clone() })
            .unwrap();
        assert_eq!(session.engine.selected_id(), Some(target.as_str()));

        session
            .dispatch(SessionCommands::Execute { id: Some(shown) })
            .unwrap();
        assert!(session.engine.get(&target).unwrap().executed_at.is_some());
    }

    #[test]
    fn session_lines_parse() {
        let line = SessionLine::try_parse_from("set copy_title 新 标题 --id 01ABC".split_whitespace()).unwrap();
        match line.command {
            SessionCommands::Set { field, value, id } => {
                assert_eq!(field, "copy_title");
                assert_eq!(value, words(&["新", "标题"]));
                assert_eq!(id.as_deref(), Some("01ABC"));
            }
            _ => panic!("expected set"),
        }
        assert!(SessionLine::try_parse_from("launch".split_whitespace()).is_err());
    }
}
