use std::path::PathBuf;

use clap::{Parser, Subcommand};

const VERSION: &str = env!("GIT_VERSION");

#[derive(Parser)]
#[command(
    name = "reachai",
    version = VERSION,
    about = "Merchant outreach agent: segment-driven recall tasks",
    after_help = "\
NOTE:
  All state is in memory. Every invocation starts from the demo catalog;
  use `reachai session` to drive one workspace through several steps.

EXIT CODES:
  0  Success
  1  Error (unknown task/segment, validation, invalid transition, etc.)

LIFECYCLE:
  pending → viewed → executed | ignored
  Selecting a pending task marks it viewed. Executed/ignored are final.
  Editing copy by hand stops automatic copy regeneration for that task."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// JSON config file with session defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List user segments with their priority tier
    Segments,

    /// Show the user-journey funnel and drop-off between steps
    Funnel,

    /// Preview generated copy for a segment
    Copy {
        /// Segment name or ID (any name is accepted)
        segment: String,
        #[arg(long, default_value = "push")]
        channel: String,
        /// Benefit label (repeatable)
        #[arg(long = "benefit")]
        benefits: Vec<String>,
    },

    /// List the tasks seeded on start
    Tasks {
        /// Include ignored tasks
        #[arg(long)]
        all: bool,
    },

    /// Drive one workspace with commands read from stdin
    #[command(after_help = "\
SESSION COMMANDS (one per line):
  list [--all]                     live tasks, P0 first
  show [ID]                        task details (default: selected task)
  select ID                        select a task (pending → viewed)
  segment NAME|ID                  reuse or create the segment's task
  funnel FROM TO                   reuse or create a funnel drop-off task
  add NAME|ID --channel C [--benefit B]... [--priority P]
                                   (reuses the segment's live task if any)
  set FIELD [VALUE]... [--id ID]   fields: channel, benefits, copy_title,
                                   copy_content, title, priority
  execute [ID] | ignore [ID]
  summary | quit

NOTE:
  IDs may be abbreviated to any unique prefix, or to the suffix shown by `list`.
  A failing line is reported and the session continues.")]
    Session,

    /// Check the header row of a CSV upload
    Import {
        file: PathBuf,
    },

    /// Print the CSV import template
    Template,
}

/// One line of a session.
#[derive(Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommands,
}

#[derive(Subcommand)]
pub enum SessionCommands {
    /// List tasks
    List {
        #[arg(long)]
        all: bool,
    },
    /// Show task details
    Show {
        id: Option<String>,
    },
    /// Select a task
    Select {
        id: String,
    },
    /// Open the task for a catalog segment
    Segment {
        name: String,
    },
    /// Open the task for a funnel drop-off
    Funnel {
        from: String,
        to: String,
    },
    /// Add a task with explicit channel and benefits
    Add {
        segment: String,
        #[arg(long)]
        channel: String,
        #[arg(long = "benefit")]
        benefits: Vec<String>,
        #[arg(long)]
        priority: Option<String>,
    },
    /// Edit a task field
    Set {
        field: String,
        value: Vec<String>,
        #[arg(long)]
        id: Option<String>,
    },
    /// Execute a task
    Execute {
        id: Option<String>,
    },
    /// Ignore a task
    Ignore {
        id: Option<String>,
    },
    /// Workspace counts
    Summary,
    /// End the session
    #[command(alias = "exit")]
    Quit,
}
