use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::ActionablePairs;
use crate::error::ReachaiError;
use crate::models::{dedup_benefits, Channel};

/// Session defaults. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub default_channel: Channel,
    pub default_benefits: Vec<String>,
    /// Create a task for every catalog segment when a session starts.
    pub seed_on_start: bool,
    /// Segment whose seeded task is selected on start.
    pub initial_selection: Option<String>,
    pub funnel: ActionablePairs,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            default_channel: Channel::Push,
            default_benefits: vec!["券".to_string()],
            seed_on_start: true,
            initial_selection: Some("活跃低转化".to_string()),
            funnel: ActionablePairs::default(),
        }
    }
}

impl AgentConfig {
    pub fn from_json(text: &str) -> Result<Self, ReachaiError> {
        let mut config: Self = serde_json::from_str(text)
            .map_err(|e| ReachaiError::config(format!("Invalid config: {e}")))?;
        config.default_benefits = dedup_benefits(config.default_benefits);
        Ok(config)
    }

    /// Load from `path`, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ReachaiError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|e| {
            ReachaiError::config(format!("Cannot read config {}: {e}", path.display()))
        })?;
        let config = Self::from_json(&text)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}
