use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelStep {
    pub step: String,
    pub value: u64,
    /// Percent of the first step.
    pub rate: f64,
}

/// Two consecutive funnel steps. Drop-off is measured from `from` to `to`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelPair {
    pub from: String,
    pub to: String,
    pub from_value: u64,
    pub to_value: u64,
}

impl FunnelPair {
    /// Synthetic segment name used as the task's lookup key.
    pub fn segment_name(&self) -> String {
        format!("{}→{}流失用户", self.from, self.to)
    }

    pub fn task_title(&self) -> String {
        format!("{}→{}流失召回任务", self.from, self.to)
    }

    /// Percentage of `from` users that did not reach `to`.
    pub fn drop_off_rate(&self) -> f64 {
        if self.from_value == 0 {
            return 0.0;
        }
        let lost = self.from_value.saturating_sub(self.to_value) as f64;
        lost / self.from_value as f64 * 100.0
    }
}
