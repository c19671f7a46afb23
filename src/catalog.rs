//! Demo reference data: the segment catalog and the user-journey funnel.
//!
//! Funnel steps are ordered; any two consecutive steps form a [`FunnelPair`]
//! that can be turned into a recall task when the pair is actionable.

use serde::{Deserialize, Serialize};

use crate::error::ReachaiError;
use crate::models::{FunnelPair, FunnelStep, Segment};

/// Read-only reference data for one process.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub segments: Vec<Segment>,
    pub funnel: Vec<FunnelStep>,
}

impl Catalog {
    pub fn demo() -> Self {
        Self {
            segments: default_segments(),
            funnel: default_funnel(),
        }
    }

    pub fn segment(&self, reference: &str) -> Result<&Segment, ReachaiError> {
        find_segment(&self.segments, reference)
            .ok_or_else(|| ReachaiError::segment_not_found(reference))
    }

    pub fn pair(&self, from: &str, to: &str) -> Result<FunnelPair, ReachaiError> {
        find_pair(&self.funnel, from, to)
            .ok_or_else(|| ReachaiError::segment_not_found(&format!("{from}→{to}")))
    }
}

pub fn default_segments() -> Vec<Segment> {
    [
        ("1", "收藏未购买", 1250, 5.9, "口径示例：近30天有收藏行为但未发生购买的用户（Demo 口径，可配置）"),
        ("2", "加购未购买", 3420, -3.9, "口径示例：近30天有加购行为但未发生购买的用户（Demo 口径，可配置）"),
        ("3", "沉没流失", 1890, -1.6, "口径示例：14天前活跃，近14天未活跃的用户（Demo 口径，可配置）"),
        ("4", "高价值低频次", 560, 7.7, "口径示例：近30天消费金额 top20%，但购买频次低于平均值的用户（Demo 口径，可配置）"),
        ("5", "高价值高频次", 890, 2.3, "口径示例：近30天消费金额 top20%，且购买频次高于平均值的用户（Demo 口径，可配置）"),
        ("6", "活跃低转化", 2340, -5.2, "口径示例：近30天浏览频次 top20%，但未产生购买的用户（Demo 口径，可配置）"),
    ]
    .into_iter()
    .map(|(id, name, count, change_7d, description)| Segment {
        id: id.to_string(),
        name: name.to_string(),
        count,
        change_7d,
        description: description.to_string(),
    })
    .collect()
}

pub fn default_funnel() -> Vec<FunnelStep> {
    [
        ("首页", 10000, 100.0),
        ("浏览", 8500, 85.0),
        ("加购", 3200, 32.0),
        ("下单", 1800, 18.0),
        ("支付", 1650, 16.5),
    ]
    .into_iter()
    .map(|(step, value, rate)| FunnelStep {
        step: step.to_string(),
        value,
        rate,
    })
    .collect()
}

/// Look up a segment by id or exact name.
pub fn find_segment<'a>(segments: &'a [Segment], reference: &str) -> Option<&'a Segment> {
    segments
        .iter()
        .find(|s| s.id == reference || s.name == reference)
}

/// All consecutive step pairs, in funnel order.
pub fn pairs(steps: &[FunnelStep]) -> Vec<FunnelPair> {
    steps
        .windows(2)
        .map(|w| FunnelPair {
            from: w[0].step.clone(),
            to: w[1].step.clone(),
            from_value: w[0].value,
            to_value: w[1].value,
        })
        .collect()
}

/// Find the adjacent pair `from → to`. Non-adjacent steps yield `None`.
pub fn find_pair(steps: &[FunnelStep], from: &str, to: &str) -> Option<FunnelPair> {
    pairs(steps)
        .into_iter()
        .find(|p| p.from == from && p.to == to)
}

/// Declares which adjacent funnel pairs may spawn recall tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionablePairs {
    pub all_pairs_actionable: bool,
    pub actionable_pairs: Vec<[String; 2]>,
}

impl Default for ActionablePairs {
    fn default() -> Self {
        Self {
            all_pairs_actionable: false,
            actionable_pairs: vec![["加购".to_string(), "下单".to_string()]],
        }
    }
}

impl ActionablePairs {
    pub fn is_actionable(&self, pair: &FunnelPair) -> bool {
        self.all_pairs_actionable
            || self
                .actionable_pairs
                .iter()
                .any(|[from, to]| *from == pair.from && *to == pair.to)
    }
}
