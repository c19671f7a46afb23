use crate::models::Priority;

/// Fixed tier and rationale for a named segment.
pub struct PriorityRule {
    pub segment: &'static str,
    pub priority: Priority,
    pub reason: &'static str,
}

/// Evaluated top to bottom; the first exact name match wins.
pub const PRIORITY_RULES: &[PriorityRule] = &[
    PriorityRule {
        segment: "活跃低转化",
        priority: Priority::P0,
        reason: "用户规模大 × 流失风险高",
    },
    PriorityRule {
        segment: "加购未购买",
        priority: Priority::P0,
        reason: "用户规模大 × 转化潜力高",
    },
    PriorityRule {
        segment: "收藏未购买",
        priority: Priority::P1,
        reason: "用户规模中等 × 购买意愿待激活",
    },
    PriorityRule {
        segment: "高价值低频次",
        priority: Priority::P1,
        reason: "用户价值高 × 复购潜力大",
    },
    PriorityRule {
        segment: "高价值高频次",
        priority: Priority::P2,
        reason: "用户价值高 × 维护关系",
    },
    PriorityRule {
        segment: "沉没流失",
        priority: Priority::P2,
        reason: "用户规模中等 × 流失风险中等",
    },
];

pub const DEFAULT_PRIORITY: Priority = Priority::P3;

/// Size buckets for unlisted segments: `(exclusive lower bound, label)`,
/// largest first. Counts at or below every bound fall into [`SMALLEST_BUCKET`].
pub const SIZE_BUCKETS: &[(u64, &str)] = &[(1000, "大"), (500, "中等")];

pub const SMALLEST_BUCKET: &str = "小";

fn rule_for(segment_name: &str) -> Option<&'static PriorityRule> {
    PRIORITY_RULES.iter().find(|r| r.segment == segment_name)
}

pub fn priority_for(segment_name: &str) -> Priority {
    rule_for(segment_name)
        .map(|r| r.priority)
        .unwrap_or(DEFAULT_PRIORITY)
}

pub fn size_bucket(count: u64) -> &'static str {
    SIZE_BUCKETS
        .iter()
        .find(|(bound, _)| count > *bound)
        .map(|(_, label)| *label)
        .unwrap_or(SMALLEST_BUCKET)
}

pub fn priority_reason_for(segment_name: &str, count: u64) -> String {
    match rule_for(segment_name) {
        Some(rule) => rule.reason.to_string(),
        None => format!("用户规模{}", size_bucket(count)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_segments_have_fixed_tiers() {
        assert_eq!(priority_for("活跃低转化"), Priority::P0);
        assert_eq!(priority_for("加购未购买"), Priority::P0);
        assert_eq!(priority_for("收藏未购买"), Priority::P1);
        assert_eq!(priority_for("高价值低频次"), Priority::P1);
        assert_eq!(priority_for("高价值高频次"), Priority::P2);
        assert_eq!(priority_for("沉没流失"), Priority::P2);
    }

    #[test]
    fn unlisted_segment_defaults_to_p3() {
        assert_eq!(priority_for("加购→下单流失用户"), Priority::P3);
        assert_eq!(priority_for(""), Priority::P3);
        assert_eq!(priority_for("活跃低转化 "), Priority::P3);
    }

    #[test]
    fn named_segment_reason_ignores_count() {
        assert_eq!(priority_reason_for("沉没流失", 0), "用户规模中等 × 流失风险中等");
        assert_eq!(priority_reason_for("沉没流失", 99_999), "用户规模中等 × 流失风险中等");
    }

    #[test]
    fn unlisted_reason_buckets_by_count() {
        assert_eq!(priority_reason_for("新客", 1500), "用户规模大");
        assert_eq!(priority_reason_for("新客", 700), "用户规模中等");
        assert_eq!(priority_reason_for("新客", 100), "用户规模小");
    }

    #[test]
    fn bucket_bounds_are_exclusive() {
        assert_eq!(size_bucket(1001), "大");
        assert_eq!(size_bucket(1000), "中等");
        assert_eq!(size_bucket(501), "中等");
        assert_eq!(size_bucket(500), "小");
        assert_eq!(size_bucket(0), "小");
    }
}
