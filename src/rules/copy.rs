//! Copy generation: segment × channel × benefit combination.
//!
//! Two ordered tables drive the output. The benefit table picks the incentive
//! phrase and call-to-action, the greeting table picks the salutation by
//! keyword. Both are first-match, so declaration order is precedence.

use serde::Serialize;

use crate::models::Channel;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedCopy {
    pub title: String,
    pub content: String,
}

pub struct BenefitRule {
    pub label: &'static str,
    pub phrase: &'static str,
    pub action: &'static str,
}

pub const BENEFIT_RULES: &[BenefitRule] = &[
    BenefitRule {
        label: "券",
        phrase: "专属优惠券",
        action: "领取优惠券",
    },
    BenefitRule {
        label: "赠品",
        phrase: "精美赠品",
        action: "领取赠品",
    },
    BenefitRule {
        label: "积分",
        phrase: "积分奖励",
        action: "获取积分",
    },
    BenefitRule {
        label: "晒单分享奖励",
        phrase: "分享奖励",
        action: "参与分享",
    },
];

/// Separator for combined benefit labels.
pub const BENEFIT_SEPARATOR: &str = "、";
pub const COMBINED_ACTION: &str = "领取权益";

pub struct GreetingRule {
    /// Matches when the segment name contains any of these.
    pub keywords: &'static [&'static str],
    pub greeting: &'static str,
    pub action: &'static str,
}

pub const GREETING_RULES: &[GreetingRule] = &[
    GreetingRule {
        keywords: &["活跃", "加购"],
        greeting: "尊敬的活跃用户",
        action: "立即查看",
    },
    GreetingRule {
        keywords: &["高价值"],
        greeting: "尊敬的高价值用户",
        action: "尊享权益",
    },
    GreetingRule {
        keywords: &["流失", "沉没"],
        greeting: "亲爱的用户",
        action: "回归有礼",
    },
];

pub static FALLBACK_GREETING: GreetingRule = GreetingRule {
    keywords: &[],
    greeting: "尊敬的客户",
    action: "查看详情",
};

/// Phrase and call-to-action for a benefit selection. `None` when nothing
/// recognisable is selected.
fn resolve_benefit(benefits: &[String]) -> Option<(String, String)> {
    if benefits.len() > 1 {
        return Some((benefits.join(BENEFIT_SEPARATOR), COMBINED_ACTION.to_string()));
    }
    BENEFIT_RULES
        .iter()
        .find(|rule| benefits.iter().any(|b| b == rule.label))
        .map(|rule| (rule.phrase.to_string(), rule.action.to_string()))
}

fn resolve_greeting(segment_name: &str) -> &'static GreetingRule {
    GREETING_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| segment_name.contains(k)))
        .unwrap_or(&FALLBACK_GREETING)
}

/// Build the title and body for a segment. The channel does not change the
/// wording; it only names the medium the copy will be sent through.
pub fn generate_copy(segment_name: &str, _channel: Channel, benefits: &[String]) -> GeneratedCopy {
    let benefit = resolve_benefit(benefits);
    let greeting = resolve_greeting(segment_name);

    let (phrase, cta) = match &benefit {
        Some((phrase, action)) => (phrase.as_str(), Some(action.as_str())),
        None => ("", None),
    };
    let title_phrase = if phrase.is_empty() { "权益" } else { phrase };
    let body_phrase = if phrase.is_empty() { "专属权益" } else { phrase };
    let closing = match cta {
        Some(action) if !action.is_empty() => format!("点击{action}，期待您的参与。"),
        _ => "点击查看详情。".to_string(),
    };

    GeneratedCopy {
        title: format!("{segment_name}专属{title_phrase}活动"),
        content: format!(
            "{}，我们为您准备了{}，{}！{}",
            greeting.greeting, body_phrase, greeting.action, closing
        ),
    }
}
