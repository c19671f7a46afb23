use serde_json::json;

use crate::catalog::{self, Catalog};
use crate::cli::report_error;
use crate::config::AgentConfig;
use crate::error::ReachaiError;
use crate::models::{dedup_benefits, Channel};
use crate::output;
use crate::rules::generate_copy;

pub fn run_segments(json_output: bool) -> i32 {
    let catalog = Catalog::demo();
    if json_output {
        let segments: Vec<_> = catalog.segments.iter().map(output::json::segment_json).collect();
        println!("{:#}", output::json::success(json!({ "segments": segments })));
    } else {
        output::text::print_segments(&catalog.segments);
    }
    0
}

pub fn run_funnel(config: &AgentConfig, json_output: bool) -> i32 {
    let catalog = Catalog::demo();
    let pairs = catalog::pairs(&catalog.funnel);
    if json_output {
        let steps: Vec<_> = catalog.funnel.iter().map(output::json::funnel_step_json).collect();
        let pairs_json: Vec<_> = pairs
            .iter()
            .map(|p| output::json::funnel_pair_json(p, &config.funnel))
            .collect();
        println!(
            "{:#}",
            output::json::success(json!({ "steps": steps, "pairs": pairs_json }))
        );
    } else {
        output::text::print_funnel(&catalog.funnel, &pairs, &config.funnel);
    }
    0
}

pub fn parse_channel(value: &str) -> Result<Channel, ReachaiError> {
    Channel::from_str(value).ok_or_else(|| {
        ReachaiError::validation(format!("Unknown channel '{value}'. Use push, edm or sms."))
    })
}

/// Split `券,赠品` style values into labels.
pub fn parse_benefits(values: &[String]) -> Vec<String> {
    dedup_benefits(
        values
            .iter()
            .flat_map(|v| v.split([',', '、']))
            .map(str::to_string),
    )
}

pub fn run_copy(segment: &str, channel: &str, benefits: &[String], json_output: bool) -> i32 {
    match copy_inner(segment, channel, benefits, json_output) {
        Ok(code) => code,
        Err(e) => report_error(&e, json_output),
    }
}

fn copy_inner(
    segment: &str,
    channel: &str,
    benefits: &[String],
    json_output: bool,
) -> Result<i32, ReachaiError> {
    let channel = parse_channel(channel)?;
    let benefits = parse_benefits(benefits);
    let catalog = Catalog::demo();
    // Catalog ids map to names; anything else is taken as a free-form name.
    let name = catalog
        .segment(segment)
        .map(|s| s.name.clone())
        .unwrap_or_else(|_| segment.to_string());
    let copy = generate_copy(&name, channel, &benefits);

    if json_output {
        println!(
            "{:#}",
            output::json::success(output::json::copy_json(&name, channel.as_str(), &benefits, &copy))
        );
    } else {
        println!("{} · {}", name, channel.label());
        output::text::print_copy(&copy);
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn benefits_split_on_separators() {
        let parsed = parse_benefits(&["券,赠品".to_string(), "积分、券".to_string()]);
        assert_eq!(parsed, vec!["券", "赠品", "积分"]);
    }

    #[test]
    fn unknown_channel_is_rejected() {
        assert!(parse_channel("edm").is_ok());
        assert!(parse_channel("EDM").is_err());
    }
}
