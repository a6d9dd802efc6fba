//! Jira issue payload for a scraped problem.

use std::sync::LazyLock;

use askama::Template;
use regex::Regex;
use serde_json::{json, Map, Value};

use crate::config::TrackerConfig;
use crate::error::Result;
use crate::problem::ProblemRecord;
use crate::tier::tier_name;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Template)]
#[template(path = "description.jira", escape = "none")]
struct Description<'a> {
    url: &'a str,
    tier: Option<String>,
    sections: Vec<Section<'a>>,
}

#[derive(Debug)]
struct Section<'a> {
    title: &'static str,
    body: &'a str,
    preformatted: bool,
}

impl<'a> Section<'a> {
    fn text(title: &'static str, body: &'a str) -> Self {
        Self {
            title,
            body: body.trim(),
            preformatted: false,
        }
    }

    fn raw(title: &'static str, body: &'a str) -> Self {
        Self {
            title,
            body: body.trim_end(),
            preformatted: true,
        }
    }
}

/// `[BOJ <number>][<tier>] <title>`, the tier part only when the rank has a name.
pub fn summary(problem: &ProblemRecord) -> String {
    match tier_name(problem.tier) {
        Some(tier) => format!("[BOJ {}][{}] {}", problem.number, tier, problem.title),
        None => format!("[BOJ {}] {}", problem.number, problem.title),
    }
}

/// Default labels followed by the tags, whitespace runs replaced by `_`, first occurrence wins.
pub fn labels(defaults: &[String], tags: &[String]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::with_capacity(defaults.len() + tags.len());
    let candidates = defaults
        .iter()
        .chain(tags)
        .map(|label| WHITESPACE.replace_all(label.trim(), "_").into_owned())
        .filter(|label| !label.is_empty());

    for label in candidates {
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    labels
}

pub fn description(problem: &ProblemRecord) -> Result<String> {
    let mut sections = vec![
        Section::text("설명", &problem.description),
        Section::text("입력", &problem.input),
        Section::text("출력", &problem.output),
    ];
    if !problem.limit.trim().is_empty() {
        sections.push(Section::text("제한", &problem.limit));
    }
    if let Some(sample) = problem.first_sample() {
        sections.push(Section::raw("예제 입력 1", &sample.input));
        sections.push(Section::raw("예제 출력 1", &sample.output));
    }

    let rendered = Description {
        url: &problem.url,
        tier: tier_name(problem.tier),
        sections,
    }
    .render()?;

    Ok(rendered.trim_end().to_string())
}

/// The `{"fields": {...}}` body for the create-issue endpoint.
pub fn build_issue_payload(config: &TrackerConfig, problem: &ProblemRecord) -> Result<Value> {
    let mut fields = Map::new();
    fields.insert("project".into(), json!({ "key": config.project_key }));
    fields.insert("summary".into(), Value::String(summary(problem)));
    fields.insert("issuetype".into(), json!({ "name": config.issue_type }));
    fields.insert(
        "labels".into(),
        json!(labels(&config.default_labels, &problem.tags)),
    );
    fields.insert("description".into(), Value::String(description(problem)?));

    if let Some(field) = &config.problem_number_field {
        fields.insert(field.clone(), Value::String(problem.number.clone()));
    }
    if let (Some(field), Some(tier)) = (&config.level_field, tier_name(problem.tier)) {
        fields.insert(field.clone(), json!({ "value": tier }));
    }

    Ok(json!({ "fields": fields }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerConfigBuilder;
    use crate::problem::Sample;

    fn problem() -> ProblemRecord {
        ProblemRecord {
            number: "1000".into(),
            title: "A+B".into(),
            url: "https://www.acmicpc.net/problem/1000".into(),
            description: "Add {{A}} and {{B}}.".into(),
            input: "A B".into(),
            output: String::new(),
            tier: Some(6),
            tags: vec!["구현".into()],
            ..Default::default()
        }
    }

    #[test]
    fn summary_should_include_tier_name() {
        assert_eq!(summary(&problem()), "[BOJ 1000][실버 V] A+B");

        let unrated = ProblemRecord {
            tier: None,
            ..problem()
        };
        insta::assert_snapshot!(summary(&unrated), @"[BOJ 1000] A+B");

        let unknown = ProblemRecord {
            tier: Some(31),
            ..problem()
        };
        assert_eq!(summary(&unknown), "[BOJ 1000] A+B");
    }

    #[test]
    fn labels_should_union_in_order() {
        let result = labels(
            &["baekjoon".into()],
            &["두 포인터".into(), "baekjoon".into()],
        );
        assert_eq!(result, vec!["baekjoon", "두_포인터"]);
    }

    #[test]
    fn labels_should_collapse_whitespace_runs() {
        let result = labels(&[], &["  segment \t tree ".into(), "segment_tree".into()]);
        assert_eq!(result, vec!["segment_tree"]);
    }

    #[test]
    fn description_should_render_sections() {
        let text = description(&problem()).unwrap();

        assert!(text.starts_with("* *문제 링크*: https://www.acmicpc.net/problem/1000\n* *난이도*: 실버 V\n"));
        assert!(text.contains("h2. *설명*\n{panel}\nAdd {{A}} and {{B}}.\n{panel}"));
        assert!(text.contains("h2. *입력*\n{panel}\nA B\n{panel}"));
        assert!(text.contains("h2. *출력*\n(없음)"));
        assert!(!text.contains("제한"));
        assert!(!text.contains("예제"));
    }

    #[test]
    fn description_should_render_limit_and_sample() {
        let problem = ProblemRecord {
            tier: None,
            limit: "N <= 10".into(),
            samples: vec![Sample {
                input: "1 2\n".into(),
                output: String::new(),
            }],
            ..problem()
        };
        let text = description(&problem).unwrap();

        assert!(!text.contains("난이도"));
        assert!(text.contains("h2. *제한*\n{panel}\nN <= 10\n{panel}"));
        assert!(text.contains("h2. *예제 입력 1*\n{panel}\n{noformat}\n1 2\n{noformat}\n{panel}"));
        assert!(text.contains("h2. *예제 출력 1*\n(없음)"));
        assert!(text.ends_with("(없음)"));
    }

    #[test]
    fn payload_should_fill_custom_fields() {
        let config = TrackerConfigBuilder::default()
            .project_key("PS")
            .problem_number_field("customfield_10100".to_string())
            .level_field("customfield_10200".to_string())
            .build()
            .unwrap();

        let payload = build_issue_payload(&config, &problem()).unwrap();
        let fields = &payload["fields"];

        assert_eq!(fields["project"]["key"], "PS");
        assert_eq!(fields["issuetype"]["name"], "Task");
        assert_eq!(fields["summary"], "[BOJ 1000][실버 V] A+B");
        assert_eq!(fields["labels"], json!(["baekjoon", "구현"]));
        assert_eq!(fields["customfield_10100"], "1000");
        assert_eq!(fields["customfield_10200"], json!({ "value": "실버 V" }));
    }

    #[test]
    fn payload_should_skip_level_without_tier() {
        let config = TrackerConfigBuilder::default()
            .level_field("customfield_10200".to_string())
            .build()
            .unwrap();
        let problem = ProblemRecord {
            tier: None,
            ..problem()
        };

        let payload = build_issue_payload(&config, &problem).unwrap();
        let fields = payload["fields"].as_object().unwrap();

        assert!(!fields.contains_key("customfield_10200"));
        assert_eq!(fields.len(), 5);
    }
}
