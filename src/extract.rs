use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::{Error, Result};
use crate::markup::to_jira_markup;
use crate::problem::{ProblemRecord, Sample};

static PROBLEM_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/problem/(\d+)").unwrap());
static TITLE_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\d+\s*-\s*").unwrap());
static TIER_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"solvedac-tier-name-(\d+)").unwrap());

const SAMPLE_INPUT: &str = r#"pre#sample-input-1, pre#sampleinput1, pre[id^="sample-input"]"#;
const SAMPLE_OUTPUT: &str = r#"pre#sample-output-1, pre#sampleoutput1, pre[id^="sample-output"]"#;

/// Read a problem page. Missing elements leave their fields empty; this never fails.
pub fn extract(html: &str, url: &str) -> ProblemRecord {
    let document = Html::parse_document(html);
    let number = problem_number(url);

    ProblemRecord {
        title: title(&document),
        url: url.to_string(),
        description: to_jira_markup(first(&document, "#problem_description")),
        input: to_jira_markup(first(&document, "#problem_input")),
        output: to_jira_markup(first(&document, "#problem_output")),
        limit: to_jira_markup(first(&document, "#problem_limit")),
        samples: samples(&document),
        tier: tier(&document),
        tags: tags(&document),
        number,
    }
}

/// Like [`extract`], but a page with neither a number nor a title is reported as not a problem page.
pub fn try_extract(html: &str, url: &str) -> Result<ProblemRecord> {
    let problem = extract(html, url);
    if problem.is_blank() {
        return Err(Error::Extraction(url.to_string()));
    }
    Ok(problem)
}

pub fn problem_number(url: &str) -> String {
    PROBLEM_NUMBER
        .captures(url)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}

fn first<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    document.select(&Selector::parse(css).unwrap()).next()
}

fn text_of(element: ElementRef) -> String {
    element.text().collect()
}

fn title(document: &Html) -> String {
    if let Some(el) = first(document, "#problem_title") {
        return text_of(el).trim().to_string();
    }
    first(document, "title")
        .map(|el| TITLE_PREFIX.replace(&text_of(el), "").trim().to_string())
        .unwrap_or_default()
}

/// First sample pair, raw text. Empty when neither block exists.
fn samples(document: &Html) -> Vec<Sample> {
    let input = first(document, SAMPLE_INPUT);
    let output = first(document, SAMPLE_OUTPUT);
    if input.is_none() && output.is_none() {
        return vec![];
    }

    vec![Sample {
        input: input.map(text_of).unwrap_or_default(),
        output: output.map(text_of).unwrap_or_default(),
    }]
}

fn tier(document: &Html) -> Option<u8> {
    let class = first(document, r#"span[class*="solvedac-tier-name-"]"#)?
        .value()
        .attr("class")?;
    TIER_CLASS.captures(class)?[1].parse().ok()
}

fn tags(document: &Html) -> Vec<String> {
    document
        .select(&Selector::parse("a.spoiler-link").unwrap())
        .map(|el| text_of(el).trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const URL: &str = "https://www.acmicpc.net/problem/1000";

    #[test]
    fn extract_fixture_should_work() {
        let content = fs::read_to_string("fixtures/p1000.html").unwrap();
        let problem = extract(&content, URL);

        assert_eq!(problem.number, "1000");
        assert_eq!(problem.title, "A+B");
        assert_eq!(problem.url, URL);
        assert_eq!(
            problem.description,
            "두 정수 {latex-inline}A{latex-inline}와 {latex-inline}B{latex-inline}를 입력받은 다음, {latex-inline}A+B{latex-inline}를 출력하는 프로그램을 작성하시오."
        );
        assert_eq!(
            problem.input,
            "첫째 줄에 {{A}}와 {{B}}가 주어진다. (0 &lt; A, B &lt; 10)"
        );
        assert_eq!(problem.output, "첫째 줄에 A+B를 출력한다.");
        assert_eq!(problem.limit, "");
        assert_eq!(
            problem.samples,
            vec![Sample {
                input: "1 2\n".into(),
                output: "3\n".into(),
            }]
        );
        assert_eq!(problem.tier, Some(1));
        assert_eq!(problem.tags, vec!["구현", "사칙연산", "수학"]);
    }

    #[test]
    fn title_should_fall_back_to_page_title() {
        let html = "<html><head><title>1000 - A+B</title></head><body></body></html>";
        assert_eq!(extract(html, URL).title, "A+B");
    }

    #[test]
    fn empty_page_should_default_every_field() {
        let problem = extract("<html><body><p>nothing</p></body></html>", "https://example.com/");

        assert_eq!(problem.number, "");
        assert_eq!(problem.title, "");
        assert_eq!(problem.description, "");
        assert!(problem.samples.is_empty());
        assert_eq!(problem.tier, None);
        assert!(problem.tags.is_empty());
    }

    #[test]
    fn try_extract_should_reject_blank_pages() {
        let err = try_extract("<html></html>", "https://example.com/").unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn sample_should_keep_missing_side_empty() {
        let html = r#"<pre id="sample-output-1">42</pre>"#;
        let problem = extract(html, URL);

        assert_eq!(
            problem.samples,
            vec![Sample {
                input: String::new(),
                output: "42".into(),
            }]
        );
    }

    #[test]
    fn tier_should_ignore_unparseable_class() {
        let html = r#"<span class="solvedac-tier-name-x">?</span>"#;
        assert_eq!(extract(html, URL).tier, None);

        let html = r#"<span class="title solvedac-tier-name-6">실버 V</span>"#;
        assert_eq!(extract(html, URL).tier, Some(6));
    }

    #[test]
    fn tags_should_keep_document_order_and_duplicates() {
        let html = r#"<a class="spoiler-link"> b </a><a class="spoiler-link">a</a><a class="spoiler-link">b</a>"#;
        assert_eq!(extract(html, URL).tags, vec!["b", "a", "b"]);
    }

    #[test]
    fn problem_number_should_parse_url() {
        assert_eq!(problem_number("https://www.acmicpc.net/problem/1000"), "1000");
        assert_eq!(problem_number("https://www.acmicpc.net/problem/15649?x=1"), "15649");
        assert_eq!(problem_number("https://www.acmicpc.net/status"), "");
    }
}
