//! Rich-text section to Jira wiki markup.
//!
//! Passes run in a fixed order: MathJax widgets are resolved on the DOM, the
//! subtree is serialized, and the remaining passes rewrite the serialized text.

use std::sync::LazyLock;

use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{NodeOrText, TreeSink};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

const LATEX_INLINE: &str = "{latex-inline}";

static PARAGRAPH_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<p>").unwrap());
static PARAGRAPH_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</p>").unwrap());
static CODE_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<code>").unwrap());
static CODE_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</code>").unwrap());
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<[^>]*?>").unwrap());

/// Convert a section element to Jira markup. A missing element yields an empty string.
pub fn to_jira_markup(element: Option<ElementRef>) -> String {
    let Some(element) = element else {
        return String::new();
    };

    let mut fragment = Html::parse_fragment(&element.inner_html());
    replace_math(&mut fragment);
    let html = fragment.root_element().inner_html();

    let text = PARAGRAPH_OPEN.replace_all(&html, "");
    let text = PARAGRAPH_CLOSE.replace_all(&text, "\n");
    let text = CODE_OPEN.replace_all(&text, "{{");
    let text = CODE_CLOSE.replace_all(&text, "}}");
    let text = ANY_TAG.replace_all(&text, "");
    text.trim().to_string()
}

/// Swap every `mjx-container` for its copy text. Containers without copy text are left alone.
fn replace_math(fragment: &mut Html) {
    let container = Selector::parse("mjx-container").unwrap();
    let copy_text = Selector::parse(".mjx-copytext").unwrap();

    let replacements = fragment
        .select(&container)
        .filter_map(|mjx| {
            let text = mjx.select(&copy_text).next()?.text().collect::<String>();
            let text = text.trim();
            if text.is_empty() {
                None
            } else {
                Some((mjx.id(), inline_math(text)))
            }
        })
        .collect::<Vec<_>>();

    for (id, text) in replacements {
        fragment.append_before_sibling(&id, NodeOrText::AppendText(StrTendril::from(text)));
        fragment.remove_from_parent(&id);
    }
}

/// `$x$` becomes `{latex-inline}x{latex-inline}`; anything else passes through.
pub fn inline_math(text: &str) -> String {
    match text.strip_prefix('$').and_then(|s| s.strip_suffix('$')) {
        Some(inner) => format!("{LATEX_INLINE}{inner}{LATEX_INLINE}"),
        None => text.to_string(),
    }
}
