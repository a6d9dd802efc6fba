use serde::{Deserialize, Serialize};

const DESCRIPTION_PREVIEW: usize = 500;
const IO_PREVIEW: usize = 300;

/// A problem scraped from a judge page. Built once per scrape and never mutated.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemRecord {
    pub number: String,
    pub title: String,
    pub url: String,
    pub description: String,
    pub input: String,
    pub output: String,
    pub limit: String,
    /// Only the first sample pair is kept.
    pub samples: Vec<Sample>,
    pub tier: Option<u8>,
    pub tags: Vec<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub input: String,
    pub output: String,
}

impl ProblemRecord {
    pub fn is_blank(&self) -> bool {
        self.number.is_empty() && self.title.is_empty()
    }

    pub fn first_sample(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn preview(&self) -> String {
        let mut out = format!("{} - {}\n{}\n", self.number, self.title, self.url);
        out.push_str("----\n");
        for (label, text, limit) in [
            ("설명", &self.description, DESCRIPTION_PREVIEW),
            ("입력", &self.input, IO_PREVIEW),
            ("출력", &self.output, IO_PREVIEW),
        ] {
            out.push_str(&format!("[{label}]\n{}\n", truncate(text, limit)));
        }
        out
    }
}

fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
