//! Request/response messages exchanged with a host over JSON.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::TrackerConfig;
use crate::error::{Error, Result};
use crate::extract::try_extract;
use crate::fetch::fetch_page;
use crate::jira::{IssueRef, JiraClient};
use crate::problem::ProblemRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    /// Scrape a problem page. Without `html` the page is downloaded from `url`.
    ScrapeBaekjoon {
        url: String,
        #[serde(default)]
        html: Option<String>,
    },
    CreateJiraIssue { problem: ProblemRecord },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Response {
    Problem { problem: ProblemRecord },
    Issue {
        key: String,
        url: String,
        existed: bool,
    },
    Error { error: String },
}

impl From<IssueRef> for Response {
    fn from(issue: IssueRef) -> Self {
        Response::Issue {
            key: issue.key,
            url: issue.url,
            existed: issue.existed,
        }
    }
}

impl Request {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Transport(format!("malformed request: {e}")))
    }
}

impl Response {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Transport(e.to_string()))
    }
}

/// Serve one request. Failures are reported as [`Response::Error`], never retried.
pub async fn handle(request: Request, config: &TrackerConfig) -> Response {
    let result = match request {
        Request::ScrapeBaekjoon { url, html } => scrape(&url, html)
            .await
            .map(|problem| Response::Problem { problem }),
        Request::CreateJiraIssue { problem } => JiraClient::new(config.clone())
            .resolve(&problem)
            .await
            .map(Response::from),
    };

    result.unwrap_or_else(|err| {
        warn!(%err, "request failed");
        Response::Error {
            error: err.to_string(),
        }
    })
}

/// Read a problem from inline HTML or by downloading `url`.
pub async fn scrape(url: &str, html: Option<String>) -> Result<ProblemRecord> {
    let html = match html {
        Some(html) => html,
        None => fetch_page(url).await?,
    };
    try_extract(&html, url)
}
