//! Issue resolution against the Jira REST API.
//!
//! A resolve call validates the config, optionally searches for an issue that
//! already carries the problem number, and otherwise creates one. Calls are
//! sequential and never retried.

use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::config::{ApiFlavor, TrackerConfig};
use crate::error::{Error, Result};
use crate::payload::build_issue_payload;
use crate::problem::ProblemRecord;

/// An issue found by search or just created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRef {
    pub key: String,
    pub url: String,
    pub existed: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<IssueKey>,
}

#[derive(Debug, Deserialize)]
struct IssueKey {
    key: String,
}

pub struct JiraClient {
    config: TrackerConfig,
    http: Client,
}

impl JiraClient {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Find or create the issue for `problem`.
    pub async fn resolve(&self, problem: &ProblemRecord) -> Result<IssueRef> {
        self.config.validate()?;

        if let Some(field) = self.dedup_field(problem) {
            if let Some(found) = self.search_existing(field, &problem.number).await? {
                info!(key = %found.key, number = %problem.number, "issue already exists");
                return Ok(found);
            }
        }

        let created = self.create_issue(problem).await?;
        info!(key = %created.key, number = %problem.number, "issue created");
        Ok(created)
    }

    fn dedup_field(&self, problem: &ProblemRecord) -> Option<&str> {
        let field = self.config.problem_number_field.as_deref()?;
        (!field.is_empty() && !problem.number.is_empty()).then_some(field)
    }

    /// Newest issue of this project and type, reported by the current user, whose
    /// `field` contains `number`.
    pub async fn search_existing(&self, field: &str, number: &str) -> Result<Option<IssueRef>> {
        let jql = search_jql(&self.config, field, number);
        debug!(%jql, "searching for existing issue");

        let body = json!({
            "jql": jql,
            "maxResults": 1,
            "fields": ["summary"],
        });
        let res = self
            .authorize(self.http.post(self.config.api_url("search")))
            .json(&body)
            .send()
            .await?;
        let found = check(res).await?.json::<SearchResponse>().await?;

        Ok(found.issues.into_iter().next().map(|issue| IssueRef {
            url: self.config.browse_url(&issue.key),
            key: issue.key,
            existed: true,
        }))
    }

    pub async fn create_issue(&self, problem: &ProblemRecord) -> Result<IssueRef> {
        let payload = build_issue_payload(&self.config, problem)?;
        debug!(number = %problem.number, "creating issue");

        let res = self
            .authorize(self.http.post(self.config.api_url("issue")))
            .json(&payload)
            .send()
            .await?;
        let created = check(res).await?.json::<IssueKey>().await?;

        Ok(IssueRef {
            url: self.config.browse_url(&created.key),
            key: created.key,
            existed: false,
        })
    }

    /// Cloud takes basic `user:token`, Data Center a bearer personal access token.
    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match self.config.api_flavor {
            ApiFlavor::Cloud => req.basic_auth(&self.config.auth_user, Some(&self.config.auth_token)),
            ApiFlavor::DataCenter => req.bearer_auth(&self.config.auth_token),
        }
    }
}

async fn check(res: Response) -> Result<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    Err(Error::TrackerApi {
        status: status.as_u16(),
        body,
    })
}

fn search_jql(config: &TrackerConfig, field: &str, number: &str) -> String {
    format!(
        "project = {} AND issuetype = {} AND {} ~ {} AND reporter = currentUser() ORDER BY created DESC",
        quote(&config.project_key),
        quote(&config.issue_type),
        field_ref(field),
        quote(number),
    )
}

/// `customfield_10100` and bare ids become `cf[10100]`; names are quoted.
fn field_ref(field: &str) -> String {
    let id = field.strip_prefix("customfield_").unwrap_or(field);
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        format!("cf[{id}]")
    } else {
        quote(field)
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
