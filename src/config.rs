use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::error::{Error, Result};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
pub enum ApiFlavor {
    #[default]
    #[strum(serialize = "dc")]
    #[serde(rename = "dc")]
    DataCenter,
    #[strum(serialize = "cloud")]
    #[serde(rename = "cloud")]
    Cloud,
}

impl ApiFlavor {
    pub fn api_path(&self) -> &'static str {
        match self {
            ApiFlavor::Cloud => "rest/api/3",
            ApiFlavor::DataCenter => "rest/api/2",
        }
    }
}

/// Jira connection settings, persisted as JSON.
#[derive(Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(default, setter(into))]
#[serde(default)]
pub struct TrackerConfig {
    pub base_url: String,
    pub api_flavor: ApiFlavor,
    pub project_key: String,
    pub issue_type: String,
    pub auth_user: String,
    pub auth_token: String,
    /// Custom field holding the problem number; also the dedup key.
    #[builder(setter(strip_option))]
    pub problem_number_field: Option<String>,
    /// Single-choice custom field holding the tier name.
    #[builder(setter(strip_option))]
    pub level_field: Option<String>,
    pub default_labels: Vec<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_flavor: ApiFlavor::default(),
            project_key: String::new(),
            issue_type: "Task".to_string(),
            auth_user: String::new(),
            auth_token: String::new(),
            problem_number_field: None,
            level_field: None,
            default_labels: vec!["baekjoon".to_string()],
        }
    }
}

impl TrackerConfig {
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("could not determine config directory".into()))?;
        Ok(dir.join("boj-jira").join("config.json"))
    }

    /// Load from `path`. A missing file means all defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("read {}: {e}", path.display())))?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("parse {}: {e}", path.display())))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("create {}: {e}", parent.display())))?;
        }

        let contents = serde_json::to_string_pretty(&self.normalized())
            .map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, contents)
            .map_err(|e| Error::Config(format!("write {}: {e}", path.display())))?;
        debug!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Trimmed copy with trailing slashes removed from the base URL and blank entries dropped.
    pub fn normalized(&self) -> Self {
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            base_url: self.base_url.trim().trim_end_matches('/').to_string(),
            api_flavor: self.api_flavor,
            project_key: self.project_key.trim().to_string(),
            issue_type: self.issue_type.trim().to_string(),
            auth_user: self.auth_user.trim().to_string(),
            auth_token: self.auth_token.clone(),
            problem_number_field: non_blank(&self.problem_number_field),
            level_field: non_blank(&self.level_field),
            default_labels: self
                .default_labels
                .iter()
                .map(|label| label.trim())
                .filter(|label| !label.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Every required field that is blank, in a stable order.
    pub fn validate(&self) -> Result<()> {
        let missing = [
            ("base_url", &self.base_url),
            ("project_key", &self.project_key),
            ("issue_type", &self.issue_type),
            ("auth_token", &self.auth_token),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect::<Vec<_>>();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::ConfigurationIncomplete(missing))
        }
    }

    pub fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_flavor.api_path(),
            endpoint
        )
    }

    pub fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.base_url.trim_end_matches('/'), key)
    }
}

/// Comma separated label list, as typed on the command line.
pub fn parse_labels(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

impl fmt::Debug for TrackerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerConfig")
            .field("base_url", &self.base_url)
            .field("api_flavor", &self.api_flavor)
            .field("project_key", &self.project_key)
            .field("issue_type", &self.issue_type)
            .field("auth_user", &self.auth_user)
            .field("auth_token", &"***")
            .field("problem_number_field", &self.problem_number_field)
            .field("level_field", &self.level_field)
            .field("default_labels", &self.default_labels)
            .finish()
    }
}

impl fmt::Display for TrackerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.auth_token.is_empty() {
            "(not set)"
        } else {
            "********"
        };
        writeln!(f, "base_url             = {}", self.base_url)?;
        writeln!(f, "api_flavor           = {}", self.api_flavor)?;
        writeln!(f, "project_key          = {}", self.project_key)?;
        writeln!(f, "issue_type           = {}", self.issue_type)?;
        writeln!(f, "auth_user            = {}", self.auth_user)?;
        writeln!(f, "auth_token           = {token}")?;
        writeln!(
            f,
            "problem_number_field = {}",
            self.problem_number_field.as_deref().unwrap_or("")
        )?;
        writeln!(f, "level_field          = {}", self.level_field.as_deref().unwrap_or(""))?;
        write!(f, "default_labels       = {}", self.default_labels.join(","))
    }
}
