pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod jira;
pub mod markup;
pub mod message;
pub mod payload;
pub mod problem;
pub mod tier;

pub use config::{ApiFlavor, TrackerConfig, TrackerConfigBuilder};
pub use error::{Error, Result};
pub use jira::{IssueRef, JiraClient};
pub use problem::{ProblemRecord, Sample};
