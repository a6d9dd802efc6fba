use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no problem found on this page: {0}")]
    Extraction(String),

    /// Required tracker settings are blank. Raised before any network call.
    #[error("tracker configuration is incomplete, missing: {}", .0.join(", "))]
    ConfigurationIncomplete(Vec<&'static str>),

    #[error("tracker API error ({status}): {body}")]
    TrackerApi { status: u16, body: String },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("render error: {0}")]
    Render(#[from] askama::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

