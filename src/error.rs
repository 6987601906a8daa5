use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Config(String),

    #[error("Humanitec API returned {status} for {method} {path}")]
    HumanitecApi {
        method: String,
        path: String,
        status: StatusCode,
        body: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API error: {0}")]
    GitHub(#[from] octocrab::Error),

    #[error("Environment {0} has never been deployed")]
    NeverDeployed(String),

    #[error("Creating deployment failed {0}")]
    DeploymentNotCreated(String),

    #[error("Invalid environment URL template: {0}")]
    Template(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the orchestration platform reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::HumanitecApi { status, .. } if *status == StatusCode::NOT_FOUND)
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
