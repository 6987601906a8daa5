use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default GitHub REST API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub repository information
#[derive(Debug, Clone, PartialEq)]
pub struct GitHubRepo {
    pub owner: String,
    pub name: String,
}

impl GitHubRepo {
    /// Parse an `owner/repo` slug as found in `GITHUB_REPOSITORY`
    pub fn parse(slug: &str) -> Result<Self> {
        let parts: Vec<&str> = slug.split('/').collect();
        match parts.as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(Error::config(format!("Invalid GitHub repository: {}", slug))),
        }
    }
}

/// A GitHub deployment as returned by the deployments API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeploymentInfo {
    pub id: u64,
    pub sha: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub environment: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentState {
    Pending,
    Success,
    Inactive,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DeploymentStatusRequest {
    pub state: DeploymentState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_url: Option<String>,
}

impl DeploymentStatusRequest {
    /// Status without links
    pub fn bare(state: DeploymentState) -> Self {
        Self {
            state,
            environment_url: None,
            log_url: None,
        }
    }

    /// Status linking the preview environment and its console page
    pub fn with_links(state: DeploymentState, environment_url: &str, log_url: &str) -> Self {
        Self {
            state,
            environment_url: Some(environment_url.to_string()),
            log_url: Some(log_url.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateDeploymentRequest<'a> {
    #[serde(rename = "ref")]
    git_ref: &'a str,
    auto_merge: bool,
    environment: &'a str,
    transient_environment: bool,
    required_contexts: Vec<String>,
}

/// GitHub answers 202 with only a message when it merges the default branch instead
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CreateDeploymentResponse {
    Created(DeploymentInfo),
    Accepted { message: String },
}

#[derive(Debug, Deserialize)]
struct DeploymentStatusResponse {
    id: u64,
    state: DeploymentState,
}

/// Trait for GitHub deployment operations to enable dependency injection and mocking
#[async_trait]
pub trait GitHubClientTrait: Send + Sync {
    /// Create a transient deployment of `git_ref` into `environment`, returning its id
    async fn create_deployment(&self, git_ref: &str, environment: &str) -> Result<u64>;

    async fn create_deployment_status(
        &self,
        deployment_id: u64,
        status: &DeploymentStatusRequest,
    ) -> Result<()>;

    /// Most recent deployment into `environment`, if any
    async fn latest_deployment(&self, environment: &str) -> Result<Option<DeploymentInfo>>;
}

/// GitHub API client wrapper
pub struct GitHubClient {
    octocrab: Octocrab,
    repo: GitHubRepo,
}

impl GitHubClient {
    /// Create a new GitHub client
    pub fn new(token: &str, api_url: &str, repo: GitHubRepo) -> Result<Self> {
        let octocrab = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(api_url)?
            .build()?;

        Ok(Self { octocrab, repo })
    }

    fn deployments_route(&self) -> String {
        format!("/repos/{}/{}/deployments", self.repo.owner, self.repo.name)
    }
}

#[async_trait]
impl GitHubClientTrait for GitHubClient {
    async fn create_deployment(&self, git_ref: &str, environment: &str) -> Result<u64> {
        let request = CreateDeploymentRequest {
            git_ref,
            auto_merge: false,
            environment,
            transient_environment: true,
            required_contexts: Vec::new(),
        };

        let response: CreateDeploymentResponse = self
            .octocrab
            .post(self.deployments_route(), Some(&request))
            .await?;

        match response {
            CreateDeploymentResponse::Created(deployment) => {
                tracing::info!("Created github deployment {}", deployment.id);
                Ok(deployment.id)
            }
            CreateDeploymentResponse::Accepted { message } => Err(Error::DeploymentNotCreated(message)),
        }
    }

    async fn create_deployment_status(
        &self,
        deployment_id: u64,
        status: &DeploymentStatusRequest,
    ) -> Result<()> {
        let route = format!("{}/{}/statuses", self.deployments_route(), deployment_id);
        let response: DeploymentStatusResponse = self.octocrab.post(route, Some(status)).await?;

        tracing::debug!(
            deployment_id,
            status_id = response.id,
            state = ?response.state,
            "created deployment status"
        );
        Ok(())
    }

    async fn latest_deployment(&self, environment: &str) -> Result<Option<DeploymentInfo>> {
        let deployments: Vec<DeploymentInfo> = self
            .octocrab
            .get(self.deployments_route(), Some(&[("environment", environment)]))
            .await?;

        // newest first
        Ok(deployments.into_iter().next())
    }
}
