use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use crate::error::{Error, Result};
use crate::github::{DeploymentInfo, DeploymentStatusRequest, GitHubClientTrait};

/// Mock GitHub client for testing that stores deployments in memory
#[derive(Debug, Clone)]
pub struct MockGitHubClient {
    /// Created or seeded deployments, oldest first
    deployments: Arc<Mutex<Vec<DeploymentInfo>>>,
    /// Recorded statuses: (deployment id, status)
    statuses: Arc<Mutex<Vec<(u64, DeploymentStatusRequest)>>>,
    /// Counter for generating deployment ids
    next_deployment_id: Arc<Mutex<u64>>,
    /// SHA stamped on deployments created through the trait
    head_sha: String,
    /// Message returned instead of creating a deployment
    reject_with: Option<String>,
}

impl MockGitHubClient {
    /// Create a new mock GitHub client whose deployments carry `head_sha`
    pub fn new(head_sha: &str) -> Self {
        Self {
            deployments: Arc::new(Mutex::new(Vec::new())),
            statuses: Arc::new(Mutex::new(Vec::new())),
            next_deployment_id: Arc::new(Mutex::new(1)),
            head_sha: head_sha.to_string(),
            reject_with: None,
        }
    }

    /// Make every create_deployment call answer like GitHub's 202 auto-merge reply
    pub fn rejecting_deployments(mut self, message: &str) -> Self {
        self.reject_with = Some(message.to_string());
        self
    }

    /// Add an existing deployment for testing
    pub fn add_deployment(&self, deployment: DeploymentInfo) {
        let mut counter = self.next_deployment_id.lock().unwrap();
        *counter = (*counter).max(deployment.id + 1);
        self.deployments.lock().unwrap().push(deployment);
    }

    /// Get all deployments for testing verification
    pub fn get_deployments(&self) -> Vec<DeploymentInfo> {
        self.deployments.lock().unwrap().clone()
    }

    /// Get all recorded statuses for testing verification
    pub fn get_statuses(&self) -> Vec<(u64, DeploymentStatusRequest)> {
        self.statuses.lock().unwrap().clone()
    }
}

#[async_trait]
impl GitHubClientTrait for MockGitHubClient {
    async fn create_deployment(&self, git_ref: &str, environment: &str) -> Result<u64> {
        if let Some(message) = &self.reject_with {
            return Err(Error::DeploymentNotCreated(message.clone()));
        }

        let id = {
            let mut counter = self.next_deployment_id.lock().unwrap();
            let id = *counter;
            *counter += 1;
            id
        };

        self.deployments.lock().unwrap().push(DeploymentInfo {
            id,
            sha: self.head_sha.clone(),
            git_ref: git_ref.to_string(),
            environment: environment.to_string(),
            created_at: None,
        });

        Ok(id)
    }

    async fn create_deployment_status(
        &self,
        deployment_id: u64,
        status: &DeploymentStatusRequest,
    ) -> Result<()> {
        let known = self.deployments.lock().unwrap().iter().any(|d| d.id == deployment_id);
        if !known {
            return Err(Error::config(format!("Mock: deployment {} not found", deployment_id)));
        }

        self.statuses.lock().unwrap().push((deployment_id, status.clone()));
        Ok(())
    }

    async fn latest_deployment(&self, environment: &str) -> Result<Option<DeploymentInfo>> {
        let deployments = self.deployments.lock().unwrap();
        Ok(deployments.iter().rev().find(|d| d.environment == environment).cloned())
    }
}
