use crate::commands::PreviewEnvironment;
use crate::error::Result;
use crate::github::{DeploymentState, DeploymentStatusRequest, GitHubClientTrait};

/// Report the preview environment as successfully deployed
pub async fn handle_notify(
    env: &PreviewEnvironment,
    current_sha: Option<&str>,
    github: Option<&dyn GitHubClientTrait>,
) -> Result<()> {
    let Some(github) = github else {
        return Ok(());
    };

    let Some(latest) = github.latest_deployment(&env.env_id).await? else {
        tracing::info!("No deployment found");
        return Ok(());
    };

    let mut deployment_id = latest.id;

    // A status on a deployment of an older commit shows up as outdated
    if current_sha != Some(latest.sha.as_str()) {
        tracing::info!(
            "Current deployment sha {} is not matching commit sha {}",
            latest.sha,
            current_sha.unwrap_or("<unknown>")
        );
        tracing::info!("Creating new deployment");
        deployment_id = github.create_deployment(&env.branch_name, &env.env_id).await?;
    }

    github
        .create_deployment_status(
            deployment_id,
            &DeploymentStatusRequest::with_links(
                DeploymentState::Success,
                &env.environment_url,
                &env.web_app_url,
            ),
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_environment;
    use crate::github::DeploymentInfo;
    use crate::mock_github::MockGitHubClient;

    fn deployment(id: u64, sha: &str, environment: &str) -> DeploymentInfo {
        DeploymentInfo {
            id,
            sha: sha.to_string(),
            git_ref: "feature/login".to_string(),
            environment: environment.to_string(),
            created_at: None,
        }
    }

    fn success(env: &PreviewEnvironment) -> DeploymentStatusRequest {
        DeploymentStatusRequest::with_links(DeploymentState::Success, &env.environment_url, &env.web_app_url)
    }

    #[tokio::test]
    async fn test_notify_without_github_is_noop() {
        handle_notify(&test_environment(), Some("abc123"), None).await.unwrap();
    }

    #[tokio::test]
    async fn test_notify_without_deployment() {
        let github = MockGitHubClient::new("abc123");
        github.add_deployment(deployment(1, "abc123", "dev-other"));

        handle_notify(&test_environment(), Some("abc123"), Some(&github)).await.unwrap();

        assert!(github.get_statuses().is_empty());
        assert_eq!(github.get_deployments().len(), 1);
    }

    #[tokio::test]
    async fn test_notify_same_sha_reuses_deployment() {
        let env = test_environment();
        let github = MockGitHubClient::new("abc123");
        github.add_deployment(deployment(7, "abc123", &env.env_id));

        handle_notify(&env, Some("abc123"), Some(&github)).await.unwrap();

        assert_eq!(github.get_deployments().len(), 1);
        assert_eq!(github.get_statuses(), vec![(7, success(&env))]);
    }

    #[tokio::test]
    async fn test_notify_new_sha_creates_deployment() {
        let env = test_environment();
        let github = MockGitHubClient::new("def456");
        github.add_deployment(deployment(7, "abc123", &env.env_id));

        handle_notify(&env, Some("def456"), Some(&github)).await.unwrap();

        let deployments = github.get_deployments();
        assert_eq!(deployments.len(), 2);
        assert_eq!(deployments[1].id, 8);
        assert_eq!(deployments[1].environment, env.env_id);
        assert_eq!(github.get_statuses(), vec![(8, success(&env))]);
    }

    #[tokio::test]
    async fn test_notify_unknown_sha_creates_deployment() {
        let env = test_environment();
        let github = MockGitHubClient::new("def456");
        github.add_deployment(deployment(7, "abc123", &env.env_id));

        handle_notify(&env, None, Some(&github)).await.unwrap();

        assert_eq!(github.get_statuses(), vec![(8, success(&env))]);
    }
}
