use crate::commands::PreviewEnvironment;
use crate::error::Result;
use crate::github::{DeploymentState, DeploymentStatusRequest, GitHubClientTrait};
use crate::humanitec::HumanitecClientTrait;

/// Delete the preview environment and retire its GitHub deployment
pub async fn handle_delete(
    env: &PreviewEnvironment,
    humanitec: &dyn HumanitecClientTrait,
    github: Option<&dyn GitHubClientTrait>,
) -> Result<()> {
    match humanitec.delete_environment(&env.env_id).await {
        Ok(()) => {}
        Err(e) if e.is_not_found() => {
            tracing::debug!(env_id = %env.env_id, "environment already deleted");
        }
        Err(e) => return Err(e),
    }

    tracing::info!("Deleted environment: {}", env.env_id);

    let Some(github) = github else {
        return Ok(());
    };

    let Some(latest) = github.latest_deployment(&env.env_id).await? else {
        tracing::info!("No deployment found");
        return Ok(());
    };

    github
        .create_deployment_status(latest.id, &DeploymentStatusRequest::bare(DeploymentState::Inactive))
        .await
}
