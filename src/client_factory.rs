use crate::config::ActionConfig;
use crate::error::Result;
use crate::github::{GitHubClient, GitHubClientTrait};
use crate::humanitec::{HumanitecClient, HumanitecClientTrait};

/// Factory function to create the Humanitec client for the configured application
pub fn create_humanitec_client(config: &ActionConfig) -> Result<Box<dyn HumanitecClientTrait>> {
    let client = HumanitecClient::new(
        &config.humanitec_api,
        config.humanitec_token()?,
        &config.org_id,
        &config.app_id,
    )?;
    Ok(Box::new(client))
}

/// Factory function to create the GitHub client - `None` when no token was given
pub fn create_github_client(config: &ActionConfig) -> Result<Option<Box<dyn GitHubClientTrait>>> {
    let Some(token) = config.github_token.as_deref() else {
        tracing::debug!("no github-token input, skipping GitHub deployments");
        return Ok(None);
    };

    let client = GitHubClient::new(token, &config.github_api_url, config.github_repo()?)?;
    Ok(Some(Box::new(client)))
}
