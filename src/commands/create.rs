use crate::commands::PreviewEnvironment;
use crate::error::{Error, Result};
use crate::github::{DeploymentState, DeploymentStatusRequest, GitHubClientTrait};
use crate::humanitec::{AutomationRuleRequest, EnvironmentDefinitionRequest, HumanitecClientTrait};

/// Inputs that only matter when creating an environment
#[derive(Debug, Clone)]
pub struct CreateOptions<'a> {
    pub base_env_id: &'a str,
    pub image: &'a str,
    pub create_automation_rule: bool,
}

/// Clone the base environment's last deployment into the preview environment
pub async fn handle_create(
    env: &PreviewEnvironment,
    options: &CreateOptions<'_>,
    humanitec: &dyn HumanitecClientTrait,
    github: Option<&dyn GitHubClientTrait>,
) -> Result<()> {
    tracing::info!(create_automation_rule = options.create_automation_rule, "Creating preview environment");

    let base_env = humanitec.get_environment(options.base_env_id).await?;
    let last_deploy = base_env
        .last_deploy
        .ok_or_else(|| Error::NeverDeployed(base_env.id.clone()))?;

    let created = humanitec
        .create_environment(&EnvironmentDefinitionRequest {
            from_deploy_id: last_deploy.id,
            id: env.env_id.clone(),
            name: env.env_id.clone(),
            env_type: base_env.env_type,
        })
        .await?;

    tracing::info!("Created environment: {}, {}", created.id, env.environment_url);

    if options.create_automation_rule {
        let rule = humanitec
            .create_automation_rule(
                &env.env_id,
                &AutomationRuleRequest::update_on_push(options.image, &env.branch_name),
            )
            .await?;

        tracing::info!(
            "Created auto-deployment rule for {} and image {}",
            rule.match_ref,
            rule.artefacts_filter.first().map(String::as_str).unwrap_or_default()
        );
    }

    let Some(github) = github else {
        return Ok(());
    };

    let deployment_id = github.create_deployment(&env.branch_name, &env.env_id).await?;
    github
        .create_deployment_status(
            deployment_id,
            &DeploymentStatusRequest::with_links(
                DeploymentState::Pending,
                &env.environment_url,
                &env.web_app_url,
            ),
        )
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_environment;
    use crate::mock_github::MockGitHubClient;
    use crate::mock_humanitec::MockHumanitecClient;

    const IMAGE: &str = "registry.humanitec.io/acme/shop";

    fn options(create_automation_rule: bool) -> CreateOptions<'static> {
        CreateOptions {
            base_env_id: "development",
            image: IMAGE,
            create_automation_rule,
        }
    }

    #[tokio::test]
    async fn test_create_with_rule_and_deployment() {
        let humanitec = MockHumanitecClient::new();
        humanitec.add_environment("development", "development", Some("deploy-1"));
        let github = MockGitHubClient::new("abc123");
        let env = test_environment();

        handle_create(&env, &options(true), &humanitec, Some(&github)).await.unwrap();

        let created = humanitec.get_stored_environment("dev-feature-login").unwrap();
        assert_eq!(created.env_type, "development");
        assert_eq!(created.last_deploy.unwrap().id, "deploy-1");

        let rules = humanitec.list_automation_rules("dev-feature-login").await.unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].match_ref, "refs/heads/feature/login");
        assert_eq!(rules[0].artefacts_filter, vec![IMAGE.to_string()]);
        assert_eq!(rules[0].rule_type, "update");
        assert!(rules[0].active);

        let deployments = github.get_deployments();
        assert_eq!(deployments.len(), 1);
        assert_eq!(deployments[0].git_ref, "feature/login");
        assert_eq!(deployments[0].environment, "dev-feature-login");

        assert_eq!(
            github.get_statuses(),
            vec![(
                deployments[0].id,
                DeploymentStatusRequest::with_links(
                    DeploymentState::Pending,
                    &env.environment_url,
                    &env.web_app_url
                )
            )]
        );
    }

    #[tokio::test]
    async fn test_create_without_rule_or_github() {
        let humanitec = MockHumanitecClient::new();
        humanitec.add_environment("development", "development", Some("deploy-1"));

        handle_create(&test_environment(), &options(false), &humanitec, None).await.unwrap();

        assert!(humanitec.get_stored_environment("dev-feature-login").is_some());
        assert!(humanitec.list_automation_rules("dev-feature-login").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_base_env_never_deployed() {
        let humanitec = MockHumanitecClient::new();
        humanitec.add_environment("development", "development", None);
        let github = MockGitHubClient::new("abc123");

        let err = handle_create(&test_environment(), &options(true), &humanitec, Some(&github))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Environment development has never been deployed");
        assert!(humanitec.get_stored_environment("dev-feature-login").is_none());
        assert!(github.get_deployments().is_empty());
    }

    #[tokio::test]
    async fn test_missing_base_env_propagates() {
        let humanitec = MockHumanitecClient::new();

        let err = handle_create(&test_environment(), &options(true), &humanitec, None)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_existing_environment_is_an_error() {
        let humanitec = MockHumanitecClient::new();
        humanitec.add_environment("development", "development", Some("deploy-1"));
        humanitec.add_environment("dev-feature-login", "development", Some("deploy-0"));

        let result = handle_create(&test_environment(), &options(true), &humanitec, None).await;
        assert!(matches!(result, Err(Error::HumanitecApi { .. })));
    }

    #[tokio::test]
    async fn test_rejected_deployment_fails() {
        let humanitec = MockHumanitecClient::new();
        humanitec.add_environment("development", "development", Some("deploy-1"));
        let github = MockGitHubClient::new("abc123").rejecting_deployments("Auto-merged main");

        let err = handle_create(&test_environment(), &options(false), &humanitec, Some(&github))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Creating deployment failed Auto-merged main");
        assert!(github.get_statuses().is_empty());
    }
}
