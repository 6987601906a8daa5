use crate::cli::ActionKind;
use crate::client_factory::{create_github_client, create_humanitec_client};
use crate::commands::create::{self, CreateOptions};
use crate::commands::{PreviewEnvironment, delete, notify};
use crate::config::ActionConfig;
use crate::env_id::{ENV_ID_PREFIX, branch_name_to_env_id};
use crate::error::Result;
use crate::humanitec::web_app_url;
use crate::outputs::ActionOutputs;
use crate::template::{self, TemplateParams};

/// Resolve the preview environment for the configured branch
pub fn preview_environment(config: &ActionConfig) -> Result<PreviewEnvironment> {
    let env_id = branch_name_to_env_id(ENV_ID_PREFIX, &config.branch_name);
    let web_app_url = web_app_url(&config.org_id, &config.app_id, &env_id);

    let environment_url = match &config.environment_url_template {
        Some(url_template) => template::render(
            url_template,
            &TemplateParams {
                env_id: &env_id,
                app_id: &config.app_id,
                org_id: &config.org_id,
                branch_name: &config.branch_name,
            },
        )?,
        None => web_app_url.clone(),
    };

    Ok(PreviewEnvironment {
        env_id,
        branch_name: config.branch_name.clone(),
        environment_url,
        web_app_url,
    })
}

/// Run one action invocation
pub async fn run(config: ActionConfig) -> Result<()> {
    let env = preview_environment(&config)?;

    tracing::info!("Using environment: {}", env.environment_url);

    let outputs = ActionOutputs::new(config.output_file.clone());
    outputs.set("environment-url", &env.environment_url)?;
    outputs.set("humanitec-env", &env.env_id)?;

    match config.action {
        ActionKind::GetEnvironmentUrl => Ok(()),
        ActionKind::Notify => {
            let github = create_github_client(&config)?;
            notify::handle_notify(&env, config.sha.as_deref(), github.as_deref()).await
        }
        ActionKind::Create => {
            let humanitec = create_humanitec_client(&config)?;
            let github = create_github_client(&config)?;
            let options = CreateOptions {
                base_env_id: &config.base_env_id,
                image: &config.image,
                create_automation_rule: config.create_automation_rule,
            };
            create::handle_create(&env, &options, humanitec.as_ref(), github.as_deref()).await
        }
        ActionKind::Delete => {
            let humanitec = create_humanitec_client(&config)?;
            let github = create_github_client(&config)?;
            delete::handle_delete(&env, humanitec.as_ref(), github.as_deref()).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn config(branch_name: &str, url_template: Option<&str>) -> ActionConfig {
        ActionConfig {
            action: ActionKind::GetEnvironmentUrl,
            org_id: "acme".to_string(),
            app_id: "shop".to_string(),
            humanitec_token: None,
            humanitec_api: "api.humanitec.io".to_string(),
            github_token: None,
            base_env_id: "development".to_string(),
            image: "registry.humanitec.io/acme/shop".to_string(),
            create_automation_rule: true,
            environment_url_template: url_template.map(str::to_string),
            branch_name: branch_name.to_string(),
            repository: Some("acme/shop".to_string()),
            sha: None,
            github_api_url: "https://api.github.com".to_string(),
            output_file: None,
        }
    }

    #[test]
    fn test_preview_environment_defaults_to_console_url() {
        let env = preview_environment(&config("feature/new_function", None)).unwrap();
        assert_eq!(env.env_id, "dev-ure-new-function");
        assert_eq!(env.branch_name, "feature/new_function");
        assert_eq!(
            env.web_app_url,
            "https://app.humanitec.io/orgs/acme/apps/shop/envs/dev-ure-new-function"
        );
        assert_eq!(env.environment_url, env.web_app_url);
    }

    #[test]
    fn test_preview_environment_with_template() {
        let env = preview_environment(&config(
            "login",
            Some("https://{{envId}}.{{appId}}.{{orgId}}.example.com/?b={{{branchName}}}"),
        ))
        .unwrap();
        assert_eq!(env.environment_url, "https://dev-login.shop.acme.example.com/?b=login");
    }

    #[test]
    fn test_preview_environment_bad_template() {
        let result = preview_environment(&config("login", Some("https://{{envId")));
        assert!(matches!(result, Err(Error::Template(_))));
    }

    #[tokio::test]
    async fn test_run_get_environment_url_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output");
        let mut config = config("feature/login", None);
        config.output_file = Some(output.clone());

        run(config).await.unwrap();

        let content = std::fs::read_to_string(output).unwrap();
        assert!(content.contains("humanitec-env<<PREVIEW_ENVS_EOF\ndev-feature-login\n"));
        assert!(content.contains(
            "environment-url<<PREVIEW_ENVS_EOF\nhttps://app.humanitec.io/orgs/acme/apps/shop/envs/dev-feature-login\n"
        ));
    }

    #[tokio::test]
    async fn test_run_create_requires_token() {
        let mut config = config("feature/login", None);
        config.action = ActionKind::Create;

        let err = run(config).await.unwrap_err();
        assert_eq!(err.to_string(), "Input required and not supplied: humanitec-token");
    }

    #[tokio::test]
    async fn test_run_notify_without_github_token() {
        let mut config = config("feature/login", None);
        config.action = ActionKind::Notify;

        run(config).await.unwrap();
    }
}
