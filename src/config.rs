use std::path::PathBuf;

use crate::cli::{ActionKind, Cli};
use crate::error::{Error, Result};
use crate::github::{DEFAULT_API_URL, GitHubRepo};
use crate::humanitec::DEFAULT_API_HOST;

/// Default environment the preview is cloned from
pub const DEFAULT_BASE_ENV: &str = "development";

/// Registry images are pushed to by default
pub const DEFAULT_REGISTRY: &str = "registry.humanitec.io";

/// Everything one action run needs, read once from inputs and the runner environment
#[derive(Debug, Clone)]
pub struct ActionConfig {
    pub action: ActionKind,
    pub org_id: String,
    pub app_id: String,
    pub humanitec_token: Option<String>,
    pub humanitec_api: String,
    pub github_token: Option<String>,
    pub base_env_id: String,
    pub image: String,
    pub create_automation_rule: bool,
    pub environment_url_template: Option<String>,
    pub branch_name: String,
    /// `owner/repo` from `GITHUB_REPOSITORY`
    pub repository: Option<String>,
    /// Commit being built, from `GITHUB_SHA`
    pub sha: Option<String>,
    pub github_api_url: String,
    pub output_file: Option<PathBuf>,
}

impl ActionConfig {
    /// Build the configuration from parsed inputs and the process environment
    pub fn from_env(cli: Cli) -> Result<Self> {
        Self::from_lookup(cli, |key| std::env::var(key).ok())
    }

    /// Build the configuration reading runner variables through `lookup`
    pub fn from_lookup(cli: Cli, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| non_empty(lookup(key));

        let org_id = required_input("humanitec-org", cli.humanitec_org)?;
        let app_id = required_input("humanitec-app", cli.humanitec_app)?;
        let action_input = required_input("action", cli.action)?;
        let action = ActionKind::from_input(&action_input)
            .ok_or_else(|| Error::config(format!("Unknown action: {}", action_input)))?;

        let branch_name = var("GITHUB_HEAD_REF")
            .or_else(|| var("GITHUB_REF_NAME"))
            .ok_or_else(|| Error::config("No branch name found"))?;

        let repository = var("GITHUB_REPOSITORY");
        let image = non_empty(cli.image).unwrap_or_else(|| {
            let repo_name = repository
                .as_deref()
                .and_then(|slug| slug.rsplit('/').next())
                .unwrap_or_default();
            format!("{}/{}/{}", DEFAULT_REGISTRY, org_id, repo_name)
        });

        let create_automation_rule = parse_boolean_input(
            "create-automation-rule",
            non_empty(cli.create_automation_rule).as_deref(),
            true,
        )?;

        Ok(Self {
            action,
            humanitec_token: non_empty(cli.humanitec_token),
            humanitec_api: non_empty(cli.humanitec_api).unwrap_or_else(|| DEFAULT_API_HOST.to_string()),
            github_token: non_empty(cli.github_token),
            base_env_id: non_empty(cli.base_env).unwrap_or_else(|| DEFAULT_BASE_ENV.to_string()),
            image,
            create_automation_rule,
            environment_url_template: non_empty(cli.environment_url_template),
            branch_name,
            repository,
            sha: var("GITHUB_SHA"),
            github_api_url: var("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            output_file: var("GITHUB_OUTPUT").map(PathBuf::from),
            org_id,
            app_id,
        })
    }

    /// Token for the Humanitec API, required by actions that touch environments
    pub fn humanitec_token(&self) -> Result<&str> {
        self.humanitec_token
            .as_deref()
            .ok_or_else(|| Error::config("Input required and not supplied: humanitec-token"))
    }

    /// Repository deployments are reported to
    pub fn github_repo(&self) -> Result<GitHubRepo> {
        let slug = self
            .repository
            .as_deref()
            .ok_or_else(|| Error::config("GITHUB_REPOSITORY is not set"))?;
        GitHubRepo::parse(slug)
    }
}

/// Trimmed value, `None` when blank
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required_input(name: &str, value: Option<String>) -> Result<String> {
    non_empty(value)
        .ok_or_else(|| Error::config(format!("Input required and not supplied: {}", name)))
}

/// Parse a boolean input the way GitHub Actions toolkits do (YAML 1.2 core schema)
fn parse_boolean_input(name: &str, value: Option<&str>, default: bool) -> Result<bool> {
    match value.map(str::trim) {
        None => Ok(default),
        Some("true" | "True" | "TRUE") => Ok(true),
        Some("false" | "False" | "FALSE") => Ok(false),
        Some(_) => Err(Error::config(format!(
            "Input does not meet YAML 1.2 \"Core Schema\" specification: {}\n\
             Support boolean input list: `true | True | TRUE | false | False | FALSE`",
            name
        ))),
    }
}
