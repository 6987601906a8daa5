use clap::{Parser, ValueEnum};

/// Action inputs arrive as `INPUT_<NAME>` environment variables; every
/// input can also be passed as a flag when running outside GitHub Actions.
///
/// Required inputs are checked by `ActionConfig`, so a missing one is reported
/// as a workflow error instead of a usage message.
#[derive(Parser, Debug)]
#[command(name = "preview-envs")]
#[command(about = "Manage Humanitec preview environments for pull requests")]
pub struct Cli {
    /// What to do with the preview environment: create, delete, notify or get-environment-url
    #[arg(long, env = "INPUT_ACTION")]
    pub action: Option<String>,

    /// Humanitec organization id
    #[arg(long, env = "INPUT_HUMANITEC-ORG")]
    pub humanitec_org: Option<String>,

    /// Humanitec application id
    #[arg(long, env = "INPUT_HUMANITEC-APP")]
    pub humanitec_app: Option<String>,

    /// Humanitec API token (required for create and delete)
    #[arg(long, env = "INPUT_HUMANITEC-TOKEN", hide_env_values = true)]
    pub humanitec_token: Option<String>,

    /// Humanitec API host [default: api.humanitec.io]
    #[arg(long, env = "INPUT_HUMANITEC-API")]
    pub humanitec_api: Option<String>,

    /// GitHub token used to report deployments; GitHub steps are skipped without it
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Environment whose last deployment seeds the preview [default: development]
    #[arg(long, env = "INPUT_BASE-ENV")]
    pub base_env: Option<String>,

    /// Image the automation rule watches [default: registry.humanitec.io/<org>/<repo>]
    #[arg(long, env = "INPUT_IMAGE")]
    pub image: Option<String>,

    /// Create an automation rule redeploying the branch on new images [default: true]
    #[arg(long, env = "INPUT_CREATE-AUTOMATION-RULE")]
    pub create_automation_rule: Option<String>,

    /// Mustache template for the environment URL (envId, appId, orgId, branchName)
    #[arg(long, env = "INPUT_ENVIRONMENT-URL-TEMPLATE")]
    pub environment_url_template: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Create the environment, its automation rule and a GitHub deployment
    Create,
    /// Delete the environment and mark the GitHub deployment inactive
    Delete,
    /// Mark the GitHub deployment successful
    Notify,
    /// Only compute the environment id and URL outputs
    GetEnvironmentUrl,
}

impl ActionKind {
    /// Parse the `action` input, `None` for an unknown action
    pub fn from_input(value: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(value, false).ok()
    }
}
