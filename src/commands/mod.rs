pub mod create;
pub mod delete;
pub mod notify;

/// The preview environment an action run works on
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewEnvironment {
    /// Humanitec environment id derived from the branch
    pub env_id: String,
    pub branch_name: String,
    /// Public URL of the running preview
    pub environment_url: String,
    /// Humanitec console page of the environment
    pub web_app_url: String,
}

#[cfg(test)]
pub(crate) fn test_environment() -> PreviewEnvironment {
    PreviewEnvironment {
        env_id: "dev-feature-login".to_string(),
        branch_name: "feature/login".to_string(),
        environment_url: "https://dev-feature-login.preview.example.com".to_string(),
        web_app_url: "https://app.humanitec.io/orgs/acme/apps/shop/envs/dev-feature-login".to_string(),
    }
}
