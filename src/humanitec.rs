use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Default Humanitec API host
pub const DEFAULT_API_HOST: &str = "api.humanitec.io";

/// Web console serving environment pages
pub const WEB_APP_URL: &str = "https://app.humanitec.io";

/// Summary of the last deployment into an environment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeploymentSummary {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvironmentResponse {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub env_type: String,
    #[serde(default)]
    pub last_deploy: Option<DeploymentSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvironmentDefinitionRequest {
    pub from_deploy_id: String,
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub env_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AutomationRuleRequest {
    pub active: bool,
    pub artefacts_filter: Vec<String>,
    #[serde(rename = "type")]
    pub rule_type: String,
    pub match_ref: String,
}

impl AutomationRuleRequest {
    /// Rule that redeploys `image` whenever it is built from `branch_name`
    pub fn update_on_push(image: &str, branch_name: &str) -> Self {
        Self {
            active: true,
            artefacts_filter: vec![image.to_string()],
            rule_type: "update".to_string(),
            match_ref: format!("refs/heads/{}", branch_name),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AutomationRuleResponse {
    pub id: String,
    pub active: bool,
    pub artefacts_filter: Vec<String>,
    #[serde(rename = "type")]
    pub rule_type: String,
    pub match_ref: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Trait for Humanitec API operations on a single application
#[async_trait]
pub trait HumanitecClientTrait: Send + Sync {
    async fn get_environment(&self, env_id: &str) -> Result<EnvironmentResponse>;

    async fn create_environment(
        &self,
        request: &EnvironmentDefinitionRequest,
    ) -> Result<EnvironmentResponse>;

    async fn delete_environment(&self, env_id: &str) -> Result<()>;

    async fn create_automation_rule(
        &self,
        env_id: &str,
        request: &AutomationRuleRequest,
    ) -> Result<AutomationRuleResponse>;

    async fn list_automation_rules(&self, env_id: &str) -> Result<Vec<AutomationRuleResponse>>;
}

/// Humanitec API client bound to one organization and application
pub struct HumanitecClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
    org_id: String,
    app_id: String,
}

impl HumanitecClient {
    /// Create a new client
    ///
    /// `api_host` is a bare host like `api.humanitec.io`; a value that
    /// already carries a scheme is used as the base URL as-is.
    pub fn new(api_host: &str, token: &str, org_id: &str, app_id: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("preview-envs/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url(api_host)?,
            token: token.to_string(),
            org_id: org_id.to_string(),
            app_id: app_id.to_string(),
        })
    }

    /// URL for `/orgs/{org}/apps/{app}/{segments...}`
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config(format!("Humanitec API URL {} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(["orgs", self.org_id.as_str(), "apps", self.app_id.as_str()])
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url).bearer_auth(&self.token)
    }

    async fn send_json<T: DeserializeOwned>(&self, method: Method, url: Url, body: Option<&impl Serialize>) -> Result<T> {
        let response = self.send(method, url, body).await?;
        Ok(response.json().await?)
    }

    async fn send(&self, method: Method, url: Url, body: Option<&impl Serialize>) -> Result<reqwest::Response> {
        let path = url.path().to_string();
        tracing::debug!(%method, %path, "Humanitec request");

        let mut request = self.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::HumanitecApi {
                method: method.to_string(),
                path,
                status,
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl HumanitecClientTrait for HumanitecClient {
    async fn get_environment(&self, env_id: &str) -> Result<EnvironmentResponse> {
        let url = self.endpoint(&["envs", env_id])?;
        self.send_json(Method::GET, url, None::<&()>).await
    }

    async fn create_environment(
        &self,
        request: &EnvironmentDefinitionRequest,
    ) -> Result<EnvironmentResponse> {
        let url = self.endpoint(&["envs"])?;
        self.send_json(Method::POST, url, Some(request)).await
    }

    async fn delete_environment(&self, env_id: &str) -> Result<()> {
        let url = self.endpoint(&["envs", env_id])?;
        self.send(Method::DELETE, url, None::<&()>).await?;
        Ok(())
    }

    async fn create_automation_rule(
        &self,
        env_id: &str,
        request: &AutomationRuleRequest,
    ) -> Result<AutomationRuleResponse> {
        let url = self.endpoint(&["envs", env_id, "rules"])?;
        self.send_json(Method::POST, url, Some(request)).await
    }

    async fn list_automation_rules(&self, env_id: &str) -> Result<Vec<AutomationRuleResponse>> {
        let url = self.endpoint(&["envs", env_id, "rules"])?;
        self.send_json(Method::GET, url, None::<&()>).await
    }
}

/// Resolve the `humanitec-api` input to a base URL
fn base_url(api_host: &str) -> Result<Url> {
    let api_host = api_host.trim().trim_end_matches('/');
    if api_host.starts_with("http://") || api_host.starts_with("https://") {
        Ok(Url::parse(api_host)?)
    } else {
        Ok(Url::parse(&format!("https://{}", api_host))?)
    }
}

/// Console page of an environment
pub fn web_app_url(org_id: &str, app_id: &str, env_id: &str) -> String {
    format!("{}/orgs/{}/apps/{}/envs/{}", WEB_APP_URL, org_id, app_id, env_id)
}
