use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use crate::error::{Error, Result};
use crate::humanitec::{
    AutomationRuleRequest, AutomationRuleResponse, DeploymentSummary, EnvironmentDefinitionRequest,
    EnvironmentResponse, HumanitecClientTrait,
};

/// Mock Humanitec client for testing that stores one application's state in memory
#[derive(Debug, Clone, Default)]
pub struct MockHumanitecClient {
    /// Environments: (env id -> environment)
    environments: Arc<Mutex<HashMap<String, EnvironmentResponse>>>,
    /// Automation rules: (env id -> rules)
    rules: Arc<Mutex<HashMap<String, Vec<AutomationRuleResponse>>>>,
    /// Every deleted env id, including ones that did not exist
    delete_calls: Arc<Mutex<Vec<String>>>,
    /// Status returned by every delete_environment call
    fail_deletes_with: Option<StatusCode>,
}

impl MockHumanitecClient {
    /// Create a new, empty mock Humanitec client
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every delete_environment call fail with `status`
    pub fn failing_deletes(mut self, status: StatusCode) -> Self {
        self.fail_deletes_with = Some(status);
        self
    }

    /// Add an environment, optionally with a last deployment
    pub fn add_environment(&self, id: &str, env_type: &str, last_deploy_id: Option<&str>) {
        let environment = EnvironmentResponse {
            id: id.to_string(),
            name: id.to_string(),
            env_type: env_type.to_string(),
            last_deploy: last_deploy_id.map(|id| DeploymentSummary { id: id.to_string() }),
        };
        self.environments.lock().unwrap().insert(id.to_string(), environment);
    }

    /// Get an environment for testing verification
    pub fn get_stored_environment(&self, id: &str) -> Option<EnvironmentResponse> {
        self.environments.lock().unwrap().get(id).cloned()
    }

    /// Get all env ids passed to delete_environment
    pub fn get_delete_calls(&self) -> Vec<String> {
        self.delete_calls.lock().unwrap().clone()
    }

    fn not_found(method: &str, env_id: &str) -> Error {
        Error::HumanitecApi {
            method: method.to_string(),
            path: format!("/envs/{}", env_id),
            status: StatusCode::NOT_FOUND,
            body: format!("Mock: environment {} not found", env_id),
        }
    }
}

#[async_trait]
impl HumanitecClientTrait for MockHumanitecClient {
    async fn get_environment(&self, env_id: &str) -> Result<EnvironmentResponse> {
        self.get_stored_environment(env_id)
            .ok_or_else(|| Self::not_found("GET", env_id))
    }

    async fn create_environment(
        &self,
        request: &EnvironmentDefinitionRequest,
    ) -> Result<EnvironmentResponse> {
        let mut environments = self.environments.lock().unwrap();
        if environments.contains_key(&request.id) {
            return Err(Error::HumanitecApi {
                method: "POST".to_string(),
                path: "/envs".to_string(),
                status: StatusCode::CONFLICT,
                body: format!("Mock: environment {} already exists", request.id),
            });
        }

        let environment = EnvironmentResponse {
            id: request.id.clone(),
            name: request.name.clone(),
            env_type: request.env_type.clone(),
            last_deploy: Some(DeploymentSummary { id: request.from_deploy_id.clone() }),
        };
        environments.insert(request.id.clone(), environment.clone());
        Ok(environment)
    }

    async fn delete_environment(&self, env_id: &str) -> Result<()> {
        self.delete_calls.lock().unwrap().push(env_id.to_string());

        if let Some(status) = self.fail_deletes_with {
            return Err(Error::HumanitecApi {
                method: "DELETE".to_string(),
                path: format!("/envs/{}", env_id),
                status,
                body: String::new(),
            });
        }

        self.rules.lock().unwrap().remove(env_id);
        match self.environments.lock().unwrap().remove(env_id) {
            Some(_) => Ok(()),
            None => Err(Self::not_found("DELETE", env_id)),
        }
    }

    async fn create_automation_rule(
        &self,
        env_id: &str,
        request: &AutomationRuleRequest,
    ) -> Result<AutomationRuleResponse> {
        if !self.environments.lock().unwrap().contains_key(env_id) {
            return Err(Self::not_found("POST", env_id));
        }

        let mut rules = self.rules.lock().unwrap();
        let env_rules = rules.entry(env_id.to_string()).or_default();
        let rule = AutomationRuleResponse {
            id: format!("rule-{}", env_rules.len() + 1),
            active: request.active,
            artefacts_filter: request.artefacts_filter.clone(),
            rule_type: request.rule_type.clone(),
            match_ref: request.match_ref.clone(),
            created_at: None,
        };
        env_rules.push(rule.clone());
        Ok(rule)
    }

    async fn list_automation_rules(&self, env_id: &str) -> Result<Vec<AutomationRuleResponse>> {
        Ok(self.rules.lock().unwrap().get(env_id).cloned().unwrap_or_default())
    }
}
