use std::collections::HashMap;

use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::ticket::Ticket;
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

pub struct JiraClient {
    http: Client,
    base_url: Option<String>,
    email: Option<String>,
    token: Option<String>,
    acceptance_fields: Vec<String>,
}

impl JiraClient {
    pub fn new(
        base_url: Option<String>,
        email: Option<String>,
        token: Option<String>,
        acceptance_fields: Vec<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url,
            email,
            token,
            acceptance_fields,
        }
    }

    fn api_details(&self) -> AppResult<(&str, &str, &str)> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira base URL not configured".to_string()))?;
        let email = self
            .email
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira email not configured".to_string()))?;
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira API token not configured".to_string()))?;
        Ok((base_url, email, token))
    }

    fn auth_header(email: &str, token: &str) -> String {
        let credentials = format!("{email}:{token}");
        let encoded = BASE64_STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    fn issue_endpoint(base_url: &str, key: &str) -> String {
        format!("{}/rest/api/2/issue/{key}", base_url.trim_end_matches('/'))
    }

    fn browse_url(base_url: &str, key: &str) -> String {
        format!("{}/browse/{key}", base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl IssueTrackerService for JiraClient {
    async fn get_ticket(&self, key: &str) -> AppResult<Ticket> {
        let key = key.trim();
        if key.is_empty() {
            return Err(AppError::IssueTracker(
                "ticket key must not be empty".to_string(),
            ));
        }

        let (base_url, email, token) = self.api_details()?;
        debug!(key, "fetching Jira issue");

        let response = self
            .http
            .get(Self::issue_endpoint(base_url, key))
            .header(AUTHORIZATION, Self::auth_header(email, token))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| {
                AppError::IssueTracker(format!("failed to fetch ticket {key}: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::IssueTracker(format!(
                "Jira responded with {status} for {key}: {body}"
            )));
        }

        let payload: JiraIssueResponse = response
            .json()
            .await
            .map_err(|err| AppError::ResponseParse(format!("Jira issue response: {err}")))?;

        Ok(ticket_from_issue(payload, &self.acceptance_fields, base_url))
    }
}

#[derive(Deserialize)]
struct JiraIssueResponse {
    key: String,
    fields: JiraIssueFields,
}

#[derive(Deserialize)]
struct JiraIssueFields {
    summary: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(rename = "issuetype")]
    issue_type: Option<JiraNamedField>,
    priority: Option<JiraNamedField>,
    project: JiraProjectRef,
    /// Everything else, including the instance-specific custom fields that
    /// may hold acceptance criteria.
    #[serde(flatten)]
    custom: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct JiraNamedField {
    name: String,
}

#[derive(Deserialize)]
struct JiraProjectRef {
    key: String,
}

fn ticket_from_issue(
    issue: JiraIssueResponse,
    acceptance_fields: &[String],
    base_url: &str,
) -> Ticket {
    let acceptance_criteria = acceptance_fields.iter().find_map(|field| {
        issue
            .fields
            .custom
            .get(field)
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    });

    let url = JiraClient::browse_url(base_url, &issue.key);

    Ticket {
        summary: issue.fields.summary,
        description: issue.fields.description.filter(|text| !text.is_empty()),
        acceptance_criteria,
        issue_type: issue.fields.issue_type.map(|field| field.name),
        priority: issue.fields.priority.map(|field| field.name),
        labels: issue.fields.labels,
        project_key: issue.fields.project.key,
        url: Some(url),
        key: issue.key,
    }
}
