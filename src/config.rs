use std::env;

pub const ENV_PREFIX: &str = "TACKLE";

const DEFAULT_BRANCH_PREFIX: &str = "feature/";
const DEFAULT_BASE_BRANCH: &str = "main";

/// Jira custom fields probed, in order, for acceptance-criteria text. These
/// ids vary per Jira instance; override with `TACKLE_ACCEPTANCE_FIELDS`.
const DEFAULT_ACCEPTANCE_FIELDS: [&str; 3] =
    ["customfield_10016", "customfield_10017", "customfield_10001"];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jira_base_url: Option<String>,
    pub jira_email: Option<String>,
    pub jira_api_token: Option<String>,
    pub branch_prefix: String,
    pub default_base_branch: String,
    pub acceptance_criteria_fields: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            jira_base_url: None,
            jira_email: None,
            jira_api_token: None,
            branch_prefix: DEFAULT_BRANCH_PREFIX.to_string(),
            default_base_branch: DEFAULT_BASE_BRANCH.to_string(),
            acceptance_criteria_fields: DEFAULT_ACCEPTANCE_FIELDS
                .iter()
                .map(|field| field.to_string())
                .collect(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| {
            lookup(&format!("{ENV_PREFIX}_{name}")).filter(|value| !value.trim().is_empty())
        };

        let mut config = Self {
            jira_base_url: var("JIRA_BASE_URL"),
            jira_email: var("JIRA_EMAIL"),
            jira_api_token: var("JIRA_API_TOKEN"),
            ..Self::default()
        };

        if let Some(prefix) = var("BRANCH_PREFIX") {
            config.branch_prefix = prefix;
        }
        if let Some(base) = var("BASE_BRANCH") {
            config.default_base_branch = base;
        }
        if let Some(fields) = var("ACCEPTANCE_FIELDS") {
            let parsed = fields
                .split(',')
                .map(str::trim)
                .filter(|field| !field.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>();
            if !parsed.is_empty() {
                config.acceptance_criteria_fields = parsed;
            }
        }

        config
    }
}
