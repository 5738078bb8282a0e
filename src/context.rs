use std::path::PathBuf;
use std::sync::Arc;

use crate::cancel::CancelToken;
use crate::config::AppConfig;
use crate::services::{
    CodeHostService, CodingAgentService, IssueTrackerService, VersionControlService,
};

/// Everything a workflow needs for one run: configuration, the resolved
/// repository path, the four ports, and the interrupt token.
#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub repo_path: PathBuf,
    pub version_control: Arc<dyn VersionControlService>,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
    pub code_host: Arc<dyn CodeHostService>,
    pub coding_agent: Arc<dyn CodingAgentService>,
    pub cancel: CancelToken,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        repo_path: PathBuf,
        version_control: Arc<dyn VersionControlService>,
        issue_tracker: Arc<dyn IssueTrackerService>,
        code_host: Arc<dyn CodeHostService>,
        coding_agent: Arc<dyn CodingAgentService>,
        cancel: CancelToken,
    ) -> Self {
        Self {
            config,
            repo_path,
            version_control,
            issue_tracker,
            code_host,
            coding_agent,
            cancel,
        }
    }
}
