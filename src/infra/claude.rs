use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::services::CodingAgentService;

const ALLOWED_TOOLS: &str = "Write,Edit,Read,Bash,Grep,Glob";

/// Claude Code CLI adapter. Runs `claude -p <prompt>` in the bound working
/// directory with the parent environment inherited, so provider credentials
/// reach the agent.
pub struct ClaudeCli {
    work_dir: PathBuf,
}

impl ClaudeCli {
    pub fn new(work_dir: PathBuf) -> Self {
        Self { work_dir }
    }

    fn command(&self, prompt: &str) -> Command {
        let mut command = Command::new("claude");
        command
            .arg("-p")
            .arg(prompt)
            .arg("--allowedTools")
            .arg(ALLOWED_TOOLS)
            .arg("--permission-mode")
            .arg("bypassPermissions")
            .current_dir(&self.work_dir);
        command
    }
}

#[async_trait]
impl CodingAgentService for ClaudeCli {
    async fn run(&self, prompt: &str) -> AppResult<()> {
        info!(work_dir = %self.work_dir.display(), "invoking Claude Code");
        debug!(prompt, "claude prompt");

        let output = self
            .command(prompt)
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| AppError::CodingAgent(format!("failed to spawn claude: {err}")))?
            .wait_with_output()
            .await
            .map_err(|err| AppError::CodingAgent(format!("claude command failed: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::CodingAgent(format!(
                "claude command failed: {}",
                stderr.trim()
            )));
        }
        Ok(())
    }

    async fn run_with_output(&self, prompt: &str) -> AppResult<String> {
        info!(work_dir = %self.work_dir.display(), "invoking Claude Code");
        debug!(prompt, "claude prompt");

        let output = self
            .command(prompt)
            .output()
            .await
            .map_err(|err| AppError::CodingAgent(format!("failed to spawn claude: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::CodingAgent(format!(
                "claude command failed: {}",
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
