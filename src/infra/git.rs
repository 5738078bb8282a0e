use std::path::PathBuf;
use std::process::Output;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::services::VersionControlService;

/// `git` subprocess wrapper bound to one repository.
pub struct GitCli {
    repo_path: PathBuf,
}

impl GitCli {
    pub fn new(repo_path: PathBuf) -> Self {
        Self { repo_path }
    }

    async fn run(&self, args: &[&str]) -> AppResult<Output> {
        debug!(?args, repo = %self.repo_path.display(), "running git command");
        Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .await
            .map_err(|err| {
                AppError::VersionControl(format!("failed to spawn git {}: {err}", args.join(" ")))
            })
    }

    /// Run a git command and fail on a non-zero exit, carrying stderr in
    /// the error message.
    async fn run_checked(&self, args: &[&str]) -> AppResult<String> {
        let output = self.run(args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::VersionControl(format!(
                "git {} failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl VersionControlService for GitCli {
    async fn current_branch(&self) -> AppResult<String> {
        self.run_checked(&["rev-parse", "--abbrev-ref", "HEAD"]).await
    }

    async fn create_branch(&self, branch: &str) -> AppResult<()> {
        self.run_checked(&["checkout", "-b", branch]).await?;
        Ok(())
    }

    async fn checkout(&self, branch: &str) -> AppResult<()> {
        self.run_checked(&["checkout", branch]).await?;
        Ok(())
    }

    async fn branch_exists(&self, branch: &str) -> AppResult<bool> {
        // Exit status alone distinguishes "missing ref" from "exists".
        let output = self
            .run(&["rev-parse", "--verify", "--quiet", branch])
            .await?;
        Ok(output.status.success())
    }

    async fn delete_branch(&self, branch: &str) -> AppResult<()> {
        self.run_checked(&["branch", "-D", branch]).await?;
        Ok(())
    }

    async fn pull(&self) -> AppResult<()> {
        self.run_checked(&["pull"]).await?;
        Ok(())
    }

    async fn has_changes(&self) -> AppResult<bool> {
        let status = self.run_checked(&["status", "--porcelain"]).await?;
        Ok(!status.is_empty())
    }

    async fn add_all(&self) -> AppResult<()> {
        self.run_checked(&["add", "-A"]).await?;
        Ok(())
    }

    async fn commit(&self, message: &str) -> AppResult<()> {
        self.run_checked(&["commit", "-m", message]).await?;
        Ok(())
    }

    async fn push(&self) -> AppResult<()> {
        let branch = self.current_branch().await?;
        self.run_checked(&["push", "-u", "origin", &branch]).await?;
        Ok(())
    }
}
