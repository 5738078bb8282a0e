use async_trait::async_trait;

use crate::error::{AppError, AppResult};

/// Port over the version-control client, bound to one repository path.
#[async_trait]
pub trait VersionControlService: Send + Sync {
    async fn current_branch(&self) -> AppResult<String>;
    /// Create a branch at HEAD and switch to it.
    async fn create_branch(&self, branch: &str) -> AppResult<()>;
    /// Switch to an existing branch.
    async fn checkout(&self, branch: &str) -> AppResult<()>;
    async fn branch_exists(&self, branch: &str) -> AppResult<bool>;
    async fn delete_branch(&self, branch: &str) -> AppResult<()>;
    async fn pull(&self) -> AppResult<()>;
    /// True when the working tree has uncommitted changes, staged or not.
    async fn has_changes(&self) -> AppResult<bool>;
    async fn add_all(&self) -> AppResult<()>;
    async fn commit(&self, message: &str) -> AppResult<()>;
    /// Push the current branch to the default remote with upstream tracking.
    async fn push(&self) -> AppResult<()>;

    async fn ensure_clean(&self) -> AppResult<()> {
        if self.has_changes().await? {
            return Err(AppError::Precondition(
                "working tree has uncommitted changes; commit or stash them first".to_string(),
            ));
        }
        Ok(())
    }
}
