use async_trait::async_trait;

use crate::domain::review::{PrCommentSet, PrDetails};
use crate::error::AppResult;

/// Port over the code-hosting client, bound to one repository path.
#[async_trait]
pub trait CodeHostService: Send + Sync {
    /// Detect the PR associated with the current branch.
    async fn pr_for_current_branch(&self) -> AppResult<u64>;
    async fn pr_details(&self, number: u64) -> AppResult<PrDetails>;
    /// Fetch all inline review comments, preserving host order.
    async fn pr_comments(&self, number: u64) -> AppResult<PrCommentSet>;
    /// Open a draft PR against `base`; returns its URL.
    async fn create_pr(&self, title: &str, body: &str, base: &str) -> AppResult<String>;
    async fn reply_to_comment(&self, pr_number: u64, comment_id: u64, body: &str)
    -> AppResult<()>;
}
