use async_trait::async_trait;

use crate::domain::ticket::Ticket;
use crate::error::AppResult;

#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    /// Fetch a ticket by key, e.g. `PROJ-123`.
    async fn get_ticket(&self, key: &str) -> AppResult<Ticket>;
}
