use async_trait::async_trait;

use crate::error::AppResult;

/// Port over the coding agent. The working directory is bound at adapter
/// construction; the agent mutates that tree as a side effect.
#[async_trait]
pub trait CodingAgentService: Send + Sync {
    /// Run the agent with the agent's own output streamed to the terminal.
    async fn run(&self, prompt: &str) -> AppResult<()>;
    /// Run the agent and capture its output instead of streaming it.
    async fn run_with_output(&self, prompt: &str) -> AppResult<String>;
}
