use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::ticket::{ImplementTicketArgs, ImplementTicketOutcome, implement_ticket};

pub async fn run(ctx: &AppContext, args: ImplementTicketArgs) -> AppResult<()> {
    match implement_ticket(ctx, args).await? {
        ImplementTicketOutcome::DryRun { branch, prompt } => {
            println!("[dry-run] would create branch: {branch}");
            println!("[dry-run] would invoke the agent with the following prompt:");
            println!("\n--- PROMPT ---");
            println!("{prompt}");
            println!("--- END PROMPT ---");
        }
        ImplementTicketOutcome::NoChanges { branch } => {
            println!("No changes were made by the agent on {branch}; nothing to commit.");
        }
        ImplementTicketOutcome::Completed { pr_url, .. } => {
            println!("\nPR created: {pr_url}");
        }
    }
    Ok(())
}
