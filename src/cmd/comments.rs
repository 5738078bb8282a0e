use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::review::{AddressCommentsArgs, AddressCommentsOutcome, address_comments};

pub async fn run(ctx: &AppContext, args: AddressCommentsArgs) -> AppResult<()> {
    match address_comments(ctx, args).await? {
        AddressCommentsOutcome::NothingToAddress { .. } => {
            println!("No review comments found on this PR.");
        }
        AddressCommentsOutcome::DryRun { prompt, .. } => {
            println!("[dry-run] would invoke the agent with the following prompt:");
            println!("\n--- PROMPT ---");
            println!("{prompt}");
            println!("--- END PROMPT ---");
        }
        AddressCommentsOutcome::NoChanges { .. } => {
            println!("No code changes were made by the agent.");
        }
        AddressCommentsOutcome::Completed {
            pr_number,
            pr_url,
            addressed,
            pushed,
            replies,
        } => {
            println!("\nSuccessfully addressed {addressed} review comments on PR #{pr_number}");
            if !pushed {
                println!("Changes were committed but not pushed (--no-push).");
            }
            if let Some(report) = replies {
                println!("Replies posted: {}", report.posted);
                for failure in &report.failed {
                    println!(
                        "Reply to comment {} failed: {}",
                        failure.comment_id, failure.reason
                    );
                }
            }
            println!("PR: {pr_url}");
        }
    }
    Ok(())
}
