//! The address-review-comments workflow.
//!
//! Lower-risk sibling of the ticket workflow: a dirty tree only warns, and
//! the reply phase is best-effort fan-out over the fetched comment order.

use tracing::{info, warn};

use crate::context::AppContext;
use crate::domain::review::PrCommentSet;
use crate::error::{AppError, AppResult};

const REPLY_BODY: &str = "Addressed in latest commit.";

#[derive(Debug, Clone)]
pub struct AddressCommentsArgs {
    /// Explicit PR number; auto-detected from the current branch if absent.
    pub pr_number: Option<u64>,
    pub prompt_prefix: Option<String>,
    pub dry_run: bool,
    pub no_push: bool,
    pub with_replies: bool,
}

/// Per-comment reply results. Partial completion is an accepted outcome,
/// so failures are carried here instead of aborting the batch.
#[derive(Debug, Default)]
pub struct ReplyReport {
    pub posted: usize,
    pub failed: Vec<ReplyFailure>,
}

#[derive(Debug)]
pub struct ReplyFailure {
    pub comment_id: u64,
    pub reason: String,
}

#[derive(Debug)]
pub enum AddressCommentsOutcome {
    /// The PR has no review comments; there is nothing to do.
    NothingToAddress { pr_number: u64 },
    DryRun { pr_number: u64, prompt: String },
    NoChanges { pr_number: u64 },
    Completed {
        pr_number: u64,
        pr_url: String,
        addressed: usize,
        pushed: bool,
        replies: Option<ReplyReport>,
    },
}

pub async fn address_comments(
    ctx: &AppContext,
    args: AddressCommentsArgs,
) -> AppResult<AddressCommentsOutcome> {
    let pr_number = match args.pr_number {
        Some(number) => number,
        None => {
            info!("detecting PR from current branch");
            ctx.code_host.pr_for_current_branch().await.map_err(|err| {
                AppError::CodeHost(format!("failed to detect PR (use --pr to specify): {err}"))
            })?
        }
    };

    info!(pr = pr_number, "fetching PR comments");
    let comments = ctx.code_host.pr_comments(pr_number).await?;
    if comments.comments.is_empty() {
        info!("no review comments to address");
        return Ok(AddressCommentsOutcome::NothingToAddress { pr_number });
    }
    info!(count = comments.comments.len(), "found review comments");
    ctx.cancel.checkpoint()?;

    if ctx.version_control.has_changes().await? {
        warn!("working tree has uncommitted changes");
    }

    let prompt = comments.format_prompt(args.prompt_prefix.as_deref());
    if args.dry_run {
        info!("dry-run: would invoke the agent");
        return Ok(AddressCommentsOutcome::DryRun { pr_number, prompt });
    }
    ctx.cancel.checkpoint()?;

    info!("invoking coding agent to address comments");
    ctx.coding_agent.run(&prompt).await?;
    ctx.cancel.checkpoint()?;

    if !ctx.version_control.has_changes().await? {
        info!("no code changes were made");
        return Ok(AddressCommentsOutcome::NoChanges { pr_number });
    }

    ctx.version_control.add_all().await?;
    ctx.version_control
        .commit(&commit_message(pr_number))
        .await?;
    info!("committed changes");

    let pushed = if args.no_push {
        info!("skipping push (--no-push specified)");
        false
    } else {
        ctx.version_control.push().await?;
        info!("pushed changes to origin");
        true
    };
    ctx.cancel.checkpoint()?;

    let replies = if args.with_replies {
        Some(post_replies(ctx, &comments).await)
    } else {
        None
    };

    Ok(AddressCommentsOutcome::Completed {
        pr_number,
        pr_url: comments.url.clone(),
        addressed: comments.comments.len(),
        pushed,
        replies,
    })
}

/// Post the acknowledgement reply to every comment in fetched order. Each
/// failure is recorded and the batch continues.
async fn post_replies(ctx: &AppContext, comments: &PrCommentSet) -> ReplyReport {
    info!("posting replies to comments");
    let mut report = ReplyReport::default();

    for comment in &comments.comments {
        match ctx
            .code_host
            .reply_to_comment(comments.number, comment.id, REPLY_BODY)
            .await
        {
            Ok(()) => report.posted += 1,
            Err(err) => {
                warn!(comment_id = comment.id, %err, "failed to post reply");
                report.failed.push(ReplyFailure {
                    comment_id: comment.id,
                    reason: err.to_string(),
                });
            }
        }
    }

    info!(
        posted = report.posted,
        failed = report.failed.len(),
        "finished posting replies"
    );
    report
}

fn commit_message(pr_number: u64) -> String {
    format!("Address PR #{pr_number} review comments\n\nAddressed by Claude Code")
}
