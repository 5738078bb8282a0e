//! The implement-ticket workflow: ticket in, draft PR out.
//!
//! Sequential with early exits. Mutating steps are skipped in dry-run mode;
//! the interrupt token is observed between steps, never mid-call.

use tracing::{info, warn};

use crate::context::AppContext;
use crate::domain::branch::BranchName;
use crate::domain::ticket::Ticket;
use crate::error::AppResult;

#[derive(Debug, Clone)]
pub struct ImplementTicketArgs {
    pub ticket_key: String,
    pub base_branch: Option<String>,
    pub prompt_prefix: Option<String>,
    pub dry_run: bool,
}

#[derive(Debug)]
pub enum ImplementTicketOutcome {
    /// Dry run stopped before invoking the agent; carries the prompt that
    /// would have been used.
    DryRun { branch: BranchName, prompt: String },
    /// The agent left the working tree untouched. Not an error: nothing to
    /// commit means nothing to push or open a PR for.
    NoChanges { branch: BranchName },
    Completed { branch: BranchName, pr_url: String },
}

pub async fn implement_ticket(
    ctx: &AppContext,
    args: ImplementTicketArgs,
) -> AppResult<ImplementTicketOutcome> {
    let base_branch = args
        .base_branch
        .unwrap_or_else(|| ctx.config.default_base_branch.clone());

    info!(
        ticket = %args.ticket_key,
        repo = %ctx.repo_path.display(),
        base = %base_branch,
        "starting work on ticket"
    );

    info!("fetching ticket");
    let ticket = ctx.issue_tracker.get_ticket(&args.ticket_key).await?;
    info!(summary = %ticket.summary, issue_type = ?ticket.issue_type, "fetched ticket details");
    ctx.cancel.checkpoint()?;

    ctx.version_control.ensure_clean().await?;

    if !args.dry_run {
        info!(branch = %base_branch, "checking out base branch");
        ctx.version_control.checkout(&base_branch).await?;
        if let Err(err) = ctx.version_control.pull().await {
            warn!(%err, "failed to pull latest, continuing with local state");
        }
    }
    ctx.cancel.checkpoint()?;

    let branch = BranchName::for_ticket(&ctx.config.branch_prefix, &ticket.key, &ticket.summary);
    let prompt = ticket.format_prompt(args.prompt_prefix.as_deref());

    if args.dry_run {
        info!(branch = %branch, "dry-run: would create branch and invoke the agent");
        return Ok(ImplementTicketOutcome::DryRun { branch, prompt });
    }

    if ctx.version_control.branch_exists(branch.as_str()).await? {
        info!(branch = %branch, "branch exists, deleting and recreating");
        ctx.version_control.delete_branch(branch.as_str()).await?;
    }
    info!(branch = %branch, "creating feature branch");
    ctx.version_control.create_branch(branch.as_str()).await?;
    ctx.cancel.checkpoint()?;

    info!("invoking coding agent");
    ctx.coding_agent.run(&prompt).await?;
    ctx.cancel.checkpoint()?;

    info!("checking for changes");
    if !ctx.version_control.has_changes().await? {
        warn!("agent made no changes");
        return Ok(ImplementTicketOutcome::NoChanges { branch });
    }

    ctx.version_control.add_all().await?;
    ctx.version_control.commit(&commit_message(&ticket)).await?;
    info!("committed changes");
    ctx.version_control.push().await?;
    info!("pushed branch to origin");
    ctx.cancel.checkpoint()?;

    info!("creating pull request");
    let pr_url = ctx
        .code_host
        .create_pr(&pr_title(&ticket), &pr_body(&ticket), &base_branch)
        .await?;
    info!(url = %pr_url, "created pull request");

    Ok(ImplementTicketOutcome::Completed { branch, pr_url })
}

fn commit_message(ticket: &Ticket) -> String {
    format!(
        "{}: {}\n\nImplemented by Claude Code",
        ticket.key, ticket.summary
    )
}

fn pr_title(ticket: &Ticket) -> String {
    format!("{}: {}", ticket.key, ticket.summary)
}

fn pr_body(ticket: &Ticket) -> String {
    let mut body = String::new();
    body.push_str("## Summary\n\n");
    match ticket.url.as_deref() {
        Some(url) => body.push_str(&format!(
            "Implements [{}]({url}): {}\n\n",
            ticket.key, ticket.summary
        )),
        None => body.push_str(&format!("Implements {}: {}\n\n", ticket.key, ticket.summary)),
    }
    body.push_str("## Changes\n\n");
    body.push_str("_Changes implemented by Claude Code from the ticket description._\n\n");
    body.push_str("## Test Plan\n\n");
    body.push_str("- [ ] Review changes\n");
    body.push_str("- [ ] Run tests\n");
    body.push_str("- [ ] Manual verification\n");
    body
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::AppError;
    use crate::workflow::testing::{
        RecordingHost, RecordingVcs, StubAgent, StubTracker, test_context, test_ticket,
    };

    fn args(dry_run: bool) -> ImplementTicketArgs {
        ImplementTicketArgs {
            ticket_key: "PROJ-42".to_string(),
            base_branch: None,
            prompt_prefix: None,
            dry_run,
        }
    }

    #[tokio::test]
    async fn happy_path_creates_branch_commit_and_draft_pr() {
        let vcs = Arc::new(RecordingVcs::new());
        let host = Arc::new(RecordingHost::new());
        let agent = Arc::new(StubAgent::making_changes(&vcs));
        let ctx = test_context(
            vcs.clone(),
            Arc::new(StubTracker::new(test_ticket())),
            host.clone(),
            agent,
        );

        let outcome = implement_ticket(&ctx, args(false)).await.expect("success");

        let ImplementTicketOutcome::Completed { branch, pr_url } = outcome else {
            panic!("expected Completed outcome");
        };
        assert_eq!(branch.as_str(), "feature/proj-42-fix-login-bug");
        assert_eq!(pr_url, "https://github.com/acme/widget/pull/7");

        let calls = vcs.calls();
        assert!(calls.contains(&"checkout:main".to_string()));
        assert!(calls.contains(&"create:feature/proj-42-fix-login-bug".to_string()));
        assert!(
            calls
                .iter()
                .any(|call| call == "commit:PROJ-42: Fix Login Bug!!\n\nImplemented by Claude Code")
        );
        assert!(calls.contains(&"push".to_string()));
        assert!(host.calls().contains(&"create_pr:main".to_string()));
    }

    #[tokio::test]
    async fn no_changes_skips_commit_push_and_pr() {
        let vcs = Arc::new(RecordingVcs::new());
        let host = Arc::new(RecordingHost::new());
        let agent = Arc::new(StubAgent::making_no_changes());
        let ctx = test_context(
            vcs.clone(),
            Arc::new(StubTracker::new(test_ticket())),
            host.clone(),
            agent,
        );

        let outcome = implement_ticket(&ctx, args(false)).await.expect("success");

        assert!(matches!(outcome, ImplementTicketOutcome::NoChanges { .. }));
        let calls = vcs.calls();
        assert!(!calls.iter().any(|call| call.starts_with("commit:")));
        assert!(!calls.contains(&"push".to_string()));
        assert!(host.calls().is_empty());
    }

    #[tokio::test]
    async fn existing_branch_is_deleted_then_recreated() {
        let vcs = Arc::new(RecordingVcs::with_existing_branch(
            "feature/proj-42-fix-login-bug",
        ));
        let host = Arc::new(RecordingHost::new());
        let agent = Arc::new(StubAgent::making_changes(&vcs));
        let ctx = test_context(
            vcs.clone(),
            Arc::new(StubTracker::new(test_ticket())),
            host,
            agent,
        );

        implement_ticket(&ctx, args(false)).await.expect("success");

        let calls = vcs.calls();
        let delete = calls
            .iter()
            .position(|call| call == "delete:feature/proj-42-fix-login-bug")
            .expect("delete recorded");
        let create = calls
            .iter()
            .position(|call| call == "create:feature/proj-42-fix-login-bug")
            .expect("create recorded");
        assert!(delete < create, "existing branch must be deleted before recreation");
    }

    #[tokio::test]
    async fn dry_run_stops_before_any_mutation() {
        let vcs = Arc::new(RecordingVcs::new());
        let host = Arc::new(RecordingHost::new());
        let agent = Arc::new(StubAgent::making_no_changes());
        let ctx = test_context(
            vcs.clone(),
            Arc::new(StubTracker::new(test_ticket())),
            host.clone(),
            agent.clone(),
        );

        let outcome = implement_ticket(&ctx, args(true)).await.expect("success");

        let ImplementTicketOutcome::DryRun { branch, prompt } = outcome else {
            panic!("expected DryRun outcome");
        };
        assert_eq!(branch.as_str(), "feature/proj-42-fix-login-bug");
        assert!(prompt.contains("# Jira Ticket: PROJ-42"));
        assert!(agent.prompts().is_empty(), "agent must not run in dry-run");
        let calls = vcs.calls();
        assert!(!calls.iter().any(|call| {
            call.starts_with("checkout:")
                || call.starts_with("create:")
                || call.starts_with("delete:")
        }));
        assert!(host.calls().is_empty());
    }

    #[tokio::test]
    async fn dirty_tree_aborts_before_branching() {
        let vcs = Arc::new(RecordingVcs::new());
        vcs.mark_changed();
        let agent = Arc::new(StubAgent::making_no_changes());
        let ctx = test_context(
            vcs.clone(),
            Arc::new(StubTracker::new(test_ticket())),
            Arc::new(RecordingHost::new()),
            agent.clone(),
        );

        let err = implement_ticket(&ctx, args(false)).await.unwrap_err();
        assert!(matches!(err, AppError::Precondition(_)));
        assert!(agent.prompts().is_empty());
        assert!(!vcs.calls().iter().any(|call| call.starts_with("create:")));
    }

    #[tokio::test]
    async fn pull_failure_is_downgraded_to_a_warning() {
        let vcs = Arc::new(RecordingVcs::new());
        vcs.fail_pull();
        let host = Arc::new(RecordingHost::new());
        let agent = Arc::new(StubAgent::making_changes(&vcs));
        let ctx = test_context(
            vcs.clone(),
            Arc::new(StubTracker::new(test_ticket())),
            host,
            agent,
        );

        let outcome = implement_ticket(&ctx, args(false)).await.expect("success");
        assert!(matches!(outcome, ImplementTicketOutcome::Completed { .. }));
    }

    #[tokio::test]
    async fn agent_failure_aborts_without_commit() {
        let vcs = Arc::new(RecordingVcs::new());
        let agent = Arc::new(StubAgent::failing());
        let ctx = test_context(
            vcs.clone(),
            Arc::new(StubTracker::new(test_ticket())),
            Arc::new(RecordingHost::new()),
            agent,
        );

        let err = implement_ticket(&ctx, args(false)).await.unwrap_err();
        assert!(matches!(err, AppError::CodingAgent(_)));
        assert!(!vcs.calls().iter().any(|call| call.starts_with("commit:")));
    }

    #[tokio::test]
    async fn tracker_failure_aborts_before_any_vcs_call() {
        let vcs = Arc::new(RecordingVcs::new());
        let ctx = test_context(
            vcs.clone(),
            Arc::new(StubTracker::failing()),
            Arc::new(RecordingHost::new()),
            Arc::new(StubAgent::making_no_changes()),
        );

        let err = implement_ticket(&ctx, args(false)).await.unwrap_err();
        assert!(matches!(err, AppError::IssueTracker(_)));
        assert!(vcs.calls().is_empty());
    }

    #[tokio::test]
    async fn reruns_produce_the_same_branch_and_commit_message() {
        let mut commit_messages = Vec::new();
        let mut branches = Vec::new();

        for _ in 0..2 {
            let vcs = Arc::new(RecordingVcs::new());
            let agent = Arc::new(StubAgent::making_changes(&vcs));
            let ctx = test_context(
                vcs.clone(),
                Arc::new(StubTracker::new(test_ticket())),
                Arc::new(RecordingHost::new()),
                agent,
            );

            let outcome = implement_ticket(&ctx, args(false)).await.expect("success");
            let ImplementTicketOutcome::Completed { branch, .. } = outcome else {
                panic!("expected Completed outcome");
            };
            branches.push(branch);
            commit_messages.extend(
                vcs.calls()
                    .into_iter()
                    .filter(|call| call.starts_with("commit:")),
            );
        }

        assert_eq!(branches[0], branches[1]);
        assert_eq!(commit_messages.len(), 2);
        assert_eq!(commit_messages[0], commit_messages[1]);
    }

    #[tokio::test]
    async fn cancelled_token_stops_the_run() {
        let vcs = Arc::new(RecordingVcs::new());
        let ctx = test_context(
            vcs.clone(),
            Arc::new(StubTracker::new(test_ticket())),
            Arc::new(RecordingHost::new()),
            Arc::new(StubAgent::making_no_changes()),
        );
        ctx.cancel.cancel();

        let err = implement_ticket(&ctx, args(false)).await.unwrap_err();
        assert!(matches!(err, AppError::Interrupted));
        assert!(!vcs.calls().iter().any(|call| call.starts_with("create:")));
    }

    #[test]
    fn pr_body_links_the_ticket_when_a_url_is_known() {
        let ticket = test_ticket();
        let body = pr_body(&ticket);
        assert!(body.contains(
            "Implements [PROJ-42](https://acme.atlassian.net/browse/PROJ-42): Fix Login Bug!!"
        ));
        assert!(body.contains("## Test Plan"));

        let mut bare = test_ticket();
        bare.url = None;
        assert!(pr_body(&bare).contains("Implements PROJ-42: Fix Login Bug!!"));
    }
}
