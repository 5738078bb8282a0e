mod cancel;
mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod logging;
mod services;
mod workflow;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::warn;

use crate::cancel::CancelToken;
use crate::config::{AppConfig, ENV_PREFIX};
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::claude::ClaudeCli;
use crate::infra::git::GitCli;
use crate::infra::github::GitHubCli;
use crate::infra::jira::JiraClient;
use crate::workflow::review::AddressCommentsArgs;
use crate::workflow::ticket::ImplementTicketArgs;

#[derive(Parser)]
#[command(
    name = "tackle",
    version,
    about = "Drive Jira tickets to pull requests with a coding agent"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Implement a Jira ticket and open a draft pull request.
    Work(WorkArgs),
    /// Address review comments on a pull request.
    AddressPrComments(CommentsArgs),
}

#[derive(Args)]
struct WorkArgs {
    /// Jira ticket key (e.g., PROJ-123).
    #[arg(short, long)]
    ticket: String,
    /// Path to the git repository (defaults to the current directory).
    #[arg(short, long)]
    repo: Option<PathBuf>,
    /// Base branch for the PR (defaults to config or 'main').
    #[arg(short, long)]
    base_branch: Option<String>,
    /// Additional context to prepend to the prompt.
    #[arg(short, long)]
    prompt_prefix: Option<String>,
    /// Print what would be done without making changes.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct CommentsArgs {
    /// PR number (auto-detected from the current branch if omitted).
    #[arg(short = 'n', long)]
    pr: Option<u64>,
    /// Path to the git repository (defaults to the current directory).
    #[arg(short, long)]
    repo: Option<PathBuf>,
    /// Additional context to prepend to the prompt.
    #[arg(short, long)]
    prompt_prefix: Option<String>,
    /// Print the prompt without invoking the agent.
    #[arg(long)]
    dry_run: bool,
    /// Skip the automatic push after committing.
    #[arg(long)]
    no_push: bool,
    /// Post an acknowledgement reply to every comment after the commit.
    #[arg(long)]
    with_replies: bool,
}

#[tokio::main]
async fn main() {
    logging::init();

    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Work(args) => run_work(args).await,
        Commands::AddressPrComments(args) => run_comments(args).await,
    }
}

async fn run_work(args: WorkArgs) -> AppResult<()> {
    let config = AppConfig::from_env();

    if config.jira_base_url.is_none() {
        warn!("{ENV_PREFIX}_JIRA_BASE_URL not set; the ticket fetch will fail");
    }
    if config.jira_email.is_none() {
        warn!("{ENV_PREFIX}_JIRA_EMAIL not set; the ticket fetch will fail");
    }
    if config.jira_api_token.is_none() {
        warn!("{ENV_PREFIX}_JIRA_API_TOKEN not set; the ticket fetch will fail");
    }

    let repo_path = resolve_repo_path(args.repo)?;
    let ctx = build_context(config, repo_path);

    cmd::work::run(
        &ctx,
        ImplementTicketArgs {
            ticket_key: args.ticket,
            base_branch: args.base_branch,
            prompt_prefix: args.prompt_prefix,
            dry_run: args.dry_run,
        },
    )
    .await
}

async fn run_comments(args: CommentsArgs) -> AppResult<()> {
    let config = AppConfig::from_env();
    let repo_path = resolve_repo_path(args.repo)?;
    let ctx = build_context(config, repo_path);

    cmd::comments::run(
        &ctx,
        AddressCommentsArgs {
            pr_number: args.pr,
            prompt_prefix: args.prompt_prefix,
            dry_run: args.dry_run,
            no_push: args.no_push,
            with_replies: args.with_replies,
        },
    )
    .await
}

fn resolve_repo_path(repo: Option<PathBuf>) -> AppResult<PathBuf> {
    let path = match repo {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    Ok(std::path::absolute(path)?)
}

fn build_context(config: AppConfig, repo_path: PathBuf) -> AppContext {
    let issue_tracker = Arc::new(JiraClient::new(
        config.jira_base_url.clone(),
        config.jira_email.clone(),
        config.jira_api_token.clone(),
        config.acceptance_criteria_fields.clone(),
    ));
    let version_control = Arc::new(GitCli::new(repo_path.clone()));
    let code_host = Arc::new(GitHubCli::new(repo_path.clone()));
    let coding_agent = Arc::new(ClaudeCli::new(repo_path.clone()));
    let cancel = CancelToken::install();

    AppContext::new(
        config,
        repo_path,
        version_control,
        issue_tracker,
        code_host,
        coding_agent,
        cancel,
    )
}
