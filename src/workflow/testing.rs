//! Recording and stub port implementations for workflow tests.
//!
//! Mutating calls are recorded as `"name:detail"` strings so tests can
//! assert both presence and relative order.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::cancel::CancelToken;
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::domain::review::{PrCommentSet, PrDetails, ReviewComment};
use crate::domain::ticket::Ticket;
use crate::error::{AppError, AppResult};
use crate::services::{
    CodeHostService, CodingAgentService, IssueTrackerService, VersionControlService,
};

pub fn test_ticket() -> Ticket {
    Ticket {
        key: "PROJ-42".to_string(),
        summary: "Fix Login Bug!!".to_string(),
        description: Some("Users are logged out at random.".to_string()),
        acceptance_criteria: None,
        issue_type: Some("Bug".to_string()),
        priority: Some("High".to_string()),
        labels: vec!["auth".to_string()],
        project_key: "PROJ".to_string(),
        url: Some("https://acme.atlassian.net/browse/PROJ-42".to_string()),
    }
}

pub fn test_comment(id: u64, author: &str) -> ReviewComment {
    ReviewComment {
        id,
        author: author.to_string(),
        body: format!("comment {id}"),
        path: "src/lib.rs".to_string(),
        line: Some(10),
        diff_hunk: None,
        url: format!("https://github.com/acme/widget/pull/7#discussion_r{id}"),
    }
}

pub fn test_comment_set(comments: Vec<ReviewComment>) -> PrCommentSet {
    PrCommentSet {
        number: 7,
        title: "Add widget cache".to_string(),
        url: "https://github.com/acme/widget/pull/7".to_string(),
        comments,
    }
}

pub fn test_context(
    version_control: Arc<RecordingVcs>,
    issue_tracker: Arc<StubTracker>,
    code_host: Arc<RecordingHost>,
    coding_agent: Arc<StubAgent>,
) -> AppContext {
    AppContext::new(
        AppConfig::default(),
        PathBuf::from("/tmp/widget"),
        version_control,
        issue_tracker,
        code_host,
        coding_agent,
        CancelToken::new(),
    )
}

#[derive(Default)]
pub struct RecordingVcs {
    calls: Mutex<Vec<String>>,
    existing: Mutex<Vec<String>>,
    changes: AtomicBool,
    pull_fails: AtomicBool,
}

impl RecordingVcs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_existing_branch(branch: &str) -> Self {
        let vcs = Self::new();
        vcs.existing.lock().unwrap().push(branch.to_string());
        vcs
    }

    pub fn mark_changed(&self) {
        self.changes.store(true, Ordering::SeqCst);
    }

    pub fn fail_pull(&self) {
        self.pull_fails.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl VersionControlService for RecordingVcs {
    async fn current_branch(&self) -> AppResult<String> {
        Ok("feature/proj-42-fix-login-bug".to_string())
    }

    async fn create_branch(&self, branch: &str) -> AppResult<()> {
        self.record(format!("create:{branch}"));
        self.existing.lock().unwrap().push(branch.to_string());
        Ok(())
    }

    async fn checkout(&self, branch: &str) -> AppResult<()> {
        self.record(format!("checkout:{branch}"));
        Ok(())
    }

    async fn branch_exists(&self, branch: &str) -> AppResult<bool> {
        Ok(self.existing.lock().unwrap().iter().any(|b| b == branch))
    }

    async fn delete_branch(&self, branch: &str) -> AppResult<()> {
        self.record(format!("delete:{branch}"));
        self.existing.lock().unwrap().retain(|b| b != branch);
        Ok(())
    }

    async fn pull(&self) -> AppResult<()> {
        self.record("pull".to_string());
        if self.pull_fails.load(Ordering::SeqCst) {
            return Err(AppError::VersionControl("network unreachable".to_string()));
        }
        Ok(())
    }

    async fn has_changes(&self) -> AppResult<bool> {
        Ok(self.changes.load(Ordering::SeqCst))
    }

    async fn add_all(&self) -> AppResult<()> {
        self.record("add_all".to_string());
        Ok(())
    }

    async fn commit(&self, message: &str) -> AppResult<()> {
        self.record(format!("commit:{message}"));
        self.changes.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn push(&self) -> AppResult<()> {
        self.record("push".to_string());
        Ok(())
    }
}

pub struct StubTracker {
    ticket: Option<Ticket>,
}

impl StubTracker {
    pub fn new(ticket: Ticket) -> Self {
        Self {
            ticket: Some(ticket),
        }
    }

    pub fn failing() -> Self {
        Self { ticket: None }
    }
}

#[async_trait]
impl IssueTrackerService for StubTracker {
    async fn get_ticket(&self, key: &str) -> AppResult<Ticket> {
        self.ticket
            .clone()
            .ok_or_else(|| AppError::IssueTracker(format!("failed to fetch ticket {key}")))
    }
}

#[derive(Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<String>>,
    comments: Option<PrCommentSet>,
    detected_pr: Option<u64>,
    failing_replies: Vec<u64>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_comments(comments: PrCommentSet) -> Self {
        Self {
            comments: Some(comments),
            ..Self::default()
        }
    }

    pub fn detecting_pr(mut self, number: u64) -> Self {
        self.detected_pr = Some(number);
        self
    }

    pub fn failing_reply_to(mut self, comment_id: u64) -> Self {
        self.failing_replies.push(comment_id);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl CodeHostService for RecordingHost {
    async fn pr_for_current_branch(&self) -> AppResult<u64> {
        self.record("detect_pr".to_string());
        self.detected_pr
            .ok_or_else(|| AppError::CodeHost("no PR found for current branch".to_string()))
    }

    async fn pr_details(&self, number: u64) -> AppResult<PrDetails> {
        Ok(PrDetails {
            title: "Add widget cache".to_string(),
            url: format!("https://github.com/acme/widget/pull/{number}"),
        })
    }

    async fn pr_comments(&self, number: u64) -> AppResult<PrCommentSet> {
        self.record(format!("comments:{number}"));
        self.comments
            .clone()
            .ok_or_else(|| AppError::CodeHost(format!("failed to fetch comments for #{number}")))
    }

    async fn create_pr(&self, _title: &str, _body: &str, base: &str) -> AppResult<String> {
        self.record(format!("create_pr:{base}"));
        Ok("https://github.com/acme/widget/pull/7".to_string())
    }

    async fn reply_to_comment(
        &self,
        pr_number: u64,
        comment_id: u64,
        _body: &str,
    ) -> AppResult<()> {
        self.record(format!("reply:{pr_number}:{comment_id}"));
        if self.failing_replies.contains(&comment_id) {
            return Err(AppError::CodeHost(format!(
                "reply to comment {comment_id} was rejected"
            )));
        }
        Ok(())
    }
}

pub struct StubAgent {
    vcs: Option<Arc<RecordingVcs>>,
    fails: bool,
    prompts: Mutex<Vec<String>>,
}

impl StubAgent {
    /// An agent whose run marks the working tree as changed.
    pub fn making_changes(vcs: &Arc<RecordingVcs>) -> Self {
        Self {
            vcs: Some(Arc::clone(vcs)),
            fails: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn making_no_changes() -> Self {
        Self {
            vcs: None,
            fails: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            vcs: None,
            fails: true,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CodingAgentService for StubAgent {
    async fn run(&self, prompt: &str) -> AppResult<()> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fails {
            return Err(AppError::CodingAgent("agent exited non-zero".to_string()));
        }
        if let Some(vcs) = &self.vcs {
            vcs.mark_changed();
        }
        Ok(())
    }

    async fn run_with_output(&self, prompt: &str) -> AppResult<String> {
        self.run(prompt).await?;
        Ok(String::new())
    }
}
