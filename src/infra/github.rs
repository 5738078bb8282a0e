use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::domain::review::{PrCommentSet, PrDetails, ReviewComment};
use crate::error::{AppError, AppResult};
use crate::services::CodeHostService;

/// `gh` subprocess wrapper bound to one repository.
pub struct GitHubCli {
    repo_path: PathBuf,
}

impl GitHubCli {
    pub fn new(repo_path: PathBuf) -> Self {
        Self { repo_path }
    }

    async fn run_gh(&self, args: &[&str], stdin: Option<Vec<u8>>) -> AppResult<String> {
        debug!(?args, repo = %self.repo_path.display(), "running gh command");

        let mut command = Command::new("gh");
        command
            .args(args)
            .current_dir(&self.repo_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command.stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });

        let mut child = command.spawn().map_err(|err| {
            AppError::CodeHost(format!("failed to spawn gh {}: {err}", args.join(" ")))
        })?;

        if let Some(payload) = stdin {
            let mut handle = child
                .stdin
                .take()
                .ok_or_else(|| AppError::CodeHost("gh stdin was not piped".to_string()))?;
            handle
                .write_all(&payload)
                .await
                .map_err(|err| AppError::CodeHost(format!("failed to write gh stdin: {err}")))?;
            // Close stdin so gh sees EOF.
            drop(handle);
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|err| AppError::CodeHost(format!("gh {} failed: {err}", args.join(" "))))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::CodeHost(format!(
                "gh {} failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// `owner/name` slug of the repository, used to build API paths.
    async fn repo_slug(&self) -> AppResult<String> {
        let slug = self
            .run_gh(
                &["repo", "view", "--json", "nameWithOwner", "-q", ".nameWithOwner"],
                None,
            )
            .await?;
        if slug.is_empty() {
            return Err(AppError::CodeHost(
                "could not determine repository owner/name".to_string(),
            ));
        }
        Ok(slug)
    }
}

#[async_trait]
impl CodeHostService for GitHubCli {
    async fn pr_for_current_branch(&self) -> AppResult<u64> {
        let raw = self.run_gh(&["pr", "view", "--json", "number"], None).await?;
        Ok(parse_pr_view(&raw)?.number)
    }

    async fn pr_details(&self, number: u64) -> AppResult<PrDetails> {
        let number_arg = number.to_string();
        let raw = self
            .run_gh(
                &["pr", "view", &number_arg, "--json", "number,title,url"],
                None,
            )
            .await?;
        let view = parse_pr_view(&raw)?;
        Ok(PrDetails {
            title: view.title,
            url: view.url,
        })
    }

    async fn pr_comments(&self, number: u64) -> AppResult<PrCommentSet> {
        let details = self.pr_details(number).await?;
        let slug = self.repo_slug().await?;

        let api_path = format!("repos/{slug}/pulls/{number}/comments");
        let raw = self.run_gh(&["api", &api_path], None).await?;
        let comments = parse_review_comments(&raw)?;

        Ok(PrCommentSet {
            number,
            title: details.title,
            url: details.url,
            comments,
        })
    }

    async fn create_pr(&self, title: &str, body: &str, base: &str) -> AppResult<String> {
        let url = self
            .run_gh(
                &[
                    "pr", "create", "--title", title, "--body", body, "--base", base, "--draft",
                ],
                None,
            )
            .await?;
        if url.is_empty() {
            return Err(AppError::CodeHost(
                "gh pr create returned no URL".to_string(),
            ));
        }
        Ok(url)
    }

    async fn reply_to_comment(
        &self,
        pr_number: u64,
        comment_id: u64,
        body: &str,
    ) -> AppResult<()> {
        let slug = self.repo_slug().await?;
        let api_path = format!("repos/{slug}/pulls/{pr_number}/comments/{comment_id}/replies");
        let payload = serde_json::to_vec(&serde_json::json!({ "body": body }))
            .map_err(|err| AppError::CodeHost(format!("failed to encode reply body: {err}")))?;

        self.run_gh(&["api", &api_path, "-X", "POST", "--input", "-"], Some(payload))
            .await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct PrViewResponse {
    number: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
}

#[derive(Deserialize)]
struct ReviewCommentResponse {
    id: u64,
    body: String,
    #[serde(default)]
    path: String,
    #[serde(default)]
    line: Option<u64>,
    #[serde(default)]
    diff_hunk: String,
    html_url: String,
    user: CommentUser,
}

#[derive(Deserialize)]
struct CommentUser {
    login: String,
}

fn parse_pr_view(raw: &str) -> AppResult<PrViewResponse> {
    serde_json::from_str(raw)
        .map_err(|err| AppError::ResponseParse(format!("gh pr view output: {err}")))
}

fn parse_review_comments(raw: &str) -> AppResult<Vec<ReviewComment>> {
    let responses: Vec<ReviewCommentResponse> = serde_json::from_str(raw)
        .map_err(|err| AppError::ResponseParse(format!("review comments response: {err}")))?;

    Ok(responses
        .into_iter()
        .map(|comment| ReviewComment {
            id: comment.id,
            author: comment.user.login,
            body: comment.body,
            path: comment.path,
            line: comment.line.filter(|line| *line > 0),
            diff_hunk: Some(comment.diff_hunk).filter(|hunk| !hunk.is_empty()),
            url: comment.html_url,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pr_view_with_number_only() {
        let view = parse_pr_view(r#"{"number": 42}"#).expect("parse");
        assert_eq!(view.number, 42);
        assert!(view.title.is_empty());
    }

    #[test]
    fn parses_full_pr_view() {
        let raw = r#"{"number": 7, "title": "Add widget cache", "url": "https://github.com/acme/widget/pull/7"}"#;
        let view = parse_pr_view(raw).expect("parse");
        assert_eq!(view.title, "Add widget cache");
        assert_eq!(view.url, "https://github.com/acme/widget/pull/7");
    }

    #[test]
    fn malformed_pr_view_is_a_parse_error() {
        let err = parse_pr_view("not json").unwrap_err();
        assert!(matches!(err, AppError::ResponseParse(_)));
    }

    #[test]
    fn parses_review_comments_preserving_order() {
        let raw = r#"[
            {"id": 11, "body": "rename this", "path": "src/lib.rs", "line": 3,
             "diff_hunk": "@@ -1,3 +1,3 @@", "html_url": "https://example.com/11",
             "user": {"login": "alice"}},
            {"id": 12, "body": "extract a helper", "path": "src/main.rs", "line": null,
             "diff_hunk": "", "html_url": "https://example.com/12",
             "user": {"login": "bob"}}
        ]"#;
        let comments = parse_review_comments(raw).expect("parse");
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].id, 11);
        assert_eq!(comments[0].author, "alice");
        assert_eq!(comments[0].line, Some(3));
        assert_eq!(comments[1].id, 12);
        assert_eq!(comments[1].line, None);
        assert_eq!(comments[1].diff_hunk, None);
    }

    #[test]
    fn zero_line_is_normalized_to_unanchored() {
        let raw = r#"[{"id": 13, "body": "note", "path": "a.rs", "line": 0,
                       "diff_hunk": "", "html_url": "https://example.com/13",
                       "user": {"login": "carol"}}]"#;
        let comments = parse_review_comments(raw).expect("parse");
        assert_eq!(comments[0].line, None);
    }
}
