/// One inline review comment on a pull request. The id is the reply target
/// for the acknowledgement phase.
#[derive(Debug, Clone)]
pub struct ReviewComment {
    pub id: u64,
    pub author: String,
    pub body: String,
    pub path: String,
    /// Absent when the comment is not anchored to a line.
    pub line: Option<u64>,
    pub diff_hunk: Option<String>,
    pub url: String,
}

/// PR title and URL, as reported by the code host.
#[derive(Debug, Clone)]
pub struct PrDetails {
    pub title: String,
    pub url: String,
}

/// All review comments for one PR, in the order the host returned them.
/// That order is preserved for prompt numbering and reply iteration.
#[derive(Debug, Clone)]
pub struct PrCommentSet {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub comments: Vec<ReviewComment>,
}

impl PrCommentSet {
    /// Render the comment set as a prompt for the coding agent. Total: an
    /// empty set still produces the preamble and instruction trailer.
    pub fn format_prompt(&self, prefix: Option<&str>) -> String {
        let mut prompt = String::new();

        prompt.push_str(&format!(
            "# PR Review Comments for PR #{}: {}\n\n",
            self.number, self.title
        ));

        if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
            prompt.push_str("## Additional Context\n\n");
            prompt.push_str(prefix);
            prompt.push_str("\n\n");
        }

        prompt.push_str("## Review Comments to Address\n\n");

        for (index, comment) in self.comments.iter().enumerate() {
            prompt.push_str(&format!(
                "### Comment {} by @{}\n",
                index + 1,
                comment.author
            ));
            prompt.push_str(&format!("**File:** `{}`", comment.path));
            if let Some(line) = comment.line {
                prompt.push_str(&format!(" (line {line})"));
            }
            prompt.push('\n');

            if let Some(hunk) = comment.diff_hunk.as_deref().filter(|h| !h.is_empty()) {
                prompt.push_str("**Code context:**\n```\n");
                prompt.push_str(hunk);
                prompt.push_str("\n```\n");
            }

            prompt.push_str("**Comment:**\n");
            prompt.push_str(&comment.body);
            prompt.push_str("\n\n---\n\n");
        }

        prompt.push_str(
            "## Instructions\n\
             Please address these review comments by making the necessary code changes.\n\
             For each comment, either:\n\
             1. Make the requested change directly\n\
             2. If the comment is unclear or needs discussion, note what clarification is needed\n\
             \n\
             Focus on implementing the requested changes accurately and completely.\n",
        );

        prompt
    }
}
