/// One issue-tracker work item, as consumed by the `work` command.
///
/// Fetched once at workflow start and treated as immutable afterwards.
#[derive(Debug, Clone)]
pub struct Ticket {
    pub key: String,
    pub summary: String,
    pub description: Option<String>,
    pub acceptance_criteria: Option<String>,
    pub issue_type: Option<String>,
    pub priority: Option<String>,
    pub labels: Vec<String>,
    pub project_key: String,
    /// Browse link on the tracker, when the tracker base URL is known.
    pub url: Option<String>,
}

impl Ticket {
    /// Render the ticket as a prompt for the coding agent.
    ///
    /// Sections with no content are omitted entirely rather than emitted
    /// as empty headings.
    pub fn format_prompt(&self, prefix: Option<&str>) -> String {
        let mut prompt = String::new();

        if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
            prompt.push_str(prefix);
            prompt.push_str("\n\n");
        }

        prompt.push_str(&format!("# Jira Ticket: {}\n\n", self.key));
        prompt.push_str(&format!("## Summary\n{}\n\n", self.summary));

        if let Some(description) = self.present(&self.description) {
            prompt.push_str(&format!("## Description\n{description}\n\n"));
        }
        if let Some(criteria) = self.present(&self.acceptance_criteria) {
            prompt.push_str(&format!("## Acceptance Criteria\n{criteria}\n\n"));
        }
        if let Some(issue_type) = self.present(&self.issue_type) {
            prompt.push_str(&format!("**Type:** {issue_type}\n"));
        }
        if let Some(priority) = self.present(&self.priority) {
            prompt.push_str(&format!("**Priority:** {priority}\n"));
        }
        if !self.labels.is_empty() {
            prompt.push_str(&format!("**Labels:** {}\n", self.labels.join(", ")));
        }

        prompt.push_str("\n---\n\n");
        prompt.push_str(
            "Please implement this ticket. Follow the existing conventions and patterns in this repository.",
        );

        prompt
    }

    fn present<'a>(&self, field: &'a Option<String>) -> Option<&'a str> {
        field.as_deref().filter(|value| !value.trim().is_empty())
    }
}
