/// Slugs longer than this are cut so branch names stay readable in refs
/// and terminal output.
const MAX_SLUG_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchName(String);

impl BranchName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build `{prefix}{ticket-key}-{slug}` from a ticket key and summary.
    ///
    /// The slug is the lowercased summary with every run of
    /// non-alphanumeric characters collapsed to a single dash. A summary
    /// with no alphanumeric characters produces `{prefix}{ticket-key}`
    /// with no trailing dash.
    pub fn for_ticket(prefix: &str, ticket_key: &str, summary: &str) -> Self {
        let slug = slugify(summary);
        let mut name = format!("{prefix}{}", ticket_key.trim().to_lowercase());
        if !slug.is_empty() {
            name.push('-');
            name.push_str(&slug);
        }
        Self(name)
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut prev_dash = false;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }

    let mut slug = slug.trim_matches('-').to_string();
    if slug.len() > MAX_SLUG_LEN {
        // The slug is pure ASCII here, so byte truncation is safe.
        slug.truncate(MAX_SLUG_LEN);
        while slug.ends_with('-') {
            slug.pop();
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_branch_name_from_ticket_and_summary() {
        let name = BranchName::for_ticket("feature/", "PROJ-42", "Fix Login Bug!!");
        assert_eq!(name.as_str(), "feature/proj-42-fix-login-bug");
    }

    #[test]
    fn is_deterministic() {
        let a = BranchName::for_ticket("feature/", "PROJ-1", "Add user auth");
        let b = BranchName::for_ticket("feature/", "PROJ-1", "Add user auth");
        assert_eq!(a, b);
    }

    #[test]
    fn slug_uses_only_lowercase_alphanumerics_and_dashes() {
        let name = BranchName::for_ticket("", "KEY-9", "Støtte før UTF-8 (æøå) & 100% cov!");
        let slug = name.as_str().strip_prefix("key-9-").expect("slug present");
        assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        assert!(!slug.contains("--"));
    }

    #[test]
    fn long_summary_is_truncated_without_trailing_dash() {
        let summary = "a".repeat(48) + " b cdefghij";
        let name = BranchName::for_ticket("feature/", "PROJ-7", &summary);
        let slug = name
            .as_str()
            .strip_prefix("feature/proj-7-")
            .expect("slug present");
        assert!(slug.len() <= 50);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn punctuation_only_summary_yields_bare_key() {
        let name = BranchName::for_ticket("feature/", "PROJ-13", "!!! ??? ...");
        assert_eq!(name.as_str(), "feature/proj-13");
    }

    #[test]
    fn collapses_mixed_separator_runs() {
        let name = BranchName::for_ticket("feature/", "PROJ-5", "one -- two__three");
        assert_eq!(name.as_str(), "feature/proj-5-one-two-three");
    }
}
