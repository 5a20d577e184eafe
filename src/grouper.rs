//! Groups merged pull requests into a markdown changelog block by label.

use crate::forge::MergedPullRequest;

/// Category used when a pull request carries no label besides the marker
pub const FALLBACK_CATEGORY: &str = "Other";

/// A merged pull request reduced to what the changelog needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRecord {
    pub title: String,
    pub link: String,
    pub category: String,
}

impl PullRequestRecord {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        PullRequestRecord {
            title: title.into(),
            link: link.into(),
            category: category.into(),
        }
    }

    /// Derive a record from a search hit, categorising it by its labels.
    pub fn from_merged(pr: &MergedPullRequest, marker_label: &str) -> Self {
        PullRequestRecord::new(
            pr.title.clone(),
            pr.url.clone(),
            categorize(&pr.labels, marker_label),
        )
    }
}

/// The first label that is not the release-note marker, or `"Other"`.
pub fn categorize(labels: &[String], marker_label: &str) -> String {
    labels
        .iter()
        .find(|label| label.as_str() != marker_label)
        .cloned()
        .unwrap_or_else(|| FALLBACK_CATEGORY.to_string())
}

/// Uppercases the first letter of every word.
///
/// Any character that is not alphanumeric or `_` starts a new word, so
/// `"kind/bug"` becomes `"Kind/Bug"`.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;

    for c in input.chars() {
        if at_word_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }

    out
}

/// Renders records as a markdown block grouped by category.
///
/// Categories are compared by their title-cased heading, so `bug` and `Bug`
/// share one `### Bug` section. Records are stably sorted by that heading;
/// each heading appears once, right before its first entry, preceded by a
/// blank line. Every record becomes a `- title (link)` bullet. The block
/// starts with a newline and every line ends with one.
pub fn render_grouped(records: &[PullRequestRecord]) -> String {
    let mut sorted: Vec<(String, &PullRequestRecord)> = records
        .iter()
        .map(|record| (title_case(&record.category), record))
        .collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let mut content = String::new();
    let mut current: Option<&str> = None;

    for (heading, record) in &sorted {
        if current != Some(heading.as_str()) {
            content.push_str(&format!("\n### {}\n", heading));
            current = Some(heading.as_str());
        }
        content.push_str(&format!("- {} ({})\n", record.title, record.link));
    }

    content
}
