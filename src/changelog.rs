//! Keep-a-changelog document handling.
//!
//! The document is kept as an ordered list of lines. Every transformation is a
//! single forward scan that produces a new document; only the `## [Unreleased]`
//! heading and the `[Unreleased]: ...HEAD` footer are ever rewritten, all
//! other lines pass through untouched.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use chrono::NaiveDate;
use log::debug;
use regex::Regex;

use crate::error::{ChrnError, Result};
use crate::tag::TagStyle;

/// Heading marking changes not yet tied to a release
pub const UNRELEASED_HEADING: &str = "## [Unreleased]";

/// Prefix of the compare-link footer for the unreleased section
pub const UNRELEASED_LINK: &str = "[Unreleased]:";

fn footer_regex() -> &'static Regex {
    static FOOTER_REGEX: OnceLock<Regex> = OnceLock::new();
    FOOTER_REGEX.get_or_init(|| {
        Regex::new(r"^\[Unreleased\]:\s*(?P<base>.+)/(?P<old_tag>[^/]+?)\.\.\.HEAD\s*$").unwrap()
    })
}

fn release_heading_regex() -> &'static Regex {
    static HEADING_REGEX: OnceLock<Regex> = OnceLock::new();
    HEADING_REGEX.get_or_init(|| Regex::new(r"## \[(?P<tag>.*)\] - ").unwrap())
}

/// The first dated release section of a changelog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseNotes {
    /// Tag exactly as written in the heading, empty when none was found
    pub tag: String,
    /// Every line below the heading up to the next release heading,
    /// each terminated by a newline
    pub notes: String,
}

impl ReleaseNotes {
    pub fn is_empty(&self) -> bool {
        self.tag.is_empty()
    }

    /// Notes with surrounding blank lines removed, as published on the forge
    pub fn body(&self) -> &str {
        self.notes.trim_matches('\n')
    }
}

/// A changelog file as a sequence of lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changelog {
    lines: Vec<String>,
}

impl Changelog {
    /// Split text into lines; line terminators are not kept.
    pub fn parse(text: &str) -> Self {
        Changelog {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            ChrnError::Io(std::io::Error::new(
                e.kind(),
                format!("cannot read changelog {}: {}", path.display(), e),
            ))
        })?;
        Ok(Changelog::parse(&text))
    }

    /// Replace the file with this document, one newline after every line.
    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render()).map_err(|e| {
            ChrnError::Io(std::io::Error::new(
                e.kind(),
                format!("cannot write changelog {}: {}", path.display(), e),
            ))
        })
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Whether any line carries the `## [Unreleased]` heading
    pub fn has_unreleased_heading(&self) -> bool {
        self.lines.iter().any(|line| line.contains(UNRELEASED_HEADING))
    }

    /// Insert `block` directly below every `## [Unreleased]` heading.
    ///
    /// The block is split into lines, so a block rendered by
    /// [`crate::grouper::render_grouped`] lands as a blank line followed by
    /// its category headings and bullets.
    pub fn insert_notes(&self, block: &str) -> Self {
        let mut lines = Vec::with_capacity(self.lines.len() + block.lines().count());

        for line in &self.lines {
            lines.push(line.clone());
            if line.contains(UNRELEASED_HEADING) {
                lines.extend(block.lines().map(str::to_string));
            }
        }

        Changelog { lines }
    }

    /// Cut a release: open a dated section for `tag` below the unreleased
    /// heading and rewrite the compare-link footer.
    ///
    /// `[Unreleased]: <base>/<old>...HEAD` becomes
    /// `[Unreleased]: <base>/<tag>...HEAD` plus `[<tag>]: <base>/<old>...<tag>`,
    /// with tags in the URLs normalised through `style`. A footer line that
    /// does not match that shape is a parse error.
    pub fn rotate(&self, tag: &str, date: NaiveDate, style: &TagStyle) -> Result<Self> {
        let version = style.strip(tag);
        let new_tag = style.apply(tag);
        let mut lines = Vec::with_capacity(self.lines.len() + 3);

        for line in &self.lines {
            if line.contains(UNRELEASED_HEADING) {
                lines.push(line.clone());
                lines.push(String::new());
                lines.push(format!("## [{}] - {}", version, date.format("%Y-%m-%d")));
            } else if line.trim_start().starts_with(UNRELEASED_LINK) {
                let captures = footer_regex().captures(line.trim()).ok_or_else(|| {
                    ChrnError::parse(format!("malformed compare link: '{}'", line))
                })?;
                let base = &captures["base"];
                let old_tag = style.apply(&captures["old_tag"]);
                debug!("rewriting compare link {} -> {}", old_tag, new_tag);

                lines.push(format!("[Unreleased]: {}/{}...HEAD", base, new_tag));
                lines.push(format!("[{}]: {}/{}...{}", version, base, old_tag, new_tag));
            } else {
                lines.push(line.clone());
            }
        }

        Ok(Changelog { lines })
    }

    /// Find the first `## [<tag>] - ` heading and collect its section.
    ///
    /// Returns an empty [`ReleaseNotes`] when the document has no dated
    /// release heading.
    pub fn first_release(&self) -> ReleaseNotes {
        let mut release = ReleaseNotes::default();
        let mut found = false;

        for line in &self.lines {
            let heading = release_heading_regex().captures(line);

            if found {
                if heading.is_some() {
                    break;
                }
                release.notes.push_str(line);
                release.notes.push('\n');
            } else if let Some(captures) = heading {
                release.tag = captures["tag"].to_string();
                found = true;
            }
        }

        release
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const SAMPLE: &str = "\
# Changelog

## [Unreleased]

## [1.0.0] - 2023-12-01

### Feature
- Initial release (https://x/repo/pull/1)

[Unreleased]: https://x/repo/compare/v1.0.0...HEAD
[1.0.0]: https://x/repo/compare/v0.9.0...v1.0.0
";

    #[test]
    fn test_rotate_minimal_document() {
        let doc = Changelog::parse(
            "## [Unreleased]\n[Unreleased]: https://x/repo/compare/v1.0.0...HEAD\n",
        );

        let rotated = doc
            .rotate("1.1.0", date(2024, 1, 1), &TagStyle::default())
            .unwrap();

        assert_eq!(
            rotated.render(),
            "## [Unreleased]\n\n## [1.1.0] - 2024-01-01\n\
             [Unreleased]: https://x/repo/compare/v1.1.0...HEAD\n\
             [1.1.0]: https://x/repo/compare/v1.0.0...v1.1.0\n"
        );
    }

    #[test]
    fn test_rotate_accepts_prefixed_tag() {
        let doc = Changelog::parse("[Unreleased]: https://x/compare/v1.0.0...HEAD");
        let rotated = doc
            .rotate("v1.1.0", date(2024, 1, 1), &TagStyle::default())
            .unwrap();

        assert_eq!(
            rotated.lines(),
            &[
                "[Unreleased]: https://x/compare/v1.1.0...HEAD".to_string(),
                "[1.1.0]: https://x/compare/v1.0.0...v1.1.0".to_string(),
            ]
        );
    }

    #[test]
    fn test_rotate_normalises_unprefixed_old_tag() {
        let doc = Changelog::parse("[Unreleased]: https://x/compare/1.0.0...HEAD");
        let rotated = doc
            .rotate("1.0.1", date(2024, 3, 9), &TagStyle::default())
            .unwrap();

        assert_eq!(
            rotated.lines()[1],
            "[1.0.1]: https://x/compare/v1.0.0...v1.0.1"
        );
    }

    #[test]
    fn test_rotate_without_prefix_convention() {
        let doc = Changelog::parse("[Unreleased]: https://x/compare/1.0.0...HEAD");
        let rotated = doc
            .rotate("1.0.1", date(2024, 3, 9), &TagStyle::new(""))
            .unwrap();

        assert_eq!(rotated.lines()[0], "[Unreleased]: https://x/compare/1.0.1...HEAD");
        assert_eq!(rotated.lines()[1], "[1.0.1]: https://x/compare/1.0.0...1.0.1");
    }

    #[test]
    fn test_rotate_preserves_other_lines() {
        let doc = Changelog::parse(SAMPLE);
        let rotated = doc
            .rotate("1.1.0", date(2024, 2, 2), &TagStyle::default())
            .unwrap();

        // heading gains two lines, footer gains one
        assert_eq!(rotated.lines().len(), doc.lines().len() + 3);
        assert!(rotated
            .lines()
            .contains(&"[1.0.0]: https://x/repo/compare/v0.9.0...v1.0.0".to_string()));
        assert!(rotated
            .lines()
            .contains(&"- Initial release (https://x/repo/pull/1)".to_string()));
    }

    #[test]
    fn test_rotate_rejects_malformed_footer() {
        let doc = Changelog::parse("## [Unreleased]\n[Unreleased]: https://x/compare/HEAD\n");
        let result = doc.rotate("1.1.0", date(2024, 1, 1), &TagStyle::default());
        assert!(matches!(result, Err(ChrnError::Parse(_))));
    }

    #[test]
    fn test_rotate_without_markers_is_identity() {
        let doc = Changelog::parse("# Changelog\n\nNothing here yet.\n");
        let rotated = doc
            .rotate("1.0.0", date(2024, 1, 1), &TagStyle::default())
            .unwrap();
        assert_eq!(rotated, doc);
    }

    #[test]
    fn test_insert_notes_below_unreleased() {
        let doc = Changelog::parse("# Changelog\n\n## [Unreleased]\n\n## [1.0.0] - 2023-12-01\n");
        let updated = doc.insert_notes("\n### Bug\n- Fix crash (u)\n");

        assert_eq!(
            updated.render(),
            "# Changelog\n\n## [Unreleased]\n\n### Bug\n- Fix crash (u)\n\n## [1.0.0] - 2023-12-01\n"
        );
    }

    #[test]
    fn test_has_unreleased_heading() {
        let open = Changelog::parse("# Changelog\n\n## [Unreleased]\n");
        let released = Changelog::parse("# Changelog\n\n## [1.0.0] - 2024-01-01\n");

        assert!(open.has_unreleased_heading());
        assert!(!released.has_unreleased_heading());
    }

    #[test]
    fn test_insert_empty_block_is_identity() {
        let doc = Changelog::parse(SAMPLE);
        assert_eq!(doc.insert_notes(""), doc);
    }

    #[test]
    fn test_first_release() {
        let release = Changelog::parse(SAMPLE).first_release();

        assert_eq!(release.tag, "1.0.0");
        assert_eq!(
            release.notes,
            "\n### Feature\n- Initial release (https://x/repo/pull/1)\n\n\
             [Unreleased]: https://x/repo/compare/v1.0.0...HEAD\n\
             [1.0.0]: https://x/repo/compare/v0.9.0...v1.0.0\n"
        );
    }

    #[test]
    fn test_first_release_stops_at_next_heading() {
        let doc = Changelog::parse(
            "## [Unreleased]\n\n## [2.0.0] - 2024-05-01\n- two\n\n## [1.0.0] - 2024-01-01\n- one\n",
        );
        let release = doc.first_release();

        assert_eq!(release.tag, "2.0.0");
        assert_eq!(release.notes, "- two\n\n");
        assert_eq!(release.body(), "- two");
    }

    #[test]
    fn test_first_release_missing_is_empty() {
        let release = Changelog::parse("# Changelog\n\n## [Unreleased]\n- pending\n").first_release();
        assert!(release.is_empty());
        assert_eq!(release.notes, "");
    }

    #[test]
    fn test_insert_rotate_extract_round_trip() {
        let doc = Changelog::parse(SAMPLE);
        let block = "\n### Bug\n- Fix crash (https://x/repo/pull/3)\n\n### Docs\n- Explain rotate (https://x/repo/pull/4)\n";

        let release = doc
            .insert_notes(block)
            .rotate("1.1.0", date(2024, 2, 2), &TagStyle::default())
            .unwrap()
            .first_release();

        assert_eq!(release.tag, "1.1.0");
        assert_eq!(release.body(), block.trim_matches('\n'));
    }

    #[test]
    fn test_read_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        fs::write(&path, "## [Unreleased]\r\n- crlf line\r\n").unwrap();

        let doc = Changelog::read(&path).unwrap();
        assert_eq!(doc.lines(), &["## [Unreleased]".to_string(), "- crlf line".to_string()]);

        doc.write(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "## [Unreleased]\n- crlf line\n");
    }

    #[test]
    fn test_read_missing_file() {
        let result = Changelog::read(Path::new("/definitely/not/here/CHANGELOG.md"));
        assert!(matches!(result, Err(ChrnError::Io(_))));
    }
}
