/// Tag naming convention shared by the changelog rewriter and the forge calls.
///
/// Headings, reference labels, release branches and the version file carry the
/// bare version (`1.2.0`). Compare URLs and forge release tags carry the
/// prefixed tag (`v1.2.0`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagStyle {
    pub prefix: String,
}

impl TagStyle {
    /// Create a tag style with the given prefix (may be empty)
    pub fn new(prefix: impl Into<String>) -> Self {
        TagStyle {
            prefix: prefix.into(),
        }
    }

    /// Remove a single leading prefix: `"v1.2.0"` -> `"1.2.0"`
    pub fn strip<'a>(&self, tag: &'a str) -> &'a str {
        if self.prefix.is_empty() {
            return tag;
        }
        tag.strip_prefix(self.prefix.as_str()).unwrap_or(tag)
    }

    /// Add the prefix to a bare version: `"1.2.0"` -> `"v1.2.0"`
    ///
    /// Already-prefixed input is returned unchanged.
    pub fn apply(&self, tag: &str) -> String {
        format!("{}{}", self.prefix, self.strip(tag))
    }
}

impl Default for TagStyle {
    fn default() -> Self {
        TagStyle::new("v")
    }
}
