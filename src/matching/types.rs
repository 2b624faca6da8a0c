use serde::Serialize;
use strum::Display;

/// Outcome of testing a candidate against an [`AuthorMatcher`](super::AuthorMatcher).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MatchKind {
    None,
    Name,
    Affiliation,
}

impl MatchKind {
    pub fn is_match(self) -> bool {
        self != MatchKind::None
    }
}

/// Markers wrapped around highlighted spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightMarkup {
    pub match_open: String,
    pub match_close: String,
    /// Wraps a trailing `(affiliation)` suffix.
    pub affiliation_open: String,
    pub affiliation_close: String,
}

impl Default for HighlightMarkup {
    fn default() -> Self {
        Self {
            match_open: r#"<span class="match">"#.to_string(),
            match_close: "</span>".to_string(),
            affiliation_open: r#"<span class="auaff">"#.to_string(),
            affiliation_close: "</span>".to_string(),
        }
    }
}

impl HighlightMarkup {
    /// Plain-text markers, e.g. `[` and `]`.
    pub fn plain(open: &str, close: &str) -> Self {
        Self {
            match_open: open.to_string(),
            match_close: close.to_string(),
            affiliation_open: String::new(),
            affiliation_close: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_kind_display_and_serialize() {
        assert_eq!(MatchKind::Affiliation.to_string(), "affiliation");
        assert_eq!(
            serde_json::to_string(&MatchKind::Name).unwrap(),
            "\"name\""
        );
        assert!(MatchKind::Name.is_match());
        assert!(!MatchKind::None.is_match());
    }
}
