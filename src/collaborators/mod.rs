//! Collaborator and conflict-of-interest lists.
//!
//! Users paste these in every imaginable format. [`CollaboratorNormalizer`]
//! rewrites them into one entry per line:
//!
//! ```text
//! # Comment
//! Jane Doe (MIT) - PhD advisor
//! All (Stanford University)
//! ```
//!
//! Each canonical line can then be turned into an
//! [`AuthorMatcher`](crate::matching::AuthorMatcher) for conflict checks.

mod conflicts;
mod line;
mod normalize;
mod split;

#[cfg(all(test, feature = "golden-tests"))]
mod golden_test;

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::matching::{AuthorMatcher, WordDictionary};

pub use conflicts::find_conflicts;
pub use normalize::{CollaboratorNormalizer, SplitMode};

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)\s*#.*$").unwrap());

/// Remove `#` comments, and the whole text if it is just "None".
pub fn strip_collaborator_comments(text: &str) -> String {
    if text.eq_ignore_ascii_case("none") {
        return String::new();
    }
    COMMENT.replace_all(text, "").into_owned()
}

/// One matcher per collaborator entry in canonical `text`.
pub fn collaborator_matchers(text: &str, dictionary: &Arc<WordDictionary>) -> Vec<AuthorMatcher> {
    strip_collaborator_comments(text)
        .lines()
        .map(str::trim)
        .filter_map(|line| AuthorMatcher::from_collaborator_line(line, Arc::clone(dictionary)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::MatchKind;
    use crate::models::PersonName;

    #[test]
    fn test_strip_collaborator_comments() {
        assert_eq!(strip_collaborator_comments("None"), "");
        assert_eq!(strip_collaborator_comments("NONE"), "");
        assert_eq!(
            strip_collaborator_comments("# Advisors\nJane Doe (MIT)\nAll (CMU) # lab"),
            "\nJane Doe (MIT)\nAll (CMU)"
        );
        assert_eq!(strip_collaborator_comments("None # really"), "None");
    }

    #[test]
    fn test_collaborator_matchers() {
        let dict = Arc::new(WordDictionary::builtin());
        let text = "# Advisors\nJane Doe (MIT)\n\nAll (Carnegie Mellon University)\nNone";
        let matchers = collaborator_matchers(text, &dict);
        assert_eq!(matchers.len(), 2);
        assert!(matchers.iter().all(|m| m.is_nonauthor()));

        let author = PersonName::new("J.", "Doe", "Harvard");
        assert_eq!(matchers[0].test(&author, false), MatchKind::Name);

        let author = PersonName::new("Ann", "Lee", "CMU");
        assert_eq!(matchers[1].test(&author, false), MatchKind::Affiliation);
    }
}
