use std::sync::Arc;

use log::debug;
use strum::{Display, EnumString};

use super::line::{EMPTY_ENTRY, LineOutcome, LineRewriter};
use super::split::{clean_text, split_lines};
use crate::matching::{AffiliationClassifier, WordDictionary};
use crate::utils::text::clean_newlines;

/// How aggressively to break up multi-person lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SplitMode {
    #[default]
    Plain,
    /// Also strip lettered sub-items ("a. Jane Doe") and split lines holding
    /// several parenthesized groups.
    Lettered,
}

/// Rewrites free-form collaborator text into one `Name (Affiliation) - note`
/// entry per line.
#[derive(Debug, Clone)]
pub struct CollaboratorNormalizer {
    dictionary: Arc<WordDictionary>,
}

impl CollaboratorNormalizer {
    pub fn new(dictionary: Arc<WordDictionary>) -> Self {
        Self { dictionary }
    }

    /// Normalize `text`.
    ///
    /// Returns `Some("None")` when the text only says there are no
    /// collaborators and `None` when it says nothing at all.
    pub fn normalize(&self, text: &str, mode: SplitMode) -> Option<String> {
        let classifier = AffiliationClassifier::new(&self.dictionary);
        let rewriter = LineRewriter::new(&self.dictionary);

        let cleaned = clean_text(&clean_newlines(text), mode);
        let raw_lines = split_lines(&cleaned, mode, &classifier);

        let mut lines: Vec<String> = Vec::with_capacity(raw_lines.len());
        let mut saw_none = false;
        for raw in &raw_lines {
            match rewriter.rewrite(raw) {
                LineOutcome::Comment(comment) => lines.push(comment),
                LineOutcome::Entry(entry) if !EMPTY_ENTRY.is_match(&entry) => lines.push(entry),
                LineOutcome::Entry(entry) if !entry.is_empty() => saw_none = true,
                // Blank lines separate groups, but never lead.
                LineOutcome::Entry(_) if !lines.is_empty() => lines.push(String::new()),
                LineOutcome::Entry(_) => {}
            }
        }

        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        debug!(
            "Normalized {} raw lines into {} collaborator lines",
            raw_lines.len(),
            lines.len()
        );

        if !lines.is_empty() {
            Some(lines.join("\n"))
        } else if saw_none {
            Some("None".to_string())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(text: &str, mode: SplitMode) -> Option<String> {
        CollaboratorNormalizer::new(Arc::new(WordDictionary::builtin())).normalize(text, mode)
    }

    fn plain(text: &str) -> Option<String> {
        normalize(text, SplitMode::Plain)
    }

    #[test]
    fn test_none_and_empty() {
        assert_eq!(plain("None"), Some("None".to_string()));
        assert_eq!(plain("n/a\n\n"), Some("None".to_string()));
        assert_eq!(plain(""), None);
        assert_eq!(plain("   \n\n"), None);
    }

    #[test]
    fn test_two_entries_on_one_line() {
        assert_eq!(
            normalize("Jane Doe (MIT), John Smith (Stanford)", SplitMode::Lettered).as_deref(),
            Some("Jane Doe (MIT)\nJohn Smith (Stanford)")
        );
        assert_eq!(
            plain("Jane Doe (MIT), John Smith (Stanford)").as_deref(),
            Some("Jane Doe (MIT) - John Smith (Stanford)")
        );
    }

    #[test]
    fn test_canonical_text_is_a_fixed_point() {
        let text = "# Advisors\nJane Doe (MIT)\n\nAll (Stanford University)\nJohn Smith (CMU) - coauthor";
        assert_eq!(plain(text).as_deref(), Some(text));
        let again = plain(text).unwrap();
        assert_eq!(plain(&again).as_deref(), Some(text));
    }

    #[test]
    fn test_enumerated_list() {
        assert_eq!(
            plain("1. Jane Doe (MIT)\n2. John Smith (Stanford)").as_deref(),
            Some("Jane Doe (MIT)\nJohn Smith (Stanford)")
        );
        assert_eq!(
            normalize("a. Jane Doe (MIT)\nb. John Smith (Stanford)", SplitMode::Lettered)
                .as_deref(),
            Some("Jane Doe (MIT)\nJohn Smith (Stanford)")
        );
    }

    #[test]
    fn test_semicolon_list() {
        assert_eq!(
            plain("Jane Doe (MIT); John Smith (Stanford); Ann Lee (CMU)").as_deref(),
            Some("Jane Doe (MIT)\nJohn Smith (Stanford)\nAnn Lee (CMU)")
        );
    }

    #[test]
    fn test_comma_list_with_affiliations() {
        assert_eq!(
            plain("Jane Doe, MIT, John Smith, Stanford University").as_deref(),
            Some("Jane Doe (MIT)\nJohn Smith (Stanford University)")
        );
    }

    #[test]
    fn test_quoted_csv() {
        assert_eq!(
            plain(r#""Doe, Jane", "Smith, John", "Lee, Ann""#).as_deref(),
            Some("Doe, Jane\nSmith, John\nLee, Ann")
        );
    }

    #[test]
    fn test_mixed_block() {
        let text = "Former students:\r\n\
                    \u{2022} Jane Doe \u{2013} Stanford University\r\n\
                    \u{2022} Massachusetts Institute of Technology (MIT)\r\n\
                    \r\n\
                    none\r\n\
                    Smith, John";
        assert_eq!(
            plain(text).as_deref(),
            Some(
                "# Former students:\n\
                 Jane Doe (Stanford University)\n\
                 All (Massachusetts Institute of Technology)\n\
                 \n\
                 Smith, John"
            )
        );
    }

    #[test]
    fn test_leading_and_trailing_blank_lines_are_dropped() {
        assert_eq!(
            plain("\n\nJane Doe (MIT)\n\n\n").as_deref(),
            Some("Jane Doe (MIT)")
        );
    }

    #[test]
    fn test_split_mode_parses_from_str() {
        assert_eq!("lettered".parse::<SplitMode>().unwrap(), SplitMode::Lettered);
        assert_eq!(SplitMode::default().to_string(), "plain");
    }
}
