use std::sync::Arc;

use log::debug;

use super::{CollaboratorNormalizer, SplitMode, collaborator_matchers};
use crate::matching::{Highlighter, WordDictionary};
use crate::models::{ConflictMatch, PersonName};

/// Check every author line in `authors` against a free-form collaborator
/// list. Each matching (author, collaborator) pair is reported once.
pub fn find_conflicts(
    collaborators: &str,
    authors: &str,
    mode: SplitMode,
    dictionary: &Arc<WordDictionary>,
    highlighter: &Highlighter,
) -> Vec<ConflictMatch> {
    let normalized = CollaboratorNormalizer::new(Arc::clone(dictionary))
        .normalize(collaborators, mode)
        .unwrap_or_default();
    let matchers = collaborator_matchers(&normalized, dictionary);
    debug!("Built {} collaborator matchers", matchers.len());

    let mut conflicts = Vec::new();
    for line in authors.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let author = PersonName::parse(line);
        if author.is_empty() {
            continue;
        }
        for matcher in &matchers {
            let kind = matcher.test(&author, false);
            if kind.is_match() {
                conflicts.push(ConflictMatch {
                    author: author.nameaff_text(),
                    collaborator: matcher.person().nameaff_text(),
                    kind,
                    highlighted: highlighter.highlight_person(&author, &[matcher]),
                });
            }
        }
    }
    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::{HighlightMarkup, MatchKind};

    fn conflicts(collaborators: &str, authors: &str) -> Vec<ConflictMatch> {
        find_conflicts(
            collaborators,
            authors,
            SplitMode::Plain,
            &Arc::new(WordDictionary::builtin()),
            &Highlighter::new(HighlightMarkup::plain("[", "]")),
        )
    }

    #[test]
    fn test_name_and_affiliation_conflicts() {
        let found = conflicts(
            "Jane Doe, MIT\nCarnegie Mellon University",
            "Jane Doe (Harvard)\nAnn Lee (CMU)\nBob Stone (Stanford)",
        );
        assert_eq!(found.len(), 2);

        assert_eq!(found[0].author, "Jane Doe (Harvard)");
        assert_eq!(found[0].collaborator, "Jane Doe (MIT)");
        assert_eq!(found[0].kind, MatchKind::Name);
        assert_eq!(found[0].highlighted, "[Jane] [Doe] (Harvard)");

        assert_eq!(found[1].author, "Ann Lee (CMU)");
        assert_eq!(found[1].kind, MatchKind::Affiliation);
    }

    #[test]
    fn test_none_list_has_no_conflicts() {
        assert!(conflicts("None", "Jane Doe (MIT)").is_empty());
        assert!(conflicts("", "Jane Doe (MIT)").is_empty());
    }
}
