use std::ops::Range;

use super::matcher::AuthorMatcher;
use super::types::HighlightMarkup;
use crate::models::PersonName;

/// Wraps mentions of one or more matchers in configurable markup.
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    markup: HighlightMarkup,
}

impl Highlighter {
    pub fn new(markup: HighlightMarkup) -> Self {
        Self { markup }
    }

    pub fn markup(&self) -> &HighlightMarkup {
        &self.markup
    }

    /// Mark every mention of `matchers` in `text`. Text is returned unchanged
    /// when no matcher has a searchable pattern.
    pub fn highlight_text(&self, text: &str, matchers: &[&AuthorMatcher]) -> String {
        let spans = AuthorMatcher::highlight_spans(text, matchers);
        self.wrap(text, &spans, 0)
    }

    /// Mark `person` displayed as "First Last (Affiliation)".
    ///
    /// The `(Affiliation)` suffix is wrapped in the affiliation markers unless
    /// it holds a mention itself, in which case only the mention is marked.
    pub fn highlight_person(&self, person: &PersonName, matchers: &[&AuthorMatcher]) -> String {
        let display = person.nameaff_text();
        let spans = AuthorMatcher::highlight_spans(&display, matchers);
        if person.affiliation.is_empty() {
            return self.wrap(&display, &spans, 0);
        }

        let suffix_start = display.len() - person.affiliation.len() - 2;
        let (name_part, suffix) = display.split_at(suffix_start);
        let (name_spans, suffix_spans): (Vec<_>, Vec<_>) =
            spans.into_iter().partition(|s| s.end <= suffix_start);

        let mut out = self.wrap(name_part, &name_spans, 0);
        if suffix_spans.is_empty() {
            out.push_str(&self.markup.affiliation_open);
            out.push_str(suffix);
            out.push_str(&self.markup.affiliation_close);
        } else {
            out.push_str(&self.wrap(suffix, &suffix_spans, suffix_start));
        }
        out
    }

    /// Wrap `spans` (offsets relative to `base`) in match markers.
    fn wrap(&self, text: &str, spans: &[Range<usize>], base: usize) -> String {
        let mut out = String::with_capacity(text.len() + spans.len() * 32);
        let mut pos = 0;
        for span in spans {
            let start = span.start.saturating_sub(base).max(pos);
            let end = span.end.saturating_sub(base).min(text.len());
            if start >= end {
                continue;
            }
            out.push_str(&text[pos..start]);
            out.push_str(&self.markup.match_open);
            out.push_str(&text[start..end]);
            out.push_str(&self.markup.match_close);
            pos = end;
        }
        out.push_str(&text[pos..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::WordDictionary;
    use std::sync::Arc;

    fn matcher(first: &str, last: &str, affiliation: &str) -> AuthorMatcher {
        AuthorMatcher::new(
            PersonName::new(first, last, affiliation),
            Arc::new(WordDictionary::builtin()),
        )
    }

    #[test]
    fn test_highlight_text_wraps_mentions() {
        let jane = matcher("Jane", "Doe", "");
        let highlighter = Highlighter::new(HighlightMarkup::plain("[", "]"));
        assert_eq!(
            highlighter.highlight_text("J. Doe and Ann Jones", &[&jane]),
            "[J.] [Doe] and Ann Jones"
        );
    }

    #[test]
    fn test_highlight_merges_matchers() {
        let jane = matcher("Jane", "Doe", "");
        let stanford = matcher("", "", "Stanford");
        let highlighter = Highlighter::new(HighlightMarkup::plain("[", "]"));
        assert_eq!(
            highlighter.highlight_text("Jane Doe (Stanford)", &[&jane, &stanford]),
            "[Jane] [Doe] ([Stanford])"
        );
    }

    #[test]
    fn test_no_general_pattern_leaves_text_unchanged() {
        let none = matcher("", "", "None");
        let highlighter = Highlighter::default();
        assert_eq!(highlighter.highlight_text("None of these", &[&none]), "None of these");
        assert_eq!(highlighter.highlight_text("anything", &[]), "anything");
    }

    #[test]
    fn test_highlight_preserves_accented_text() {
        let jose = matcher("Jose", "Nunez", "");
        let highlighter = Highlighter::new(HighlightMarkup::plain("<", ">"));
        assert_eq!(
            highlighter.highlight_text("José Núñez-Ortiz", &[&jose]),
            "<José> <Núñez>-Ortiz"
        );
    }

    #[test]
    fn test_highlight_person_wraps_affiliation_suffix() {
        let doe = matcher("", "Doe", "");
        let highlighter = Highlighter::default();
        let person = PersonName::new("Jane", "Doe", "MIT");
        assert_eq!(
            highlighter.highlight_person(&person, &[&doe]),
            r#"Jane <span class="match">Doe</span> <span class="auaff">(MIT)</span>"#
        );
    }

    #[test]
    fn test_highlight_person_marks_inside_suffix_without_wrapping() {
        let stanford = matcher("", "", "Stanford");
        let highlighter = Highlighter::new(HighlightMarkup {
            match_open: "[".to_string(),
            match_close: "]".to_string(),
            affiliation_open: "{".to_string(),
            affiliation_close: "}".to_string(),
        });
        let person = PersonName::new("Ann", "Lee", "Stanford");
        assert_eq!(
            highlighter.highlight_person(&person, &[&stanford]),
            "Ann Lee ([Stanford])"
        );
    }

    #[test]
    fn test_highlight_person_wraps_unmatched_suffix() {
        let lee = matcher("Ann", "Lee", "");
        let highlighter = Highlighter::new(HighlightMarkup {
            match_open: "[".to_string(),
            match_close: "]".to_string(),
            affiliation_open: "{".to_string(),
            affiliation_close: "}".to_string(),
        });
        let person = PersonName::new("Ann", "Lee", "Stanford");
        assert_eq!(
            highlighter.highlight_person(&person, &[&lee]),
            "[Ann] [Lee] {(Stanford)}"
        );
    }
}
