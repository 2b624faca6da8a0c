//! Heuristic "is this an institution?" classifier.

use std::sync::LazyLock;

use regex::Regex;

use super::dictionary::{Nameish, WordDictionary};
use crate::utils::text::{fold_accents, is_all_upper};

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z0-9&]+").unwrap());

pub struct AffiliationClassifier<'a> {
    dictionary: &'a WordDictionary,
}

impl<'a> AffiliationClassifier<'a> {
    pub fn new(dictionary: &'a WordDictionary) -> Self {
        Self { dictionary }
    }

    /// Decide whether `text` reads like an institution name rather than a
    /// person's name.
    ///
    /// With `assume_name` set, a single unknown word is taken to be a name.
    pub fn looks_like_affiliation(&self, text: &str, assume_name: bool) -> bool {
        let folded = fold_accents(text);
        let tokens: Vec<&str> = TOKEN.find_iter(&folded).map(|m| m.as_str()).collect();

        let mut has_weak = false;
        let mut has_nameish = false;
        let mut initials = 0;
        let mut first_capitalized = None;
        let mut capitalized = 0;

        for (i, token) in tokens.iter().enumerate() {
            let Some(record) = self.dictionary.lookup(&token.to_lowercase()) else {
                if token.len() > 2 && is_all_upper(token) {
                    first_capitalized.get_or_insert(i);
                    capitalized += 1;
                }
                continue;
            };

            match record.nameish {
                Some(Nameish::Never) => return true,
                Some(Nameish::Initial) => {
                    initials += 1;
                    continue;
                }
                Some(Nameish::Always) => {
                    has_nameish = true;
                    continue;
                }
                Some(Nameish::NotLeading) if i > 0 => {
                    has_nameish = true;
                    continue;
                }
                Some(Nameish::Neutral) => continue,
                _ => {}
            }

            if record.is_weak {
                has_weak = true;
            } else {
                return true;
            }
        }

        let n = tokens.len();
        has_weak
            || (n == 1 && !has_nameish && !assume_name)
            || (n == 1 && is_all_upper(tokens[0]))
            || (initials > 0 && n == initials)
            || (capitalized > 0
                && !has_nameish
                && first_capitalized != Some(1)
                && (capitalized < n || text.contains(['-', ',', '/'])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn looks(text: &str) -> bool {
        let dict = WordDictionary::builtin();
        AffiliationClassifier::new(&dict).looks_like_affiliation(text, false)
    }

    #[test]
    fn test_abbreviations_are_affiliations() {
        assert!(looks("MIT"));
        assert!(looks("UCLA"));
        assert!(looks("EPFL"));
    }

    #[test]
    fn test_known_names_are_not_affiliations() {
        assert!(!looks("John Smith"));
        assert!(!looks("Jane Doe"));
        assert!(!looks("Eddie Kohler"));
        assert!(!looks("José García"));
    }

    #[test]
    fn test_unknown_two_word_names_are_not_affiliations() {
        assert!(!looks("Ada Lovelace"));
    }

    #[test]
    fn test_weak_words_make_affiliations() {
        assert!(looks("Stanford University"));
        assert!(looks("University of Oxford"));
        assert!(looks("Bell Labs"));
    }

    #[test]
    fn test_strong_dictionary_words_make_affiliations() {
        assert!(looks("Massachusetts General Hospital"));
        assert!(looks("Google Research"));
        assert!(looks("Acme Inc"));
    }

    #[test]
    fn test_single_word_depends_on_assumption() {
        let dict = WordDictionary::empty();
        let classifier = AffiliationClassifier::new(&dict);
        assert!(classifier.looks_like_affiliation("Oxford", false));
        assert!(!classifier.looks_like_affiliation("Oxford", true));
        assert!(classifier.looks_like_affiliation("OXFORD", true));
    }

    #[test]
    fn test_only_initials() {
        assert!(looks("Jr"));
        assert!(looks("Jr. III"));
    }

    #[test]
    fn test_capitalized_words() {
        // Second-position capitals read as a surname ("Jane DOE").
        assert!(!looks("Ada LOVELACE"));
        assert!(looks("CERN Geneva"));
        assert!(looks("INRIA-Rennes"));
        assert!(!looks("Wei ZHANG"));
    }

    #[test]
    fn test_particle_position() {
        assert!(!looks("Anna de Groot"));
        assert!(looks("de Montfort"));
    }

    #[test]
    fn test_empty_text() {
        assert!(!looks(""));
    }
}
