//! Builds the compiled pattern set for one person.
//!
//! Pipeline: name/affiliation fields → fold + tokenize → dictionary
//! expansion (stopwords, alternates, sync words) → compiled patterns.

use std::sync::LazyLock;

use regex::Regex;

use super::dictionary::{Alternate, WordDictionary};
use super::pattern::{Conjunction, PatternAtom, PatternPair, compile};
use crate::models::PersonName;
use crate::utils::text::deaccent;

static NAME_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9]+").unwrap());

static AFFILIATION_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9&]+").unwrap());

/// Affiliation words plus the regex that finds them (and their alternates).
#[derive(Debug, Clone)]
pub struct AffiliationMatcher {
    /// Direct (non-stopword) affiliation words, in order. Alternates excluded.
    pub words: Vec<String>,
    /// True if any direct word is weak or any alternate was admitted.
    pub any_weak: bool,
    regex: Regex,
}

impl AffiliationMatcher {
    /// Test accent-folded, lowercased candidate affiliation text.
    pub fn test(&self, dictionary: &WordDictionary, text: &str) -> bool {
        if !self.any_weak {
            return self.regex.is_match(text);
        }

        let seen: Vec<&str> = self.regex.find_iter(text).map(|m| m.as_str()).collect();
        if seen.is_empty() {
            return false;
        }
        let was_seen = |w: &str| seen.iter().any(|s| *s == w);

        let mut all_satisfied = true;
        for word in &self.words {
            let record = dictionary.lookup(word);
            let mut weak = record.is_some_and(|r| r.is_weak);
            let mut saw = was_seen(word);

            if !saw && let Some(record) = record {
                // A missing word is still satisfied by a fully present alternate.
                for alt in &record.alternates {
                    if !alt.is_admitted(&self.words) {
                        continue;
                    }
                    saw = alt.words().all(was_seen);
                    if saw {
                        if weak && !alt.phrase().contains(' ') && !dictionary.is_weak(alt.phrase())
                        {
                            weak = false;
                        }
                        break;
                    }
                }
            }

            // "penn state university" must not match "university of penn":
            // a sync word present on one side must be present on the other.
            if saw && let Some(record) = record {
                for phrase in &record.sync_groups {
                    let mut sync_words = phrase.split(' ').filter(|w| !w.is_empty());
                    let ours = sync_words.clone().any(|w| self.words.iter().any(|o| o == w));
                    saw = if ours {
                        sync_words.any(was_seen)
                    } else {
                        !sync_words.any(was_seen)
                    };
                    if !saw {
                        break;
                    }
                }
            }

            if saw {
                if !weak {
                    return true;
                }
            } else {
                all_satisfied = false;
            }
        }
        all_satisfied
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Patterns compiled for one [`PersonName`]. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct CompiledMatcher {
    pub first_name: Option<PatternPair>,
    pub last_name: Option<Conjunction>,
    pub general: Option<PatternPair>,
    pub affiliation: Option<AffiliationMatcher>,
}

/// Turns a [`PersonName`] into a [`CompiledMatcher`] using a dictionary.
pub struct PatternBuilder<'a> {
    dictionary: &'a WordDictionary,
}

impl<'a> PatternBuilder<'a> {
    pub fn new(dictionary: &'a WordDictionary) -> Self {
        Self { dictionary }
    }

    pub fn build(&self, person: &PersonName) -> CompiledMatcher {
        // Every token harvested below also feeds the general pattern.
        let mut general: Vec<PatternAtom> = Vec::new();

        let first_name = if person.first_name.is_empty() {
            None
        } else {
            let folded = deaccent(&person.first_name);
            let mut atoms = Vec::new();
            for m in NAME_WORD.find_iter(&folded) {
                let w = m.as_str();
                atoms.push(PatternAtom::Word(w.to_string()));
                if w.starts_with(|c: char| c.is_ascii_alphabetic()) {
                    if w.len() == 1 {
                        atoms.push(PatternAtom::Prefix(w.to_string()));
                    } else {
                        atoms.push(PatternAtom::Initial(w[..1].to_string()));
                    }
                }
            }
            general.extend(atoms.iter().cloned());
            PatternPair::alternation(&atoms)
        };

        let last_name = if person.last_name.is_empty() {
            None
        } else {
            let folded = deaccent(&person.last_name);
            let words: Vec<&str> = NAME_WORD.find_iter(&folded).map(|m| m.as_str()).collect();
            general.extend(words.iter().map(|w| PatternAtom::Word(w.to_string())));
            Conjunction::new(&words)
        };

        let affiliation = if person.affiliation.is_empty() {
            None
        } else {
            self.build_affiliation(&person.affiliation, &mut general)
        };

        let general = match general.as_slice() {
            [] => None,
            [PatternAtom::Word(w)] if w == "none" => None,
            atoms => PatternPair::alternation(atoms),
        };

        CompiledMatcher {
            first_name,
            last_name,
            general,
            affiliation,
        }
    }

    fn build_affiliation(
        &self,
        affiliation: &str,
        general: &mut Vec<PatternAtom>,
    ) -> Option<AffiliationMatcher> {
        let folded = deaccent(affiliation);
        let mut directs: Vec<String> = Vec::new();
        let mut alternates: Vec<Alternate> = Vec::new();
        let mut any_weak = false;

        for m in AFFILIATION_WORD.find_iter(&folded) {
            let w = m.as_str();
            let record = self.dictionary.lookup(w);
            if record.is_some_and(|r| r.is_stop) {
                continue;
            }
            general.push(PatternAtom::Word(w.to_string()));
            directs.push(w.to_string());
            if let Some(record) = record {
                any_weak |= record.is_weak;
                alternates.extend(record.alternates.iter().cloned());
                alternates.extend(record.sync_groups.iter().cloned().map(Alternate::Literal));
            }
        }

        // Guards see the direct words plus every alternate admitted before them.
        let mut words = directs.clone();
        for alt in &alternates {
            if !alt.is_admitted(&words) {
                continue;
            }
            for w in alt.words() {
                general.push(PatternAtom::Word(w.to_string()));
                words.push(w.to_string());
                any_weak = true;
            }
        }

        if words.is_empty() {
            return None;
        }
        let body = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        let regex = compile(&format!(r"(?-u:\b)(?:{body})(?-u:\b)"))?;

        Some(AffiliationMatcher {
            words: directs,
            any_weak,
            regex,
        })
    }
}
