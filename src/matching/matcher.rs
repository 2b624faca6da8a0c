use std::ops::Range;
use std::sync::{Arc, OnceLock};

use log::debug;

use super::affiliation::AffiliationClassifier;
use super::builder::{CompiledMatcher, PatternBuilder};
use super::dictionary::WordDictionary;
use super::pattern::PatternPair;
use super::types::MatchKind;
use crate::models::PersonName;
use crate::utils::text::deaccent;

/// Fuzzy matcher for one person or institution.
///
/// Patterns are compiled on first use and cached for the matcher's lifetime.
#[derive(Debug)]
pub struct AuthorMatcher {
    person: PersonName,
    nonauthor: bool,
    dictionary: Arc<WordDictionary>,
    compiled: OnceLock<CompiledMatcher>,
}

impl AuthorMatcher {
    pub fn new(person: PersonName, dictionary: Arc<WordDictionary>) -> Self {
        Self {
            person,
            nonauthor: false,
            dictionary,
            compiled: OnceLock::new(),
        }
    }

    /// Parse `text` as a name; `None` if nothing usable remains.
    pub fn from_text(text: &str, nonauthor: bool, dictionary: Arc<WordDictionary>) -> Option<Self> {
        if text.is_empty() {
            return None;
        }
        let person = PersonName::parse(text);
        if person.is_empty() {
            return None;
        }
        Some(Self::new(person, dictionary).with_nonauthor(nonauthor))
    }

    /// Parse `text`, treating institution-like text as an affiliation.
    pub fn from_guess(text: &str, dictionary: Arc<WordDictionary>) -> Self {
        let person = PersonName::parse_guess(text, &AffiliationClassifier::new(&dictionary));
        Self::new(person, dictionary)
    }

    pub fn from_affiliation(affiliation: &str, dictionary: Arc<WordDictionary>) -> Self {
        Self::new(PersonName::affiliation_only(affiliation), dictionary)
    }

    /// Matcher for one canonical collaborator line; `None` for empty and
    /// `None` lines.
    pub fn from_collaborator_line(line: &str, dictionary: Arc<WordDictionary>) -> Option<Self> {
        if line.is_empty() || line.eq_ignore_ascii_case("none") {
            return None;
        }
        Some(Self::new(PersonName::parse(line), dictionary).with_nonauthor(true))
    }

    pub fn with_nonauthor(mut self, nonauthor: bool) -> Self {
        self.nonauthor = nonauthor;
        self
    }

    pub fn person(&self) -> &PersonName {
        &self.person
    }

    /// True for collaborators and other non-authors.
    pub fn is_nonauthor(&self) -> bool {
        self.nonauthor
    }

    pub fn dictionary(&self) -> &Arc<WordDictionary> {
        &self.dictionary
    }

    fn compiled(&self) -> &CompiledMatcher {
        self.compiled.get_or_init(|| {
            debug!("Compiling matcher for {:?}", self.person.nameaff_text());
            PatternBuilder::new(&self.dictionary).build(&self.person)
        })
    }

    /// The "any mention" pattern, if the person has any searchable words.
    pub fn general_pattern(&self) -> Option<&PatternPair> {
        self.compiled().general.as_ref()
    }

    /// Test a candidate record.
    ///
    /// With `prefer_name`, an affiliation match only counts when one side has
    /// no last name.
    pub fn test(&self, candidate: &PersonName, prefer_name: bool) -> MatchKind {
        let compiled = self.compiled();
        if compiled.general.is_none() {
            return MatchKind::None;
        }

        if let Some(last) = &compiled.last_name
            && !candidate.last_name.is_empty()
            && last.is_match(&candidate.last_name)
            && (candidate.first_name.is_empty()
                || compiled
                    .first_name
                    .as_ref()
                    .is_none_or(|first| first.is_match(&candidate.first_name)))
        {
            return MatchKind::Name;
        }

        if let Some(affiliation) = &compiled.affiliation
            && !candidate.affiliation.is_empty()
            && (!prefer_name || self.person.last_name.is_empty() || candidate.last_name.is_empty())
            && affiliation.test(&self.dictionary, &deaccent(&candidate.affiliation))
        {
            return MatchKind::Affiliation;
        }

        MatchKind::None
    }

    /// Test free text, guessing whether it names a person or an institution.
    pub fn test_text(&self, text: &str, prefer_name: bool) -> MatchKind {
        let candidate = PersonName::parse_guess(text, &AffiliationClassifier::new(&self.dictionary));
        self.test(&candidate, prefer_name)
    }

    /// True if every last-name word appears in `text`.
    pub fn matches_last_name(&self, text: &str) -> bool {
        self.compiled()
            .last_name
            .as_ref()
            .is_some_and(|last| last.is_match(text))
    }

    /// Byte spans of `text` mentioning any of `matchers`.
    pub fn highlight_spans(text: &str, matchers: &[&AuthorMatcher]) -> Vec<Range<usize>> {
        let patterns: Vec<&PatternPair> =
            matchers.iter().filter_map(|m| m.general_pattern()).collect();
        match patterns.as_slice() {
            [] => Vec::new(),
            [single] => single.find_spans(text),
            _ => PatternPair::merge(&patterns)
                .map(|merged| merged.find_spans(text))
                .unwrap_or_default(),
        }
    }
}
