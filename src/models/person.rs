use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::matching::AffiliationClassifier;
use crate::utils::text::{simplify_whitespace, skip_balanced_parens};

static EMAIL_BRACKETS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Lowercase words that belong to the following surname.
const SURNAME_PARTICLES: &[&str] = &[
    "da", "das", "de", "del", "della", "den", "der", "di", "do", "dos", "du", "la", "le", "st",
    "ten", "ter", "van", "von",
];

/// A person (or an institution, with only `affiliation` set).
///
/// Empty strings mean "absent".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersonName {
    pub first_name: String,
    pub last_name: String,
    pub affiliation: String,
}

impl PersonName {
    pub fn new(first_name: &str, last_name: &str, affiliation: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            affiliation: affiliation.to_string(),
        }
    }

    pub fn affiliation_only(affiliation: &str) -> Self {
        Self::new("", "", affiliation)
    }

    pub fn is_empty(&self) -> bool {
        self.is_name_empty() && self.affiliation.is_empty()
    }

    pub fn is_name_empty(&self) -> bool {
        self.first_name.is_empty() && self.last_name.is_empty()
    }

    /// "First Last".
    pub fn name_text(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            _ => self.last_name.clone(),
        }
    }

    /// "First Last (Affiliation)".
    pub fn nameaff_text(&self) -> String {
        let name = self.name_text();
        match (name.is_empty(), self.affiliation.is_empty()) {
            (_, true) => name,
            (true, false) => format!("({})", self.affiliation),
            (false, false) => format!("{} ({})", name, self.affiliation),
        }
    }

    /// Best-effort parse of `First Last`, `Last, First`, `Name <email>` and
    /// `Name (Affiliation) - note`.
    ///
    /// The note is dropped. The name `All` stands for "everyone at the
    /// affiliation" and parses as an empty name.
    pub fn parse(text: &str) -> Self {
        let text = simplify_whitespace(text);

        let (name, affiliation) = match text.find('(') {
            Some(open) => {
                let close = skip_balanced_parens(&text, open);
                (&text[..open], text[open + 1..close].trim())
            }
            None => (text.as_str(), ""),
        };

        let name = EMAIL_BRACKETS.replace_all(name, " ");
        let name = name
            .split_whitespace()
            .filter(|w| !w.contains('@'))
            .collect::<Vec<_>>()
            .join(" ");
        let name = name.trim_end_matches([',', ';', ':', '-', ' ']);

        let mut person = Self::affiliation_only(affiliation);
        if name.is_empty() || name.eq_ignore_ascii_case("all") {
            return person;
        }

        if let Some((last, first)) = name.split_once(',') {
            person.last_name = last.trim().to_string();
            person.first_name = first.trim().to_string();
            return person;
        }

        let words: Vec<&str> = name.split(' ').collect();
        let mut split = words.len() - 1;
        while split > 0 && SURNAME_PARTICLES.contains(&words[split - 1]) {
            split -= 1;
        }
        person.first_name = words[..split].join(" ");
        person.last_name = words[split..].join(" ");
        person
    }

    /// Like [`parse`](Self::parse), but text that reads like an institution
    /// ("Stanford University") becomes an affiliation.
    pub fn parse_guess(text: &str, classifier: &AffiliationClassifier<'_>) -> Self {
        let person = Self::parse(text);
        if person.affiliation.is_empty()
            && !person.is_name_empty()
            && !text.contains([',', '@'])
        {
            let name = person.name_text();
            if classifier.looks_like_affiliation(&name, false) {
                return Self::affiliation_only(&name);
            }
        }
        person
    }
}
