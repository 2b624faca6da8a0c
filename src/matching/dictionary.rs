//! Word classification dictionary.
//!
//! Maps lowercase words to [`WordRecord`]s that tell the pattern builder and
//! the affiliation classifier how to treat them: stopwords are dropped, weak
//! words need company, alternates and sync groups widen or constrain
//! affiliation matches, and `nameish` biases the affiliation classifier.
//!
//! The backing document is a JSON object:
//!
//! ```json
//! {
//!   "of": {"stop": true},
//!   "university": {"weak": true, "alternate": ["univ"]},
//!   "massachusetts": {"alternate": [{"word": "mit", "if": "institute technology"}]},
//!   "penn": {"sync": "state"},
//!   "john": {"nameish": true}
//! }
//! ```
//!
//! Loading is lenient. A missing or unparsable file yields an empty
//! dictionary, and a malformed entry is skipped on its own.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Deserialize;
use serde_json::{Map, Value};

const BUILTIN_DICTIONARY: &str = include_str!("../../resources/affiliationmatchers.json");

/// How strongly a word suggests a personal name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nameish {
    /// `false`: never part of a name; text containing it is an affiliation.
    Never,
    /// `true`: usually part of a name.
    Always,
    /// `2`: part of a name unless it is the first word ("van", "de").
    NotLeading,
    /// `1`: initial-like ("jr", "ii"); counted but otherwise ignored.
    Initial,
    /// `0`: says nothing either way.
    Neutral,
}

/// An alternate spelling or expansion of a dictionary word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alternate {
    Literal(String),
    /// Admitted only when every `requires` word is present and not every
    /// `excludes` word is present.
    Conditional {
        phrase: String,
        requires: Option<Vec<String>>,
        excludes: Option<Vec<String>>,
    },
}

impl Alternate {
    pub fn phrase(&self) -> &str {
        match self {
            Alternate::Literal(phrase) => phrase,
            Alternate::Conditional { phrase, .. } => phrase,
        }
    }

    /// The space-separated words of the phrase.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.phrase().split(' ').filter(|w| !w.is_empty())
    }

    /// Evaluate the guard against the words collected so far.
    pub fn is_admitted<S: AsRef<str>>(&self, present: &[S]) -> bool {
        match self {
            Alternate::Literal(_) => true,
            Alternate::Conditional {
                requires, excludes, ..
            } => {
                if let Some(requires) = requires
                    && !all_present(requires, present)
                {
                    return false;
                }
                if let Some(excludes) = excludes
                    && all_present(excludes, present)
                {
                    return false;
                }
                true
            }
        }
    }
}

fn all_present<S: AsRef<str>>(words: &[String], present: &[S]) -> bool {
    words
        .iter()
        .filter(|w| !w.is_empty())
        .all(|w| present.iter().any(|p| p.as_ref() == w))
}

/// Classification record for one dictionary word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordRecord {
    pub is_stop: bool,
    pub is_weak: bool,
    pub alternates: Vec<Alternate>,
    /// Sync phrases; see `AuthorMatcher::test` for how they constrain matches.
    pub sync_groups: Vec<String>,
    pub nameish: Option<Nameish>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(x) => vec![x],
            OneOrMany::Many(xs) => xs,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WordList {
    Text(String),
    List(Vec<String>),
}

impl WordList {
    fn into_words(self) -> Vec<String> {
        match self {
            WordList::Text(s) => s
                .split(' ')
                .filter(|w| !w.is_empty())
                .map(str::to_lowercase)
                .collect(),
            WordList::List(ws) => ws.iter().map(|w| w.to_lowercase()).collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAlternate {
    Phrase(String),
    Guarded {
        word: String,
        #[serde(default, rename = "if")]
        requires: Option<WordList>,
        #[serde(default)]
        if_not: Option<WordList>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNameish {
    Flag(bool),
    Level(u64),
}

#[derive(Deserialize)]
struct RawRecord {
    #[serde(default)]
    stop: bool,
    #[serde(default)]
    weak: bool,
    #[serde(default)]
    alternate: Option<OneOrMany<RawAlternate>>,
    #[serde(default)]
    sync: Option<OneOrMany<String>>,
    #[serde(default)]
    nameish: Option<RawNameish>,
}

impl TryFrom<RawRecord> for WordRecord {
    type Error = String;

    fn try_from(raw: RawRecord) -> std::result::Result<Self, Self::Error> {
        let nameish = match raw.nameish {
            None => None,
            Some(RawNameish::Flag(false)) => Some(Nameish::Never),
            Some(RawNameish::Flag(true)) => Some(Nameish::Always),
            Some(RawNameish::Level(0)) => Some(Nameish::Neutral),
            Some(RawNameish::Level(1)) => Some(Nameish::Initial),
            Some(RawNameish::Level(2)) => Some(Nameish::NotLeading),
            Some(RawNameish::Level(n)) => return Err(format!("unknown nameish level {n}")),
        };

        let alternates = raw
            .alternate
            .map(OneOrMany::into_vec)
            .unwrap_or_default()
            .into_iter()
            .map(|alt| match alt {
                RawAlternate::Phrase(phrase) => Alternate::Literal(phrase.to_lowercase()),
                RawAlternate::Guarded {
                    word,
                    requires,
                    if_not,
                } => Alternate::Conditional {
                    phrase: word.to_lowercase(),
                    requires: requires.map(WordList::into_words),
                    excludes: if_not.map(WordList::into_words),
                },
            })
            .collect();

        let sync_groups = raw
            .sync
            .map(OneOrMany::into_vec)
            .unwrap_or_default()
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase())
            .collect();

        Ok(WordRecord {
            is_stop: raw.stop,
            is_weak: raw.weak,
            alternates,
            sync_groups,
            nameish,
        })
    }
}

/// Read-only word classification table.
#[derive(Debug, Clone, Default)]
pub struct WordDictionary {
    records: HashMap<String, WordRecord>,
}

impl WordDictionary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The dictionary shipped in `resources/affiliationmatchers.json`.
    pub fn builtin() -> Self {
        Self::from_json_str(BUILTIN_DICTIONARY).unwrap_or_else(|e| {
            warn!("Built-in affiliation dictionary is invalid: {e:#}");
            Self::empty()
        })
    }

    /// Parse a dictionary document.
    ///
    /// Fails only if the document is not a JSON object; individual malformed
    /// entries are logged and skipped.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: Map<String, Value> =
            serde_json::from_str(json).context("Dictionary is not a JSON object")?;

        let mut records = HashMap::with_capacity(entries.len());
        for (word, value) in entries {
            let parsed = serde_json::from_value::<RawRecord>(value)
                .map_err(|e| e.to_string())
                .and_then(WordRecord::try_from);
            match parsed {
                Ok(record) => {
                    records.insert(word.to_lowercase(), record);
                }
                Err(e) => warn!("Ignoring malformed dictionary entry {word:?}: {e}"),
            }
        }

        Ok(Self { records })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dictionary {:?}", path))?;
        let dictionary = Self::from_json_str(&json)
            .with_context(|| format!("Failed to parse dictionary {:?}", path))?;
        debug!("Loaded {} dictionary words from {:?}", dictionary.len(), path);
        Ok(dictionary)
    }

    /// Load `path`, falling back to an empty dictionary on any failure.
    pub fn load_or_empty(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("{e:#}; continuing with an empty dictionary");
            Self::empty()
        })
    }

    pub fn lookup(&self, word: &str) -> Option<&WordRecord> {
        self.records.get(word)
    }

    pub fn is_stop(&self, word: &str) -> bool {
        self.lookup(word).is_some_and(|r| r.is_stop)
    }

    pub fn is_weak(&self, word: &str) -> bool {
        self.lookup(word).is_some_and(|r| r.is_weak)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Where the dictionary comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionarySource {
    Builtin,
    File(PathBuf),
}

/// Loads the dictionary at most once and hands out shared references.
///
/// Concurrent first callers block on the same initialization; every caller
/// sees the same immutable dictionary afterwards.
#[derive(Debug)]
pub struct DictionaryLoader {
    source: DictionarySource,
    dictionary: OnceLock<Arc<WordDictionary>>,
}

impl DictionaryLoader {
    pub fn new(source: DictionarySource) -> Self {
        Self {
            source,
            dictionary: OnceLock::new(),
        }
    }

    pub fn source(&self) -> &DictionarySource {
        &self.source
    }

    pub fn get(&self) -> Arc<WordDictionary> {
        Arc::clone(self.dictionary.get_or_init(|| {
            Arc::new(match &self.source {
                DictionarySource::Builtin => WordDictionary::builtin(),
                DictionarySource::File(path) => WordDictionary::load_or_empty(path),
            })
        }))
    }
}
