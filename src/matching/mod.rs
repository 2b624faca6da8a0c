//! Fuzzy author and affiliation matching.
//!
//! A [`WordDictionary`] classifies words, [`PatternBuilder`] turns a
//! [`PersonName`](crate::models::PersonName) into compiled patterns, and
//! [`AuthorMatcher`] tests candidates and reports mentions for highlighting.

mod affiliation;
mod builder;
pub mod dictionary;
mod highlight;
mod matcher;
pub mod pattern;
mod types;

pub use affiliation::AffiliationClassifier;
pub use builder::{AffiliationMatcher, CompiledMatcher, PatternBuilder};
pub use dictionary::{
    Alternate, DictionaryLoader, DictionarySource, Nameish, WordDictionary, WordRecord,
};
pub use highlight::Highlighter;
pub use matcher::AuthorMatcher;
pub use pattern::{Conjunction, PatternAtom, PatternPair};
pub use types::{HighlightMarkup, MatchKind};
