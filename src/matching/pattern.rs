//! Regex primitives for name and affiliation patterns.
//!
//! Every pattern is compiled twice from the same atoms:
//! - an ASCII variant (ASCII word boundaries), run directly on ASCII text;
//! - a folded variant (Unicode word boundaries), run on accent-folded,
//!   lowercased text when the input has non-ASCII characters.
//!
//! The `regex` crate has no lookaround, so an abbreviated initial ("J.")
//! consumes its period, and "every word appears somewhere" is a
//! [`Conjunction`] of single-word patterns rather than a chain of lookaheads.

use std::ops::Range;

use log::warn;
use regex::Regex;

use crate::utils::text::{FoldedText, deaccent};

/// Which text a compiled variant runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corpus {
    Ascii,
    Folded,
}

impl Corpus {
    pub fn boundary(self) -> &'static str {
        match self {
            Corpus::Ascii => r"(?-u:\b)",
            Corpus::Folded => r"\b",
        }
    }
}

/// One alternative inside a word alternation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternAtom {
    /// A whole word.
    Word(String),
    /// A word prefix followed by any letters ("j" matches "john").
    Prefix(String),
    /// An abbreviated initial: the letter followed by a period.
    Initial(String),
}

impl PatternAtom {
    fn render(&self, corpus: Corpus) -> String {
        let b = corpus.boundary();
        match self {
            PatternAtom::Word(w) => format!("{}{b}", regex::escape(w)),
            PatternAtom::Prefix(p) => format!("{}[a-z]*{b}", regex::escape(p)),
            PatternAtom::Initial(i) => format!(r"{}\.", regex::escape(i)),
        }
    }
}

fn render_alternation(atoms: &[PatternAtom], corpus: Corpus) -> String {
    let body = atoms
        .iter()
        .map(|a| a.render(corpus))
        .collect::<Vec<_>>()
        .join("|");
    format!("(?i){}(?:{body})", corpus.boundary())
}

pub(crate) fn compile(source: &str) -> Option<Regex> {
    match Regex::new(source) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("Failed to compile pattern {source:?}: {e}");
            None
        }
    }
}

/// An ASCII/folded pair of compiled patterns.
#[derive(Debug, Clone)]
pub struct PatternPair {
    raw: Regex,
    utf8: Regex,
}

impl PatternPair {
    /// Compile a word-boundary-delimited alternation of `atoms`.
    ///
    /// Returns `None` for an empty atom list.
    pub fn alternation(atoms: &[PatternAtom]) -> Option<Self> {
        if atoms.is_empty() {
            return None;
        }
        Some(Self {
            raw: compile(&render_alternation(atoms, Corpus::Ascii))?,
            utf8: compile(&render_alternation(atoms, Corpus::Folded))?,
        })
    }

    /// Combine several pairs into one alternation.
    pub fn merge(pairs: &[&PatternPair]) -> Option<Self> {
        if pairs.is_empty() {
            return None;
        }
        let join = |select: fn(&PatternPair) -> &Regex| {
            pairs
                .iter()
                .map(|p| format!("(?:{})", select(p).as_str()))
                .collect::<Vec<_>>()
                .join("|")
        };
        Some(Self {
            raw: compile(&join(|p| &p.raw))?,
            utf8: compile(&join(|p| &p.utf8))?,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        if text.is_ascii() {
            self.raw.is_match(text)
        } else {
            self.utf8.is_match(&deaccent(text))
        }
    }

    /// Byte ranges of every match, as offsets into `text`.
    pub fn find_spans(&self, text: &str) -> Vec<Range<usize>> {
        if text.is_ascii() {
            self.raw.find_iter(text).map(|m| m.range()).collect()
        } else {
            let folded = FoldedText::new(text);
            self.utf8
                .find_iter(&folded.text)
                .map(|m| folded.original_range(m.range()))
                .collect()
        }
    }

    pub fn as_str(&self, corpus: Corpus) -> &str {
        match corpus {
            Corpus::Ascii => self.raw.as_str(),
            Corpus::Folded => self.utf8.as_str(),
        }
    }
}

/// Matches text containing every word, in any order.
#[derive(Debug, Clone)]
pub struct Conjunction {
    words: Vec<PatternPair>,
}

impl Conjunction {
    pub fn new<S: AsRef<str>>(words: &[S]) -> Option<Self> {
        if words.is_empty() {
            return None;
        }
        let words = words
            .iter()
            .map(|w| PatternPair::alternation(&[PatternAtom::Word(w.as_ref().to_string())]))
            .collect::<Option<Vec<_>>>()?;
        Some(Self { words })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.words.iter().all(|w| w.is_match(text))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
