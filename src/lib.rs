pub mod cli;
pub mod collaborators;
pub mod matching;
pub mod models;
pub mod scanner;
pub mod utils;

pub use collaborators::{CollaboratorNormalizer, SplitMode, find_conflicts};
pub use matching::{AuthorMatcher, Highlighter, MatchKind, WordDictionary};
pub use models::{ConflictMatch, FileReport, Header, Output, PersonName};
pub use scanner::{ProcessResult, count, process};
