use derive_builder::Builder;
use serde::Serialize;

use crate::matching::MatchKind;

pub const AUTHORMATCH_OUTPUT_FORMAT_VERSION: &str = "1.0.0";

#[derive(Serialize, Debug)]
pub struct Output {
    pub headers: Vec<Header>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<ConflictMatch>,
}

#[derive(Serialize, Debug)]
pub struct Header {
    pub tool_name: String,
    pub command: String,
    pub start_timestamp: String,
    pub end_timestamp: String,
    pub duration: f64,
    pub extra_data: ExtraData,
    pub errors: Vec<String>,
    pub output_format_version: String,
}

#[derive(Serialize, Debug)]
pub struct ExtraData {
    pub files_count: usize,
    pub directories_count: usize,
    pub excluded_count: usize,
    pub dictionary: String,
    pub dictionary_words: usize,
    pub system_environment: SystemEnvironment,
}

#[derive(Serialize, Debug)]
pub struct SystemEnvironment {
    pub operating_system: Option<String>,
    pub cpu_architecture: String,
    pub platform: String,
    pub rust_version: String,
}

/// Normalization result for one collaborator file.
#[derive(Debug, Clone, Builder, Serialize)]
#[builder(build_fn(skip))]
pub struct FileReport {
    pub path: String,
    pub name: String,
    pub size: u64,
    /// Canonical text; absent when the file held nothing at all.
    #[builder(default)]
    pub normalized: Option<String>,
    #[builder(default)]
    pub entries_count: usize,
    #[builder(default)]
    pub comments_count: usize,
    /// The file only said "none".
    #[builder(default)]
    pub declared_none: bool,
    #[builder(default)]
    pub scan_errors: Vec<String>,
}

impl FileReportBuilder {
    pub fn build(&self) -> Result<FileReport, String> {
        Ok(FileReport {
            path: self.path.clone().ok_or("Missing field: path")?,
            name: self.name.clone().ok_or("Missing field: name")?,
            size: self.size.unwrap_or_default(),
            normalized: self.normalized.clone().flatten(),
            entries_count: self.entries_count.unwrap_or_default(),
            comments_count: self.comments_count.unwrap_or_default(),
            declared_none: self.declared_none.unwrap_or_default(),
            scan_errors: self.scan_errors.clone().unwrap_or_default(),
        })
    }
}

/// One author line that matched a collaborator entry.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ConflictMatch {
    pub author: String,
    pub collaborator: String,
    pub kind: MatchKind,
    pub highlighted: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_report_builder_requires_path() {
        let err = FileReportBuilder::default().name("a.txt".to_string()).build();
        assert_eq!(err.unwrap_err(), "Missing field: path");
    }

    #[test]
    fn test_file_report_builder_defaults() {
        let report = FileReportBuilder::default()
            .path("lists/a.txt".to_string())
            .name("a.txt".to_string())
            .build()
            .unwrap();
        assert_eq!(report.size, 0);
        assert_eq!(report.normalized, None);
        assert!(!report.declared_none);
        assert!(report.scan_errors.is_empty());
    }

    #[test]
    fn test_empty_sections_are_not_serialized() {
        let output = Output {
            headers: Vec::new(),
            files: Vec::new(),
            conflicts: Vec::new(),
        };
        assert_eq!(serde_json::to_string(&output).unwrap(), r#"{"headers":[]}"#);
    }

    #[test]
    fn test_conflict_kind_serializes_snake_case() {
        let conflict = ConflictMatch {
            author: "Jane Doe (MIT)".to_string(),
            collaborator: "All (MIT)".to_string(),
            kind: MatchKind::Affiliation,
            highlighted: "Jane Doe ([MIT])".to_string(),
        };
        let json = serde_json::to_value(&conflict).unwrap();
        assert_eq!(json["kind"], "affiliation");
    }
}
