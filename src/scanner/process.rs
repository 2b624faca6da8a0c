use super::ProcessResult;
use super::walk::list_dir;
use crate::collaborators::{CollaboratorNormalizer, SplitMode};
use crate::models::{FileReport, FileReportBuilder};
use crate::utils::file::{is_path_excluded, read_text_lossy};
use anyhow::Error;
use glob::Pattern;
use indicatif::ProgressBar;
use log::warn;
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Normalize every collaborator file under `path` (or `path` itself if it is
/// a file). Files in one directory are processed in parallel.
pub fn process<P: AsRef<Path>>(
    path: P,
    max_depth: usize,
    progress_bar: Arc<ProgressBar>,
    exclude_patterns: &[Pattern],
    normalizer: &CollaboratorNormalizer,
    mode: SplitMode,
) -> Result<ProcessResult, Error> {
    let path = path.as_ref();

    if is_path_excluded(path, exclude_patterns) {
        return Ok(ProcessResult {
            files: Vec::new(),
            excluded_count: 1,
        });
    }

    if path.is_file() {
        let metadata = fs::metadata(path)?;
        let report = process_file(path, &metadata, normalizer, mode);
        progress_bar.inc(1);
        return Ok(ProcessResult {
            files: vec![report],
            excluded_count: 0,
        });
    }

    let listing = list_dir(path, exclude_patterns)?;
    let mut total_excluded = listing.excluded;

    let mut all_files: Vec<FileReport> = listing
        .files
        .par_iter()
        .map(|(path, metadata)| {
            let report = process_file(path, metadata, normalizer, mode);
            progress_bar.inc(1);
            report
        })
        .collect();

    if max_depth > 0 {
        for path in listing.dirs {
            match process(
                &path,
                max_depth - 1,
                progress_bar.clone(),
                exclude_patterns,
                normalizer,
                mode,
            ) {
                Ok(mut result) => {
                    all_files.append(&mut result.files);
                    total_excluded += result.excluded_count;
                }
                Err(e) => warn!("Error processing directory {}: {}", path.display(), e),
            }
        }
    }

    Ok(ProcessResult {
        files: all_files,
        excluded_count: total_excluded,
    })
}

fn process_file(
    path: &Path,
    metadata: &fs::Metadata,
    normalizer: &CollaboratorNormalizer,
    mode: SplitMode,
) -> FileReport {
    let mut scan_errors: Vec<String> = vec![];
    let mut report_builder = FileReportBuilder::default();

    match read_text_lossy(path) {
        Ok(text) => fill_normalization(&mut report_builder, normalizer.normalize(&text, mode)),
        Err(e) => scan_errors.push(format!("{e:#}")),
    }

    let report = report_builder
        .name(
            path.file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
        )
        .path(path.to_string_lossy().to_string())
        .size(metadata.len())
        .scan_errors(scan_errors)
        .build();

    report.unwrap_or_else(|e| {
        warn!("Incomplete report for {}: {}", path.display(), e);
        FileReport {
            path: path.to_string_lossy().to_string(),
            name: String::new(),
            size: metadata.len(),
            normalized: None,
            entries_count: 0,
            comments_count: 0,
            declared_none: false,
            scan_errors: vec![e],
        }
    })
}

fn fill_normalization(report_builder: &mut FileReportBuilder, normalized: Option<String>) {
    if let Some(text) = &normalized {
        let declared_none = text == "None";
        let comments = text.lines().filter(|l| l.starts_with('#')).count();
        let entries = if declared_none {
            0
        } else {
            text.lines()
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .count()
        };
        report_builder
            .declared_none(declared_none)
            .comments_count(comments)
            .entries_count(entries);
    }
    report_builder.normalized(normalized);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::WordDictionary;
    use tempfile::TempDir;

    fn normalizer() -> CollaboratorNormalizer {
        CollaboratorNormalizer::new(Arc::new(WordDictionary::builtin()))
    }

    #[test]
    fn test_process_directory_tree() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "Jane Doe, MIT\n# note\nStanford University\n").unwrap();
        fs::write(dir.path().join("b.txt"), "none\n").unwrap();
        fs::write(dir.path().join("skip.bak"), "x").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.txt"), "").unwrap();

        let excludes = vec![Pattern::new("*.bak").unwrap()];
        let result = process(
            dir.path(),
            5,
            Arc::new(ProgressBar::hidden()),
            &excludes,
            &normalizer(),
            SplitMode::Plain,
        )
        .unwrap();

        assert_eq!(result.excluded_count, 1);
        assert_eq!(result.files.len(), 3);

        let a = &result.files[0];
        assert_eq!(a.name, "a.txt");
        assert_eq!(
            a.normalized.as_deref(),
            Some("Jane Doe (MIT)\n# note\nAll (Stanford University)")
        );
        assert_eq!(a.entries_count, 2);
        assert_eq!(a.comments_count, 1);

        let b = &result.files[1];
        assert!(b.declared_none);
        assert_eq!(b.entries_count, 0);

        let c = &result.files[2];
        assert_eq!(c.name, "c.txt");
        assert_eq!(c.normalized, None);
    }

    #[test]
    fn test_max_depth_zero_skips_subdirectories() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "Jane Doe (MIT)").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.txt"), "John Smith (CMU)").unwrap();

        let result = process(
            dir.path(),
            0,
            Arc::new(ProgressBar::hidden()),
            &[],
            &normalizer(),
            SplitMode::Plain,
        )
        .unwrap();
        assert_eq!(result.files.len(), 1);
    }

    #[test]
    fn test_process_single_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("list.txt");
        fs::write(&file, "Jane Doe (MIT) John Smith (Stanford) Ann Lee (CMU)").unwrap();

        let result = process(
            &file,
            0,
            Arc::new(ProgressBar::hidden()),
            &[],
            &normalizer(),
            SplitMode::Lettered,
        )
        .unwrap();
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].entries_count, 3);
    }
}
