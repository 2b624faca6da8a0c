use crate::utils::file::is_path_excluded;
use glob::Pattern;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

/// One directory level, split into files and subdirectories, both sorted by
/// path. Unreadable entries are skipped.
pub(super) struct Listing {
    pub files: Vec<(PathBuf, Metadata)>,
    pub dirs: Vec<PathBuf>,
    pub excluded: usize,
}

pub(super) fn list_dir(dir: &Path, exclude_patterns: &[Pattern]) -> io::Result<Listing> {
    let mut listing = Listing {
        files: Vec::new(),
        dirs: Vec::new(),
        excluded: 0,
    };

    for path in fs::read_dir(dir)?.filter_map(Result::ok).map(|e| e.path()) {
        if is_path_excluded(&path, exclude_patterns) {
            listing.excluded += 1;
            continue;
        }
        match fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => listing.files.push((path, metadata)),
            Ok(metadata) if metadata.is_dir() => listing.dirs.push(path),
            _ => {}
        }
    }

    listing.files.sort_by(|a, b| a.0.cmp(&b.0));
    listing.dirs.sort();
    Ok(listing)
}

/// Totals for a walk: `(files, directories, excluded)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkTotals {
    pub files: usize,
    pub directories: usize,
    pub excluded: usize,
}

/// Tally what [`process`](super::process) will visit under `path` with the
/// same depth limit and exclusions, so the progress bar has a length.
pub fn count<P: AsRef<Path>>(
    path: P,
    max_depth: usize,
    exclude_patterns: &[Pattern],
) -> io::Result<WalkTotals> {
    let path = path.as_ref();
    if is_path_excluded(path, exclude_patterns) {
        return Ok(WalkTotals {
            excluded: 1,
            ..WalkTotals::default()
        });
    }
    if path.is_file() {
        return Ok(WalkTotals {
            files: 1,
            ..WalkTotals::default()
        });
    }

    let listing = list_dir(path, exclude_patterns)?;
    let mut totals = WalkTotals {
        files: listing.files.len(),
        directories: 1 + listing.dirs.len(),
        excluded: listing.excluded,
    };
    if max_depth > 0 {
        for dir in &listing.dirs {
            let nested = count(dir, max_depth - 1, exclude_patterns)?;
            totals.files += nested.files;
            // `dir` itself was already tallied above.
            totals.directories += nested.directories - 1;
            totals.excluded += nested.excluded;
        }
    }
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{CollaboratorNormalizer, SplitMode};
    use crate::matching::WordDictionary;
    use indicatif::ProgressBar;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn committee_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "None").unwrap();
        fs::write(dir.path().join("a.txt"), "Jane Doe (MIT)").unwrap();
        fs::write(dir.path().join("old.bak"), "").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.txt"), "All (CMU)").unwrap();
        dir
    }

    #[test]
    fn test_list_dir_sorts_and_excludes() {
        let dir = committee_tree();
        let excludes = vec![Pattern::new("*.bak").unwrap()];
        let listing = list_dir(dir.path(), &excludes).unwrap();
        let names: Vec<_> = listing
            .files
            .iter()
            .map(|(p, _)| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
        assert_eq!(listing.dirs, vec![dir.path().join("nested")]);
        assert_eq!(listing.excluded, 1);
    }

    #[test]
    fn test_count_respects_depth_and_exclusions() {
        let dir = committee_tree();
        let excludes = vec![Pattern::new("*.bak").unwrap()];
        let deep = count(dir.path(), 5, &excludes).unwrap();
        assert_eq!((deep.files, deep.directories, deep.excluded), (3, 2, 1));
        let shallow = count(dir.path(), 0, &excludes).unwrap();
        assert_eq!((shallow.files, shallow.directories, shallow.excluded), (2, 2, 1));
    }

    #[test]
    fn test_count_single_file_and_excluded_root() {
        let dir = committee_tree();
        let file = dir.path().join("a.txt");
        assert_eq!(count(&file, 0, &[]).unwrap().files, 1);
        let excludes = vec![Pattern::new("a.txt").unwrap()];
        assert_eq!(count(&file, 0, &excludes).unwrap().excluded, 1);
    }

    #[test]
    fn test_count_agrees_with_process() {
        let dir = committee_tree();
        let excludes = vec![Pattern::new("*.bak").unwrap()];
        let normalizer = CollaboratorNormalizer::new(Arc::new(WordDictionary::builtin()));
        for depth in [0, 5] {
            let totals = count(dir.path(), depth, &excludes).unwrap();
            let result = crate::scanner::process(
                dir.path(),
                depth,
                Arc::new(ProgressBar::hidden()),
                &excludes,
                &normalizer,
                SplitMode::Plain,
            )
            .unwrap();
            assert_eq!(totals.files, result.files.len());
            assert_eq!(totals.excluded, result.excluded_count);
        }
    }
}
