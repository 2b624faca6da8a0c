//! Golden tests for collaborator normalization.
//!
//! Each `testdata/collaborators-golden/<name>.txt` input is normalized and
//! compared with `<name>.txt.expected`. Inputs whose name starts with
//! `lettered-` use [`SplitMode::Lettered`]. An empty expected file means the
//! input normalizes to nothing.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use crate::collaborators::{CollaboratorNormalizer, SplitMode};
    use crate::matching::WordDictionary;

    const GOLDEN_DIR: &str = "testdata/collaborators-golden";

    fn find_inputs(dir: &Path) -> Vec<PathBuf> {
        let mut inputs: Vec<PathBuf> = match fs::read_dir(dir) {
            Ok(entries) => entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
                .collect(),
            Err(_) => Vec::new(),
        };
        inputs.sort();
        inputs
    }

    fn mode_for(path: &Path) -> SplitMode {
        let lettered = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with("lettered-"));
        if lettered {
            SplitMode::Lettered
        } else {
            SplitMode::Plain
        }
    }

    #[test]
    fn test_collaborators_golden() {
        let dir = PathBuf::from(GOLDEN_DIR);
        let inputs = find_inputs(&dir);
        if inputs.is_empty() {
            eprintln!("Skipping golden test: no inputs in {}", GOLDEN_DIR);
            return;
        }

        let normalizer = CollaboratorNormalizer::new(Arc::new(WordDictionary::builtin()));
        let mut failures = Vec::new();

        for input_path in &inputs {
            let expected_path = PathBuf::from(format!("{}.expected", input_path.display()));
            let input = fs::read_to_string(input_path).expect("Failed to read golden input");
            let expected = fs::read_to_string(&expected_path)
                .unwrap_or_else(|e| panic!("Missing {:?}: {}", expected_path, e));

            let actual = normalizer
                .normalize(&input, mode_for(input_path))
                .unwrap_or_default();
            if actual.trim_end() != expected.trim_end() {
                failures.push(format!(
                    "{}\n--- expected\n{}\n--- actual\n{}",
                    input_path.display(),
                    expected.trim_end(),
                    actual
                ));
            }
        }

        println!(
            "Collaborator golden tests: {}/{} passed",
            inputs.len() - failures.len(),
            inputs.len()
        );
        assert!(failures.is_empty(), "Golden mismatches:\n\n{}", failures.join("\n\n"));
    }
}
