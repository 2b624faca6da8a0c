use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use glob::Pattern;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::to_string_pretty;
use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use authormatch::cli::{Cli, Command};
use authormatch::collaborators::{CollaboratorNormalizer, SplitMode, find_conflicts};
use authormatch::matching::{
    AffiliationClassifier, DictionaryLoader, DictionarySource, Highlighter, WordDictionary,
};
use authormatch::models::{
    AUTHORMATCH_OUTPUT_FORMAT_VERSION, ConflictMatch, ExtraData, Header, Output,
    SystemEnvironment,
};
use authormatch::scanner::{ProcessResult, count, process};
use authormatch::utils::file::read_text_lossy;

fn main() -> std::io::Result<()> {
    env_logger::init();

    if let Err(err) = run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let loader = DictionaryLoader::new(match &cli.dictionary {
        Some(path) => DictionarySource::File(path.clone()),
        None => DictionarySource::Builtin,
    });

    match cli.command {
        Command::Normalize {
            path,
            output_file,
            lettered,
            max_depth,
            exclude,
        } => run_normalize(&loader, &path, &output_file, split_mode(lettered), max_depth, &exclude),
        Command::Conflicts {
            collaborators,
            authors,
            output_file,
            lettered,
        } => run_conflicts(&loader, &collaborators, &authors, &output_file, split_mode(lettered)),
        Command::Classify { texts } => {
            let dictionary = loader.get();
            let classifier = AffiliationClassifier::new(&dictionary);
            for text in texts {
                let verdict = if classifier.looks_like_affiliation(&text, false) {
                    "affiliation"
                } else {
                    "name"
                };
                println!("{}\t{}", verdict, text);
            }
            Ok(())
        }
    }
}

fn split_mode(lettered: bool) -> SplitMode {
    if lettered {
        SplitMode::Lettered
    } else {
        SplitMode::Plain
    }
}

fn run_normalize(
    loader: &DictionaryLoader,
    path: &str,
    output_file: &str,
    mode: SplitMode,
    max_depth: usize,
    exclude: &[String],
) -> anyhow::Result<()> {
    let start_time = Utc::now();

    let exclude_patterns = compile_exclude_patterns(exclude);
    println!("Exclusion patterns: {:?}", exclude);

    let totals = count(path, max_depth, &exclude_patterns)
        .with_context(|| format!("Failed to walk {}", path))?;
    println!(
        "Found {} files in {} directories ({} items excluded)",
        totals.files, totals.directories, totals.excluded
    );

    let dictionary = loader.get();
    let normalizer = CollaboratorNormalizer::new(Arc::clone(&dictionary));

    let progress_bar = create_progress_bar(totals.files)?;
    let result = process(
        path,
        max_depth,
        Arc::clone(&progress_bar),
        &exclude_patterns,
        &normalizer,
        mode,
    )?;
    progress_bar.finish_with_message("Normalization complete!");

    let end_time = Utc::now();
    let output = create_output(
        "normalize",
        start_time,
        end_time,
        result,
        Vec::new(),
        totals.directories,
        loader,
        &dictionary,
    );
    write_output(output_file, &output)?;

    println!("JSON output written to {}", output_file);
    Ok(())
}

fn run_conflicts(
    loader: &DictionaryLoader,
    collaborators: &Path,
    authors: &Path,
    output_file: &str,
    mode: SplitMode,
) -> anyhow::Result<()> {
    let start_time = Utc::now();

    let collaborator_text = read_text_lossy(collaborators)?;
    let author_text = read_text_lossy(authors)?;

    let dictionary = loader.get();
    let conflicts = find_conflicts(
        &collaborator_text,
        &author_text,
        mode,
        &dictionary,
        &Highlighter::default(),
    );
    println!("Found {} conflicts", conflicts.len());

    let end_time = Utc::now();
    let result = ProcessResult {
        files: Vec::new(),
        excluded_count: 0,
    };
    let output = create_output(
        "conflicts",
        start_time,
        end_time,
        result,
        conflicts,
        0,
        loader,
        &dictionary,
    );
    write_output(output_file, &output)?;

    println!("JSON output written to {}", output_file);
    Ok(())
}

fn compile_exclude_patterns(patterns: &[String]) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|pattern| Pattern::new(pattern).ok())
        .collect()
}

fn create_progress_bar(total_files: usize) -> anyhow::Result<Arc<ProgressBar>> {
    let progress_bar = ProgressBar::new(total_files as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files processed ({eta})")
            .context("Failed to create progress bar style")?
            .progress_chars("#>-"),
    );
    Ok(Arc::new(progress_bar))
}

#[allow(clippy::too_many_arguments)]
fn create_output(
    command: &str,
    start_time: chrono::DateTime<Utc>,
    end_time: chrono::DateTime<Utc>,
    result: ProcessResult,
    conflicts: Vec<ConflictMatch>,
    total_dirs: usize,
    loader: &DictionaryLoader,
    dictionary: &WordDictionary,
) -> Output {
    let duration = (end_time - start_time).num_nanoseconds().unwrap_or(0) as f64 / 1_000_000_000.0;

    let extra_data = ExtraData {
        files_count: result.files.len(),
        directories_count: total_dirs,
        excluded_count: result.excluded_count,
        dictionary: match loader.source() {
            DictionarySource::Builtin => "builtin".to_string(),
            DictionarySource::File(path) => path.display().to_string(),
        },
        dictionary_words: dictionary.len(),
        system_environment: SystemEnvironment {
            operating_system: sys_info::os_type().ok(),
            cpu_architecture: env::consts::ARCH.to_string(),
            platform: format!(
                "{}-{}-{}",
                sys_info::os_type().unwrap_or_else(|_| "unknown".to_string()),
                sys_info::os_release().unwrap_or_else(|_| "unknown".to_string()),
                env::consts::ARCH
            ),
            rust_version: rustc_version_runtime::version().to_string(),
        },
    };

    let errors: Vec<String> = result
        .files
        .iter()
        .flat_map(|file| {
            file.scan_errors
                .iter()
                .map(move |error| format!("{}: {}", file.path, error))
        })
        .collect();

    Output {
        headers: vec![Header {
            tool_name: env!("CARGO_PKG_NAME").to_string(),
            command: command.to_string(),
            start_timestamp: start_time.to_rfc3339(),
            end_timestamp: end_time.to_rfc3339(),
            duration,
            extra_data,
            errors,
            output_format_version: AUTHORMATCH_OUTPUT_FORMAT_VERSION.to_string(),
        }],
        files: result.files,
        conflicts,
    }
}

fn write_output(output_file: &str, output: &Output) -> anyhow::Result<()> {
    let json_output = to_string_pretty(output).context("Failed to serialize output")?;
    let mut file =
        File::create(output_file).with_context(|| format!("Failed to create {}", output_file))?;
    file.write_all(json_output.as_bytes())?;
    Ok(())
}
