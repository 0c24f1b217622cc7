use cli::file_utils::is_minified_file;
use cli::model::cli_configuration::CliConfiguration;
use comments_core::rule::RuleSeverity;
use comments_core::{Engine, FileAnalysis};
use common::analysis_options::AnalysisOptions;
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a file and if the file has some invalid UTF-8 characters, it returns a string with invalid
/// characters.
pub fn read_file(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path).map_err(|e| anyhow::anyhow!("cannot read file: {}", e))?;
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            Ok(String::from_utf8_lossy(&bytes).to_string())
        }
    }
}

/// Run the comment rules over all the files, in parallel. Filenames in the
/// returned analyses are relative to the source directory.
pub fn comment_analysis(
    engine: &Engine,
    config: &CliConfiguration,
    options: &AnalysisOptions,
    files_to_analyze: &[PathBuf],
) -> Vec<FileAnalysis> {
    let directory_path = Path::new(config.source_directory.as_str());

    // we only use the progress bar when the debug mode is not active, otherwise, it puts
    // too much information on the screen.
    let progress_bar = if !config.use_debug {
        Some(ProgressBar::new(files_to_analyze.len() as u64))
    } else {
        None
    };

    let mut analyses = files_to_analyze
        .into_par_iter()
        .fold(
            Vec::new,
            |mut fold_results: Vec<FileAnalysis>, path| {
                if options.ignore_minified_files && is_minified_file(path) {
                    if options.log_output {
                        eprintln!("skipping minified file {}", path.display());
                    }
                    if let Some(pb) = &progress_bar {
                        pb.inc(1);
                    }
                    return fold_results;
                }

                let relative_path = path
                    .strip_prefix(directory_path)
                    .expect("cannot strip prefix from path")
                    .to_str()
                    .expect("path contains non-Unicode characters");

                match read_file(path) {
                    Ok(file_content) => {
                        let analysis = engine.analyze(relative_path, &file_content);
                        tracing::debug!(
                            "analyzed {} ({} comments) in {} ms",
                            relative_path,
                            analysis.comment_count,
                            analysis.execution_time_ms
                        );
                        fold_results.push(analysis);
                    }
                    Err(_) => {
                        // this is generally because the file is binary.
                        if options.log_output {
                            eprintln!("error when getting content of path {}", path.display());
                        }
                    }
                }

                if let Some(pb) = &progress_bar {
                    pb.inc(1);
                }
                fold_results
            },
        )
        .reduce(Vec::new, |mut base, other| {
            base.extend(other);
            base
        });

    if let Some(pb) = &progress_bar {
        pb.finish();
    }

    // the fold order depends on the thread scheduling, keep the report stable
    analyses.sort_by(|a, b| a.filename.cmp(&b.filename));
    analyses
}

pub fn count_violations_by_severities(
    analyses: &[FileAnalysis],
    severities: &[RuleSeverity],
) -> usize {
    analyses
        .iter()
        .map(|analysis| {
            analysis
                .violations
                .iter()
                .filter(|violation| severities.contains(&violation.severity))
                .count()
        })
        .sum()
}
