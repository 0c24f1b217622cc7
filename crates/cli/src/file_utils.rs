use std::fs;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use anyhow::Result;
use walkdir::WalkDir;

use crate::model::cli_configuration::CliConfiguration;
use crate::model::config_file::PathConfig;

static STYLESHEET_FILE_EXTENSIONS: &[&str] = &["css", "scss", "less"];

// Read the .gitignore file in a directory and return the lines that are not commented
// or empty.
// We ignore pattern that start with # (comments) or contains ! (cause repositories
// not being included and totally skipped).
pub fn read_files_from_gitignore_internal(path: &PathBuf) -> Result<Vec<String>> {
    if path.exists() {
        let lines: Vec<String> = read_to_string(path)?
            .lines()
            .map(String::from)
            .filter(|v| !v.starts_with('#'))
            .filter(|v| !v.contains('!'))
            .filter(|v| !v.is_empty())
            .collect();
        return Ok(lines);
    }
    Ok(vec![])
}

pub fn read_files_from_gitignore(source_directory: &str) -> Result<Vec<String>> {
    let gitignore_path = Path::new(source_directory).join(".gitignore");
    read_files_from_gitignore_internal(&gitignore_path)
}

/// get the files to analyze from the directory. This function walks the directory
/// to analyze recursively and gets all the files.
/// if passed, subdirectories_to_analyze are subdirectories within the directory.
pub fn get_files(
    directory: &str,
    subdirectories_to_analyze: Vec<String>,
    path_config: &PathConfig,
) -> Result<Vec<PathBuf>> {
    let mut files_to_return: Vec<PathBuf> = vec![];

    // This is the directory that contains the .git files, we do not need to keep them.
    let git_directory = format!("{}/.git", &directory);

    let directories_to_walk: Vec<String> = if !subdirectories_to_analyze.is_empty() {
        subdirectories_to_analyze
            .iter()
            .map(|p| {
                let sd_str = p.as_str();
                let p = Path::new(directory).join(sd_str);
                p.as_os_str().to_str().unwrap().to_string()
            })
            .collect()
    } else {
        vec![directory.to_string()]
    };

    for directory_to_walk in directories_to_walk {
        for entry in WalkDir::new(directory_to_walk.as_str()) {
            let dir_entry = entry?;
            let entry = dir_entry.path();

            // we only include if this is a file and not a symlink
            // we should NEVER follow symlink for security reason (an attacker could then
            // attempt to add a symlink outside the repo and read content outside of the
            // repo with a custom rule.
            let mut should_include = entry.is_file() && !entry.is_symlink();
            let path_buf = entry.to_path_buf();

            let relative_path_str = path_buf
                .strip_prefix(directory)
                .ok()
                .and_then(|p| p.to_str())
                .ok_or_else(|| anyhow::Error::msg("should get the path"))?;

            // check if the path is allowed by the configuration.
            should_include = should_include && path_config.allows_file(relative_path_str);

            // do not include the git directory.
            if entry.starts_with(git_directory.as_str()) {
                should_include = false;
            }

            if should_include {
                files_to_return.push(entry.to_path_buf());
            }
        }
    }
    Ok(files_to_return)
}

/// try to find if one of the subdirectory used to scan a repository is going outside the
/// repository directory. If yes, this is unsafe, scans outside the repository and should
/// not run.
pub fn are_subdirectories_safe(directory_path: &Path, subdirectories: &[String]) -> bool {
    let directory_canonicalized = directory_path
        .canonicalize()
        .expect("cannot canonicalize repository directory");
    return subdirectories.iter().all(|subdirectory| {
        let new_path = directory_path.join(subdirectory).canonicalize();
        match new_path {
            Err(e) => panic!("error when checking directory {}: {}", subdirectory, e),
            Ok(p) => {
                if !p.starts_with(directory_canonicalized.clone()) {
                    return false;
                }
                true
            }
        }
    });
}

// filter the file according to a list of extensions
fn match_extension(path: &Path, extensions: &[&str]) -> bool {
    match path.extension() {
        Some(ext) => match ext.to_str() {
            Some(e) => extensions.contains(&e.to_lowercase().as_str()),
            None => false,
        },
        None => false,
    }
}

// keep only the stylesheets from a list of files.
pub fn filter_stylesheet_files(files: &[PathBuf]) -> Vec<PathBuf> {
    files
        .iter()
        .filter(|p| match_extension(p, STYLESHEET_FILE_EXTENSIONS))
        .cloned()
        .collect()
}

// Minified stylesheets are generated and their comments are not authored by hand,
// so there is nothing actionable to report on them.
pub fn is_minified_file(path: &Path) -> bool {
    match path.file_name().and_then(|p| p.to_str()) {
        Some(name) => {
            let name = name.to_lowercase();
            STYLESHEET_FILE_EXTENSIONS
                .iter()
                .any(|ext| name.ends_with(format!(".min.{}", ext).as_str()))
        }
        None => false,
    }
}

pub fn filter_files_by_size(files: &[PathBuf], configuration: &CliConfiguration) -> Vec<PathBuf> {
    let max_len_bytes = configuration.max_file_size_kb * 1024;
    return files
        .iter()
        .filter(|f| {
            let metadata = fs::metadata(f);
            let too_big = metadata
                .as_ref()
                .map(|x| x.len() > max_len_bytes)
                .unwrap_or(false);

            if configuration.use_debug && too_big {
                eprintln!(
                    "File {} too big (size {} bytes, max size {} kb ({} bytes))",
                    f.display(),
                    &metadata.map(|x| x.len()).unwrap_or(0),
                    configuration.max_file_size_kb,
                    max_len_bytes
                )
            }

            f.is_file() && !too_big
        })
        .cloned()
        .collect();
}
