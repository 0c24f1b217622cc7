use comments_core::rule::RuleSeverity;
use globset::{GlobBuilder, GlobMatcher};
use indexmap::IndexMap;
use std::borrow::Borrow;
use std::fmt;
use std::path::{Path, PathBuf};

// A pattern for an 'only' or 'ignore' field. The 'glob' field contains a precompiled glob pattern,
// while the 'prefix' field contains a path prefix.
#[derive(Debug, Default, Clone)]
pub struct PathPattern {
    pub glob: Option<GlobMatcher>,
    pub prefix: PathBuf,
}

// Lists of directories and glob patterns to include/exclude from the analysis.
#[derive(Debug, PartialEq, Default, Clone)]
pub struct PathConfig {
    // Analyze only these directories and patterns.
    pub only: Option<Vec<PathPattern>>,
    // Do not analyze any of these directories and patterns.
    pub ignore: Vec<PathPattern>,
}

// Configuration for a single rule.
#[derive(Debug, PartialEq, Clone)]
pub struct RuleConfig {
    // Do not run this rule when false.
    pub enabled: bool,
    // Override this rule's severity.
    pub severity: Option<RuleSeverity>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        RuleConfig {
            enabled: true,
            severity: None,
        }
    }
}

// The parsed configuration file.
#[derive(Debug, PartialEq, Default, Clone)]
pub struct ConfigFile {
    // Configurations for the rules.
    pub rules: IndexMap<String, RuleConfig>,
    // Paths to include/exclude from analysis.
    pub paths: PathConfig,
    // Ignore all the paths in the .gitignore file.
    pub ignore_gitignore: Option<bool>,
    // Analyze only files up to this size.
    pub max_file_size_kb: Option<u64>,
    // Do not analyze minified files.
    pub ignore_minified_files: Option<bool>,
}

impl fmt::Display for ConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl PathPattern {
    pub fn matches(&self, path: &str) -> bool {
        self.glob
            .as_ref()
            .map(|g| g.is_match(path))
            .unwrap_or(false)
            || Path::new(path).starts_with(&self.prefix)
    }
}

impl From<String> for PathPattern {
    fn from(value: String) -> Self {
        PathPattern {
            glob: GlobBuilder::new(&value)
                .literal_separator(true)
                .empty_alternates(true)
                .backslash_escape(true)
                .build()
                .map(|g| g.compile_matcher())
                .ok(),
            prefix: PathBuf::from(value),
        }
    }
}

impl Borrow<str> for PathPattern {
    fn borrow(&self) -> &str {
        self.prefix.to_str().unwrap_or("")
    }
}

impl From<PathPattern> for String {
    fn from(value: PathPattern) -> Self {
        value.prefix.display().to_string()
    }
}

impl PartialEq for PathPattern {
    fn eq(&self, other: &Self) -> bool {
        self.prefix.eq(&other.prefix)
    }
}

impl PathConfig {
    pub fn allows_file(&self, file_name: &str) -> bool {
        !self.ignore.iter().any(|pattern| pattern.matches(file_name))
            && match &self.only {
                None => true,
                Some(only) => only.iter().any(|pattern| pattern.matches(file_name)),
            }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_pattern_matches_globs_and_prefixes() {
        let glob = PathPattern::from("src/**/*.css".to_string());
        assert!(glob.matches("src/pages/home.css"));
        assert!(!glob.matches("lib/pages/home.css"));

        // a pattern without glob metacharacters still matches as a prefix
        let prefix = PathPattern::from("vendor".to_string());
        assert!(prefix.matches("vendor/reset.css"));
        assert!(!prefix.matches("src/vendor.css"));
    }

    #[test]
    fn glob_separators_are_literal() {
        let pattern = PathPattern::from("*.scss".to_string());
        assert!(pattern.matches("theme.scss"));
        assert!(!pattern.matches("nested/theme.scss"));
    }

    #[test]
    fn path_config_combines_only_and_ignore() {
        let config = PathConfig {
            only: Some(vec![PathPattern::from("src".to_string())]),
            ignore: vec![PathPattern::from("src/generated".to_string())],
        };
        assert!(config.allows_file("src/main.css"));
        assert!(!config.allows_file("src/generated/tokens.css"));
        assert!(!config.allows_file("docs/main.css"));

        // without an 'only' list, everything not ignored is allowed
        let config = PathConfig {
            only: None,
            ignore: vec![PathPattern::from("dist".to_string())],
        };
        assert!(config.allows_file("anything/at/all.scss"));
        assert!(!config.allows_file("dist/bundle.css"));
    }
}
