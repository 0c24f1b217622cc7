use crate::constants;
use crate::model::config_file::{ConfigFile, PathConfig, PathPattern, RuleConfig};
use anyhow::{anyhow, Context, Result};
use comments_core::rule::RuleSeverity;
use indexmap::IndexMap;
use serde::de::{Error, Unexpected};
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::Read;
use std::path::Path;

fn get_config_file(path: &str) -> Result<Option<File>> {
    let yml_file_path = Path::new(path).join(format!(
        "{}.yml",
        constants::DATADOG_CONFIG_FILE_WITHOUT_PREFIX
    ));
    let yaml_file_path = Path::new(path).join(format!(
        "{}.yaml",
        constants::DATADOG_CONFIG_FILE_WITHOUT_PREFIX
    ));

    // first, comment-analysis.datadog.yml
    match File::open(yml_file_path) {
        Ok(f) => Ok(Some(f)),
        Err(e1) if e1.kind() == std::io::ErrorKind::NotFound => {
            // second, comment-analysis.datadog.yaml
            match File::open(yaml_file_path) {
                Ok(f) => Ok(Some(f)),
                Err(e2) if e2.kind() == std::io::ErrorKind::NotFound => Ok(None),
                _ => Err(anyhow!("cannot open config file")),
            }
        }
        _ => Err(anyhow!("cannot open config file")),
    }
}

// We first try to read comment-analysis.datadog.yml
// If it fails, we try to read comment-analysis.datadog.yaml
// If the file does not exist, we return a Ok(None).
// If there is an error reading the file, we return a failure
pub fn read_config_file(path: &str) -> Result<Option<ConfigFile>> {
    if let Some(mut file) = get_config_file(path)? {
        let mut contents = String::new();

        let size_read = file
            .read_to_string(&mut contents)
            .context("error when reading the configuration file")?;
        if size_read == 0 {
            return Err(anyhow!("the config file is empty"));
        }
        parse_config_file(&contents).map(Some)
    } else {
        Ok(None)
    }
}

// Parses the configuration from a YAML string.
pub fn parse_config_file(config_contents: &str) -> Result<ConfigFile> {
    let yaml_config: YamlConfigFile = serde_yaml::from_str(config_contents)?;
    Ok(yaml_config.into())
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct YamlConfigFile {
    #[serde(default)]
    schema_version: SchemaVersion,
    // A rule configured with no body keeps its defaults.
    #[serde(default)]
    rules: IndexMap<String, Option<YamlRuleConfig>>,
    #[serde(flatten)]
    paths: YamlPathConfig,
    ignore_gitignore: Option<bool>,
    max_file_size_kb: Option<u64>,
    ignore_minified_files: Option<bool>,
}

// A marker for the schema version.
// No content because it's only deserialized if the schema version is correct.
#[derive(Default)]
struct SchemaVersion {}

// An 'only'/'ignore' configuration.
#[derive(Deserialize, Default, PartialEq)]
struct YamlPathConfig {
    #[serde(default)]
    only: Option<Vec<String>>,
    #[serde(default)]
    ignore: Vec<String>,
}

// A configuration for a rule. Unknown fields are rejected to catch typos in
// the rule options.
#[derive(Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
struct YamlRuleConfig {
    enabled: Option<bool>,
    severity: Option<RuleSeverity>,
}

const SCHEMA_VERSION: &str = "v1";

// Deserializer for the schema version.
// It requires the field to contain the SCHEMA_VERSION string and returns a marker if so.
impl<'de> Deserialize<'de> for SchemaVersion {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match String::deserialize(deserializer)?.as_str() {
            SCHEMA_VERSION => Ok(SchemaVersion {}),
            v => Err(Error::invalid_value(
                Unexpected::Str(v),
                &format!("\"{}\"", SCHEMA_VERSION).as_str(),
            )),
        }
    }
}

impl From<YamlConfigFile> for ConfigFile {
    fn from(value: YamlConfigFile) -> Self {
        ConfigFile {
            rules: value
                .rules
                .into_iter()
                .map(|(name, cfg)| (name, cfg.unwrap_or_default().into()))
                .collect(),
            paths: value.paths.into(),
            ignore_gitignore: value.ignore_gitignore,
            max_file_size_kb: value.max_file_size_kb,
            ignore_minified_files: value.ignore_minified_files,
        }
    }
}

impl From<YamlRuleConfig> for RuleConfig {
    fn from(value: YamlRuleConfig) -> Self {
        RuleConfig {
            enabled: value.enabled.unwrap_or(true),
            severity: value.severity,
        }
    }
}

impl From<YamlPathConfig> for PathConfig {
    fn from(value: YamlPathConfig) -> Self {
        PathConfig {
            only: value
                .only
                .map(|v| v.into_iter().map(PathPattern::from).collect()),
            ignore: value.ignore.into_iter().map(PathPattern::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_full_config() {
        let data = r#"
schema-version: v1
rules:
  comment-no-empty:
    severity: NOTICE
  comment-own-line:
    enabled: false
  comment-whitespace-inside:
only:
  - src
ignore:
  - "**/vendor/**"
ignore-gitignore: true
max-file-size-kb: 100
ignore-minified-files: false
    "#;
        let expected = ConfigFile {
            rules: IndexMap::from([
                (
                    "comment-no-empty".to_string(),
                    RuleConfig {
                        enabled: true,
                        severity: Some(RuleSeverity::Notice),
                    },
                ),
                (
                    "comment-own-line".to_string(),
                    RuleConfig {
                        enabled: false,
                        severity: None,
                    },
                ),
                (
                    "comment-whitespace-inside".to_string(),
                    RuleConfig::default(),
                ),
            ]),
            paths: PathConfig {
                only: Some(vec!["src".to_string().into()]),
                ignore: vec!["**/vendor/**".to_string().into()],
            },
            ignore_gitignore: Some(true),
            max_file_size_kb: Some(100),
            ignore_minified_files: Some(false),
        };

        let res = parse_config_file(data);
        assert_eq!(expected, res.unwrap());
    }

    #[test]
    fn test_parse_config_without_rules() {
        let data = r#"
schema-version: v1
ignore:
  - dist
    "#;
        let res = parse_config_file(data).unwrap();
        assert!(res.rules.is_empty());
        assert_eq!(
            res.paths.ignore,
            vec![PathPattern::from("dist".to_string())]
        );
    }

    #[test]
    fn test_schema_version_must_match() {
        let data = r#"
schema-version: v2
rules:
  comment-no-empty:
    "#;
        assert!(parse_config_file(data).is_err());

        // the schema version may be omitted entirely
        let data = r#"
rules:
  comment-no-empty:
    "#;
        assert!(parse_config_file(data).is_ok());
    }

    #[test]
    fn test_unknown_rule_options_are_rejected() {
        let data = r#"
rules:
  comment-no-empty:
    severty: ERROR
    "#;
        assert!(parse_config_file(data).is_err());
    }

    #[test]
    fn test_read_config_file_with_yaml_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().to_str().unwrap();

        // no file at all
        assert!(read_config_file(path).unwrap().is_none());

        // the .yaml extension is picked up when .yml is absent
        fs::write(
            dir.path().join("comment-analysis.datadog.yaml"),
            "rules:\n  comment-own-line:\n",
        )
        .unwrap();
        let config = read_config_file(path).unwrap().unwrap();
        assert!(config.rules.contains_key("comment-own-line"));

        // the .yml extension takes precedence
        fs::write(
            dir.path().join("comment-analysis.datadog.yml"),
            "rules:\n  comment-no-empty:\n",
        )
        .unwrap();
        let config = read_config_file(path).unwrap().unwrap();
        assert!(config.rules.contains_key("comment-no-empty"));
    }

    #[test]
    fn test_read_config_file_empty_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("comment-analysis.datadog.yml"), "").unwrap();
        assert!(read_config_file(dir.path().to_str().unwrap()).is_err());
    }
}
