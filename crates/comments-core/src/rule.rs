// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License, Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2024 Datadog, Inc.

use crate::common::ByteSpan;
use crate::record::Comment;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A unique id that identifies a comment-style rule.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct RuleId(pub Arc<str>);

impl From<&str> for RuleId {
    fn from(value: &str) -> Self {
        Self(Arc::from(value))
    }
}

impl From<String> for RuleId {
    fn from(value: String) -> Self {
        Self(Arc::from(value.as_str()))
    }
}

impl AsRef<str> for RuleId {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Copy, Clone, Deserialize, Debug, Serialize, Eq, PartialEq)]
pub enum RuleSeverity {
    #[serde(rename = "ERROR")]
    Error,
    #[serde(rename = "WARNING")]
    Warning,
    #[serde(rename = "NOTICE")]
    Notice,
    #[serde(rename = "NONE")]
    None,
}

impl TryFrom<&str> for RuleSeverity {
    type Error = &'static str;

    fn try_from(s: &str) -> Result<Self, &'static str> {
        match s.to_lowercase().as_str() {
            "error" => Ok(RuleSeverity::Error),
            "warning" => Ok(RuleSeverity::Warning),
            "notice" => Ok(RuleSeverity::Notice),
            "none" => Ok(RuleSeverity::None),
            _ => Err("unknown severity"),
        }
    }
}

impl fmt::Display for RuleSeverity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Notice => write!(f, "notice"),
            Self::None => write!(f, "none"),
        }
    }
}

#[derive(Copy, Clone, Deserialize, Debug, Serialize, Eq, PartialEq)]
pub enum RuleCategory {
    #[serde(rename = "BEST_PRACTICES")]
    BestPractices,
    #[serde(rename = "CODE_STYLE")]
    CodeStyle,
    #[serde(rename = "ERROR_PRONE")]
    ErrorProne,
    #[serde(other)]
    #[serde(skip_serializing)]
    Unknown,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::BestPractices => write!(f, "best_practices"),
            Self::CodeStyle => write!(f, "code_style"),
            Self::ErrorProne => write!(f, "error_prone"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// One issue a rule found in a single comment record.
///
/// The span points at the offending part of the comment (often one of its
/// markers); the engine resolves it to line/column positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentMatch {
    pub span: ByteSpan,
    pub message: String,
}

/// A style check over comment records.
///
/// Rules are deliberately small consumers: each inspects one record at a time
/// and reports zero or more matches from the record's fields alone.
pub trait CommentRule: Send + Sync {
    fn id(&self) -> RuleId;

    /// The severity reported when no override is configured.
    fn severity(&self) -> RuleSeverity;

    fn category(&self) -> RuleCategory;

    fn short_description(&self) -> &'static str;

    fn check(&self, comment: &Comment) -> Vec<CommentMatch>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_parses_case_insensitively() {
        assert_eq!(RuleSeverity::try_from("ERROR"), Ok(RuleSeverity::Error));
        assert_eq!(RuleSeverity::try_from("warning"), Ok(RuleSeverity::Warning));
        assert_eq!(RuleSeverity::try_from("Notice"), Ok(RuleSeverity::Notice));
        assert_eq!(RuleSeverity::try_from("none"), Ok(RuleSeverity::None));
        assert!(RuleSeverity::try_from("fatal").is_err());
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(RuleSeverity::Warning.to_string(), "warning");
        assert_eq!(RuleCategory::BestPractices.to_string(), "best_practices");
        assert_eq!(RuleId::from("comment-no-empty").to_string(), "comment-no-empty");
    }
}
