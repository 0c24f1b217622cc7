// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License, Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2024 Datadog, Inc.

use crate::location::{LineIndex, Point};
use crate::record::Comment;
use crate::rule::{CommentRule, RuleId, RuleSeverity};
use crate::scanner::find_comments;
use crate::violation::Violation;
use common::model::position::Position;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("unknown rule `{0}`")]
    UnknownRule(String),
}

/// The analysis of one document: its comment census and the violations the
/// enabled rules reported.
#[derive(Clone, Deserialize, Debug, Serialize, Builder)]
pub struct FileAnalysis {
    pub filename: String,
    pub comment_count: usize,
    pub violations: Vec<Violation>,
    pub execution_time_ms: u128,
}

/// Runs a set of comment-style rules over documents.
///
/// The engine owns its rule set and severity overrides, and shares nothing
/// across `analyze` calls, so one engine can serve many documents in
/// parallel behind a shared reference.
pub struct Engine {
    rules: Vec<Box<dyn CommentRule>>,
    severity_overrides: HashMap<RuleId, RuleSeverity>,
}

impl Engine {
    /// Finds every comment in `source`, ordered by start offset.
    pub fn scan(&self, source: &str) -> Vec<Comment> {
        find_comments(source)
    }

    /// Scans `source` once and runs every rule over the comment records.
    /// Violations are ordered by source position.
    pub fn analyze(&self, filename: &str, source: &str) -> FileAnalysis {
        let started = Instant::now();
        let comments = find_comments(source);
        let index = LineIndex::new(source.as_bytes());

        let mut violations: Vec<Violation> = Vec::new();
        for rule in &self.rules {
            let severity = self.severity_for(rule.as_ref());
            // An overridden severity of `none` mutes the rule.
            if severity == RuleSeverity::None {
                continue;
            }
            for comment in &comments {
                for rule_match in rule.check(comment) {
                    let point_span = index.span_at(rule_match.span);
                    violations.push(Violation {
                        rule: rule.id().to_string(),
                        message: rule_match.message,
                        severity,
                        category: rule.category(),
                        start: as_position(point_span.start()),
                        end: as_position(point_span.end()),
                    });
                }
            }
        }
        violations.sort_by_key(|violation| (violation.start.line, violation.start.col));

        FileAnalysis {
            filename: filename.to_string(),
            comment_count: comments.len(),
            violations,
            execution_time_ms: started.elapsed().as_millis(),
        }
    }

    /// The rules the engine runs, in registration order.
    pub fn rules(&self) -> &[Box<dyn CommentRule>] {
        &self.rules
    }

    fn severity_for(&self, rule: &dyn CommentRule) -> RuleSeverity {
        self.severity_overrides
            .get(&rule.id())
            .copied()
            .unwrap_or_else(|| rule.severity())
    }
}

fn as_position(point: Point) -> Position {
    Position::new(point.line(), point.col())
}

pub struct EngineBuilder {
    rules: Vec<Box<dyn CommentRule>>,
    severity_overrides: HashMap<RuleId, RuleSeverity>,
}

impl EngineBuilder {
    pub fn new() -> EngineBuilder {
        Self {
            rules: Vec::new(),
            severity_overrides: HashMap::new(),
        }
    }

    pub fn rule(mut self, rule: Box<dyn CommentRule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = Box<dyn CommentRule>>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn severity_override(mut self, id: impl Into<RuleId>, severity: RuleSeverity) -> Self {
        self.severity_overrides.insert(id.into(), severity);
        self
    }

    /// Builds the engine, rejecting overrides that name no registered rule.
    pub fn build(self) -> Result<Engine, EngineError> {
        for id in self.severity_overrides.keys() {
            if !self.rules.iter().any(|rule| &rule.id() == id) {
                return Err(EngineError::UnknownRule(id.to_string()));
            }
        }
        Ok(Engine {
            rules: self.rules,
            severity_overrides: self.severity_overrides,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
