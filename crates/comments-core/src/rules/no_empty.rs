// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License, Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2024 Datadog, Inc.

use crate::record::Comment;
use crate::rule::{CommentMatch, CommentRule, RuleCategory, RuleId, RuleSeverity};

/// Flags comments with no text, including whitespace-only ones.
pub struct NoEmpty;

impl CommentRule for NoEmpty {
    fn id(&self) -> RuleId {
        RuleId::from("comment-no-empty")
    }

    fn severity(&self) -> RuleSeverity {
        RuleSeverity::Warning
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::BestPractices
    }

    fn short_description(&self) -> &'static str {
        "disallow empty comments"
    }

    fn check(&self, comment: &Comment) -> Vec<CommentMatch> {
        if comment.inner_text.is_empty() {
            vec![CommentMatch {
                span: comment.byte_span(),
                message: "unexpected empty comment".to_string(),
            }]
        } else {
            Vec::new()
        }
    }
}
