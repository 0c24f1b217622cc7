// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License, Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2024 Datadog, Inc.

use crate::record::Comment;
use crate::rule::{CommentMatch, CommentRule, RuleCategory, RuleId, RuleSeverity};

/// Flags comments that share their source line with code, on either side.
pub struct OwnLine;

impl CommentRule for OwnLine {
    fn id(&self) -> RuleId {
        RuleId::from("comment-own-line")
    }

    fn severity(&self) -> RuleSeverity {
        RuleSeverity::Notice
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::CodeStyle
    }

    fn short_description(&self) -> &'static str {
        "require comments to be on their own line"
    }

    fn check(&self, comment: &Comment) -> Vec<CommentMatch> {
        if comment.preceded_by_code || comment.followed_by_code {
            vec![CommentMatch {
                span: comment.byte_span(),
                message: "expected comment on its own line".to_string(),
            }]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::find_comments;

    fn check_first(source: &str) -> Vec<CommentMatch> {
        let comments = find_comments(source);
        OwnLine.check(&comments[0])
    }

    #[test]
    fn comments_alone_on_their_line_pass() {
        assert!(check_first("/* x */").is_empty());
        assert!(check_first("a {}\n// note\nb {}").is_empty());
        assert!(check_first("  /* indented is fine */\n").is_empty());
    }

    #[test]
    fn code_before_the_comment_is_flagged() {
        let matches = check_first("a {} /* x */");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].message, "expected comment on its own line");
    }

    #[test]
    fn code_after_the_comment_is_flagged() {
        assert_eq!(check_first("/* x */ a {}").len(), 1);
    }

    #[test]
    fn trailing_line_comments_are_flagged() {
        assert_eq!(check_first("a { color: red } // why\n").len(), 1);
    }
}
