// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License, Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2024 Datadog, Inc.

use crate::record::{Comment, CommentKind};
use crate::rule::{CommentMatch, CommentRule, RuleCategory, RuleId, RuleSeverity};

/// Requires whitespace just inside comment markers: after the opening marker,
/// and before the closing marker of a block comment.
pub struct WhitespaceInside;

impl CommentRule for WhitespaceInside {
    fn id(&self) -> RuleId {
        RuleId::from("comment-whitespace-inside")
    }

    fn severity(&self) -> RuleSeverity {
        RuleSeverity::Warning
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::CodeStyle
    }

    fn short_description(&self) -> &'static str {
        "require whitespace inside comment markers"
    }

    fn check(&self, comment: &Comment) -> Vec<CommentMatch> {
        // Nothing to pad in an empty comment.
        if comment.inner_text.is_empty() {
            return Vec::new();
        }
        let mut matches = Vec::new();
        if comment.leading_whitespace.is_empty() {
            matches.push(CommentMatch {
                span: comment.open_marker_span(),
                message: format!("expected whitespace after \"{}\"", comment.open_marker),
            });
        }
        if comment.kind == CommentKind::Block && comment.trailing_whitespace.is_empty() {
            if let (Some(close_marker), Some(span)) =
                (comment.close_marker.as_ref(), comment.close_marker_span())
            {
                matches.push(CommentMatch {
                    span,
                    message: format!("expected whitespace before \"{close_marker}\""),
                });
            }
        }
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::find_comments;

    fn check_first(source: &str) -> Vec<CommentMatch> {
        let comments = find_comments(source);
        WhitespaceInside.check(&comments[0])
    }

    #[test]
    fn padded_comments_pass() {
        assert!(check_first("/* x */").is_empty());
        assert!(check_first("// x\n").is_empty());
        assert!(check_first("/*! x */").is_empty());
    }

    #[test]
    fn missing_leading_whitespace_is_flagged() {
        let matches = check_first("/*x */");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].message, "expected whitespace after \"/*\"");
        assert_eq!(matches[0].span.as_range(), 0..2);

        let matches = check_first("//x\n");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].message, "expected whitespace after \"//\"");
    }

    #[test]
    fn missing_trailing_whitespace_is_flagged_for_blocks() {
        let matches = check_first("/* x*/");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].message, "expected whitespace before \"*/\"");
        assert_eq!(matches[0].span.as_range(), 4..6);
    }

    #[test]
    fn both_sides_can_be_flagged_at_once() {
        let matches = check_first("/*x*/");
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn line_comments_have_no_trailing_requirement() {
        assert!(check_first("// x\n").is_empty());
        // `x` up against end of line is still only a leading-side concern.
        assert_eq!(check_first("//x").len(), 1);
    }

    #[test]
    fn empty_comments_are_skipped() {
        assert!(check_first("/**/").is_empty());
        assert!(check_first("/*  */").is_empty());
        assert!(check_first("//\n").is_empty());
    }

    #[test]
    fn decorated_markers_report_their_own_token() {
        let matches = check_first("/**doc */");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].message, "expected whitespace after \"/**\"");
        assert_eq!(matches[0].span.as_range(), 0..3);
    }
}
