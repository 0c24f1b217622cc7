// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License, Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2024 Datadog, Inc.

use crate::common::ByteSpan;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Copy, Clone, Deserialize, Debug, Serialize, Eq, PartialEq, Hash)]
pub enum CommentKind {
    #[serde(rename = "BLOCK")]
    Block,
    #[serde(rename = "LINE")]
    Line,
}

impl fmt::Display for CommentKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Block => write!(f, "block"),
            Self::Line => write!(f, "line"),
        }
    }
}

/// One comment found in a source document.
///
/// `start` and `end` are 0-based byte offsets into the document, both
/// inclusive, delimiting the full comment including its markers. The marker,
/// whitespace, and text fields partition that span exactly:
/// `open_marker + leading_whitespace + inner_text + trailing_whitespace
/// + close_marker` reassembles the original substring.
#[derive(Clone, Deserialize, Debug, Serialize, Eq, PartialEq)]
pub struct Comment {
    pub kind: CommentKind,
    pub start: usize,
    pub end: usize,
    /// The opening token as written (`/*`, `/**`, `/*!`, `//`, `///`, ...).
    pub open_marker: String,
    /// The closing token as written (`*/`, `**/`, ...). `None` for line comments.
    pub close_marker: Option<String>,
    pub leading_whitespace: String,
    pub trailing_whitespace: String,
    pub inner_text: String,
    /// True if non-whitespace code precedes the comment on its line.
    pub preceded_by_code: bool,
    /// True if non-whitespace code follows the comment before the next line
    /// break. Always false for line comments, which run to end of line.
    pub followed_by_code: bool,
}

impl Comment {
    /// Decomposes a comment span into its marker, whitespace, and text fields.
    ///
    /// `span_text` must be exactly `source[start..=end]`, and must be a
    /// well-formed span for `kind`: line spans start with `//`, block spans
    /// start with `/*` and end with `*/`. The scanner's boundary detection
    /// guarantees this, so violations are asserted, not returned.
    pub(crate) fn assemble(
        kind: CommentKind,
        start: usize,
        end: usize,
        span_text: &str,
        preceded_by_code: bool,
        followed_by_code: bool,
    ) -> Comment {
        debug_assert!(start < end && span_text.len() == end - start + 1);
        let (open_marker, interior, close_marker) = match kind {
            CommentKind::Block => {
                debug_assert!(
                    span_text.len() >= 4
                        && span_text.starts_with("/*")
                        && span_text.ends_with("*/")
                );
                let (open, rest) = split_block_open(span_text);
                let (interior, close) = split_block_close(rest);
                (open, interior, Some(close.to_string()))
            }
            CommentKind::Line => {
                debug_assert!(span_text.len() >= 2 && span_text.starts_with("//"));
                let marker_len = span_text.bytes().take_while(|&b| b == b'/').count();
                let (open, interior) = span_text.split_at(marker_len);
                (open, interior, None)
            }
        };

        // Leading whitespace is captured greedily first, so an all-whitespace
        // interior lands entirely in `leading_whitespace`.
        let trimmed_start = interior.trim_start();
        let leading_whitespace = &interior[..interior.len() - trimmed_start.len()];
        let inner_text = trimmed_start.trim_end();
        let trailing_whitespace = &trimmed_start[inner_text.len()..];

        Comment {
            kind,
            start,
            end,
            open_marker: open_marker.to_string(),
            close_marker,
            leading_whitespace: leading_whitespace.to_string(),
            trailing_whitespace: trailing_whitespace.to_string(),
            inner_text: inner_text.to_string(),
            preceded_by_code,
            followed_by_code: match kind {
                CommentKind::Block => followed_by_code,
                CommentKind::Line => false,
            },
        }
    }

    /// Returns the comment's position as a half-open [`ByteSpan`].
    #[inline]
    pub fn byte_span(&self) -> ByteSpan {
        ByteSpan::new(self.start, self.end + 1)
    }

    /// Returns the half-open span of the opening marker.
    #[inline]
    pub fn open_marker_span(&self) -> ByteSpan {
        ByteSpan::new(self.start, self.start + self.open_marker.len())
    }

    /// Returns the half-open span of the closing marker, if there is one.
    pub fn close_marker_span(&self) -> Option<ByteSpan> {
        self.close_marker
            .as_ref()
            .map(|close| ByteSpan::new(self.end + 1 - close.len(), self.end + 1))
    }
}

/// Splits off the opening marker of a block span: `/`, a run of `*`, and an
/// optional `!` or `#` flag, clamped so at least the closing `*/` remains.
///
/// The clamp resolves the degenerate spans in favor of the close marker:
/// `/**/` splits as `/*` + `*/`, and `/***/` as `/**` + `*/`.
fn split_block_open(span_text: &str) -> (&str, &str) {
    let bytes = span_text.as_bytes();
    let mut open_len = 1;
    while open_len < bytes.len() && bytes[open_len] == b'*' {
        open_len += 1;
    }
    if open_len < bytes.len() && (bytes[open_len] == b'!' || bytes[open_len] == b'#') {
        open_len += 1;
    }
    span_text.split_at(open_len.min(span_text.len() - 2))
}

/// Splits the remainder of a block span into interior and closing marker,
/// where the marker is the maximal trailing run of `*` followed by `/`.
fn split_block_close(rest: &str) -> (&str, &str) {
    let bytes = rest.as_bytes();
    let mut close_start = rest.len() - 1;
    while close_start > 0 && bytes[close_start - 1] == b'*' {
        close_start -= 1;
    }
    rest.split_at(close_start)
}
