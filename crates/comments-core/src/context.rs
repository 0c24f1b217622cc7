// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License, Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2024 Datadog, Inc.

use crate::record::CommentKind;

/// The interpretation mode for the characters the scanner is currently reading.
///
/// A quote, parenthesis, or comment marker only has its special meaning in some
/// of these modes, so the scanner keeps a stack of them and dispatches on the
/// innermost one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LexicalContext {
    /// Plain code. The bottom of the stack is always this frame.
    Normal,
    /// Inside a quoted string. The payload is the quote byte (`b'"'` or `b'\''`)
    /// that opened the string and that must match to close it.
    StringLiteral(u8),
    /// Inside a parenthesized group that is not a `url()` argument.
    Parens,
    /// Inside the argument of `url(...)`, where `//` is not a comment marker.
    Url,
    /// Inside a comment of the given kind.
    Comment(CommentKind),
}

/// A stack of [`LexicalContext`] frames.
///
/// The sentinel [`LexicalContext::Normal`] frame at the bottom is never popped,
/// so `current` is total and a stray `)` in plain code is a no-op.
#[derive(Debug, Clone)]
pub struct ContextStack {
    frames: Vec<LexicalContext>,
}

impl ContextStack {
    pub fn new() -> Self {
        Self {
            frames: vec![LexicalContext::Normal],
        }
    }

    /// Returns the innermost (active) context.
    #[inline]
    pub fn current(&self) -> LexicalContext {
        *self
            .frames
            .last()
            .expect("stack always holds the sentinel frame")
    }

    #[inline]
    pub fn push(&mut self, context: LexicalContext) {
        self.frames.push(context);
    }

    /// Pops the innermost frame, refusing to pop the sentinel.
    pub fn pop(&mut self) -> Option<LexicalContext> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    /// Returns the number of frames above the sentinel.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }
}

impl Default for ContextStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_never_popped() {
        let mut stack = ContextStack::new();
        assert_eq!(stack.current(), LexicalContext::Normal);
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.current(), LexicalContext::Normal);
    }

    #[test]
    fn pop_returns_innermost_frame() {
        let mut stack = ContextStack::new();
        stack.push(LexicalContext::Parens);
        stack.push(LexicalContext::Url);
        assert_eq!(stack.current(), LexicalContext::Url);
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pop(), Some(LexicalContext::Url));
        assert_eq!(stack.pop(), Some(LexicalContext::Parens));
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn string_frame_carries_its_quote() {
        let mut stack = ContextStack::new();
        stack.push(LexicalContext::StringLiteral(b'\''));
        assert_eq!(stack.current(), LexicalContext::StringLiteral(b'\''));
        assert_ne!(stack.current(), LexicalContext::StringLiteral(b'"'));
    }
}
