// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License, Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2024 Datadog, Inc.

use crate::common::ByteSpan;
use bstr::{BStr, ByteSlice};
use std::num::NonZeroU32;

/// A one-based point representing a line and column in a string.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Point {
    pub line: NonZeroU32,
    pub col: NonZeroU32,
}

impl Point {
    /// Creates a new `Point`.
    ///
    /// # Panics
    /// Panics if either `line` or `col` are 0
    pub fn new(line: u32, col: u32) -> Point {
        Self {
            line: NonZeroU32::new(line).unwrap(),
            col: NonZeroU32::new(col).unwrap(),
        }
    }

    /// Returns the line represented by this point.
    #[inline]
    pub fn line(&self) -> u32 {
        self.line.get()
    }

    /// Returns the column represented by this point.
    #[inline]
    pub fn col(&self) -> u32 {
        self.col.get()
    }
}

impl Default for Point {
    fn default() -> Self {
        Point::new(1, 1)
    }
}

/// A span of [`Point`]s representing a range of lines and columns in a text.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PointSpan {
    start: Point,
    end: Point,
}

impl PointSpan {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Returns the start of this span.
    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    /// Returns the end of this span.
    #[inline]
    pub fn end(&self) -> Point {
        self.end
    }
}

/// `LineIndex` maps byte offsets in a document to lines and columns.
///
/// Line starts are collected in a single pass at construction; lookups then
/// binary search for the line in `O(log n)` and count (grapheme-aware)
/// columns within it in `O(m)`.
pub struct LineIndex<'d> {
    data: &'d [u8],
    /// Byte offsets, where each entry corresponds to the start byte of a line.
    line_offsets: Vec<usize>,
}

impl<'d> LineIndex<'d> {
    pub fn new(data: &'d [u8]) -> LineIndex<'d> {
        let mut line_offsets = vec![0];
        for line in BStr::new(data).lines_with_terminator() {
            let start_index = line.as_ptr() as usize - data.as_ptr() as usize;
            line_offsets.push(start_index + line.len());
        }
        Self { data, line_offsets }
    }

    /// Returns a [`Point`] for the underlying data, given a byte offset.
    ///
    /// # Panics
    /// Panics if `byte_offset` is out-of-bounds of the underlying data.
    pub fn point_at(&self, byte_offset: usize) -> Point {
        let (line_number, line_start_byte) = self.find_line(byte_offset);

        let col_number = BStr::new(&self.data[line_start_byte..byte_offset])
            .graphemes()
            // Handle carriage returns by filtering out b`\r`. The iterator treats b'\r' as a grapheme
            .filter(|&grapheme| grapheme != "\r")
            .count()
            + 1;

        Point::new(line_number as u32, col_number as u32)
    }

    /// Returns a [`PointSpan`] for the underlying data, given a [`ByteSpan`].
    ///
    /// # Panics
    /// Panics if `byte_span` is out-of-bounds of the underlying data.
    pub fn span_at(&self, byte_span: ByteSpan) -> PointSpan {
        let start = self.point_at(byte_span.start_index as usize);
        let end = self.point_at(byte_span.end_index as usize);
        PointSpan { start, end }
    }

    /// Binary searches the line offsets, returning the one-based line number
    /// containing `byte_offset` and that line's start byte.
    fn find_line(&self, byte_offset: usize) -> (usize, usize) {
        match self.line_offsets.binary_search(&byte_offset) {
            Ok(exact_index) => (exact_index + 1, byte_offset),
            Err(hypothetical_index) => {
                // The offset would be inserted here, so the previous entry is
                // the start of the line it sits on.
                let previous_index = hypothetical_index - 1;
                (previous_index + 1, self.line_offsets[previous_index])
            }
        }
    }
}
