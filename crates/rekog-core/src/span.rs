//! Byte spans into matched input.

use std::borrow::Cow;
use std::ops::Range;

/// A `(start, len)` pair of byte offsets into an input buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

impl Span {
    #[inline]
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    #[inline]
    pub fn from_range(range: Range<usize>) -> Self {
        Self::new(range.start, range.end - range.start)
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Matched text. Spans never split input in valid-UTF-8 grammars, but
    /// byte-range grammars can; those bytes are replaced lossily.
    pub fn text<'i>(&self, input: &'i [u8]) -> Cow<'i, str> {
        String::from_utf8_lossy(&input[self.range()])
    }
}
