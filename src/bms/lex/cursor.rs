use std::ops::Range;

/// A cursor walking the source line by line.
///
/// Each line comes with its byte range in the source, excluding the line feed and a trailing
/// carriage return of CRLF.
pub struct Cursor<'a> {
    /// The line position, starts with 1.
    line: usize,
    /// The index position.
    index: usize,
    /// The source str.
    source: &'a str,
}

impl<'a> Cursor<'a> {
    pub const fn new(source: &'a str) -> Self {
        Self {
            line: 1,
            index: 0,
            source,
        }
    }

    pub const fn is_end(&self) -> bool {
        self.index >= self.source.len()
    }

    /// Returns the number of the line the next call of [`Self::next_line`] returns.
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Moves the cursor through the current line, and returns it with its range.
    pub fn next_line(&mut self) -> Option<(Range<usize>, &'a str)> {
        if self.is_end() {
            return None;
        }
        let rest = &self.source[self.index..];
        let (content_len, consumed) = match rest.find('\n') {
            Some(feed) => (feed, feed + 1),
            None => (rest.len(), rest.len()),
        };
        let content_len = if rest[..content_len].ends_with('\r') {
            content_len - 1
        } else {
            content_len
        };
        let range = self.index..self.index + content_len;
        self.index += consumed;
        self.line += 1;
        Some((range.clone(), &self.source[range]))
    }
}
