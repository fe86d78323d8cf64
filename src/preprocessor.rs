//! Input normalization and the append-only, cursor-addressed input buffer.
//!
//! This is the "Preprocessor" leaf of the tokenizer: it owns the raw,
//! already-normalized code points and answers lookahead/backtracking
//! questions for the state machine, but knows nothing about HTML syntax.
//! See <https://html.spec.whatwg.org/#preprocessing-the-input-stream>.

use crate::error::Location;

/// Result of [`Preprocessor::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Advance {
    /// A normalized code point.
    Char(char),
    /// The buffer is exhausted, but more input may still arrive (no `isLast`
    /// write yet). The caller should hibernate: rewind whatever it already
    /// consumed this step and wait for the next `write`/`insert_html_at_current_pos`.
    EndOfChunk,
    /// The buffer is exhausted and the final chunk has been written.
    Eof,
}

/// Result of [`Preprocessor::peek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Peek {
    Char(char),
    EndOfChunk,
    Eof,
}

/// Result of [`Preprocessor::starts_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StartsWith {
    Yes,
    No,
    /// Not enough buffered input to decide yet; more may still arrive.
    NeedMoreInput,
}

/// Input normalization and windowed buffer, as described by `spec.md` §4.1.
///
/// Chunks are fed in via [`Preprocessor::write`]; the tokenizer drives a
/// cursor over the normalized code points via [`Preprocessor::advance`],
/// [`Preprocessor::retreat`], [`Preprocessor::peek`] and
/// [`Preprocessor::starts_with`]. The buffer is an append-only `Vec<char>`
/// with a cursor index rather than a ring buffer, per the design note in
/// `spec.md` §9: lookahead windows used by `starts_with` routinely cross
/// what would be a ring buffer's wraparound point.
#[derive(Debug, Default)]
pub(crate) struct Preprocessor {
    buf: Vec<char>,
    /// `loc_after[i]` is the [`Location`] immediately after consuming `buf[i]`.
    loc_after: Vec<Location>,
    /// Index of the next code point `advance()` will return.
    pos: usize,
    /// The location in effect immediately before `buf[0]`, i.e. as of the
    /// last code point dropped by [`Preprocessor::drop_parsed_chunk`] (or
    /// the very start of input if nothing has been dropped yet).
    base_location: Location,
    /// Whether the chunk most recently appended ended on an unresolved `\r`
    /// (normalized to `\n`, but a following `\n` in the next chunk must
    /// still be folded away) -- carrying this across `write()` calls is
    /// what makes CRLF-across-a-chunk-boundary behave identically to
    /// CRLF-in-one-chunk (chunk invariance, `spec.md` §8).
    pending_cr: bool,
    /// Set once the final chunk has been written.
    is_last: bool,
}

impl Preprocessor {
    pub(crate) fn new() -> Self {
        Preprocessor {
            base_location: Location {
                line: 1,
                column: 1,
                offset: 0,
            },
            ..Default::default()
        }
    }

    /// Append a chunk of text, normalizing `\r\n` and lone `\r` to `\n`.
    pub(crate) fn write(&mut self, chunk: &str, is_last: bool) {
        debug_assert!(!self.is_last, "write() called after isLast chunk");
        self.append_normalized(chunk);
        self.is_last = is_last;
    }

    /// Splice `chunk` into the buffer immediately after the cursor.
    ///
    /// Used by a tree constructor implementing a `document.write`-like
    /// insertion point. Locations for everything after the insertion point
    /// are recomputed; the cursor position itself, and therefore any
    /// retained backtrack distance, is untouched.
    pub(crate) fn insert_html_at_current_pos(&mut self, chunk: &str) {
        let mut inserted: Vec<char> = Vec::with_capacity(chunk.len());
        let mut pending_cr = false;
        normalize_into(chunk, &mut pending_cr, &mut inserted);
        // An unresolved trailing `\r` in the spliced-in text must still
        // fold against whatever was already waiting at the splice point.
        if pending_cr && self.buf.get(self.pos) == Some(&'\n') {
            self.pos += 1;
        }

        let tail_start = self.pos;
        self.buf.splice(tail_start..tail_start, inserted.iter().copied());
        self.loc_after
            .splice(tail_start..tail_start, std::iter::repeat(Location::default()).take(inserted.len()));
        self.recompute_locations_from(tail_start);
    }

    fn append_normalized(&mut self, chunk: &str) {
        let start = self.buf.len();
        let mut pending_cr = self.pending_cr;
        normalize_into(chunk, &mut pending_cr, &mut self.buf);
        // a lone trailing '\r' was turned into '\n' and pushed already; we
        // just remember to swallow a leading '\n' on the *next* write/insert.
        self.pending_cr = pending_cr;
        self.loc_after
            .resize(self.buf.len(), Location::default());
        self.recompute_locations_from(start);
    }

    fn recompute_locations_from(&mut self, start: usize) {
        let mut loc = if start == 0 {
            self.base_location
        } else {
            self.loc_after[start - 1]
        };
        for i in start..self.buf.len() {
            loc.advance(self.buf[i]);
            self.loc_after[i] = loc;
        }
    }

    /// The next normalized code point, or a sentinel for end-of-chunk/EOF.
    pub(crate) fn advance(&mut self) -> Advance {
        match self.buf.get(self.pos) {
            Some(&c) => {
                self.pos += 1;
                Advance::Char(c)
            }
            None if self.is_last => Advance::Eof,
            None => Advance::EndOfChunk,
        }
    }

    /// Rewind the cursor by `n` code points.
    pub(crate) fn retreat(&mut self, n: usize) {
        assert!(n <= self.pos, "retreat() past retained prefix");
        self.pos -= n;
    }

    /// Snapshot the cursor, to later [`Preprocessor::reset_to`].
    ///
    /// Used by the state machine to rewind an entire step's worth of
    /// consumption when a multi-code-point lookahead runs out of buffered
    /// input and must hibernate.
    pub(crate) fn mark(&self) -> usize {
        self.pos
    }

    /// Rewind the cursor to a position previously returned by [`Preprocessor::mark`].
    pub(crate) fn reset_to(&mut self, mark: usize) {
        self.pos = mark;
    }

    /// Look `n` code points ahead of the cursor without consuming.
    pub(crate) fn peek(&self, n: usize) -> Peek {
        match self.buf.get(self.pos + n) {
            Some(&c) => Peek::Char(c),
            None if self.is_last => Peek::Eof,
            None => Peek::EndOfChunk,
        }
    }

    /// Compare the window starting at the cursor against `pattern`.
    ///
    /// Does not consume. Returns [`StartsWith::NeedMoreInput`] if the
    /// buffer doesn't (yet) hold enough code points to decide and more
    /// input may still arrive.
    pub(crate) fn starts_with(&self, pattern: &str, case_sensitive: bool) -> StartsWith {
        for (i, pc) in pattern.chars().enumerate() {
            match self.peek(i) {
                Peek::Char(c) => {
                    let eq = if case_sensitive {
                        c == pc
                    } else {
                        c.eq_ignore_ascii_case(&pc)
                    };
                    if !eq {
                        return StartsWith::No;
                    }
                }
                Peek::EndOfChunk => return StartsWith::NeedMoreInput,
                Peek::Eof => return StartsWith::No,
            }
        }
        StartsWith::Yes
    }

    /// If `starts_with(pattern, case_sensitive)` would return `Yes`, consume
    /// it and return `true`. Otherwise leaves the cursor untouched.
    pub(crate) fn consume_if_starts_with(&mut self, pattern: &str, case_sensitive: bool) -> StartsWith {
        let result = self.starts_with(pattern, case_sensitive);
        if result == StartsWith::Yes {
            self.pos += pattern.chars().count();
        }
        result
    }

    /// The location the next [`crate::error::ParseError`] would be reported at,
    /// i.e. the point immediately after the most recently consumed code point.
    pub(crate) fn current_location(&self) -> Location {
        if self.pos == 0 {
            self.base_location
        } else {
            self.loc_after[self.pos - 1]
        }
    }

    /// Discard the buffer prefix behind the cursor.
    ///
    /// The caller guarantees no future `retreat()` will reach past the
    /// current cursor position.
    pub(crate) fn drop_parsed_chunk(&mut self) {
        if self.pos == 0 {
            return;
        }
        self.base_location = self.loc_after[self.pos - 1];
        self.buf.drain(0..self.pos);
        self.loc_after.drain(0..self.pos);
        self.pos = 0;
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.is_last && self.pos >= self.buf.len()
    }
}

fn normalize_into(chunk: &str, pending_cr: &mut bool, out: &mut Vec<char>) {
    for c in chunk.chars() {
        if *pending_cr {
            *pending_cr = false;
            if c == '\n' {
                continue;
            }
        }
        match c {
            '\r' => {
                out.push('\n');
                *pending_cr = true;
            }
            other => out.push(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn drain(pp: &mut Preprocessor) -> String {
        let mut s = String::new();
        loop {
            match pp.advance() {
                Advance::Char(c) => s.push(c),
                Advance::Eof => break,
                Advance::EndOfChunk => break,
            }
        }
        s
    }

    #[test]
    fn normalizes_crlf_and_lone_cr() {
        let mut pp = Preprocessor::new();
        pp.write("a\r\nb\rc\n", true);
        assert_eq!(drain(&mut pp), "a\nb\nc\n");
    }

    #[test]
    fn crlf_split_across_chunks_folds_once() {
        let mut pp = Preprocessor::new();
        pp.write("a\r", false);
        pp.write("\nb", true);
        assert_eq!(drain(&mut pp), "a\nb");
    }

    #[test]
    fn end_of_chunk_then_eof() {
        let mut pp = Preprocessor::new();
        pp.write("ab", false);
        assert_eq!(pp.advance(), Advance::Char('a'));
        assert_eq!(pp.advance(), Advance::Char('b'));
        assert_eq!(pp.advance(), Advance::EndOfChunk);
        pp.write("c", true);
        assert_eq!(pp.advance(), Advance::Char('c'));
        assert_eq!(pp.advance(), Advance::Eof);
    }

    #[test]
    fn retreat_rewinds_cursor_and_location() {
        let mut pp = Preprocessor::new();
        pp.write("ab\nc", true);
        pp.advance();
        pp.advance();
        pp.advance();
        let loc_before = pp.current_location();
        assert_eq!(pp.advance(), Advance::Char('c'));
        pp.retreat(1);
        assert_eq!(pp.current_location(), loc_before);
        assert_eq!(pp.advance(), Advance::Char('c'));
    }

    #[test]
    fn starts_with_needs_more_input_then_resolves() {
        let mut pp = Preprocessor::new();
        pp.write("doc", false);
        assert_eq!(pp.starts_with("doctype", false), StartsWith::NeedMoreInput);
        pp.write("type html", true);
        assert_eq!(
            pp.consume_if_starts_with("DOCTYPE", false),
            StartsWith::Yes
        );
        assert_eq!(drain(&mut pp), " html");
    }

    #[test]
    fn drop_parsed_chunk_preserves_absolute_offsets() {
        let mut pp = Preprocessor::new();
        pp.write("abcdef", true);
        pp.advance();
        pp.advance();
        pp.advance();
        let loc_before_drop = pp.current_location();
        pp.drop_parsed_chunk();
        assert_eq!(pp.current_location(), loc_before_drop);
        assert_eq!(drain(&mut pp), "def");
    }

    #[test]
    fn insert_html_at_current_pos_splices_and_relocates() {
        let mut pp = Preprocessor::new();
        pp.write("ac", true);
        pp.advance(); // consume 'a'
        pp.insert_html_at_current_pos("b");
        assert_eq!(drain(&mut pp), "bc");
    }

    #[test]
    fn location_tracks_lines_and_columns() {
        let mut pp = Preprocessor::new();
        pp.write("ab\ncd", true);
        pp.advance();
        pp.advance();
        pp.advance();
        let loc = pp.current_location();
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 1);
        assert_eq!(loc.offset, 3);
    }
}
