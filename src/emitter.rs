//! The [`Sink`] trait: the tokenizer's only way of talking to the outside
//! world, plus [`VecSink`], a minimal recording implementation.

use crate::error::ParseError;
use crate::state::State;
use crate::tag_id::TagId;
use crate::token::{CommentToken, DoctypeToken, EndTagToken, StartTagToken};

/// The tokenizer's callback contract.
///
/// A tree constructor (or any simpler consumer, such as a scraper) implements
/// this trait and hands it to [`crate::Tokenizer::new_with_sink`]. None of
/// these methods return a `Result`: the tokenizer itself never fails, and a
/// sink that wants to abort early should use [`crate::Tokenizer::pause`]
/// instead of panicking.
///
/// Implementations that don't care about a particular callback (attributes,
/// say, or parse errors) can simply leave the default no-op body in place.
pub trait Sink {
    /// A start tag, e.g. `<div class="a">`.
    ///
    /// The return value lets a tree constructor switch the tokenizer into
    /// RCDATA/RAWTEXT/script-data/PLAINTEXT text content modes the way the
    /// "tree construction dispatcher" does in a full parser; see
    /// [`naive_next_state`] for an approximation that doesn't require a real
    /// tree. Returning `None` leaves the current state untouched.
    #[must_use]
    fn on_start_tag(&mut self, tag: StartTagToken) -> Option<State> {
        let _ = tag;
        None
    }

    /// An end tag, e.g. `</div>`.
    fn on_end_tag(&mut self, tag: EndTagToken) {
        let _ = tag;
    }

    /// A comment, e.g. `<!-- hi -->`.
    fn on_comment(&mut self, comment: CommentToken) {
        let _ = comment;
    }

    /// A DOCTYPE, e.g. `<!DOCTYPE html>`.
    fn on_doctype(&mut self, doctype: DoctypeToken) {
        let _ = doctype;
    }

    /// A run of ordinary character data.
    ///
    /// Called with maximal coalesced runs: the tokenizer never calls this
    /// (or [`Sink::on_whitespace_character`]) twice in a row without an
    /// intervening non-character token.
    fn on_character(&mut self, data: &str) {
        let _ = data;
    }

    /// A single NUL code point found in character data outside of a markup
    /// declaration.
    ///
    /// Kept separate from [`Sink::on_character`] because WHATWG's own
    /// algorithm replaces each one with U+FFFD individually and emits a
    /// [`crate::Error::UnexpectedNullCharacter`]; a sink that wants the
    /// replacement folded back into an ordinary text run can do so itself.
    fn on_null_character(&mut self) {}

    /// A run of character data made up entirely of ASCII whitespace.
    ///
    /// A tree constructor can use this to implement whitespace-sensitive
    /// insertion-mode rules without re-scanning [`Sink::on_character`] data.
    fn on_whitespace_character(&mut self, data: &str) {
        let _ = data;
    }

    /// The input stream has ended. No further callbacks will occur unless
    /// the tokenizer is fed more input after this point via
    /// [`crate::Tokenizer::insert_html_at_current_pos`].
    fn on_eof(&mut self) {}

    /// A (non-fatal) parse error.
    fn on_parse_error(&mut self, error: ParseError) {
        let _ = error;
    }
}

/// Take an educated guess at the next state from the name of a just-emitted
/// start tag.
///
/// A correct switch requires a real tree constructor (the decision depends
/// on the *adjusted current node*, not just the tag name), but this
/// approximation is good enough for most scraping and linting uses. Inspired
/// by the similar heuristic in `lol-html`.
#[must_use]
pub fn naive_next_state(tag_name: &str) -> Option<State> {
    match TagId::lookup(tag_name)? {
        TagId::Title | TagId::Textarea => Some(State::RcData),
        TagId::Plaintext => Some(State::PlainText),
        TagId::Script => Some(State::ScriptData),
        TagId::Style | TagId::Iframe | TagId::Xmp | TagId::Noembed | TagId::Noframes | TagId::Noscript => {
            Some(State::RawText)
        }
    }
}

/// One recorded callback, as collected by [`VecSink`].
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum RecordedToken {
    StartTag(StartTagToken),
    EndTag(EndTagToken),
    Comment(CommentToken),
    Doctype(DoctypeToken),
    /// A coalesced run of character data (ordinary, whitespace or
    /// NUL-replaced, folded together in emission order).
    Character(String),
    ParseError(ParseError),
}

/// The simplest possible [`Sink`]: records every callback into a `Vec`,
/// coalescing adjacent character runs.
///
/// Handy for tests and for applications (scrapers, linters) that want a
/// `Vec<Token>`-shaped API rather than writing their own `Sink`.
#[derive(Debug, Default)]
pub struct VecSink {
    /// Tokens recorded so far, in emission order.
    pub tokens: Vec<RecordedToken>,
    current_characters: String,
}

impl VecSink {
    fn flush_characters(&mut self) {
        if !self.current_characters.is_empty() {
            let s = std::mem::take(&mut self.current_characters);
            self.tokens.push(RecordedToken::Character(s));
        }
    }
}

impl Sink for VecSink {
    fn on_start_tag(&mut self, tag: StartTagToken) -> Option<State> {
        self.flush_characters();
        let next_state = naive_next_state(&tag.name);
        self.tokens.push(RecordedToken::StartTag(tag));
        next_state
    }

    fn on_end_tag(&mut self, tag: EndTagToken) {
        self.flush_characters();
        self.tokens.push(RecordedToken::EndTag(tag));
    }

    fn on_comment(&mut self, comment: CommentToken) {
        self.flush_characters();
        self.tokens.push(RecordedToken::Comment(comment));
    }

    fn on_doctype(&mut self, doctype: DoctypeToken) {
        self.flush_characters();
        self.tokens.push(RecordedToken::Doctype(doctype));
    }

    fn on_character(&mut self, data: &str) {
        self.current_characters.push_str(data);
    }

    fn on_null_character(&mut self) {
        self.current_characters.push('\u{fffd}');
    }

    fn on_whitespace_character(&mut self, data: &str) {
        self.current_characters.push_str(data);
    }

    fn on_eof(&mut self) {
        self.flush_characters();
    }

    fn on_parse_error(&mut self, error: ParseError) {
        self.tokens.push(RecordedToken::ParseError(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn naive_next_state_switches_script_and_rcdata() {
        assert_eq!(naive_next_state("script"), Some(State::ScriptData));
        assert_eq!(naive_next_state("title"), Some(State::RcData));
        assert_eq!(naive_next_state("noframes"), Some(State::RawText));
        assert_eq!(naive_next_state("div"), None);
    }

    #[test]
    fn vec_sink_coalesces_character_runs() {
        let mut sink = VecSink::default();
        sink.on_character("a");
        sink.on_whitespace_character(" ");
        sink.on_null_character();
        sink.on_character("b");
        sink.on_eof();
        assert_eq!(
            sink.tokens,
            vec![RecordedToken::Character("a \u{fffd}b".to_string())]
        );
    }
}
