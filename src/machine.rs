//! The tokenizer's state dispatch: [`Tokenizer::dispatch`] runs exactly one
//! state transition per call.
//!
//! Ported from a classic blocking `read_char()` state machine to one driven
//! by [`Preprocessor`], which can run out of buffered input mid-step. Every
//! multi-code-point lookahead here (named character reference matching,
//! literal-string matching) is therefore structured to resolve entirely
//! through non-consuming peeks before anything is consumed or emitted; the
//! run loop in [`Tokenizer::run`] takes a cursor snapshot before each
//! `dispatch()` call and rewinds it whole if the step reports that it ran
//! out of input (see [`DispatchResult::NeedMoreInput`]).

use std::collections::HashSet;

use crate::emitter::Sink;
use crate::entities::{self, NamedRefOutcome};
use crate::error::{Error, Location, ParseError, TokenLocation};
use crate::preprocessor::{Advance, Peek, Preprocessor, StartsWith};
use crate::state::State;
use crate::tag_id::TagId;
use crate::utils::{ascii_digit_pat, control_pat, ctostr, noncharacter_pat, surrogate_pat, trace_log, whitespace_pat};
use crate::token::{Attribute, CommentToken, DoctypeToken, EndTagToken, StartTagToken};

/// Construction-time options for a [`Tokenizer`].
#[derive(Debug, Clone, Copy)]
pub struct TokenizerOpts {
    /// Mirrors `sourceCodeLocationInfo`.
    ///
    /// This tokenizer always tracks [`crate::Location`] precisely enough to
    /// attach one to every [`crate::Error`] -- unlike a full tree
    /// constructor, nothing downstream here retains per-node spans that
    /// would make that tracking worth skipping, so the field exists for
    /// constructor-shape parity rather than to gate any behavior.
    pub source_code_location_info: bool,
}

impl Default for TokenizerOpts {
    fn default() -> Self {
        TokenizerOpts {
            source_code_location_info: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharRunKind {
    None,
    Whitespace,
    Character,
}

enum NextChar {
    Char(char),
    Eof,
    EndOfChunk,
}

/// The result of one [`Tokenizer::dispatch`] call.
pub(crate) enum DispatchResult {
    Continue,
    Eof,
    /// The step consumed some input before discovering it needed more than
    /// is currently buffered. The caller must rewind the cursor (and any
    /// bookkeeping advanced during the step) and wait for more input.
    NeedMoreInput,
}

/// A streaming WHATWG HTML5 tokenizer.
///
/// Feed it input with [`Tokenizer::write`]; it calls back into a [`Sink`] in
/// token-stream order. `state`, `return_state`, `in_foreign_node` and
/// `last_start_tag_name` are all public so a tree constructor (or anything
/// playing that role) can drive RCDATA/RAWTEXT/script-data/PLAINTEXT/CDATA
/// switches the way [`Sink::on_start_tag`]'s return value and the
/// foreign-content insertion mode are meant to, and so fragment-parsing
/// contexts can seed `last_start_tag_name` before the first `write`, per
/// <https://html.spec.whatwg.org/#parsing-html-fragments>.
pub struct Tokenizer<S: Sink> {
    sink: S,
    pp: Preprocessor,
    /// Current state of the 79-state machine.
    pub state: State,
    /// Saved state to return to once the current character-reference chain
    /// (`&...`) resolves, per <https://html.spec.whatwg.org/#character-reference-state>.
    pub return_state: Option<State>,
    /// Whether the adjusted current node would be in a foreign (SVG/MathML)
    /// namespace, per <https://html.spec.whatwg.org/#markup-declaration-open-state>.
    /// Controls whether `<![CDATA[` is tokenized as CDATA or as a bogus
    /// comment; a tree constructor without any foreign content support can
    /// simply leave this `false` forever.
    pub in_foreign_node: bool,
    /// Lowercased name of the most recent start tag emitted. Governs the
    /// "appropriate end tag" check for RCDATA/RAWTEXT/SCRIPT_DATA end-tag
    /// states; a fragment parser seeds this with the context element's name
    /// before the first `write`.
    pub last_start_tag_name: String,
    opts: TokenizerOpts,
    paused: bool,
    last_validated_offset: u64,
    pending_stream_errors: Vec<ParseError>,
    temporary_buffer: String,
    character_reference_code: u32,
    pending_run: String,
    pending_kind: CharRunKind,
    current_tag_is_end: bool,
    current_tag_name: String,
    current_tag_self_closing: bool,
    current_attrs: Vec<Attribute>,
    current_attr: Option<(String, String)>,
    seen_attr_names: HashSet<String>,
    current_comment: String,
    current_doctype_name: Option<String>,
    current_doctype_public_id: Option<String>,
    current_doctype_system_id: Option<String>,
    current_doctype_force_quirks: bool,
    /// Location of the `<` that opened the tag/comment/doctype currently
    /// being constructed, captured when a text state sees `<` and taken
    /// (cleared) by whichever `init_*` call starts building a token from
    /// it. `None` once `source_code_location_info` is off.
    pending_token_start: Option<Location>,
    current_token_start: Option<Location>,
}

impl<S: Sink> Tokenizer<S> {
    /// Build a tokenizer in the `Data` state with default options.
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self::new_with_opts(sink, TokenizerOpts::default())
    }

    /// Build a tokenizer with explicit [`TokenizerOpts`].
    #[must_use]
    pub fn new_with_opts(sink: S, opts: TokenizerOpts) -> Self {
        Tokenizer {
            sink,
            pp: Preprocessor::new(),
            state: State::Data,
            return_state: None,
            in_foreign_node: false,
            last_start_tag_name: String::new(),
            opts,
            paused: false,
            last_validated_offset: 0,
            pending_stream_errors: Vec::new(),
            temporary_buffer: String::new(),
            character_reference_code: 0,
            pending_run: String::new(),
            pending_kind: CharRunKind::None,
            current_tag_is_end: false,
            current_tag_name: String::new(),
            current_tag_self_closing: false,
            current_attrs: Vec::new(),
            current_attr: None,
            seen_attr_names: HashSet::new(),
            current_comment: String::new(),
            current_doctype_name: None,
            current_doctype_public_id: None,
            current_doctype_system_id: None,
            current_doctype_force_quirks: false,
            pending_token_start: None,
            current_token_start: None,
        }
    }

    /// The options this tokenizer was constructed with.
    #[must_use]
    pub fn opts(&self) -> TokenizerOpts {
        self.opts
    }

    /// Borrow the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutably borrow the sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Discard the tokenizer, keeping only the sink.
    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Feed a chunk of input, running the state machine until either the
    /// buffered input is exhausted or [`Tokenizer::pause`] is called.
    ///
    /// `is_last` marks the final chunk: once set, running out of buffered
    /// input means end-of-file rather than a hibernation wait for more
    /// `write`/[`Tokenizer::insert_html_at_current_pos`] calls.
    pub fn write(&mut self, chunk: &str, is_last: bool) {
        self.pp.write(chunk, is_last);
        self.run();
        self.pp.drop_parsed_chunk();
    }

    /// Splice `chunk` into the input immediately after the cursor and run,
    /// as a `document.write`-like insertion point would.
    pub fn insert_html_at_current_pos(&mut self, chunk: &str) {
        self.pp.insert_html_at_current_pos(chunk);
        self.run();
    }

    /// Request that the run loop stop at the next step boundary.
    ///
    /// Safe to call from inside a [`Sink`] callback: the loop checks this
    /// flag at the head of each step, so pausing takes effect as soon as the
    /// in-progress callback returns.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Clear a prior [`Tokenizer::pause`] and resume running immediately.
    pub fn resume(&mut self) {
        self.paused = false;
        self.run();
    }

    fn run(&mut self) {
        loop {
            if self.paused {
                return;
            }
            let mark = self.pp.mark();
            let validated_mark = self.last_validated_offset;
            debug_assert!(self.pending_stream_errors.is_empty());
            match self.dispatch() {
                DispatchResult::Continue => {
                    self.flush_stream_errors();
                }
                DispatchResult::Eof => {
                    self.flush_stream_errors();
                    self.flush_pending_chars();
                    self.sink.on_eof();
                    return;
                }
                DispatchResult::NeedMoreInput => {
                    self.pp.reset_to(mark);
                    self.last_validated_offset = validated_mark;
                    self.pending_stream_errors.clear();
                    return;
                }
            }
        }
    }

    fn flush_stream_errors(&mut self) {
        for err in self.pending_stream_errors.drain(..) {
            self.sink.on_parse_error(err);
        }
    }

    /// Read one normalized code point, queuing a stream-validation error
    /// (surrogate/noncharacter/disallowed-control) the first time each
    /// absolute offset is consumed.
    ///
    /// Queued rather than reported immediately: if the step this call is
    /// part of turns out to need more input than is buffered, [`Tokenizer::run`]
    /// discards the queue along with the cursor rewind, and the same code
    /// point is re-validated (and, if still erroneous, re-queued) the next
    /// time it's read.
    fn next_char(&mut self) -> NextChar {
        match self.pp.advance() {
            Advance::Char(c) => {
                let offset = self.pp.current_location().offset;
                if offset > self.last_validated_offset || (offset == 0 && self.last_validated_offset == 0) {
                    self.last_validated_offset = offset;
                    if let Some(error) = validate_char(c) {
                        self.pending_stream_errors.push(ParseError {
                            error,
                            location: self.pp.current_location(),
                        });
                    }
                }
                NextChar::Char(c)
            }
            Advance::EndOfChunk => NextChar::EndOfChunk,
            Advance::Eof => NextChar::Eof,
        }
    }

    fn unread(&mut self, c: Option<char>) {
        if c.is_some() {
            self.pp.retreat(1);
        }
    }

    fn report_error(&mut self, error: Error) {
        let location = self.pp.current_location();
        self.sink.on_parse_error(ParseError { error, location });
    }

    fn is_consumed_as_part_of_an_attribute(&self) -> bool {
        matches!(
            self.return_state,
            Some(State::AttributeValueDoubleQuoted | State::AttributeValueSingleQuoted | State::AttributeValueUnquoted)
        )
    }

    fn flush_code_points_consumed_as_character_reference(&mut self) {
        if self.is_consumed_as_part_of_an_attribute() {
            let buf = std::mem::take(&mut self.temporary_buffer);
            self.push_attribute_value(&buf);
        } else {
            self.flush_buffer_characters();
        }
    }

    fn flush_buffer_characters(&mut self) {
        let buf = std::mem::take(&mut self.temporary_buffer);
        self.emit_str(&buf);
    }

    fn emit_char(&mut self, c: char) {
        let kind = if matches!(c, whitespace_pat!()) {
            CharRunKind::Whitespace
        } else {
            CharRunKind::Character
        };
        if self.pending_kind != CharRunKind::None && self.pending_kind != kind {
            self.flush_pending_chars();
        }
        self.pending_kind = kind;
        self.pending_run.push(c);
    }

    fn emit_str(&mut self, s: &str) {
        for c in s.chars() {
            self.emit_char(c);
        }
    }

    fn emit_null_character(&mut self) {
        self.flush_pending_chars();
        self.sink.on_null_character();
    }

    fn flush_pending_chars(&mut self) {
        if self.pending_run.is_empty() {
            self.pending_kind = CharRunKind::None;
            return;
        }
        let s = std::mem::take(&mut self.pending_run);
        match self.pending_kind {
            CharRunKind::Whitespace => self.sink.on_whitespace_character(&s),
            CharRunKind::Character => self.sink.on_character(&s),
            CharRunKind::None => unreachable!("non-empty pending_run implies a kind was set"),
        }
        self.pending_kind = CharRunKind::None;
    }

    fn init_start_tag(&mut self) {
        self.current_tag_is_end = false;
        self.current_tag_name.clear();
        self.current_tag_self_closing = false;
        self.current_attrs.clear();
        self.seen_attr_names.clear();
        self.current_attr = None;
        self.current_token_start = self.pending_token_start.take();
    }

    fn init_end_tag(&mut self) {
        self.current_tag_is_end = true;
        self.current_tag_name.clear();
        self.current_tag_self_closing = false;
        self.current_attrs.clear();
        self.seen_attr_names.clear();
        self.current_attr = None;
        self.current_token_start = self.pending_token_start.take();
    }

    fn push_tag_name(&mut self, s: &str) {
        self.current_tag_name.push_str(s);
    }

    fn set_self_closing(&mut self) {
        if self.current_tag_is_end {
            self.report_error(Error::EndTagWithTrailingSolidus);
        } else {
            self.current_tag_self_closing = true;
        }
    }

    fn init_attribute(&mut self) {
        self.flush_current_attribute();
        self.current_attr = Some((String::new(), String::new()));
    }

    fn push_attribute_name(&mut self, s: &str) {
        if let Some((name, _)) = &mut self.current_attr {
            name.push_str(s);
        }
    }

    fn push_attribute_value(&mut self, s: &str) {
        if let Some((_, value)) = &mut self.current_attr {
            value.push_str(s);
        }
    }

    fn flush_current_attribute(&mut self) {
        let Some((name, value)) = self.current_attr.take() else {
            return;
        };
        if self.current_tag_is_end {
            if !self.seen_attr_names.insert(name) {
                self.report_error(Error::DuplicateAttribute);
            }
        } else if self.seen_attr_names.insert(name.clone()) {
            self.current_attrs.push(Attribute { name, value });
        } else {
            self.report_error(Error::DuplicateAttribute);
        }
    }

    fn current_is_appropriate_end_tag_token(&self) -> bool {
        self.current_tag_is_end && !self.last_start_tag_name.is_empty() && self.last_start_tag_name == self.current_tag_name
    }

    /// Build the [`TokenLocation`] for the token currently being closed,
    /// pairing the `<`/`<!--`/`<!` start captured in `current_token_start`
    /// with the cursor's current position (one past the just-consumed
    /// closing delimiter). Returns `None` when location tracking is
    /// disabled via [`TokenizerOpts::source_code_location_info`].
    fn take_token_location(&mut self) -> Option<TokenLocation> {
        let start = self.current_token_start.take()?;
        if !self.opts.source_code_location_info {
            return None;
        }
        Some(TokenLocation {
            start,
            end: self.pp.current_location(),
        })
    }

    fn emit_current_tag(&mut self) {
        self.flush_current_attribute();
        self.flush_pending_chars();
        let location = self.take_token_location();
        if self.current_tag_is_end {
            if !self.seen_attr_names.is_empty() {
                self.report_error(Error::EndTagWithAttributes);
            }
            let name = std::mem::take(&mut self.current_tag_name);
            let tag_id = TagId::lookup(&name);
            let tag = EndTagToken { name, tag_id, location };
            self.last_start_tag_name.clear();
            self.sink.on_end_tag(tag);
        } else {
            self.last_start_tag_name = self.current_tag_name.clone();
            let name = std::mem::take(&mut self.current_tag_name);
            let tag_id = TagId::lookup(&name);
            let tag = StartTagToken {
                name,
                tag_id,
                attrs: std::mem::take(&mut self.current_attrs),
                self_closing: self.current_tag_self_closing,
                ack_self_closing: false,
                location,
            };
            if let Some(next_state) = self.sink.on_start_tag(tag) {
                self.state = next_state;
            }
        }
    }

    fn init_comment(&mut self) {
        self.current_comment.clear();
        self.current_token_start = self.pending_token_start.take();
    }

    fn push_comment(&mut self, s: &str) {
        self.current_comment.push_str(s);
    }

    fn emit_current_comment(&mut self) {
        self.flush_pending_chars();
        let location = self.take_token_location();
        let comment = CommentToken {
            data: std::mem::take(&mut self.current_comment),
            location,
        };
        self.sink.on_comment(comment);
    }

    fn init_doctype(&mut self) {
        self.current_doctype_name = None;
        self.current_doctype_public_id = None;
        self.current_doctype_system_id = None;
        self.current_doctype_force_quirks = false;
        self.current_token_start = self.pending_token_start.take();
    }

    fn push_doctype_name(&mut self, s: &str) {
        self.current_doctype_name.get_or_insert_with(String::new).push_str(s);
    }

    fn set_force_quirks(&mut self) {
        self.current_doctype_force_quirks = true;
    }

    fn set_doctype_public_identifier(&mut self, s: &str) {
        self.current_doctype_public_id = Some(s.to_string());
    }

    fn push_doctype_public_identifier(&mut self, s: &str) {
        if let Some(id) = &mut self.current_doctype_public_id {
            id.push_str(s);
        }
    }

    fn set_doctype_system_identifier(&mut self, s: &str) {
        self.current_doctype_system_id = Some(s.to_string());
    }

    fn push_doctype_system_identifier(&mut self, s: &str) {
        if let Some(id) = &mut self.current_doctype_system_id {
            id.push_str(s);
        }
    }

    fn emit_current_doctype(&mut self) {
        self.flush_pending_chars();
        let location = self.take_token_location();
        let doctype = DoctypeToken {
            name: std::mem::take(&mut self.current_doctype_name),
            public_id: std::mem::take(&mut self.current_doctype_public_id),
            system_id: std::mem::take(&mut self.current_doctype_system_id),
            force_quirks: self.current_doctype_force_quirks,
            location,
        };
        self.sink.on_doctype(doctype);
    }

    /// Run one state transition.
    pub(crate) fn dispatch(&mut self) -> DispatchResult {
        macro_rules! next_char {
            () => {
                match self.next_char() {
                    NextChar::Char(c) => Some(c),
                    NextChar::Eof => None,
                    NextChar::EndOfChunk => return DispatchResult::NeedMoreInput,
                }
            };
        }
        macro_rules! try_read {
            ($s:expr, $cs:expr) => {
                match self.pp.consume_if_starts_with($s, $cs) {
                    StartsWith::Yes => true,
                    StartsWith::No => false,
                    StartsWith::NeedMoreInput => return DispatchResult::NeedMoreInput,
                }
            };
        }
        macro_rules! mutate_character_reference {
            (* $mul:literal + $x:ident - $sub:literal) => {
                match self.character_reference_code.checked_mul($mul).and_then(|cr| cr.checked_add($x as u32 - $sub)) {
                    Some(cr) => self.character_reference_code = cr,
                    None => self.character_reference_code = 0x0011_0000,
                }
            };
        }

        trace_log!("dispatch: {:?}", self.state);
        // Position of whatever code point this step is about to consume --
        // exactly the position a `<` seen below would sit at, since `Location`
        // advances *after* each consumed char. Stashed into
        // `pending_token_start` so the eventual tag/comment/doctype token's
        // span starts at the opening delimiter rather than just after it.
        let step_start = self.pp.current_location();

        match self.state {
            State::Data => match next_char!() {
                Some('&') => {
                    self.return_state = Some(self.state);
                    self.state = State::CharacterReference;
                    DispatchResult::Continue
                }
                Some('<') => {
                    self.pending_token_start = Some(step_start);
                    self.state = State::TagOpen;
                    DispatchResult::Continue
                }
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    self.emit_null_character();
                    DispatchResult::Continue
                }
                Some(x) => {
                    self.emit_char(x);
                    DispatchResult::Continue
                }
                None => DispatchResult::Eof,
            },
            State::RcData => match next_char!() {
                Some('&') => {
                    self.return_state = Some(State::RcData);
                    self.state = State::CharacterReference;
                    DispatchResult::Continue
                }
                Some('<') => {
                    self.pending_token_start = Some(step_start);
                    self.state = State::RcDataLessThanSign;
                    DispatchResult::Continue
                }
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    self.emit_null_character();
                    DispatchResult::Continue
                }
                Some(x) => {
                    self.emit_char(x);
                    DispatchResult::Continue
                }
                None => DispatchResult::Eof,
            },
            State::RawText => match next_char!() {
                Some('<') => {
                    self.pending_token_start = Some(step_start);
                    self.state = State::RawTextLessThanSign;
                    DispatchResult::Continue
                }
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    self.emit_null_character();
                    DispatchResult::Continue
                }
                Some(x) => {
                    self.emit_char(x);
                    DispatchResult::Continue
                }
                None => DispatchResult::Eof,
            },
            State::ScriptData => match next_char!() {
                Some('<') => {
                    self.pending_token_start = Some(step_start);
                    self.state = State::ScriptDataLessThanSign;
                    DispatchResult::Continue
                }
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    self.emit_null_character();
                    DispatchResult::Continue
                }
                Some(x) => {
                    self.emit_char(x);
                    DispatchResult::Continue
                }
                None => DispatchResult::Eof,
            },
            State::PlainText => match next_char!() {
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    self.emit_null_character();
                    DispatchResult::Continue
                }
                Some(x) => {
                    self.emit_char(x);
                    DispatchResult::Continue
                }
                None => DispatchResult::Eof,
            },
            State::TagOpen => match next_char!() {
                Some('!') => {
                    self.state = State::MarkupDeclarationOpen;
                    DispatchResult::Continue
                }
                Some('/') => {
                    self.state = State::EndTagOpen;
                    DispatchResult::Continue
                }
                Some(x) if x.is_ascii_alphabetic() => {
                    self.init_start_tag();
                    self.state = State::TagName;
                    self.unread(Some(x));
                    DispatchResult::Continue
                }
                c @ Some('?') => {
                    self.report_error(Error::UnexpectedQuestionMarkInsteadOfTagName);
                    self.init_comment();
                    self.state = State::BogusComment;
                    self.unread(c);
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofBeforeTagName);
                    self.emit_str("<");
                    DispatchResult::Eof
                }
                c @ Some(_) => {
                    self.report_error(Error::InvalidFirstCharacterOfTagName);
                    self.state = State::Data;
                    self.emit_str("<");
                    self.unread(c);
                    DispatchResult::Continue
                }
            },
            State::EndTagOpen => match next_char!() {
                Some(x) if x.is_ascii_alphabetic() => {
                    self.init_end_tag();
                    self.state = State::TagName;
                    self.unread(Some(x));
                    DispatchResult::Continue
                }
                Some('>') => {
                    self.report_error(Error::MissingEndTagName);
                    self.state = State::Data;
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofBeforeTagName);
                    self.emit_str("</");
                    DispatchResult::Eof
                }
                Some(x) => {
                    self.report_error(Error::InvalidFirstCharacterOfTagName);
                    self.init_comment();
                    self.state = State::BogusComment;
                    self.unread(Some(x));
                    DispatchResult::Continue
                }
            },
            State::TagName => match next_char!() {
                Some(whitespace_pat!()) => {
                    self.state = State::BeforeAttributeName;
                    DispatchResult::Continue
                }
                Some('/') => {
                    self.state = State::SelfClosingStartTag;
                    DispatchResult::Continue
                }
                Some('>') => {
                    self.state = State::Data;
                    self.emit_current_tag();
                    DispatchResult::Continue
                }
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    self.push_tag_name("\u{fffd}");
                    DispatchResult::Continue
                }
                Some(x) => {
                    self.push_tag_name(ctostr!(x.to_ascii_lowercase()));
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInTag);
                    DispatchResult::Eof
                }
            },
            State::RcDataLessThanSign => match next_char!() {
                Some('/') => {
                    self.temporary_buffer.clear();
                    self.state = State::RcDataEndTagOpen;
                    DispatchResult::Continue
                }
                c => {
                    self.emit_str("<");
                    self.state = State::RcData;
                    self.unread(c);
                    DispatchResult::Continue
                }
            },
            State::RcDataEndTagOpen => match next_char!() {
                Some(x) if x.is_ascii_alphabetic() => {
                    self.init_end_tag();
                    self.state = State::RcDataEndTagName;
                    self.unread(Some(x));
                    DispatchResult::Continue
                }
                c => {
                    self.emit_str("</");
                    self.state = State::RcData;
                    self.unread(c);
                    DispatchResult::Continue
                }
            },
            State::RcDataEndTagName => match next_char!() {
                Some(whitespace_pat!()) if self.current_is_appropriate_end_tag_token() => {
                    self.state = State::BeforeAttributeName;
                    DispatchResult::Continue
                }
                Some('/') if self.current_is_appropriate_end_tag_token() => {
                    self.state = State::SelfClosingStartTag;
                    DispatchResult::Continue
                }
                Some('>') if self.current_is_appropriate_end_tag_token() => {
                    self.state = State::Data;
                    self.emit_current_tag();
                    DispatchResult::Continue
                }
                Some(x) if x.is_ascii_alphabetic() => {
                    self.push_tag_name(ctostr!(x.to_ascii_lowercase()));
                    self.temporary_buffer.push(x);
                    DispatchResult::Continue
                }
                c => {
                    self.emit_str("</");
                    self.flush_buffer_characters();
                    self.state = State::RcData;
                    self.unread(c);
                    DispatchResult::Continue
                }
            },
            State::RawTextLessThanSign => match next_char!() {
                Some('/') => {
                    self.temporary_buffer.clear();
                    self.state = State::RawTextEndTagOpen;
                    DispatchResult::Continue
                }
                c => {
                    self.emit_str("<");
                    self.state = State::RawText;
                    self.unread(c);
                    DispatchResult::Continue
                }
            },
            State::RawTextEndTagOpen => match next_char!() {
                Some(x) if x.is_ascii_alphabetic() => {
                    self.init_end_tag();
                    self.state = State::RawTextEndTagName;
                    self.unread(Some(x));
                    DispatchResult::Continue
                }
                c => {
                    self.emit_str("</");
                    self.state = State::RawText;
                    self.unread(c);
                    DispatchResult::Continue
                }
            },
            State::RawTextEndTagName => match next_char!() {
                Some(whitespace_pat!()) if self.current_is_appropriate_end_tag_token() => {
                    self.state = State::BeforeAttributeName;
                    DispatchResult::Continue
                }
                Some('/') if self.current_is_appropriate_end_tag_token() => {
                    self.state = State::SelfClosingStartTag;
                    DispatchResult::Continue
                }
                Some('>') if self.current_is_appropriate_end_tag_token() => {
                    self.state = State::Data;
                    self.emit_current_tag();
                    DispatchResult::Continue
                }
                Some(x) if x.is_ascii_alphabetic() => {
                    self.push_tag_name(ctostr!(x.to_ascii_lowercase()));
                    self.temporary_buffer.push(x);
                    DispatchResult::Continue
                }
                c => {
                    self.emit_str("</");
                    self.flush_buffer_characters();
                    self.state = State::RawText;
                    self.unread(c);
                    DispatchResult::Continue
                }
            },
            State::ScriptDataLessThanSign => match next_char!() {
                Some('/') => {
                    self.temporary_buffer.clear();
                    self.state = State::ScriptDataEndTagOpen;
                    DispatchResult::Continue
                }
                Some('!') => {
                    self.state = State::ScriptDataEscapeStart;
                    self.emit_str("<!");
                    DispatchResult::Continue
                }
                c => {
                    self.emit_str("<");
                    self.state = State::ScriptData;
                    self.unread(c);
                    DispatchResult::Continue
                }
            },
            State::ScriptDataEndTagOpen => match next_char!() {
                Some(x) if x.is_ascii_alphabetic() => {
                    self.init_end_tag();
                    self.state = State::ScriptDataEndTagName;
                    self.unread(Some(x));
                    DispatchResult::Continue
                }
                c => {
                    self.emit_str("</");
                    self.state = State::ScriptData;
                    self.unread(c);
                    DispatchResult::Continue
                }
            },
            State::ScriptDataEndTagName => match next_char!() {
                Some(whitespace_pat!()) if self.current_is_appropriate_end_tag_token() => {
                    self.state = State::BeforeAttributeName;
                    DispatchResult::Continue
                }
                Some('/') if self.current_is_appropriate_end_tag_token() => {
                    self.state = State::SelfClosingStartTag;
                    DispatchResult::Continue
                }
                Some('>') if self.current_is_appropriate_end_tag_token() => {
                    self.state = State::Data;
                    self.emit_current_tag();
                    DispatchResult::Continue
                }
                Some(x) if x.is_ascii_alphabetic() => {
                    self.push_tag_name(ctostr!(x.to_ascii_lowercase()));
                    self.temporary_buffer.push(x.to_ascii_lowercase());
                    DispatchResult::Continue
                }
                c => {
                    self.emit_str("</");
                    self.flush_buffer_characters();
                    self.state = State::ScriptData;
                    self.unread(c);
                    DispatchResult::Continue
                }
            },
            State::ScriptDataEscapeStart => match next_char!() {
                Some('-') => {
                    self.state = State::ScriptDataEscapeStartDash;
                    self.emit_str("-");
                    DispatchResult::Continue
                }
                c => {
                    self.state = State::ScriptData;
                    self.unread(c);
                    DispatchResult::Continue
                }
            },
            State::ScriptDataEscapeStartDash => match next_char!() {
                Some('-') => {
                    self.state = State::ScriptDataEscapedDashDash;
                    self.emit_str("-");
                    DispatchResult::Continue
                }
                c => {
                    self.state = State::ScriptData;
                    self.unread(c);
                    DispatchResult::Continue
                }
            },
            State::ScriptDataEscaped => match next_char!() {
                Some('-') => {
                    self.state = State::ScriptDataEscapedDash;
                    self.emit_str("-");
                    DispatchResult::Continue
                }
                Some('<') => {
                    self.pending_token_start = Some(step_start);
                    self.state = State::ScriptDataEscapedLessThanSign;
                    DispatchResult::Continue
                }
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    self.emit_null_character();
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInScriptHtmlCommentLikeText);
                    DispatchResult::Eof
                }
                Some(x) => {
                    self.emit_char(x);
                    DispatchResult::Continue
                }
            },
            State::ScriptDataEscapedDash => match next_char!() {
                Some('-') => {
                    self.state = State::ScriptDataEscapedDashDash;
                    self.emit_str("-");
                    DispatchResult::Continue
                }
                Some('<') => {
                    self.pending_token_start = Some(step_start);
                    self.state = State::ScriptDataEscapedLessThanSign;
                    DispatchResult::Continue
                }
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    self.state = State::ScriptDataEscaped;
                    self.emit_null_character();
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInScriptHtmlCommentLikeText);
                    DispatchResult::Eof
                }
                Some(x) => {
                    self.state = State::ScriptDataEscaped;
                    self.emit_char(x);
                    DispatchResult::Continue
                }
            },
            State::ScriptDataEscapedDashDash => match next_char!() {
                Some('-') => {
                    self.emit_str("-");
                    DispatchResult::Continue
                }
                Some('<') => {
                    self.pending_token_start = Some(step_start);
                    self.state = State::ScriptDataEscapedLessThanSign;
                    DispatchResult::Continue
                }
                Some('>') => {
                    self.state = State::ScriptData;
                    self.emit_str(">");
                    DispatchResult::Continue
                }
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    self.state = State::ScriptDataEscaped;
                    self.emit_null_character();
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInScriptHtmlCommentLikeText);
                    DispatchResult::Eof
                }
                Some(x) => {
                    self.state = State::ScriptDataEscaped;
                    self.emit_char(x);
                    DispatchResult::Continue
                }
            },
            State::ScriptDataEscapedLessThanSign => match next_char!() {
                Some('/') => {
                    self.temporary_buffer.clear();
                    self.state = State::ScriptDataEscapedEndTagOpen;
                    DispatchResult::Continue
                }
                Some(x) if x.is_ascii_alphabetic() => {
                    self.temporary_buffer.clear();
                    self.emit_str("<");
                    self.state = State::ScriptDataDoubleEscapeStart;
                    self.unread(Some(x));
                    DispatchResult::Continue
                }
                c => {
                    self.emit_str("<");
                    self.state = State::ScriptDataEscaped;
                    self.unread(c);
                    DispatchResult::Continue
                }
            },
            State::ScriptDataEscapedEndTagOpen => match next_char!() {
                Some(x) if x.is_ascii_alphabetic() => {
                    self.init_end_tag();
                    self.state = State::ScriptDataEscapedEndTagName;
                    self.unread(Some(x));
                    DispatchResult::Continue
                }
                c => {
                    self.emit_str("</");
                    self.unread(c);
                    self.state = State::ScriptDataEscaped;
                    DispatchResult::Continue
                }
            },
            State::ScriptDataEscapedEndTagName => match next_char!() {
                Some(whitespace_pat!()) if self.current_is_appropriate_end_tag_token() => {
                    self.state = State::BeforeAttributeName;
                    DispatchResult::Continue
                }
                Some('/') if self.current_is_appropriate_end_tag_token() => {
                    self.state = State::SelfClosingStartTag;
                    DispatchResult::Continue
                }
                Some('>') if self.current_is_appropriate_end_tag_token() => {
                    self.state = State::Data;
                    self.emit_current_tag();
                    DispatchResult::Continue
                }
                Some(x) if x.is_ascii_alphabetic() => {
                    self.push_tag_name(ctostr!(x.to_ascii_lowercase()));
                    self.temporary_buffer.push(x);
                    DispatchResult::Continue
                }
                c => {
                    self.emit_str("</");
                    self.flush_buffer_characters();
                    self.state = State::ScriptDataEscaped;
                    self.unread(c);
                    DispatchResult::Continue
                }
            },
            State::ScriptDataDoubleEscapeStart => match next_char!() {
                Some(x @ (whitespace_pat!() | '/' | '>')) => {
                    if self.temporary_buffer == "script" {
                        self.state = State::ScriptDataDoubleEscaped;
                    } else {
                        self.state = State::ScriptDataEscaped;
                    }
                    self.emit_char(x);
                    DispatchResult::Continue
                }
                Some(x) if x.is_ascii_alphabetic() => {
                    self.temporary_buffer.push(x.to_ascii_lowercase());
                    self.emit_char(x);
                    DispatchResult::Continue
                }
                c => {
                    self.state = State::ScriptDataEscaped;
                    self.unread(c);
                    DispatchResult::Continue
                }
            },
            State::ScriptDataDoubleEscaped => match next_char!() {
                Some('-') => {
                    self.state = State::ScriptDataDoubleEscapedDash;
                    self.emit_str("-");
                    DispatchResult::Continue
                }
                Some('<') => {
                    self.state = State::ScriptDataDoubleEscapedLessThanSign;
                    self.emit_str("<");
                    DispatchResult::Continue
                }
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    self.emit_null_character();
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInScriptHtmlCommentLikeText);
                    DispatchResult::Eof
                }
                Some(x) => {
                    self.emit_char(x);
                    DispatchResult::Continue
                }
            },
            State::ScriptDataDoubleEscapedDash => match next_char!() {
                Some('-') => {
                    self.state = State::ScriptDataDoubleEscapedDashDash;
                    self.emit_str("-");
                    DispatchResult::Continue
                }
                Some('<') => {
                    self.state = State::ScriptDataDoubleEscapedLessThanSign;
                    self.emit_str("<");
                    DispatchResult::Continue
                }
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    self.state = State::ScriptDataDoubleEscaped;
                    self.emit_null_character();
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInScriptHtmlCommentLikeText);
                    DispatchResult::Eof
                }
                Some(x) => {
                    self.state = State::ScriptDataDoubleEscaped;
                    self.emit_char(x);
                    DispatchResult::Continue
                }
            },
            State::ScriptDataDoubleEscapedDashDash => match next_char!() {
                Some('-') => {
                    self.emit_str("-");
                    DispatchResult::Continue
                }
                Some('<') => {
                    self.emit_str("<");
                    self.state = State::ScriptDataDoubleEscapedLessThanSign;
                    DispatchResult::Continue
                }
                Some('>') => {
                    self.emit_str(">");
                    self.state = State::ScriptData;
                    DispatchResult::Continue
                }
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    self.state = State::ScriptDataDoubleEscaped;
                    self.emit_null_character();
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInScriptHtmlCommentLikeText);
                    DispatchResult::Eof
                }
                Some(x) => {
                    self.state = State::ScriptDataDoubleEscaped;
                    self.emit_char(x);
                    DispatchResult::Continue
                }
            },
            State::ScriptDataDoubleEscapedLessThanSign => match next_char!() {
                Some('/') => {
                    self.temporary_buffer.clear();
                    self.state = State::ScriptDataDoubleEscapeEnd;
                    self.emit_str("/");
                    DispatchResult::Continue
                }
                c => {
                    self.state = State::ScriptDataDoubleEscaped;
                    self.unread(c);
                    DispatchResult::Continue
                }
            },
            State::ScriptDataDoubleEscapeEnd => match next_char!() {
                Some(x @ (whitespace_pat!() | '/' | '>')) => {
                    if self.temporary_buffer == "script" {
                        self.state = State::ScriptDataEscaped;
                    } else {
                        self.state = State::ScriptDataDoubleEscaped;
                    }
                    self.emit_char(x);
                    DispatchResult::Continue
                }
                Some(x) if x.is_ascii_alphabetic() => {
                    self.temporary_buffer.push(x.to_ascii_lowercase());
                    self.emit_char(x);
                    DispatchResult::Continue
                }
                c => {
                    self.state = State::ScriptDataDoubleEscaped;
                    self.unread(c);
                    DispatchResult::Continue
                }
            },
            State::BeforeAttributeName => match next_char!() {
                Some(whitespace_pat!()) => DispatchResult::Continue,
                c @ (Some('/' | '>') | None) => {
                    self.state = State::AfterAttributeName;
                    self.unread(c);
                    DispatchResult::Continue
                }
                Some('=') => {
                    self.report_error(Error::UnexpectedEqualsSignBeforeAttributeName);
                    self.init_attribute();
                    self.push_attribute_name("=");
                    self.state = State::AttributeName;
                    DispatchResult::Continue
                }
                Some(x) => {
                    self.init_attribute();
                    self.state = State::AttributeName;
                    self.unread(Some(x));
                    DispatchResult::Continue
                }
            },
            State::AttributeName => match next_char!() {
                c @ (Some(whitespace_pat!() | '/' | '>') | None) => {
                    self.state = State::AfterAttributeName;
                    self.unread(c);
                    DispatchResult::Continue
                }
                Some('=') => {
                    self.state = State::BeforeAttributeValue;
                    DispatchResult::Continue
                }
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    self.push_attribute_name("\u{fffd}");
                    DispatchResult::Continue
                }
                Some(x @ ('"' | '\'' | '<')) => {
                    self.report_error(Error::UnexpectedCharacterInAttributeName);
                    self.push_attribute_name(ctostr!(x.to_ascii_lowercase()));
                    DispatchResult::Continue
                }
                Some(x) => {
                    self.push_attribute_name(ctostr!(x.to_ascii_lowercase()));
                    DispatchResult::Continue
                }
            },
            State::AfterAttributeName => match next_char!() {
                Some(whitespace_pat!()) => DispatchResult::Continue,
                Some('/') => {
                    self.state = State::SelfClosingStartTag;
                    DispatchResult::Continue
                }
                Some('=') => {
                    self.state = State::BeforeAttributeValue;
                    DispatchResult::Continue
                }
                Some('>') => {
                    self.state = State::Data;
                    self.emit_current_tag();
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInTag);
                    DispatchResult::Eof
                }
                Some(x) => {
                    self.init_attribute();
                    self.state = State::AttributeName;
                    self.unread(Some(x));
                    DispatchResult::Continue
                }
            },
            State::BeforeAttributeValue => match next_char!() {
                Some(whitespace_pat!()) => DispatchResult::Continue,
                Some('"') => {
                    self.state = State::AttributeValueDoubleQuoted;
                    DispatchResult::Continue
                }
                Some('\'') => {
                    self.state = State::AttributeValueSingleQuoted;
                    DispatchResult::Continue
                }
                Some('>') => {
                    self.report_error(Error::MissingAttributeValue);
                    self.state = State::Data;
                    self.emit_current_tag();
                    DispatchResult::Continue
                }
                c => {
                    self.state = State::AttributeValueUnquoted;
                    self.unread(c);
                    DispatchResult::Continue
                }
            },
            State::AttributeValueDoubleQuoted => match next_char!() {
                Some('"') => {
                    self.state = State::AfterAttributeValueQuoted;
                    DispatchResult::Continue
                }
                Some('&') => {
                    self.return_state = Some(State::AttributeValueDoubleQuoted);
                    self.state = State::CharacterReference;
                    DispatchResult::Continue
                }
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    self.push_attribute_value("\u{fffd}");
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInTag);
                    DispatchResult::Eof
                }
                Some(x) => {
                    self.push_attribute_value(ctostr!(x));
                    DispatchResult::Continue
                }
            },
            State::AttributeValueSingleQuoted => match next_char!() {
                Some('\'') => {
                    self.state = State::AfterAttributeValueQuoted;
                    DispatchResult::Continue
                }
                Some('&') => {
                    self.return_state = Some(State::AttributeValueSingleQuoted);
                    self.state = State::CharacterReference;
                    DispatchResult::Continue
                }
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    self.push_attribute_value("\u{fffd}");
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInTag);
                    DispatchResult::Eof
                }
                Some(x) => {
                    self.push_attribute_value(ctostr!(x));
                    DispatchResult::Continue
                }
            },
            State::AttributeValueUnquoted => match next_char!() {
                Some(whitespace_pat!()) => {
                    self.state = State::BeforeAttributeName;
                    DispatchResult::Continue
                }
                Some('&') => {
                    self.return_state = Some(State::AttributeValueUnquoted);
                    self.state = State::CharacterReference;
                    DispatchResult::Continue
                }
                Some('>') => {
                    self.state = State::Data;
                    self.emit_current_tag();
                    DispatchResult::Continue
                }
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    self.push_attribute_value("\u{fffd}");
                    DispatchResult::Continue
                }
                Some(x @ ('"' | '\'' | '<' | '=' | '\u{60}')) => {
                    self.report_error(Error::UnexpectedCharacterInUnquotedAttributeValue);
                    self.push_attribute_value(ctostr!(x));
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInTag);
                    DispatchResult::Eof
                }
                Some(x) => {
                    self.push_attribute_value(ctostr!(x));
                    DispatchResult::Continue
                }
            },
            State::AfterAttributeValueQuoted => match next_char!() {
                Some(whitespace_pat!()) => {
                    self.state = State::BeforeAttributeName;
                    DispatchResult::Continue
                }
                Some('/') => {
                    self.state = State::SelfClosingStartTag;
                    DispatchResult::Continue
                }
                Some('>') => {
                    self.state = State::Data;
                    self.emit_current_tag();
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInTag);
                    DispatchResult::Eof
                }
                Some(x) => {
                    self.report_error(Error::MissingWhitespaceBetweenAttributes);
                    self.state = State::BeforeAttributeName;
                    self.unread(Some(x));
                    DispatchResult::Continue
                }
            },
            State::SelfClosingStartTag => match next_char!() {
                Some('>') => {
                    self.set_self_closing();
                    self.state = State::Data;
                    self.emit_current_tag();
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInTag);
                    DispatchResult::Eof
                }
                Some(x) => {
                    self.report_error(Error::UnexpectedSolidusInTag);
                    self.state = State::BeforeAttributeName;
                    self.unread(Some(x));
                    DispatchResult::Continue
                }
            },
            State::BogusComment => match next_char!() {
                Some('>') => {
                    self.state = State::Data;
                    self.emit_current_comment();
                    DispatchResult::Continue
                }
                None => {
                    self.emit_current_comment();
                    DispatchResult::Eof
                }
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    self.push_comment("\u{fffd}");
                    DispatchResult::Continue
                }
                Some(x) => {
                    self.push_comment(ctostr!(x));
                    DispatchResult::Continue
                }
            },
            State::MarkupDeclarationOpen => match next_char!() {
                Some('-') if try_read!("-", true) => {
                    self.init_comment();
                    self.state = State::CommentStart;
                    DispatchResult::Continue
                }
                Some('d' | 'D') if try_read!("octype", false) => {
                    self.state = State::Doctype;
                    DispatchResult::Continue
                }
                Some('[') if try_read!("CDATA[", true) => {
                    if self.in_foreign_node {
                        self.state = State::CdataSection;
                    } else {
                        self.report_error(Error::CdataInHtmlContent);
                        self.init_comment();
                        self.push_comment("[CDATA[");
                        self.state = State::BogusComment;
                    }
                    DispatchResult::Continue
                }
                c => {
                    self.report_error(Error::IncorrectlyOpenedComment);
                    self.init_comment();
                    self.state = State::BogusComment;
                    self.unread(c);
                    DispatchResult::Continue
                }
            },
            State::CommentStart => match next_char!() {
                Some('-') => {
                    self.state = State::CommentStartDash;
                    DispatchResult::Continue
                }
                Some('>') => {
                    self.report_error(Error::AbruptClosingOfEmptyComment);
                    self.state = State::Data;
                    self.emit_current_comment();
                    DispatchResult::Continue
                }
                c => {
                    self.unread(c);
                    self.state = State::Comment;
                    DispatchResult::Continue
                }
            },
            State::CommentStartDash => match next_char!() {
                Some('-') => {
                    self.state = State::CommentEnd;
                    DispatchResult::Continue
                }
                Some('>') => {
                    self.report_error(Error::AbruptClosingOfEmptyComment);
                    self.state = State::Data;
                    self.emit_current_comment();
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInComment);
                    self.emit_current_comment();
                    DispatchResult::Eof
                }
                c => {
                    self.push_comment("-");
                    self.unread(c);
                    self.state = State::Comment;
                    DispatchResult::Continue
                }
            },
            State::Comment => match next_char!() {
                Some('<') => {
                    self.push_comment("<");
                    self.state = State::CommentLessThanSign;
                    DispatchResult::Continue
                }
                Some('-') => {
                    self.state = State::CommentEndDash;
                    DispatchResult::Continue
                }
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    self.push_comment("\u{fffd}");
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInComment);
                    self.emit_current_comment();
                    DispatchResult::Eof
                }
                Some(x) => {
                    self.push_comment(ctostr!(x));
                    DispatchResult::Continue
                }
            },
            State::CommentLessThanSign => match next_char!() {
                Some('!') => {
                    self.push_comment("!");
                    self.state = State::CommentLessThanSignBang;
                    DispatchResult::Continue
                }
                Some('<') => {
                    self.push_comment("<");
                    DispatchResult::Continue
                }
                c => {
                    self.unread(c);
                    self.state = State::Comment;
                    DispatchResult::Continue
                }
            },
            State::CommentLessThanSignBang => match next_char!() {
                Some('-') => {
                    self.state = State::CommentLessThanSignBangDash;
                    DispatchResult::Continue
                }
                c => {
                    self.unread(c);
                    self.state = State::Comment;
                    DispatchResult::Continue
                }
            },
            State::CommentLessThanSignBangDash => match next_char!() {
                Some('-') => {
                    self.state = State::CommentLessThanSignBangDashDash;
                    DispatchResult::Continue
                }
                c => {
                    self.unread(c);
                    self.state = State::CommentEndDash;
                    DispatchResult::Continue
                }
            },
            State::CommentLessThanSignBangDashDash => match next_char!() {
                c @ (Some('>') | None) => {
                    self.unread(c);
                    self.state = State::CommentEnd;
                    DispatchResult::Continue
                }
                c => {
                    self.report_error(Error::NestedComment);
                    self.unread(c);
                    self.state = State::CommentEnd;
                    DispatchResult::Continue
                }
            },
            State::CommentEndDash => match next_char!() {
                Some('-') => {
                    self.state = State::CommentEnd;
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInComment);
                    self.emit_current_comment();
                    DispatchResult::Eof
                }
                c => {
                    self.push_comment("-");
                    self.unread(c);
                    self.state = State::Comment;
                    DispatchResult::Continue
                }
            },
            State::CommentEnd => match next_char!() {
                Some('>') => {
                    self.state = State::Data;
                    self.emit_current_comment();
                    DispatchResult::Continue
                }
                Some('!') => {
                    self.state = State::CommentEndBang;
                    DispatchResult::Continue
                }
                Some('-') => {
                    self.push_comment("-");
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInComment);
                    self.emit_current_comment();
                    DispatchResult::Eof
                }
                c => {
                    self.push_comment("-");
                    self.push_comment("-");
                    self.unread(c);
                    self.state = State::Comment;
                    DispatchResult::Continue
                }
            },
            State::CommentEndBang => match next_char!() {
                Some('-') => {
                    self.push_comment("-");
                    self.push_comment("-");
                    self.push_comment("!");
                    self.state = State::CommentEndDash;
                    DispatchResult::Continue
                }
                Some('>') => {
                    self.report_error(Error::IncorrectlyClosedComment);
                    self.state = State::Data;
                    self.emit_current_comment();
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInComment);
                    self.emit_current_comment();
                    DispatchResult::Eof
                }
                c => {
                    self.push_comment("-");
                    self.push_comment("-");
                    self.push_comment("!");
                    self.state = State::Comment;
                    self.unread(c);
                    DispatchResult::Continue
                }
            },
            State::Doctype => match next_char!() {
                Some(whitespace_pat!()) => {
                    self.state = State::BeforeDoctypeName;
                    DispatchResult::Continue
                }
                c @ Some('>') => {
                    self.unread(c);
                    self.state = State::BeforeDoctypeName;
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInDoctype);
                    self.init_doctype();
                    self.set_force_quirks();
                    self.emit_current_doctype();
                    DispatchResult::Eof
                }
                c @ Some(_) => {
                    self.report_error(Error::MissingWhitespaceBeforeDoctypeName);
                    self.unread(c);
                    self.state = State::BeforeDoctypeName;
                    DispatchResult::Continue
                }
            },
            State::BeforeDoctypeName => match next_char!() {
                Some(whitespace_pat!()) => DispatchResult::Continue,
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    self.init_doctype();
                    self.push_doctype_name("\u{fffd}");
                    self.state = State::DoctypeName;
                    DispatchResult::Continue
                }
                Some('>') => {
                    self.report_error(Error::MissingDoctypeName);
                    self.init_doctype();
                    self.set_force_quirks();
                    self.state = State::Data;
                    self.emit_current_doctype();
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInDoctype);
                    self.init_doctype();
                    self.set_force_quirks();
                    self.emit_current_doctype();
                    DispatchResult::Eof
                }
                Some(x) => {
                    self.init_doctype();
                    self.push_doctype_name(ctostr!(x.to_ascii_lowercase()));
                    self.state = State::DoctypeName;
                    DispatchResult::Continue
                }
            },
            State::DoctypeName => match next_char!() {
                Some(whitespace_pat!()) => {
                    self.state = State::AfterDoctypeName;
                    DispatchResult::Continue
                }
                Some('>') => {
                    self.state = State::Data;
                    self.emit_current_doctype();
                    DispatchResult::Continue
                }
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    self.push_doctype_name("\u{fffd}");
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInDoctype);
                    self.set_force_quirks();
                    self.emit_current_doctype();
                    DispatchResult::Eof
                }
                Some(x) => {
                    self.push_doctype_name(ctostr!(x.to_ascii_lowercase()));
                    DispatchResult::Continue
                }
            },
            State::AfterDoctypeName => match next_char!() {
                Some(whitespace_pat!()) => DispatchResult::Continue,
                Some('>') => {
                    self.state = State::Data;
                    self.emit_current_doctype();
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInDoctype);
                    self.set_force_quirks();
                    self.emit_current_doctype();
                    DispatchResult::Eof
                }
                Some('p' | 'P') if try_read!("ublic", false) => {
                    self.state = State::AfterDoctypePublicKeyword;
                    DispatchResult::Continue
                }
                Some('s' | 'S') if try_read!("ystem", false) => {
                    self.state = State::AfterDoctypeSystemKeyword;
                    DispatchResult::Continue
                }
                c @ Some(_) => {
                    self.report_error(Error::InvalidCharacterSequenceAfterDoctypeName);
                    self.set_force_quirks();
                    self.unread(c);
                    self.state = State::BogusDoctype;
                    DispatchResult::Continue
                }
            },
            State::AfterDoctypePublicKeyword => match next_char!() {
                Some(whitespace_pat!()) => {
                    self.state = State::BeforeDoctypePublicIdentifier;
                    DispatchResult::Continue
                }
                Some('"') => {
                    self.report_error(Error::MissingWhitespaceAfterDoctypePublicKeyword);
                    self.set_doctype_public_identifier("");
                    self.state = State::DoctypePublicIdentifierDoubleQuoted;
                    DispatchResult::Continue
                }
                Some('\'') => {
                    self.report_error(Error::MissingWhitespaceAfterDoctypePublicKeyword);
                    self.set_doctype_public_identifier("");
                    self.state = State::DoctypePublicIdentifierSingleQuoted;
                    DispatchResult::Continue
                }
                Some('>') => {
                    self.report_error(Error::MissingDoctypePublicIdentifier);
                    self.set_force_quirks();
                    self.state = State::Data;
                    self.emit_current_doctype();
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInDoctype);
                    self.set_force_quirks();
                    self.emit_current_doctype();
                    DispatchResult::Eof
                }
                c @ Some(_) => {
                    self.report_error(Error::MissingQuoteBeforeDoctypePublicIdentifier);
                    self.set_force_quirks();
                    self.unread(c);
                    self.state = State::BogusDoctype;
                    DispatchResult::Continue
                }
            },
            State::BeforeDoctypePublicIdentifier => match next_char!() {
                Some(whitespace_pat!()) => DispatchResult::Continue,
                Some('"') => {
                    self.set_doctype_public_identifier("");
                    self.state = State::DoctypePublicIdentifierDoubleQuoted;
                    DispatchResult::Continue
                }
                Some('\'') => {
                    self.set_doctype_public_identifier("");
                    self.state = State::DoctypePublicIdentifierSingleQuoted;
                    DispatchResult::Continue
                }
                Some('>') => {
                    self.report_error(Error::MissingDoctypePublicIdentifier);
                    self.set_force_quirks();
                    self.state = State::Data;
                    self.emit_current_doctype();
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInDoctype);
                    self.set_force_quirks();
                    self.emit_current_doctype();
                    DispatchResult::Eof
                }
                c @ Some(_) => {
                    self.report_error(Error::MissingQuoteBeforeDoctypePublicIdentifier);
                    self.set_force_quirks();
                    self.unread(c);
                    self.state = State::BogusDoctype;
                    DispatchResult::Continue
                }
            },
            State::DoctypePublicIdentifierDoubleQuoted => match next_char!() {
                Some('"') => {
                    self.state = State::AfterDoctypePublicIdentifier;
                    DispatchResult::Continue
                }
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    self.push_doctype_public_identifier("\u{fffd}");
                    DispatchResult::Continue
                }
                Some('>') => {
                    self.report_error(Error::AbruptDoctypePublicIdentifier);
                    self.set_force_quirks();
                    self.state = State::Data;
                    self.emit_current_doctype();
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInDoctype);
                    self.set_force_quirks();
                    self.emit_current_doctype();
                    DispatchResult::Eof
                }
                Some(x) => {
                    self.push_doctype_public_identifier(ctostr!(x));
                    DispatchResult::Continue
                }
            },
            State::DoctypePublicIdentifierSingleQuoted => match next_char!() {
                Some('\'') => {
                    self.state = State::AfterDoctypePublicIdentifier;
                    DispatchResult::Continue
                }
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    self.push_doctype_public_identifier("\u{fffd}");
                    DispatchResult::Continue
                }
                Some('>') => {
                    self.report_error(Error::AbruptDoctypePublicIdentifier);
                    self.set_force_quirks();
                    self.state = State::Data;
                    self.emit_current_doctype();
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInDoctype);
                    self.set_force_quirks();
                    self.emit_current_doctype();
                    DispatchResult::Eof
                }
                Some(x) => {
                    self.push_doctype_public_identifier(ctostr!(x));
                    DispatchResult::Continue
                }
            },
            State::AfterDoctypePublicIdentifier => match next_char!() {
                Some(whitespace_pat!()) => {
                    self.state = State::BetweenDoctypePublicAndSystemIdentifiers;
                    DispatchResult::Continue
                }
                Some('>') => {
                    self.state = State::Data;
                    self.emit_current_doctype();
                    DispatchResult::Continue
                }
                Some('"') => {
                    self.report_error(Error::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers);
                    self.set_doctype_system_identifier("");
                    self.state = State::DoctypeSystemIdentifierDoubleQuoted;
                    DispatchResult::Continue
                }
                Some('\'') => {
                    self.report_error(Error::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers);
                    self.set_doctype_system_identifier("");
                    self.state = State::DoctypeSystemIdentifierSingleQuoted;
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInDoctype);
                    self.set_force_quirks();
                    self.emit_current_doctype();
                    DispatchResult::Eof
                }
                c @ Some(_) => {
                    self.report_error(Error::MissingQuoteBeforeDoctypeSystemIdentifier);
                    self.set_force_quirks();
                    self.unread(c);
                    self.state = State::BogusDoctype;
                    DispatchResult::Continue
                }
            },
            State::BetweenDoctypePublicAndSystemIdentifiers => match next_char!() {
                Some(whitespace_pat!()) => DispatchResult::Continue,
                Some('>') => {
                    self.state = State::Data;
                    self.emit_current_doctype();
                    DispatchResult::Continue
                }
                Some('"') => {
                    self.set_doctype_system_identifier("");
                    self.state = State::DoctypeSystemIdentifierDoubleQuoted;
                    DispatchResult::Continue
                }
                Some('\'') => {
                    self.set_doctype_system_identifier("");
                    self.state = State::DoctypeSystemIdentifierSingleQuoted;
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInDoctype);
                    self.set_force_quirks();
                    self.emit_current_doctype();
                    DispatchResult::Eof
                }
                c @ Some(_) => {
                    self.report_error(Error::MissingQuoteBeforeDoctypeSystemIdentifier);
                    self.set_force_quirks();
                    self.state = State::BogusDoctype;
                    self.unread(c);
                    DispatchResult::Continue
                }
            },
            State::AfterDoctypeSystemKeyword => match next_char!() {
                Some(whitespace_pat!()) => {
                    self.state = State::BeforeDoctypeSystemIdentifier;
                    DispatchResult::Continue
                }
                Some('"') => {
                    self.report_error(Error::MissingWhitespaceAfterDoctypeSystemKeyword);
                    self.set_doctype_system_identifier("");
                    self.state = State::DoctypeSystemIdentifierDoubleQuoted;
                    DispatchResult::Continue
                }
                Some('\'') => {
                    self.report_error(Error::MissingWhitespaceAfterDoctypeSystemKeyword);
                    self.set_doctype_system_identifier("");
                    self.state = State::DoctypeSystemIdentifierSingleQuoted;
                    DispatchResult::Continue
                }
                Some('>') => {
                    self.report_error(Error::MissingDoctypeSystemIdentifier);
                    self.set_force_quirks();
                    self.state = State::Data;
                    self.emit_current_doctype();
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInDoctype);
                    self.set_force_quirks();
                    self.emit_current_doctype();
                    DispatchResult::Eof
                }
                c @ Some(_) => {
                    self.report_error(Error::MissingQuoteBeforeDoctypeSystemIdentifier);
                    self.set_force_quirks();
                    self.state = State::BogusDoctype;
                    self.unread(c);
                    DispatchResult::Continue
                }
            },
            State::BeforeDoctypeSystemIdentifier => match next_char!() {
                Some(whitespace_pat!()) => DispatchResult::Continue,
                Some('"') => {
                    self.set_doctype_system_identifier("");
                    self.state = State::DoctypeSystemIdentifierDoubleQuoted;
                    DispatchResult::Continue
                }
                Some('\'') => {
                    self.set_doctype_system_identifier("");
                    self.state = State::DoctypeSystemIdentifierSingleQuoted;
                    DispatchResult::Continue
                }
                Some('>') => {
                    self.report_error(Error::MissingDoctypeSystemIdentifier);
                    self.set_force_quirks();
                    self.state = State::Data;
                    self.emit_current_doctype();
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInDoctype);
                    self.set_force_quirks();
                    self.emit_current_doctype();
                    DispatchResult::Eof
                }
                c @ Some(_) => {
                    self.report_error(Error::MissingQuoteBeforeDoctypeSystemIdentifier);
                    self.set_force_quirks();
                    self.state = State::BogusDoctype;
                    self.unread(c);
                    DispatchResult::Continue
                }
            },
            State::DoctypeSystemIdentifierDoubleQuoted => match next_char!() {
                Some('"') => {
                    self.state = State::AfterDoctypeSystemIdentifier;
                    DispatchResult::Continue
                }
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    self.push_doctype_system_identifier("\u{fffd}");
                    DispatchResult::Continue
                }
                Some('>') => {
                    self.report_error(Error::AbruptDoctypeSystemIdentifier);
                    self.set_force_quirks();
                    self.state = State::Data;
                    self.emit_current_doctype();
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInDoctype);
                    self.set_force_quirks();
                    self.emit_current_doctype();
                    DispatchResult::Eof
                }
                Some(x) => {
                    self.push_doctype_system_identifier(ctostr!(x));
                    DispatchResult::Continue
                }
            },
            State::DoctypeSystemIdentifierSingleQuoted => match next_char!() {
                Some('\'') => {
                    self.state = State::AfterDoctypeSystemIdentifier;
                    DispatchResult::Continue
                }
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    self.push_doctype_system_identifier("\u{fffd}");
                    DispatchResult::Continue
                }
                Some('>') => {
                    self.report_error(Error::AbruptDoctypeSystemIdentifier);
                    self.set_force_quirks();
                    self.state = State::Data;
                    self.emit_current_doctype();
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInDoctype);
                    self.set_force_quirks();
                    self.emit_current_doctype();
                    DispatchResult::Eof
                }
                Some(x) => {
                    self.push_doctype_system_identifier(ctostr!(x));
                    DispatchResult::Continue
                }
            },
            State::AfterDoctypeSystemIdentifier => match next_char!() {
                Some(whitespace_pat!()) => DispatchResult::Continue,
                Some('>') => {
                    self.state = State::Data;
                    self.emit_current_doctype();
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInDoctype);
                    self.set_force_quirks();
                    self.emit_current_doctype();
                    DispatchResult::Eof
                }
                c @ Some(_) => {
                    self.report_error(Error::UnexpectedCharacterAfterDoctypeSystemIdentifier);
                    self.unread(c);
                    self.state = State::BogusDoctype;
                    DispatchResult::Continue
                }
            },
            State::BogusDoctype => match next_char!() {
                Some('>') => {
                    self.state = State::Data;
                    self.emit_current_doctype();
                    DispatchResult::Continue
                }
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    DispatchResult::Continue
                }
                None => {
                    self.emit_current_doctype();
                    DispatchResult::Eof
                }
                Some(_) => DispatchResult::Continue,
            },
            State::CdataSection => match next_char!() {
                Some(']') => {
                    self.state = State::CdataSectionBracket;
                    DispatchResult::Continue
                }
                Some('\0') => {
                    self.report_error(Error::UnexpectedNullCharacter);
                    self.emit_char('\0');
                    DispatchResult::Continue
                }
                None => {
                    self.report_error(Error::EofInCdata);
                    DispatchResult::Eof
                }
                Some(x) => {
                    self.emit_char(x);
                    DispatchResult::Continue
                }
            },
            State::CdataSectionBracket => match next_char!() {
                Some(']') => {
                    self.state = State::CdataSectionEnd;
                    DispatchResult::Continue
                }
                c => {
                    self.emit_str("]");
                    self.state = State::CdataSection;
                    self.unread(c);
                    DispatchResult::Continue
                }
            },
            State::CdataSectionEnd => match next_char!() {
                Some(']') => {
                    self.emit_str("]");
                    DispatchResult::Continue
                }
                Some('>') => {
                    self.state = State::Data;
                    DispatchResult::Continue
                }
                c => {
                    self.emit_str("]]");
                    self.unread(c);
                    self.state = State::CdataSection;
                    DispatchResult::Continue
                }
            },
            State::CharacterReference => {
                self.temporary_buffer.clear();
                self.temporary_buffer.push('&');
                match next_char!() {
                    Some(x) if x.is_ascii_alphanumeric() => {
                        self.unread(Some(x));
                        self.state = State::NamedCharacterReference;
                        DispatchResult::Continue
                    }
                    Some('#') => {
                        self.temporary_buffer.push('#');
                        self.state = State::NumericCharacterReference;
                        DispatchResult::Continue
                    }
                    c => {
                        self.flush_code_points_consumed_as_character_reference();
                        self.state = self.return_state.take().expect("return_state set on entry to CharacterReference");
                        self.unread(c);
                        DispatchResult::Continue
                    }
                }
            }
            State::NamedCharacterReference => match entities::longest_named_reference_match(&self.pp) {
                NamedRefOutcome::NeedMoreInput => DispatchResult::NeedMoreInput,
                NamedRefOutcome::NoMatch => {
                    self.flush_code_points_consumed_as_character_reference();
                    self.state = State::AmbiguousAmpersand;
                    DispatchResult::Continue
                }
                NamedRefOutcome::Found(m) => {
                    let in_attr = self.is_consumed_as_part_of_an_attribute();
                    if in_attr && !m.ends_with_semicolon {
                        match self.pp.peek(m.matched_chars) {
                            Peek::EndOfChunk => return DispatchResult::NeedMoreInput,
                            Peek::Char(next) if next == '=' || next.is_ascii_alphanumeric() => {
                                for _ in 0..m.matched_chars {
                                    if let Advance::Char(c) = self.pp.advance() {
                                        self.temporary_buffer.push(c);
                                    }
                                }
                                self.flush_code_points_consumed_as_character_reference();
                                self.state =
                                    self.return_state.take().expect("return_state set on entry to CharacterReference");
                                return DispatchResult::Continue;
                            }
                            _ => {}
                        }
                    }
                    if !m.ends_with_semicolon {
                        self.report_error(Error::MissingSemicolonAfterCharacterReference);
                    }
                    for _ in 0..m.matched_chars {
                        self.pp.advance();
                    }
                    self.temporary_buffer.clear();
                    self.temporary_buffer.push(m.chars.0);
                    if let Some(c2) = m.chars.1 {
                        self.temporary_buffer.push(c2);
                    }
                    self.flush_code_points_consumed_as_character_reference();
                    self.state = self.return_state.take().expect("return_state set on entry to CharacterReference");
                    DispatchResult::Continue
                }
            },
            State::AmbiguousAmpersand => match next_char!() {
                Some(x) if x.is_ascii_alphanumeric() => {
                    if self.is_consumed_as_part_of_an_attribute() {
                        self.push_attribute_value(ctostr!(x));
                    } else {
                        self.emit_char(x);
                    }
                    DispatchResult::Continue
                }
                c @ Some(';') => {
                    self.report_error(Error::UnknownNamedCharacterReference);
                    self.unread(c);
                    self.state = self.return_state.take().expect("return_state set on entry to CharacterReference");
                    DispatchResult::Continue
                }
                c => {
                    self.unread(c);
                    self.state = self.return_state.take().expect("return_state set on entry to CharacterReference");
                    DispatchResult::Continue
                }
            },
            State::NumericCharacterReference => {
                self.character_reference_code = 0;
                match next_char!() {
                    Some(x @ ('x' | 'X')) => {
                        self.temporary_buffer.push(x);
                        self.state = State::HexadecimalCharacterReferenceStart;
                        DispatchResult::Continue
                    }
                    c => {
                        self.unread(c);
                        self.state = State::DecimalCharacterReferenceStart;
                        DispatchResult::Continue
                    }
                }
            }
            State::HexadecimalCharacterReferenceStart => match next_char!() {
                c @ Some('0'..='9' | 'A'..='F' | 'a'..='f') => {
                    self.unread(c);
                    self.state = State::HexadecimalCharacterReference;
                    DispatchResult::Continue
                }
                c => {
                    self.report_error(Error::AbsenceOfDigitsInNumericCharacterReference);
                    self.flush_code_points_consumed_as_character_reference();
                    self.unread(c);
                    self.state = self.return_state.take().expect("return_state set on entry to CharacterReference");
                    DispatchResult::Continue
                }
            },
            State::DecimalCharacterReferenceStart => match next_char!() {
                Some(x @ ascii_digit_pat!()) => {
                    self.unread(Some(x));
                    self.state = State::DecimalCharacterReference;
                    DispatchResult::Continue
                }
                c => {
                    self.report_error(Error::AbsenceOfDigitsInNumericCharacterReference);
                    self.flush_code_points_consumed_as_character_reference();
                    self.unread(c);
                    self.state = self.return_state.take().expect("return_state set on entry to CharacterReference");
                    DispatchResult::Continue
                }
            },
            State::HexadecimalCharacterReference => match next_char!() {
                Some(x @ ascii_digit_pat!()) => {
                    mutate_character_reference!(*16 + x - 0x0030);
                    DispatchResult::Continue
                }
                Some(x @ 'A'..='F') => {
                    mutate_character_reference!(*16 + x - 0x0037);
                    DispatchResult::Continue
                }
                Some(x @ 'a'..='f') => {
                    mutate_character_reference!(*16 + x - 0x0057);
                    DispatchResult::Continue
                }
                Some(';') => {
                    self.state = State::NumericCharacterReferenceEnd;
                    DispatchResult::Continue
                }
                c => {
                    self.report_error(Error::MissingSemicolonAfterCharacterReference);
                    self.unread(c);
                    self.state = State::NumericCharacterReferenceEnd;
                    DispatchResult::Continue
                }
            },
            State::DecimalCharacterReference => match next_char!() {
                Some(x @ ascii_digit_pat!()) => {
                    mutate_character_reference!(*10 + x - 0x0030);
                    DispatchResult::Continue
                }
                Some(';') => {
                    self.state = State::NumericCharacterReferenceEnd;
                    DispatchResult::Continue
                }
                c => {
                    self.report_error(Error::MissingSemicolonAfterCharacterReference);
                    self.unread(c);
                    self.state = State::NumericCharacterReferenceEnd;
                    DispatchResult::Continue
                }
            },
            State::NumericCharacterReferenceEnd => {
                let (c, err) = entities::resolve_numeric_character_reference(self.character_reference_code);
                if let Some(error) = err {
                    self.report_error(error);
                }
                self.temporary_buffer.clear();
                self.temporary_buffer.push(c);
                self.flush_code_points_consumed_as_character_reference();
                self.state = self.return_state.take().expect("return_state set on entry to CharacterReference");
                DispatchResult::Continue
            }
        }
    }
}

fn validate_char(c: char) -> Option<Error> {
    match c as u32 {
        surrogate_pat!() => Some(Error::SurrogateInInputStream),
        noncharacter_pat!() => Some(Error::NoncharacterInInputStream),
        x @ control_pat!() if !matches!(x, 0x0000 | 0x0009 | 0x000a | 0x000c | 0x0020) => {
            Some(Error::ControlCharacterInInputStream)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::VecSink;
    use pretty_assertions::assert_eq;

    fn tokenize(input: &str) -> VecSink {
        let mut tok = Tokenizer::new_with_opts(
            VecSink::default(),
            TokenizerOpts {
                source_code_location_info: false,
            },
        );
        tok.write(input, true);
        tok.into_sink()
    }

    #[test]
    fn tokenizes_simple_start_and_end_tag_with_attribute() {
        use crate::emitter::RecordedToken;
        use crate::token::{Attribute, EndTagToken, StartTagToken};

        let sink = tokenize("<p class=\"a\">hi</p>");
        assert_eq!(
            sink.tokens,
            vec![
                RecordedToken::StartTag(StartTagToken {
                    name: "p".to_string(),
                    attrs: vec![Attribute {
                        name: "class".to_string(),
                        value: "a".to_string()
                    }],
                    self_closing: false,
                    ..Default::default()
                }),
                RecordedToken::Character("hi".to_string()),
                RecordedToken::EndTag(EndTagToken {
                    name: "p".to_string(),
                    ..Default::default()
                }),
            ]
        );
    }

    #[test]
    fn tokenizes_comment() {
        use crate::emitter::RecordedToken;
        use crate::token::CommentToken;

        let sink = tokenize("<!-- x -->");
        assert_eq!(
            sink.tokens,
            vec![RecordedToken::Comment(CommentToken {
                data: " x ".to_string(),
                ..Default::default()
            })]
        );
    }

    #[test]
    fn tokenizes_doctype() {
        use crate::emitter::RecordedToken;
        use crate::token::DoctypeToken;

        let sink = tokenize("<!DOCTYPE html>");
        assert_eq!(
            sink.tokens,
            vec![RecordedToken::Doctype(DoctypeToken {
                name: Some("html".to_string()),
                public_id: None,
                system_id: None,
                force_quirks: false,
                ..Default::default()
            })]
        );
    }

    #[test]
    fn unknown_named_reference_falls_back_to_literal_text() {
        use crate::emitter::RecordedToken;

        // "&notit;" matches no named reference at all (there is no legacy
        // "not" entry in the curated table), so it falls back to literal
        // text plus an unknown-named-character-reference error.
        let sink = tokenize("&notit;");
        assert!(sink
            .tokens
            .iter()
            .any(|t| matches!(t, RecordedToken::Character(s) if s == "&notit;")));
    }

    #[test]
    fn duplicate_attribute_keeps_first_value() {
        use crate::emitter::RecordedToken;
        use crate::token::{Attribute, StartTagToken};

        let sink = tokenize("<a x=1 x=2>");
        let RecordedToken::StartTag(tag) = &sink.tokens[0] else {
            panic!("expected a start tag");
        };
        assert_eq!(
            tag,
            &StartTagToken {
                name: "a".to_string(),
                attrs: vec![Attribute {
                    name: "x".to_string(),
                    value: "1".to_string()
                }],
                self_closing: false,
                ..Default::default()
            }
        );
    }

    #[test]
    fn script_double_escape_round_trips_plain_text() {
        use crate::emitter::RecordedToken;

        let input = "<script><!--a<script>b</script>c--></script>";
        let sink = tokenize(input);
        let chars: String = sink
            .tokens
            .iter()
            .filter_map(|t| match t {
                RecordedToken::Character(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(chars, "<!--a<script>b</script>c-->");
    }

    #[test]
    fn chunk_boundary_mid_tag_name_hibernates_and_resumes() {
        let mut tok = Tokenizer::new_with_opts(
            VecSink::default(),
            TokenizerOpts {
                source_code_location_info: false,
            },
        );
        tok.write("<di", false);
        tok.write("v>x</div>", true);
        let sink = tok.into_sink();
        use crate::emitter::RecordedToken;
        use crate::token::{EndTagToken, StartTagToken};
        assert_eq!(
            sink.tokens,
            vec![
                RecordedToken::StartTag(StartTagToken {
                    name: "div".to_string(),
                    attrs: vec![],
                    self_closing: false,
                    ..Default::default()
                }),
                RecordedToken::Character("x".to_string()),
                RecordedToken::EndTag(EndTagToken {
                    name: "div".to_string(),
                    ..Default::default()
                }),
            ]
        );
    }

    #[test]
    fn appropriate_end_tag_check_falls_back_to_text_when_name_mismatches() {
        // </div> seen while last start tag was <script> (RAWTEXT-like): the
        // end tag name doesn't match, so it's just more text content.
        let mut tok = Tokenizer::new_with_opts(
            VecSink::default(),
            TokenizerOpts {
                source_code_location_info: false,
            },
        );
        tok.state = State::RawText;
        tok.last_start_tag_name = "script".to_string();
        tok.write("</div>x", true);
        use crate::emitter::RecordedToken;
        let sink = tok.into_sink();
        assert_eq!(
            sink.tokens,
            vec![RecordedToken::Character("</div>x".to_string())]
        );
    }

    #[test]
    fn foreign_cdata_section_emits_literal_content() {
        use crate::emitter::RecordedToken;

        let mut tok = Tokenizer::new_with_opts(
            VecSink::default(),
            TokenizerOpts {
                source_code_location_info: false,
            },
        );
        tok.in_foreign_node = true;
        tok.write("<![CDATA[a<b]]>", true);
        let sink = tok.into_sink();
        assert_eq!(sink.tokens, vec![RecordedToken::Character("a<b".to_string())]);
    }

    #[test]
    fn non_foreign_cdata_becomes_bogus_comment() {
        use crate::emitter::RecordedToken;
        use crate::token::CommentToken;

        let sink = tokenize("<![CDATA[x]]>");
        assert_eq!(
            sink.tokens,
            vec![RecordedToken::Comment(CommentToken {
                data: "[CDATA[x]]".to_string(),
                ..Default::default()
            })]
        );
    }
}
