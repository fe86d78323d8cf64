//! Token payloads passed to [`crate::Sink`] methods.
//!
//! Character data has no payload type of its own: runs of ordinary text,
//! whitespace and NUL replacement characters are coalesced by the state
//! machine and handed to [`crate::Sink::on_character`],
//! [`crate::Sink::on_whitespace_character`] and
//! [`crate::Sink::on_null_character`] as plain string slices. Unlike the
//! four structured token types below, a coalesced run's boundaries float
//! with its content rather than with markup delimiters, so it carries no
//! [`TokenLocation`] of its own; a caller that needs exact character-run spans
//! can track the preprocessor offset itself between callbacks rather than
//! have it threaded through every callback signature.

use crate::error::TokenLocation;
use crate::tag_id::TagId;

/// A single attribute as it appeared in a start tag, in first-occurrence
/// order.
///
/// The state machine never stores attributes in a map: later duplicate
/// names are dropped (the first occurrence wins) and a
/// [`crate::Error::DuplicateAttribute`] is reported, but the surviving
/// attributes keep their original source order, matching
/// <https://html.spec.whatwg.org/#attributes-2>.
#[derive(Debug, Default, Eq, PartialEq, Clone)]
pub struct Attribute {
    /// Attribute name, lowercased.
    pub name: String,
    /// Attribute value. Empty for a valueless attribute (`<input disabled>`).
    pub value: String,
}

/// A start tag token (`<div class="a">`).
#[derive(Debug, Default, Eq, PartialEq, Clone)]
pub struct StartTagToken {
    /// Tag name, lowercased.
    pub name: String,
    /// The interned identity of `name`, if it's one of the handful of tag
    /// names this tokenizer itself must recognize (see [`TagId`]).
    /// `None` for any other tag, including custom elements; this is purely
    /// a convenience/optimization field and never load-bearing for
    /// tokenization correctness.
    pub tag_id: Option<TagId>,
    /// Attributes in first-occurrence order; duplicates already removed.
    pub attrs: Vec<Attribute>,
    /// Whether the tag ended in `/>`.
    ///
    /// Self-closing is only meaningful for foreign (SVG/MathML) content;
    /// a tree constructor is expected to ignore it for HTML elements, per
    /// <https://html.spec.whatwg.org/#start-tag-state>.
    pub self_closing: bool,
    /// Set by a tree constructor once it has acted on `self_closing` for a
    /// foreign element, acknowledging the flag. The tokenizer never reads
    /// or writes this itself; it exists purely as a place for the consumer
    /// to record that fact on its own copy of the token, matching the
    /// `ackSelfClosing` field of the WHATWG token struct.
    pub ack_self_closing: bool,
    /// Source span, from the opening `<` up to (but not including) the
    /// character after the closing `>`. `None` when the tokenizer was
    /// constructed with `source_code_location_info: false`.
    pub location: Option<TokenLocation>,
}

/// An end tag token (`</div>`).
#[derive(Debug, Default, Eq, PartialEq, Clone)]
pub struct EndTagToken {
    /// Tag name, lowercased.
    pub name: String,
    /// See [`StartTagToken::tag_id`].
    pub tag_id: Option<TagId>,
    /// Source span; see [`StartTagToken::location`].
    pub location: Option<TokenLocation>,
}

/// A comment token (`<!-- ... -->`), including bogus comments produced from
/// malformed markup declarations and `<?`/`<!` junk.
#[derive(Debug, Default, Eq, PartialEq, Clone)]
pub struct CommentToken {
    /// The comment's text content.
    pub data: String,
    /// Source span; see [`StartTagToken::location`].
    pub location: Option<TokenLocation>,
}

/// A DOCTYPE token (`<!DOCTYPE html>`).
#[derive(Debug, Default, Eq, PartialEq, Clone)]
pub struct DoctypeToken {
    /// The DOCTYPE name, if any was given.
    pub name: Option<String>,
    /// The public identifier, if any.
    pub public_id: Option<String>,
    /// The system identifier, if any.
    pub system_id: Option<String>,
    /// Whether a tree constructor should treat the resulting document as
    /// quirks-mode, per <https://html.spec.whatwg.org/#force-quirks-flag>.
    pub force_quirks: bool,
    /// Source span; see [`StartTagToken::location`].
    pub location: Option<TokenLocation>,
}
