#![deny(missing_docs)]
// This is an HTML parser. HTML can be untrusted input from the internet.
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod emitter;
mod entities;
mod error;
mod machine;
mod preprocessor;
mod state;
mod tag_id;
mod token;
mod utils;

pub use emitter::{naive_next_state, RecordedToken, Sink, VecSink};
pub use error::{Error, Location, ParseError, TokenLocation};
pub use machine::{Tokenizer, TokenizerOpts};
pub use state::State;
pub use tag_id::TagId;
pub use token::{Attribute, CommentToken, DoctypeToken, EndTagToken, StartTagToken};
