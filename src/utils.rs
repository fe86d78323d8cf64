//! Small char-class patterns shared by the preprocessor and the state machine.

macro_rules! surrogate_pat {
    () => {
        0xd800..=0xdfff
    };
}

pub(crate) use surrogate_pat;

macro_rules! noncharacter_pat {
    () => {
        0xfdd0
            ..=0xfdef
                | 0xfffe
                | 0xffff
                | 0x1fffe
                | 0x1ffff
                | 0x2fffe
                | 0x2ffff
                | 0x3fffe
                | 0x3ffff
                | 0x4fffe
                | 0x4ffff
                | 0x5fffe
                | 0x5ffff
                | 0x6fffe
                | 0x6ffff
                | 0x7fffe
                | 0x7ffff
                | 0x8fffe
                | 0x8ffff
                | 0x9fffe
                | 0x9ffff
                | 0xafffe
                | 0xaffff
                | 0xbfffe
                | 0xbffff
                | 0xcfffe
                | 0xcffff
                | 0xdfffe
                | 0xdffff
                | 0xefffe
                | 0xeffff
                | 0xffffe
                | 0xfffff
                | 0x10fffe
                | 0x10ffff
    };
}

pub(crate) use noncharacter_pat;

/// ASCII/C0/C1 control code points, as used by
/// <https://infra.spec.whatwg.org/#control>.
macro_rules! control_pat {
    () => {
        0x0000..=0x001f | 0x007f..=0x009f
    };
}

pub(crate) use control_pat;

macro_rules! whitespace_pat {
    () => {
        '\t' | '\u{000a}' | '\u{000c}' | ' '
    };
}

pub(crate) use whitespace_pat;

macro_rules! ascii_digit_pat {
    () => {
        '0'..='9'
    };
}

pub(crate) use ascii_digit_pat;

pub(crate) enum ControlToken {
    Eof,
    Continue,
}

macro_rules! ctostr {
    ($c:expr) => {
        &*$c.encode_utf8(&mut [0; 4])
    };
}

pub(crate) use ctostr;

// Having this be a macro is performance critical: with the `trace` feature
// disabled the whole call, including argument formatting, evaporates. A
// function taking `&str` would still force the caller to build the
// formatted string before the (now dead) call, defeating the point.
macro_rules! trace_log {
    ($($tt:tt)*) => {{
        #[cfg(feature = "trace")]
        log::trace!($($tt)*);
    }};
}

pub(crate) use trace_log;
