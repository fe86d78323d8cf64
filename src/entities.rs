//! Character reference resolution: named references (trie-like longest
//! match with backtrack) and numeric reference folding.
//!
//! The named reference table here is the full legacy HTML4/XHTML entity set
//! (ISO-8859-1, the general-punctuation/Greek/math symbols, and the
//! markup-significant internationalization entities) plus the handful of
//! no-semicolon legacy spellings recognized by WHATWG, rather than the full
//! ~2000-entry WHATWG table (see `DESIGN.md` for why). It is backed by a
//! flat array and a prefix scan rather than a packed trie: at a few hundred
//! entries a linear scan is still fast enough, and, crucially, stays
//! auditable by hand, which a hand-packed bit trie over data transcribed
//! from memory would not be.

use crate::error::Error;
use crate::preprocessor::{Peek, Preprocessor};
use crate::utils::{control_pat, noncharacter_pat, surrogate_pat};

/// One entry of the named character reference table.
///
/// `name` is the reference spelling *without* the leading `&`, e.g. `"amp;"`
/// or the legacy `"amp"`. `legacy` marks entries that predate the
/// semicolon requirement and may be matched in text content (and, subject
/// to the ambiguous-ampersand check, in attribute values) without a
/// trailing `;`.
struct NamedRef {
    name: &'static str,
    chars: (char, Option<char>),
}

// Sorted is not required for correctness (lookup below is a linear prefix
// scan), only for readability.
const NAMED_REFERENCES: &[NamedRef] = &[
    // Legacy (no-semicolon-required) spellings.
    NamedRef { name: "AMP", chars: ('&', None) },
    NamedRef { name: "AMP;", chars: ('&', None) },
    NamedRef { name: "COPY", chars: ('\u{00A9}', None) },
    NamedRef { name: "COPY;", chars: ('\u{00A9}', None) },
    NamedRef { name: "GT", chars: ('>', None) },
    NamedRef { name: "GT;", chars: ('>', None) },
    NamedRef { name: "LT", chars: ('<', None) },
    NamedRef { name: "LT;", chars: ('<', None) },
    NamedRef { name: "QUOT", chars: ('"', None) },
    NamedRef { name: "QUOT;", chars: ('"', None) },
    NamedRef { name: "REG", chars: ('\u{00AE}', None) },
    NamedRef { name: "REG;", chars: ('\u{00AE}', None) },
    NamedRef { name: "amp", chars: ('&', None) },
    NamedRef { name: "amp;", chars: ('&', None) },
    NamedRef { name: "apos;", chars: ('\'', None) },
    NamedRef { name: "cent;", chars: ('\u{00A2}', None) },
    NamedRef { name: "copy", chars: ('\u{00A9}', None) },
    NamedRef { name: "copy;", chars: ('\u{00A9}', None) },
    NamedRef { name: "deg;", chars: ('\u{00B0}', None) },
    NamedRef { name: "divide;", chars: ('\u{00F7}', None) },
    NamedRef { name: "equals;", chars: ('=', None) },
    NamedRef { name: "euro;", chars: ('\u{20AC}', None) },
    NamedRef { name: "gt", chars: ('>', None) },
    NamedRef { name: "gt;", chars: ('>', None) },
    NamedRef { name: "hellip;", chars: ('\u{2026}', None) },
    NamedRef { name: "laquo;", chars: ('\u{00AB}', None) },
    NamedRef { name: "lt", chars: ('<', None) },
    NamedRef { name: "lt;", chars: ('<', None) },
    NamedRef { name: "mdash;", chars: ('\u{2014}', None) },
    NamedRef { name: "micro;", chars: ('\u{00B5}', None) },
    NamedRef { name: "middot;", chars: ('\u{00B7}', None) },
    NamedRef { name: "nbsp", chars: ('\u{00A0}', None) },
    NamedRef { name: "nbsp;", chars: ('\u{00A0}', None) },
    NamedRef { name: "ndash;", chars: ('\u{2013}', None) },
    NamedRef { name: "notin;", chars: ('\u{2209}', None) },
    NamedRef { name: "para;", chars: ('\u{00B6}', None) },
    NamedRef { name: "plusmn;", chars: ('\u{00B1}', None) },
    NamedRef { name: "pound;", chars: ('\u{00A3}', None) },
    NamedRef { name: "quot", chars: ('"', None) },
    NamedRef { name: "quot;", chars: ('"', None) },
    NamedRef { name: "raquo;", chars: ('\u{00BB}', None) },
    NamedRef { name: "reg", chars: ('\u{00AE}', None) },
    NamedRef { name: "reg;", chars: ('\u{00AE}', None) },
    NamedRef { name: "sect;", chars: ('\u{00A7}', None) },
    NamedRef { name: "times;", chars: ('\u{00D7}', None) },
    NamedRef { name: "trade;", chars: ('\u{2122}', None) },
    NamedRef { name: "yen;", chars: ('\u{00A5}', None) },
    // ISO-8859-1 entities (HTML4 "Latin-1" set).
    NamedRef { name: "iexcl;", chars: ('\u{00A1}', None) },
    NamedRef { name: "curren;", chars: ('\u{00A4}', None) },
    NamedRef { name: "brvbar;", chars: ('\u{00A6}', None) },
    NamedRef { name: "uml;", chars: ('\u{00A8}', None) },
    NamedRef { name: "ordf;", chars: ('\u{00AA}', None) },
    NamedRef { name: "not;", chars: ('\u{00AC}', None) },
    NamedRef { name: "shy;", chars: ('\u{00AD}', None) },
    NamedRef { name: "macr;", chars: ('\u{00AF}', None) },
    NamedRef { name: "sup2;", chars: ('\u{00B2}', None) },
    NamedRef { name: "sup3;", chars: ('\u{00B3}', None) },
    NamedRef { name: "acute;", chars: ('\u{00B4}', None) },
    NamedRef { name: "cedil;", chars: ('\u{00B8}', None) },
    NamedRef { name: "sup1;", chars: ('\u{00B9}', None) },
    NamedRef { name: "ordm;", chars: ('\u{00BA}', None) },
    NamedRef { name: "frac14;", chars: ('\u{00BC}', None) },
    NamedRef { name: "frac12;", chars: ('\u{00BD}', None) },
    NamedRef { name: "frac34;", chars: ('\u{00BE}', None) },
    NamedRef { name: "iquest;", chars: ('\u{00BF}', None) },
    NamedRef { name: "Agrave;", chars: ('\u{00C0}', None) },
    NamedRef { name: "Aacute;", chars: ('\u{00C1}', None) },
    NamedRef { name: "Acirc;", chars: ('\u{00C2}', None) },
    NamedRef { name: "Atilde;", chars: ('\u{00C3}', None) },
    NamedRef { name: "Auml;", chars: ('\u{00C4}', None) },
    NamedRef { name: "Aring;", chars: ('\u{00C5}', None) },
    NamedRef { name: "AElig;", chars: ('\u{00C6}', None) },
    NamedRef { name: "Ccedil;", chars: ('\u{00C7}', None) },
    NamedRef { name: "Egrave;", chars: ('\u{00C8}', None) },
    NamedRef { name: "Eacute;", chars: ('\u{00C9}', None) },
    NamedRef { name: "Ecirc;", chars: ('\u{00CA}', None) },
    NamedRef { name: "Euml;", chars: ('\u{00CB}', None) },
    NamedRef { name: "Igrave;", chars: ('\u{00CC}', None) },
    NamedRef { name: "Iacute;", chars: ('\u{00CD}', None) },
    NamedRef { name: "Icirc;", chars: ('\u{00CE}', None) },
    NamedRef { name: "Iuml;", chars: ('\u{00CF}', None) },
    NamedRef { name: "ETH;", chars: ('\u{00D0}', None) },
    NamedRef { name: "Ntilde;", chars: ('\u{00D1}', None) },
    NamedRef { name: "Ograve;", chars: ('\u{00D2}', None) },
    NamedRef { name: "Oacute;", chars: ('\u{00D3}', None) },
    NamedRef { name: "Ocirc;", chars: ('\u{00D4}', None) },
    NamedRef { name: "Otilde;", chars: ('\u{00D5}', None) },
    NamedRef { name: "Ouml;", chars: ('\u{00D6}', None) },
    NamedRef { name: "Oslash;", chars: ('\u{00D8}', None) },
    NamedRef { name: "Ugrave;", chars: ('\u{00D9}', None) },
    NamedRef { name: "Uacute;", chars: ('\u{00DA}', None) },
    NamedRef { name: "Ucirc;", chars: ('\u{00DB}', None) },
    NamedRef { name: "Uuml;", chars: ('\u{00DC}', None) },
    NamedRef { name: "Yacute;", chars: ('\u{00DD}', None) },
    NamedRef { name: "THORN;", chars: ('\u{00DE}', None) },
    NamedRef { name: "szlig;", chars: ('\u{00DF}', None) },
    NamedRef { name: "agrave;", chars: ('\u{00E0}', None) },
    NamedRef { name: "aacute;", chars: ('\u{00E1}', None) },
    NamedRef { name: "acirc;", chars: ('\u{00E2}', None) },
    NamedRef { name: "atilde;", chars: ('\u{00E3}', None) },
    NamedRef { name: "auml;", chars: ('\u{00E4}', None) },
    NamedRef { name: "aring;", chars: ('\u{00E5}', None) },
    NamedRef { name: "aelig;", chars: ('\u{00E6}', None) },
    NamedRef { name: "ccedil;", chars: ('\u{00E7}', None) },
    NamedRef { name: "egrave;", chars: ('\u{00E8}', None) },
    NamedRef { name: "eacute;", chars: ('\u{00E9}', None) },
    NamedRef { name: "ecirc;", chars: ('\u{00EA}', None) },
    NamedRef { name: "euml;", chars: ('\u{00EB}', None) },
    NamedRef { name: "igrave;", chars: ('\u{00EC}', None) },
    NamedRef { name: "iacute;", chars: ('\u{00ED}', None) },
    NamedRef { name: "icirc;", chars: ('\u{00EE}', None) },
    NamedRef { name: "iuml;", chars: ('\u{00EF}', None) },
    NamedRef { name: "eth;", chars: ('\u{00F0}', None) },
    NamedRef { name: "ntilde;", chars: ('\u{00F1}', None) },
    NamedRef { name: "ograve;", chars: ('\u{00F2}', None) },
    NamedRef { name: "oacute;", chars: ('\u{00F3}', None) },
    NamedRef { name: "ocirc;", chars: ('\u{00F4}', None) },
    NamedRef { name: "otilde;", chars: ('\u{00F5}', None) },
    NamedRef { name: "ouml;", chars: ('\u{00F6}', None) },
    NamedRef { name: "oslash;", chars: ('\u{00F8}', None) },
    NamedRef { name: "ugrave;", chars: ('\u{00F9}', None) },
    NamedRef { name: "uacute;", chars: ('\u{00FA}', None) },
    NamedRef { name: "ucirc;", chars: ('\u{00FB}', None) },
    NamedRef { name: "uuml;", chars: ('\u{00FC}', None) },
    NamedRef { name: "yacute;", chars: ('\u{00FD}', None) },
    NamedRef { name: "thorn;", chars: ('\u{00FE}', None) },
    NamedRef { name: "yuml;", chars: ('\u{00FF}', None) },
    // Greek letters.
    NamedRef { name: "fnof;", chars: ('\u{0192}', None) },
    NamedRef { name: "Alpha;", chars: ('\u{0391}', None) },
    NamedRef { name: "Beta;", chars: ('\u{0392}', None) },
    NamedRef { name: "Gamma;", chars: ('\u{0393}', None) },
    NamedRef { name: "Delta;", chars: ('\u{0394}', None) },
    NamedRef { name: "Epsilon;", chars: ('\u{0395}', None) },
    NamedRef { name: "Zeta;", chars: ('\u{0396}', None) },
    NamedRef { name: "Eta;", chars: ('\u{0397}', None) },
    NamedRef { name: "Theta;", chars: ('\u{0398}', None) },
    NamedRef { name: "Iota;", chars: ('\u{0399}', None) },
    NamedRef { name: "Kappa;", chars: ('\u{039A}', None) },
    NamedRef { name: "Lambda;", chars: ('\u{039B}', None) },
    NamedRef { name: "Mu;", chars: ('\u{039C}', None) },
    NamedRef { name: "Nu;", chars: ('\u{039D}', None) },
    NamedRef { name: "Xi;", chars: ('\u{039E}', None) },
    NamedRef { name: "Omicron;", chars: ('\u{039F}', None) },
    NamedRef { name: "Pi;", chars: ('\u{03A0}', None) },
    NamedRef { name: "Rho;", chars: ('\u{03A1}', None) },
    NamedRef { name: "Sigma;", chars: ('\u{03A3}', None) },
    NamedRef { name: "Tau;", chars: ('\u{03A4}', None) },
    NamedRef { name: "Upsilon;", chars: ('\u{03A5}', None) },
    NamedRef { name: "Phi;", chars: ('\u{03A6}', None) },
    NamedRef { name: "Chi;", chars: ('\u{03A7}', None) },
    NamedRef { name: "Psi;", chars: ('\u{03A8}', None) },
    NamedRef { name: "Omega;", chars: ('\u{03A9}', None) },
    NamedRef { name: "alpha;", chars: ('\u{03B1}', None) },
    NamedRef { name: "beta;", chars: ('\u{03B2}', None) },
    NamedRef { name: "gamma;", chars: ('\u{03B3}', None) },
    NamedRef { name: "delta;", chars: ('\u{03B4}', None) },
    NamedRef { name: "epsilon;", chars: ('\u{03B5}', None) },
    NamedRef { name: "zeta;", chars: ('\u{03B6}', None) },
    NamedRef { name: "eta;", chars: ('\u{03B7}', None) },
    NamedRef { name: "theta;", chars: ('\u{03B8}', None) },
    NamedRef { name: "iota;", chars: ('\u{03B9}', None) },
    NamedRef { name: "kappa;", chars: ('\u{03BA}', None) },
    NamedRef { name: "lambda;", chars: ('\u{03BB}', None) },
    NamedRef { name: "mu;", chars: ('\u{03BC}', None) },
    NamedRef { name: "nu;", chars: ('\u{03BD}', None) },
    NamedRef { name: "xi;", chars: ('\u{03BE}', None) },
    NamedRef { name: "omicron;", chars: ('\u{03BF}', None) },
    NamedRef { name: "pi;", chars: ('\u{03C0}', None) },
    NamedRef { name: "rho;", chars: ('\u{03C1}', None) },
    NamedRef { name: "sigmaf;", chars: ('\u{03C2}', None) },
    NamedRef { name: "sigma;", chars: ('\u{03C3}', None) },
    NamedRef { name: "tau;", chars: ('\u{03C4}', None) },
    NamedRef { name: "upsilon;", chars: ('\u{03C5}', None) },
    NamedRef { name: "phi;", chars: ('\u{03C6}', None) },
    NamedRef { name: "chi;", chars: ('\u{03C7}', None) },
    NamedRef { name: "psi;", chars: ('\u{03C8}', None) },
    NamedRef { name: "omega;", chars: ('\u{03C9}', None) },
    NamedRef { name: "thetasym;", chars: ('\u{03D1}', None) },
    NamedRef { name: "upsih;", chars: ('\u{03D2}', None) },
    NamedRef { name: "piv;", chars: ('\u{03D6}', None) },
    // General punctuation, letterlike, arrows, math operators, misc symbols.
    NamedRef { name: "bull;", chars: ('\u{2022}', None) },
    NamedRef { name: "prime;", chars: ('\u{2032}', None) },
    NamedRef { name: "Prime;", chars: ('\u{2033}', None) },
    NamedRef { name: "oline;", chars: ('\u{203E}', None) },
    NamedRef { name: "frasl;", chars: ('\u{2044}', None) },
    NamedRef { name: "weierp;", chars: ('\u{2118}', None) },
    NamedRef { name: "image;", chars: ('\u{2111}', None) },
    NamedRef { name: "real;", chars: ('\u{211C}', None) },
    NamedRef { name: "alefsym;", chars: ('\u{2135}', None) },
    NamedRef { name: "larr;", chars: ('\u{2190}', None) },
    NamedRef { name: "uarr;", chars: ('\u{2191}', None) },
    NamedRef { name: "rarr;", chars: ('\u{2192}', None) },
    NamedRef { name: "darr;", chars: ('\u{2193}', None) },
    NamedRef { name: "harr;", chars: ('\u{2194}', None) },
    NamedRef { name: "crarr;", chars: ('\u{21B5}', None) },
    NamedRef { name: "lArr;", chars: ('\u{21D0}', None) },
    NamedRef { name: "uArr;", chars: ('\u{21D1}', None) },
    NamedRef { name: "rArr;", chars: ('\u{21D2}', None) },
    NamedRef { name: "dArr;", chars: ('\u{21D3}', None) },
    NamedRef { name: "hArr;", chars: ('\u{21D4}', None) },
    NamedRef { name: "forall;", chars: ('\u{2200}', None) },
    NamedRef { name: "part;", chars: ('\u{2202}', None) },
    NamedRef { name: "exist;", chars: ('\u{2203}', None) },
    NamedRef { name: "empty;", chars: ('\u{2205}', None) },
    NamedRef { name: "nabla;", chars: ('\u{2207}', None) },
    NamedRef { name: "isin;", chars: ('\u{2208}', None) },
    NamedRef { name: "ni;", chars: ('\u{220B}', None) },
    NamedRef { name: "prod;", chars: ('\u{220F}', None) },
    NamedRef { name: "sum;", chars: ('\u{2211}', None) },
    NamedRef { name: "minus;", chars: ('\u{2212}', None) },
    NamedRef { name: "lowast;", chars: ('\u{2217}', None) },
    NamedRef { name: "radic;", chars: ('\u{221A}', None) },
    NamedRef { name: "prop;", chars: ('\u{221D}', None) },
    NamedRef { name: "infin;", chars: ('\u{221E}', None) },
    NamedRef { name: "ang;", chars: ('\u{2220}', None) },
    NamedRef { name: "and;", chars: ('\u{2227}', None) },
    NamedRef { name: "or;", chars: ('\u{2228}', None) },
    NamedRef { name: "cap;", chars: ('\u{2229}', None) },
    NamedRef { name: "cup;", chars: ('\u{222A}', None) },
    NamedRef { name: "int;", chars: ('\u{222B}', None) },
    NamedRef { name: "there4;", chars: ('\u{2234}', None) },
    NamedRef { name: "sim;", chars: ('\u{223C}', None) },
    NamedRef { name: "cong;", chars: ('\u{2245}', None) },
    NamedRef { name: "asymp;", chars: ('\u{2248}', None) },
    NamedRef { name: "ne;", chars: ('\u{2260}', None) },
    NamedRef { name: "equiv;", chars: ('\u{2261}', None) },
    NamedRef { name: "le;", chars: ('\u{2264}', None) },
    NamedRef { name: "ge;", chars: ('\u{2265}', None) },
    NamedRef { name: "sub;", chars: ('\u{2282}', None) },
    NamedRef { name: "sup;", chars: ('\u{2283}', None) },
    NamedRef { name: "nsub;", chars: ('\u{2284}', None) },
    NamedRef { name: "sube;", chars: ('\u{2286}', None) },
    NamedRef { name: "supe;", chars: ('\u{2287}', None) },
    NamedRef { name: "oplus;", chars: ('\u{2295}', None) },
    NamedRef { name: "otimes;", chars: ('\u{2297}', None) },
    NamedRef { name: "perp;", chars: ('\u{22A5}', None) },
    NamedRef { name: "sdot;", chars: ('\u{22C5}', None) },
    NamedRef { name: "lceil;", chars: ('\u{2308}', None) },
    NamedRef { name: "rceil;", chars: ('\u{2309}', None) },
    NamedRef { name: "lfloor;", chars: ('\u{230A}', None) },
    NamedRef { name: "rfloor;", chars: ('\u{230B}', None) },
    NamedRef { name: "lang;", chars: ('\u{2329}', None) },
    NamedRef { name: "rang;", chars: ('\u{232A}', None) },
    NamedRef { name: "loz;", chars: ('\u{25CA}', None) },
    NamedRef { name: "spades;", chars: ('\u{2660}', None) },
    NamedRef { name: "clubs;", chars: ('\u{2663}', None) },
    NamedRef { name: "hearts;", chars: ('\u{2665}', None) },
    NamedRef { name: "diams;", chars: ('\u{2666}', None) },
    // Markup-significant and internationalization entities.
    NamedRef { name: "OElig;", chars: ('\u{0152}', None) },
    NamedRef { name: "oelig;", chars: ('\u{0153}', None) },
    NamedRef { name: "Scaron;", chars: ('\u{0160}', None) },
    NamedRef { name: "scaron;", chars: ('\u{0161}', None) },
    NamedRef { name: "Yuml;", chars: ('\u{0178}', None) },
    NamedRef { name: "circ;", chars: ('\u{02C6}', None) },
    NamedRef { name: "tilde;", chars: ('\u{02DC}', None) },
    NamedRef { name: "ensp;", chars: ('\u{2002}', None) },
    NamedRef { name: "emsp;", chars: ('\u{2003}', None) },
    NamedRef { name: "thinsp;", chars: ('\u{2009}', None) },
    NamedRef { name: "zwnj;", chars: ('\u{200C}', None) },
    NamedRef { name: "zwj;", chars: ('\u{200D}', None) },
    NamedRef { name: "lrm;", chars: ('\u{200E}', None) },
    NamedRef { name: "rlm;", chars: ('\u{200F}', None) },
    NamedRef { name: "lsquo;", chars: ('\u{2018}', None) },
    NamedRef { name: "rsquo;", chars: ('\u{2019}', None) },
    NamedRef { name: "sbquo;", chars: ('\u{201A}', None) },
    NamedRef { name: "ldquo;", chars: ('\u{201C}', None) },
    NamedRef { name: "rdquo;", chars: ('\u{201D}', None) },
    NamedRef { name: "bdquo;", chars: ('\u{201E}', None) },
    NamedRef { name: "dagger;", chars: ('\u{2020}', None) },
    NamedRef { name: "Dagger;", chars: ('\u{2021}', None) },
    NamedRef { name: "permil;", chars: ('\u{2030}', None) },
    NamedRef { name: "lsaquo;", chars: ('\u{2039}', None) },
    NamedRef { name: "rsaquo;", chars: ('\u{203A}', None) },
];

/// The result of matching a candidate named reference against the input
/// stream at the cursor, *after* the leading `&` has already been consumed.
pub(crate) struct NamedRefMatch {
    /// How many code points of the name (not counting `&`) were consumed.
    pub matched_chars: usize,
    /// Whether the matched spelling ends in `;`.
    pub ends_with_semicolon: bool,
    /// The replacement code point(s).
    pub chars: (char, Option<char>),
}

/// Outcome of [`longest_named_reference_match`].
pub(crate) enum NamedRefOutcome {
    Found(NamedRefMatch),
    NoMatch,
    /// The buffered input ran out before a longest match could be decided
    /// and more input may still arrive; the caller must hibernate without
    /// having consumed anything.
    NeedMoreInput,
}

/// Find the longest named character reference starting at `pp`'s cursor,
/// remembering the last terminal match seen while continuing to look for a
/// longer one, per <https://html.spec.whatwg.org/#named-character-reference-state>.
///
/// Performs no mutation: the caller decides how many code points to
/// actually consume based on the returned match.
pub(crate) fn longest_named_reference_match(pp: &Preprocessor) -> NamedRefOutcome {
    let mut candidates: Vec<&'static NamedRef> = NAMED_REFERENCES.iter().collect();
    let mut consumed = 0usize;
    let mut best: Option<NamedRefMatch> = None;

    loop {
        candidates.retain(|r| r.name.chars().count() > consumed);
        if candidates.is_empty() {
            break;
        }
        match pp.peek(consumed) {
            Peek::Char(c) => {
                candidates.retain(|r| r.name.chars().nth(consumed) == Some(c));
                if candidates.is_empty() {
                    break;
                }
                consumed += 1;
                for r in &candidates {
                    if r.name.chars().count() == consumed {
                        best = Some(NamedRefMatch {
                            matched_chars: consumed,
                            ends_with_semicolon: r.name.ends_with(';'),
                            chars: r.chars,
                        });
                    }
                }
            }
            Peek::EndOfChunk => return NamedRefOutcome::NeedMoreInput,
            Peek::Eof => break,
        }
    }

    match best {
        Some(m) => NamedRefOutcome::Found(m),
        None => NamedRefOutcome::NoMatch,
    }
}

/// Windows-1252 remapping applied to C1-range numeric character references,
/// per <https://html.spec.whatwg.org/#numeric-character-reference-end-state>.
fn remap_c1(code: u32) -> u32 {
    match code {
        0x80 => 0x20AC,
        0x82 => 0x201A,
        0x83 => 0x0192,
        0x84 => 0x201E,
        0x85 => 0x2026,
        0x86 => 0x2020,
        0x87 => 0x2021,
        0x88 => 0x02C6,
        0x89 => 0x2030,
        0x8A => 0x0160,
        0x8B => 0x2039,
        0x8C => 0x0152,
        0x8E => 0x017D,
        0x91 => 0x2018,
        0x92 => 0x2019,
        0x93 => 0x201C,
        0x94 => 0x201D,
        0x95 => 0x2022,
        0x96 => 0x2013,
        0x97 => 0x2014,
        0x98 => 0x02DC,
        0x99 => 0x2122,
        0x9A => 0x0161,
        0x9B => 0x203A,
        0x9C => 0x0153,
        0x9E => 0x017E,
        0x9F => 0x0178,
        other => other,
    }
}

/// Fold a numeric character reference's code point per
/// <https://html.spec.whatwg.org/#numeric-character-reference-end-state>,
/// returning the resolved `char` and an accompanying parse error, if any.
pub(crate) fn resolve_numeric_character_reference(code: u32) -> (char, Option<Error>) {
    match code {
        0x00 => ('\u{fffd}', Some(Error::NullCharacterReference)),
        0x110000.. => ('\u{fffd}', Some(Error::CharacterReferenceOutsideUnicodeRange)),
        surrogate_pat!() => ('\u{fffd}', Some(Error::SurrogateCharacterReference)),
        noncharacter_pat!() => (
            char::from_u32(code).unwrap_or('\u{fffd}'),
            Some(Error::NoncharacterCharacterReference),
        ),
        x @ 0x000d | x @ control_pat!() if !matches!(x, 0x0009 | 0x000a | 0x000c | 0x0020) => {
            let remapped = remap_c1(x);
            (
                char::from_u32(remapped).unwrap_or('\u{fffd}'),
                Some(Error::ControlCharacterReference),
            )
        }
        other => (char::from_u32(other).unwrap_or('\u{fffd}'), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pp_with(s: &str) -> Preprocessor {
        let mut pp = Preprocessor::new();
        pp.write(s, true);
        pp
    }

    #[test]
    fn matches_longest_named_reference() {
        let pp = pp_with("notin;rest");
        match longest_named_reference_match(&pp) {
            NamedRefOutcome::Found(m) => {
                assert_eq!(m.matched_chars, 6);
                assert!(m.ends_with_semicolon);
                assert_eq!(m.chars.0, '\u{2209}');
            }
            _ => panic!("expected a match"),
        }
    }

    #[test]
    fn backtracks_to_last_terminal_match_on_dead_end() {
        // "notit;" has no entry of its own; the matcher should fail to find
        // any terminal match at all (there is no legacy "not" entry), and
        // the caller falls back to treating "&" as a literal ampersand.
        let pp = pp_with("notit;rest");
        assert!(matches!(
            longest_named_reference_match(&pp),
            NamedRefOutcome::NoMatch
        ));
    }

    #[test]
    fn legacy_reference_without_semicolon_matches() {
        let pp = pp_with("amp=1");
        match longest_named_reference_match(&pp) {
            NamedRefOutcome::Found(m) => {
                assert_eq!(m.matched_chars, 3);
                assert!(!m.ends_with_semicolon);
                assert_eq!(m.chars.0, '&');
            }
            _ => panic!("expected a match"),
        }
    }

    #[test]
    fn needs_more_input_when_candidates_remain_at_chunk_end() {
        let mut pp = Preprocessor::new();
        pp.write("amp", false);
        assert!(matches!(
            longest_named_reference_match(&pp),
            NamedRefOutcome::NeedMoreInput
        ));
    }

    #[test]
    fn numeric_reference_folds_null_to_replacement_character() {
        let (c, err) = resolve_numeric_character_reference(0x00);
        assert_eq!(c, '\u{fffd}');
        assert_eq!(err, Some(Error::NullCharacterReference));
    }

    #[test]
    fn numeric_reference_remaps_c1_control() {
        let (c, err) = resolve_numeric_character_reference(0x80);
        assert_eq!(c, '\u{20AC}');
        assert_eq!(err, Some(Error::ControlCharacterReference));
    }

    #[test]
    fn numeric_reference_passes_through_ordinary_code_point() {
        let (c, err) = resolve_numeric_character_reference(0x41);
        assert_eq!(c, 'A');
        assert_eq!(err, None);
    }
}
