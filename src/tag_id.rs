//! Interned names for the handful of tag names the tokenizer itself must
//! recognize (RCDATA/RAWTEXT/script-data entry points and the "appropriate
//! end tag token" check). A tree constructor wanting a full interned tag
//! set should layer its own on top; this crate only needs to compare
//! against a small closed list on the hot path, so a `match` on `&str`
//! already compiles to an efficient decision tree and nothing bigger is
//! warranted here.

/// A recognized HTML tag name.
///
/// Returned by [`TagId::lookup`] for the tags this tokenizer's state
/// machine treats specially; any other tag name simply has no `TagId`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum TagId {
    Title,
    Textarea,
    Style,
    Xmp,
    Iframe,
    Noembed,
    Noframes,
    Script,
    Noscript,
    Plaintext,
}

impl TagId {
    /// Look up a lowercased tag name.
    #[must_use]
    pub fn lookup(name: &str) -> Option<TagId> {
        Some(match name {
            "title" => TagId::Title,
            "textarea" => TagId::Textarea,
            "style" => TagId::Style,
            "xmp" => TagId::Xmp,
            "iframe" => TagId::Iframe,
            "noembed" => TagId::Noembed,
            "noframes" => TagId::Noframes,
            "script" => TagId::Script,
            "noscript" => TagId::Noscript,
            "plaintext" => TagId::Plaintext,
            _ => return None,
        })
    }

    /// The canonical lowercase spelling.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TagId::Title => "title",
            TagId::Textarea => "textarea",
            TagId::Style => "style",
            TagId::Xmp => "xmp",
            TagId::Iframe => "iframe",
            TagId::Noembed => "noembed",
            TagId::Noframes => "noframes",
            TagId::Script => "script",
            TagId::Noscript => "noscript",
            TagId::Plaintext => "plaintext",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn looks_up_known_tags() {
        assert_eq!(TagId::lookup("script"), Some(TagId::Script));
        assert_eq!(TagId::lookup("SCRIPT"), None, "lookup expects pre-lowercased input");
        assert_eq!(TagId::lookup("div"), None);
    }

    #[test]
    fn as_str_round_trips() {
        for tag in [
            TagId::Title,
            TagId::Textarea,
            TagId::Style,
            TagId::Xmp,
            TagId::Iframe,
            TagId::Noembed,
            TagId::Noframes,
            TagId::Script,
            TagId::Noscript,
            TagId::Plaintext,
        ] {
            assert_eq!(TagId::lookup(tag.as_str()), Some(tag));
        }
    }
}
