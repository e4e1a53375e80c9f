//! Fragment identifiers for headings.
//!
//! [`slugify`] turns heading text into the `id` a navigation link targets.
//! The transformation is deliberately simple and stable, since existing
//! links into a page depend on it:
//!
//! 1. take the text content
//! 2. replace each run of whitespace with a single `-`
//! 3. drop everything that is not an ASCII letter, digit or `-`
//! 4. lowercase
//! 5. strip trailing colons
//!
//! Leading, trailing and repeated hyphens are kept.

use std::borrow::Cow;

use crate::dom::{Dom, NodeId};

/// Anything that can report its visible text.
pub trait TextContent {
    fn text_content(&self) -> Cow<'_, str>;
}

impl TextContent for str {
    fn text_content(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl TextContent for String {
    fn text_content(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl<T: TextContent + ?Sized> TextContent for &T {
    fn text_content(&self) -> Cow<'_, str> {
        (**self).text_content()
    }
}

/// A DOM node viewed as text: the concatenation of its descendant text nodes.
#[derive(Debug, Clone, Copy)]
pub struct NodeText<'a> {
    dom: &'a Dom,
    id: NodeId,
}

impl<'a> NodeText<'a> {
    pub fn new(dom: &'a Dom, id: NodeId) -> Self {
        Self { dom, id }
    }
}

impl TextContent for NodeText<'_> {
    fn text_content(&self) -> Cow<'_, str> {
        Cow::Owned(self.dom.text_content(self.id))
    }
}

/// Build a fragment identifier from text.
///
/// Total over all input; text with no ASCII letters or digits yields an
/// empty or hyphen-only slug.
///
/// # Examples
///
/// ```
/// use pagenav::slugify;
///
/// assert_eq!(slugify("Getting Started"), "getting-started");
/// assert_eq!(slugify("Auth:"), "auth");
/// assert_eq!(slugify("  A  b "), "-a-b-");
/// assert_eq!(slugify("Café au lait"), "caf-au-lait");
/// assert_eq!(slugify("!!!"), "");
/// ```
pub fn slugify<T: TextContent + ?Sized>(source: &T) -> String {
    let text = source.text_content();
    let mut slug = String::with_capacity(text.len());
    let mut in_whitespace = false;

    for c in text.chars() {
        if is_whitespace(c) {
            if !in_whitespace {
                slug.push('-');
                in_whitespace = true;
            }
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_alphanumeric() || c == '-' {
            slug.push(c.to_ascii_lowercase());
        }
    }

    // Unreachable while the filter above drops colons.
    let kept = strip_trailing_colons(&slug).len();
    slug.truncate(kept);
    slug
}

/// Remove any run of `:` at the end of `text`.
///
/// ```
/// use pagenav::slug::strip_trailing_colons;
///
/// assert_eq!(strip_trailing_colons("Auth::"), "Auth");
/// assert_eq!(strip_trailing_colons("a: b"), "a: b");
/// ```
pub fn strip_trailing_colons(text: &str) -> &str {
    text.trim_end_matches(':')
}

/// Whitespace as matched by the `\s` class of browser regular expressions.
///
/// Unicode `White_Space` plus BOM, minus NEL (U+0085), which `\s` leaves
/// alone.
fn is_whitespace(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}
