//! Mutable HTML DOM: parsing, selector queries and serialization.
//!
//! # Example
//!
//! ```
//! use pagenav::dom::{Selector, parse_html, serialize_children};
//!
//! let dom = parse_html("<h1>Title</h1><p>Body</p>");
//! let h1 = Selector::parse("h1").unwrap().select_first(&dom, dom.document()).unwrap();
//! assert_eq!(dom.text_content(h1), "Title");
//! assert_eq!(serialize_children(&dom, h1).unwrap(), "Title");
//! ```

mod arena;
mod element_ref;
mod selector;
mod serialize;
mod tree_sink;

pub use arena::{Attribute, Descendants, Dom, Node, NodeData, NodeId, Siblings};
pub use element_ref::{ElementRef, PageSelectors};
pub use selector::Selector;
pub use serialize::{SerializableNode, serialize_children, serialize_document, serialize_node};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use tree_sink::DomSink;

/// Parse an HTML document. Malformed markup is recovered the way browsers do.
pub fn parse_html(html: &str) -> Dom {
    let sink = parse_document(DomSink::new(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes());

    let errors = sink.error_count();
    if errors > 0 {
        tracing::debug!(errors, "recovered from html parse errors");
    }
    sink.into_dom()
}

/// Parse HTML bytes in any encoding.
///
/// See [`crate::util::decode_html`] for how the encoding is chosen.
pub fn parse_html_bytes(bytes: &[u8]) -> Dom {
    parse_html(&crate::util::decode_html(bytes))
}
