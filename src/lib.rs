//! # pagenav
//!
//! Turn a flat HTML document into a navigable page.
//!
//! Every `h1`/`h2` starts a content block holding that heading and the
//! content after it. Blocks are gathered into a content container, and a
//! sidebar list receives one link per block plus one per `h3` inside it.
//! Headings get stable fragment identifiers from [`slugify`].
//!
//! ## Quick Start
//!
//! ```
//! use pagenav::{RestructureOptions, restructure_html};
//!
//! let html = r#"<ul class="nav"></ul><div class="content"></div>
//!     <article><h1>Getting Started</h1><p>Install.</p>
//!     <h1>API Reference</h1><h3>Auth:</h3><p>Tokens.</p></article>"#;
//!
//! let page = restructure_html(html, &RestructureOptions::default()).unwrap();
//!
//! let labels: Vec<_> = page.outline.entries.iter().map(|e| e.label.as_str()).collect();
//! assert_eq!(labels, ["Getting Started", "API Reference", "Auth"]);
//! ```
//!
//! ## Working with a DOM
//!
//! [`Restructurer`] runs on an already parsed [`dom::Dom`], which is useful
//! when the page goes through other passes too:
//!
//! ```
//! use pagenav::dom::{parse_html, serialize_document};
//! use pagenav::{NoScrollSpy, RestructureOptions, Restructurer};
//!
//! let mut dom = parse_html("<div class='content'></div><main><h2>Usage</h2></main>");
//! let outline = Restructurer::new(&RestructureOptions::default())?
//!     .with_scroll_spy(NoScrollSpy)
//!     .restructure(&mut dom);
//!
//! assert_eq!(outline.blocks[0].id, "usage");
//! assert!(serialize_document(&dom)?.contains(r#"<h2 id="usage">Usage</h2>"#));
//! # Ok::<(), pagenav::Error>(())
//! ```

pub mod dom;
pub mod error;
pub mod restructure;
pub mod slug;
pub mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Error, Result};
pub use restructure::{
    ContentBlock, DataApiScrollSpy, HeadingLevel, NavEntry, NavKind, NoScrollSpy, Outline,
    RestructureOptions, Restructured, Restructurer, ScrollSpy, restructure,
    restructure_html,
};
pub use slug::{TextContent, slugify};
