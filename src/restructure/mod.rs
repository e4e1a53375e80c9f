//! Heading-driven page restructuring.
//!
//! A flat document such as
//!
//! ```html
//! <h1>Getting Started</h1>
//! <p>...</p>
//! <h1>API Reference</h1>
//! <h3>Auth:</h3>
//! <p>...</p>
//! ```
//!
//! becomes one `<div class="block">` per `h1`/`h2`, each holding a copy of
//! the heading (with an `id`) and everything that followed it up to the
//! next `h1`/`h2`. The blocks are appended to the content container and a
//! navigation list gets one `<li class="nav-header">` per block plus one
//! `<li>` per `h3` inside it.
//!
//! # Example
//!
//! ```
//! use pagenav::{RestructureOptions, restructure_html};
//!
//! let html = r#"
//!     <div id="navbar"><ul class="nav"></ul></div>
//!     <div class="content"></div>
//!     <div id="source"><h1>Intro</h1><p>Hello</p></div>
//! "#;
//! let page = restructure_html(html, &RestructureOptions::default()).unwrap();
//!
//! assert_eq!(page.outline.blocks[0].id, "intro");
//! assert!(page.html.contains(r##"<li class="nav-header"><a href="#intro">Intro</a></li>"##));
//! ```

mod options;
mod outline;
mod scroll_spy;

pub use options::{
    CompiledOptions, DEFAULT_BLOCK_CLASS, DEFAULT_CONTENT_CONTAINER, DEFAULT_NAV_CONTAINER,
    DEFAULT_NAV_LIST, DEFAULT_SECTION_CLASS, RestructureOptions,
};
pub use outline::{ContentBlock, HeadingLevel, NavEntry, NavKind, Outline};
pub use scroll_spy::{DataApiScrollSpy, NoScrollSpy, ScrollSpy};

use tracing::{debug, warn};

use crate::dom::{Attribute, Dom, NodeId, parse_html, serialize_document};
use crate::error::Result;
use crate::slug::{NodeText, slugify, strip_trailing_colons};

/// Runs the restructuring pass with a fixed configuration.
#[derive(Debug, Clone)]
pub struct Restructurer<S = DataApiScrollSpy> {
    options: CompiledOptions,
    scroll_spy: S,
}

impl Restructurer {
    pub fn new(options: &RestructureOptions) -> Result<Self> {
        Ok(Self::from_compiled(options.compile()?))
    }

    pub fn from_compiled(options: CompiledOptions) -> Self {
        Self {
            options,
            scroll_spy: DataApiScrollSpy,
        }
    }
}

impl<S: ScrollSpy> Restructurer<S> {
    /// Use a different scroll-spy collaborator.
    pub fn with_scroll_spy<T: ScrollSpy>(self, scroll_spy: T) -> Restructurer<T> {
        Restructurer {
            options: self.options,
            scroll_spy,
        }
    }

    pub fn options(&self) -> &CompiledOptions {
        &self.options
    }

    /// Restructure `dom` in place.
    ///
    /// Headings already inside a `div` carrying the block class are left
    /// alone, so running the pass over its own output changes nothing. The
    /// same applies to headings the page itself wraps in such a `div`.
    ///
    /// Only the first match of the navigation list and content container
    /// selectors is used. A page with several `.nav` lists gets entries in
    /// the first one only; narrow the selector to pick another. Missing
    /// containers skip the steps that need them.
    pub fn restructure(&self, dom: &mut Dom) -> Outline {
        let doc = dom.document();

        match self.options.nav_container.select_first(dom, doc) {
            Some(nav) => self.scroll_spy.activate(dom, nav),
            None => warn!(
                selector = %self.options.nav_container,
                "navigation container not found; scroll spy not activated"
            ),
        }

        // Resolved once: a list later swept into a block keeps receiving entries.
        let nav_list = self.options.nav_list.select_first(dom, doc);
        if nav_list.is_none() {
            warn!(
                selector = %self.options.nav_list,
                "navigation list not found; entries will not be inserted"
            );
        }

        // Collected up front: later steps move nodes around.
        let headings: Vec<NodeId> = dom
            .live_descendants(doc)
            .filter(|&id| block_level(dom, id).is_some() && !self.in_block(dom, id))
            .collect();

        let mut outline = Outline::default();
        for heading in headings {
            let block = self.build_block(dom, heading, nav_list, &mut outline.entries);
            outline.blocks.push(block);
        }

        self.insert_blocks(dom, &outline.blocks);
        outline
    }

    fn build_block(
        &self,
        dom: &mut Dom,
        heading: NodeId,
        nav_list: Option<NodeId>,
        entries: &mut Vec<NavEntry>,
    ) -> ContentBlock {
        let level = block_level(dom, heading).unwrap_or(HeadingLevel::Primary);

        let title = dom.deep_clone(heading);
        let id = slugify(&NodeText::new(dom, title));
        dom.set_attr(title, "id", &id);

        let content: Vec<NodeId> = dom
            .following_siblings(heading)
            .take_while(|&sibling| block_level(dom, sibling).is_none())
            .collect();

        let node = dom.create_html_element(
            "div",
            vec![Attribute::new("class", self.options.block_class.as_str())],
        );
        dom.append(node, title);
        for child in &content {
            dom.append(node, *child);
        }
        dom.detach(heading);

        let label = dom.text_content(title);
        debug!(%id, %label, moved = content.len(), "built content block");

        let section_class = self.options.section_class.as_str();
        let li = nav_list.map(|list| append_nav_item(dom, list, Some(section_class), &id, &label));
        entries.push(NavEntry {
            kind: NavKind::Section,
            target: id.clone(),
            label: label.clone(),
            node: li,
        });

        let subheadings: Vec<NodeId> = dom
            .live_descendants(node)
            .filter(|&d| dom.is_tag(d, HeadingLevel::Tertiary.tag()))
            .collect();
        for sub in subheadings {
            let sub_id = slugify(&NodeText::new(dom, sub));
            dom.set_attr(sub, "id", &sub_id);
            let sub_label = strip_trailing_colons(&dom.text_content(sub)).to_string();

            let li = nav_list.map(|list| append_nav_item(dom, list, None, &sub_id, &sub_label));
            entries.push(NavEntry {
                kind: NavKind::Subsection,
                target: sub_id,
                label: sub_label,
                node: li,
            });
        }

        ContentBlock {
            node,
            heading: title,
            level,
            id,
            label,
        }
    }

    fn insert_blocks(&self, dom: &mut Dom, blocks: &[ContentBlock]) {
        if blocks.is_empty() {
            return;
        }

        let Some(container) = self
            .options
            .content_container
            .select_first(dom, dom.document())
        else {
            warn!(
                selector = %self.options.content_container,
                blocks = blocks.len(),
                "content container not found; blocks were not inserted"
            );
            return;
        };

        // Looked up only now: a container swept into a block is no longer
        // part of the document, so it can never end up inside itself.
        for block in blocks {
            dom.append(container, block.node);
        }
    }

    /// Is `id` inside a block built by an earlier pass?
    fn in_block(&self, dom: &Dom, id: NodeId) -> bool {
        dom.ancestors(id)
            .any(|a| dom.is_tag(a, "div") && dom.has_class(a, &self.options.block_class))
    }
}

/// Level of `id` if it is a heading that starts a block.
fn block_level(dom: &Dom, id: NodeId) -> Option<HeadingLevel> {
    let level = HeadingLevel::from_tag(dom.element_name(id)?.as_ref())?;
    level.starts_block().then_some(level)
}

/// Append `<li [class]><a href="#target">label</a></li>` to `list`.
fn append_nav_item(
    dom: &mut Dom,
    list: NodeId,
    class: Option<&str>,
    target: &str,
    label: &str,
) -> NodeId {
    let li_attrs = class
        .map(|c| vec![Attribute::new("class", c)])
        .unwrap_or_default();
    let li = dom.create_html_element("li", li_attrs);
    let a = dom.create_html_element("a", vec![Attribute::new("href", format!("#{target}"))]);
    dom.append_text(a, label);
    dom.append(li, a);
    dom.append(list, li);
    li
}

/// Restructure a parsed document with the default scroll spy.
pub fn restructure(dom: &mut Dom, options: &RestructureOptions) -> Result<Outline> {
    Ok(Restructurer::new(options)?.restructure(dom))
}

/// A restructured document.
#[derive(Debug, Clone)]
pub struct Restructured {
    /// Serialized HTML5.
    pub html: String,
    pub outline: Outline,
}

/// Parse, restructure and serialize in one step.
pub fn restructure_html(html: &str, options: &RestructureOptions) -> Result<Restructured> {
    let mut dom = parse_html(html);
    let outline = restructure(&mut dom, options)?;
    let html = serialize_document(&dom)?;
    Ok(Restructured { html, outline })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Selector, serialize_children, serialize_node};

    const SHELL: &str = r#"<div id="navbar"><ul class="nav"></ul></div><div class="content"></div>"#;

    fn page(source: &str) -> Dom {
        parse_html(&format!("{SHELL}<div id=\"src\">{source}</div>"))
    }

    fn inner(dom: &Dom, selector: &str) -> String {
        let id = Selector::parse(selector)
            .unwrap()
            .select_first(dom, dom.document())
            .unwrap();
        serialize_children(dom, id).unwrap()
    }

    fn run(dom: &mut Dom) -> Outline {
        restructure(dom, &RestructureOptions::default()).unwrap()
    }

    #[test]
    fn test_two_sections_with_subheading() {
        let mut dom = page(
            "<h1>Getting Started</h1><p>Install it.</p>\
             <h1>API Reference</h1><h3>Auth:</h3><p>Tokens.</p>",
        );
        let outline = run(&mut dom);

        let ids: Vec<_> = outline.blocks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["getting-started", "api-reference"]);

        let sections: Vec<_> = outline.sections().map(|e| e.label.as_str()).collect();
        assert_eq!(sections, ["Getting Started", "API Reference"]);

        let subs: Vec<_> = outline.subsections().collect();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].label, "Auth");
        assert_eq!(subs[0].target, "auth");
        assert_eq!(subs[0].href(), "#auth");

        assert_eq!(
            inner(&dom, ".content"),
            "<div class=\"block\"><h1 id=\"getting-started\">Getting Started</h1><p>Install it.</p></div>\
             <div class=\"block\"><h1 id=\"api-reference\">API Reference</h1><h3 id=\"auth\">Auth:</h3><p>Tokens.</p></div>"
        );
        assert_eq!(
            inner(&dom, ".nav"),
            "<li class=\"nav-header\"><a href=\"#getting-started\">Getting Started</a></li>\
             <li class=\"nav-header\"><a href=\"#api-reference\">API Reference</a></li>\
             <li><a href=\"#auth\">Auth</a></li>"
        );
        assert_eq!(inner(&dom, "#src"), "");
    }

    #[test]
    fn test_entries_interleave_in_document_order() {
        let mut dom = page("<h2>A</h2><h3>A1</h3><h3>A2</h3><h2>B</h2><h3>B1</h3>");
        let outline = run(&mut dom);

        let order: Vec<_> = outline
            .entries
            .iter()
            .map(|e| (e.kind, e.target.as_str()))
            .collect();
        assert_eq!(
            order,
            [
                (NavKind::Section, "a"),
                (NavKind::Subsection, "a1"),
                (NavKind::Subsection, "a2"),
                (NavKind::Section, "b"),
                (NavKind::Subsection, "b1"),
            ]
        );
        assert!(outline.blocks.iter().all(|b| b.level == HeadingLevel::Secondary));
    }

    #[test]
    fn test_no_headings_is_a_no_op_on_content() {
        let mut dom = parse_html(
            r#"<div id="navbar"><ul class="nav"></ul></div><div class="content"><p>kept</p></div><p>x</p>"#,
        );
        let outline = run(&mut dom);

        assert!(outline.is_empty());
        assert_eq!(inner(&dom, ".content"), "<p>kept</p>");
        assert_eq!(inner(&dom, ".nav"), "");
    }

    #[test]
    fn test_sibling_content_belongs_to_first_heading_only() {
        let mut dom = page("<h1>One</h1><p>a</p><ul><li>b</li></ul><h2>Two</h2><p>c</p>");
        let outline = run(&mut dom);

        let first = serialize_node(&dom, outline.blocks[0].node).unwrap();
        let second = serialize_node(&dom, outline.blocks[1].node).unwrap();
        assert_eq!(
            first,
            "<div class=\"block\"><h1 id=\"one\">One</h1><p>a</p><ul><li>b</li></ul></div>"
        );
        assert_eq!(second, "<div class=\"block\"><h2 id=\"two\">Two</h2><p>c</p></div>");
    }

    #[test]
    fn test_heading_without_content_gets_empty_block() {
        let mut dom = page("<h1>Lonely</h1><h1>Next</h1><p>n</p>");
        let outline = run(&mut dom);

        assert_eq!(dom.children(outline.blocks[0].node).count(), 1);
        assert_eq!(
            dom.children(outline.blocks[0].node).next(),
            Some(outline.blocks[0].heading)
        );
    }

    #[test]
    fn test_second_pass_changes_nothing() {
        let mut dom = page("<h1>Intro</h1><p>a</p><h3>Sub:</h3><h2>More</h2>");
        run(&mut dom);
        let first = serialize_document(&dom).unwrap();

        let outline = run(&mut dom);

        assert!(outline.is_empty());
        assert_eq!(serialize_document(&dom).unwrap(), first);
    }

    #[test]
    fn test_heading_clone_keeps_markup_and_gets_id() {
        let mut dom = page(r#"<h1 class="big" id="old">Hello <em>There</em></h1>"#);
        let outline = run(&mut dom);

        assert_eq!(
            serialize_node(&dom, outline.blocks[0].heading).unwrap(),
            "<h1 class=\"big\" id=\"hello-there\">Hello <em>There</em></h1>"
        );
        assert_eq!(outline.blocks[0].label, "Hello There");
    }

    #[test]
    fn test_labels_are_text_not_markup() {
        let mut dom = page("<h1>a &lt;b&gt; c</h1>");
        run(&mut dom);

        assert_eq!(
            inner(&dom, ".nav"),
            "<li class=\"nav-header\"><a href=\"#a-b-c\">a &lt;b&gt; c</a></li>"
        );
    }

    #[test]
    fn test_missing_containers_are_skipped() {
        let mut dom = parse_html("<h1>Alone</h1><p>text</p>");
        let outline = run(&mut dom);

        assert_eq!(outline.blocks.len(), 1);
        assert_eq!(outline.entries.len(), 1);
        assert_eq!(outline.entries[0].node, None);
        // The block was built but had nowhere to go.
        assert_eq!(dom.parent(outline.blocks[0].node), None);
        assert!(dom.find_by_tag("h1").is_none());
    }

    #[test]
    fn test_scroll_spy_activation() {
        let mut dom = page("<h1>x</h1>");
        run(&mut dom);
        let nav = Selector::parse("#navbar")
            .unwrap()
            .select_first(&dom, dom.document())
            .unwrap();
        assert_eq!(dom.get_attr(nav, "data-spy"), Some("scroll"));

        let mut dom = page("<h1>x</h1>");
        Restructurer::new(&RestructureOptions::default())
            .unwrap()
            .with_scroll_spy(NoScrollSpy)
            .restructure(&mut dom);
        assert!(!serialize_document(&dom).unwrap().contains("data-spy"));
    }

    #[test]
    fn test_container_swept_into_block_leaves_blocks_detached() {
        let mut dom = parse_html(
            r#"<ul class="nav"></ul><h1>Top</h1><div class="content"></div><p>after</p>"#,
        );
        let outline = run(&mut dom);

        assert_eq!(outline.blocks.len(), 1);
        let block = outline.blocks[0].node;
        let content = dom
            .descendants(block)
            .find(|&d| dom.has_class(d, "content"))
            .expect("container was swept into the block");
        assert_eq!(dom.parent(block), None);
        assert_eq!(dom.children(content).count(), 0);
    }

    #[test]
    fn test_nested_heading_is_processed_in_order() {
        // The h2 is swept into the h1 block first, then split out into its own.
        let mut dom = page("<h1>Outer</h1><section><h2>Inner</h2><p>i</p></section>");
        let outline = run(&mut dom);

        let ids: Vec<_> = outline.blocks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["outer", "inner"]);
        assert_eq!(
            serialize_node(&dom, outline.blocks[0].node).unwrap(),
            "<div class=\"block\"><h1 id=\"outer\">Outer</h1><section></section></div>"
        );
    }

    #[test]
    fn test_custom_classes() {
        let mut dom = parse_html(
            r#"<nav id="side"><ol id="toc"></ol></nav><main></main><h1>Doc</h1>"#,
        );
        let options = RestructureOptions::default()
            .with_nav_container("#side")
            .with_nav_list("#toc")
            .with_content_container("main")
            .with_block_class("section")
            .with_section_class("top");
        restructure(&mut dom, &options).unwrap();

        assert_eq!(
            inner(&dom, "main"),
            "<div class=\"section\"><h1 id=\"doc\">Doc</h1></div>"
        );
        assert_eq!(inner(&dom, "#toc"), "<li class=\"top\"><a href=\"#doc\">Doc</a></li>");
    }

    #[test]
    fn test_restructure_html_round_trip() {
        let page = restructure_html(
            &format!("<!DOCTYPE html>{SHELL}<h1>T</h1>"),
            &RestructureOptions::default(),
        )
        .unwrap();

        assert!(page.html.starts_with("<!DOCTYPE html><html>"));
        assert!(page.html.contains("<div class=\"content\"><div class=\"block\"><h1 id=\"t\">T</h1></div></div>"));
        assert_eq!(page.outline.blocks.len(), 1);
    }

    #[test]
    fn test_template_contents_are_ignored() {
        let mut dom = page(
            "<template><h1>Hidden</h1></template><h1>Real</h1>\
             <template><h3>Draft</h3></template><h3>Auth</h3>",
        );
        let outline = run(&mut dom);

        let blocks: Vec<_> = outline.blocks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(blocks, ["real"]);
        let targets: Vec<_> = outline.entries.iter().map(|e| e.target.as_str()).collect();
        assert_eq!(targets, ["real", "auth"]);
        assert_eq!(
            inner(&dom, "#src"),
            "<template><h1>Hidden</h1></template>"
        );
    }

    #[test]
    fn test_deeply_nested_heading() {
        const DEPTH: usize = 20_000;

        let html = format!(
            "{SHELL}<h1>{}x{}</h1>",
            "<span>".repeat(DEPTH),
            "</span>".repeat(DEPTH)
        );
        let page = restructure_html(&html, &RestructureOptions::default()).unwrap();

        assert_eq!(page.outline.blocks.len(), 1);
        assert_eq!(page.outline.blocks[0].id, "x");
        assert!(page.html.contains("<div class=\"block\"><h1 id=\"x\"><span>"));
    }
}
