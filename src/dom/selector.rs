//! Compiled CSS selector lists and document queries.

use selectors::context::{MatchingContext, SelectorCaches};
use selectors::matching::{MatchingForInvalidation, MatchingMode, NeedsSelectorFlags};
use selectors::parser::{ParseRelative, SelectorList};

use super::arena::{Dom, NodeId};
use super::element_ref::{ElementRef, PageSelectors};
use crate::error::{Error, Result};

/// A parsed, comma-separated selector list such as `"h1, h2"`.
#[derive(Clone)]
pub struct Selector {
    source: String,
    list: SelectorList<PageSelectors>,
}

impl Selector {
    /// Parse a selector list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Selector`] if the text is not a valid selector list
    /// or uses a pseudo-class the static DOM cannot evaluate.
    pub fn parse(source: &str) -> Result<Self> {
        let mut input = cssparser::ParserInput::new(source);
        let mut parser = cssparser::Parser::new(&mut input);
        let list = SelectorList::parse(&PageSelectors, &mut parser, ParseRelative::No)
            .map_err(|e| Error::Selector {
                selector: source.to_string(),
                message: format!("{:?} at column {}", e.kind, e.location.column),
            })?;

        Ok(Self {
            source: source.to_string(),
            list,
        })
    }

    /// The text this selector was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Does the element `id` match any selector in the list?
    pub fn matches(&self, dom: &Dom, id: NodeId) -> bool {
        if !dom.is_element(id) {
            return false;
        }
        let elem = ElementRef::new(dom, id);
        let mut caches = SelectorCaches::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut caches,
            selectors::context::QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            MatchingForInvalidation::No,
        );

        self.list.slice().iter().any(|selector| {
            selectors::matching::matches_selector(selector, 0, None, &elem, &mut context)
        })
    }

    /// Every matching descendant of `root`, in document order.
    ///
    /// `<template>` contents are never searched.
    pub fn select_all(&self, dom: &Dom, root: NodeId) -> Vec<NodeId> {
        dom.live_descendants(root)
            .filter(|&id| self.matches(dom, id))
            .collect()
    }

    /// First matching descendant of `root` in document order.
    pub fn select_first(&self, dom: &Dom, root: NodeId) -> Option<NodeId> {
        dom.live_descendants(root).find(|&id| self.matches(dom, id))
    }
}

impl std::fmt::Debug for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Selector").field(&self.source).finish()
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}
