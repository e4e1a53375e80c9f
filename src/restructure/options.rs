//! Where the pass finds its containers and what it names the things it builds.

use crate::dom::Selector;
use crate::error::{Error, Result};

pub const DEFAULT_NAV_CONTAINER: &str = "#navbar";
pub const DEFAULT_NAV_LIST: &str = ".nav";
pub const DEFAULT_CONTENT_CONTAINER: &str = ".content";
pub const DEFAULT_BLOCK_CLASS: &str = "block";
pub const DEFAULT_SECTION_CLASS: &str = "nav-header";

/// User-facing configuration, as plain strings.
///
/// ```
/// use pagenav::RestructureOptions;
///
/// let options = RestructureOptions::default()
///     .with_nav_list("#sidebar ul")
///     .with_content_container("main");
/// assert_eq!(options.nav_container, "#navbar");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestructureOptions {
    /// Element that receives scroll-linked highlighting.
    pub nav_container: String,
    /// List that navigation entries are appended to.
    pub nav_list: String,
    /// Element that content blocks are appended to.
    pub content_container: String,
    /// Class of the `<div>` wrapping each block.
    pub block_class: String,
    /// Class of the `<li>` of each top-level navigation entry.
    pub section_class: String,
}

impl Default for RestructureOptions {
    fn default() -> Self {
        Self {
            nav_container: DEFAULT_NAV_CONTAINER.to_string(),
            nav_list: DEFAULT_NAV_LIST.to_string(),
            content_container: DEFAULT_CONTENT_CONTAINER.to_string(),
            block_class: DEFAULT_BLOCK_CLASS.to_string(),
            section_class: DEFAULT_SECTION_CLASS.to_string(),
        }
    }
}

impl RestructureOptions {
    pub fn with_nav_container(mut self, selector: impl Into<String>) -> Self {
        self.nav_container = selector.into();
        self
    }

    pub fn with_nav_list(mut self, selector: impl Into<String>) -> Self {
        self.nav_list = selector.into();
        self
    }

    pub fn with_content_container(mut self, selector: impl Into<String>) -> Self {
        self.content_container = selector.into();
        self
    }

    pub fn with_block_class(mut self, class: impl Into<String>) -> Self {
        self.block_class = class.into();
        self
    }

    pub fn with_section_class(mut self, class: impl Into<String>) -> Self {
        self.section_class = class.into();
        self
    }

    /// Parse the selectors and validate the class names.
    pub fn compile(&self) -> Result<CompiledOptions> {
        Ok(CompiledOptions {
            nav_container: Selector::parse(&self.nav_container)?,
            nav_list: Selector::parse(&self.nav_list)?,
            content_container: Selector::parse(&self.content_container)?,
            block_class: class_token(&self.block_class)?,
            section_class: class_token(&self.section_class)?,
        })
    }
}

/// Options with selectors parsed once, ready for repeated use.
#[derive(Debug, Clone)]
pub struct CompiledOptions {
    pub nav_container: Selector,
    pub nav_list: Selector,
    pub content_container: Selector,
    pub block_class: String,
    pub section_class: String,
}

fn class_token(class: &str) -> Result<String> {
    if class.is_empty() || class.contains(char::is_whitespace) {
        return Err(Error::ClassName(class.to_string()));
    }
    Ok(class.to_string())
}
