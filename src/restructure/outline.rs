//! What a restructuring pass built.

use serde::Serialize;

use crate::dom::NodeId;

/// Heading rank the pass cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HeadingLevel {
    /// `h1`: starts a block.
    #[serde(rename = "h1")]
    Primary,
    /// `h2`: starts a block.
    #[serde(rename = "h2")]
    Secondary,
    /// `h3`: gets a sub-entry inside its block.
    #[serde(rename = "h3")]
    Tertiary,
}

impl HeadingLevel {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "h1" => Some(Self::Primary),
            "h2" => Some(Self::Secondary),
            "h3" => Some(Self::Tertiary),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Primary => "h1",
            Self::Secondary => "h2",
            Self::Tertiary => "h3",
        }
    }

    /// Does a heading of this level start a content block?
    pub fn starts_block(self) -> bool {
        matches!(self, Self::Primary | Self::Secondary)
    }
}

/// A `<div>` holding a cloned heading and the content that followed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentBlock {
    /// The block container.
    #[serde(skip)]
    pub node: NodeId,
    /// The cloned heading, first child of `node`.
    #[serde(skip)]
    pub heading: NodeId,
    pub level: HeadingLevel,
    /// Fragment identifier assigned to the cloned heading.
    pub id: String,
    /// Heading text.
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavKind {
    /// One per content block.
    Section,
    /// One per `h3` inside a block.
    Subsection,
}

/// A navigation link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub kind: NavKind,
    /// Fragment identifier the link points at, without the `#`.
    pub target: String,
    pub label: String,
    /// The `<li>` inserted into the navigation list, if there was one.
    #[serde(skip)]
    pub node: Option<NodeId>,
}

impl NavEntry {
    pub fn href(&self) -> String {
        format!("#{}", self.target)
    }
}

/// Blocks and navigation entries in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Outline {
    pub blocks: Vec<ContentBlock>,
    pub entries: Vec<NavEntry>,
}

impl Outline {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.entries.is_empty()
    }

    pub fn sections(&self) -> impl Iterator<Item = &NavEntry> {
        self.entries.iter().filter(|e| e.kind == NavKind::Section)
    }

    pub fn subsections(&self) -> impl Iterator<Item = &NavEntry> {
        self.entries.iter().filter(|e| e.kind == NavKind::Subsection)
    }

    /// Pretty-printed JSON, without DOM handles.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
