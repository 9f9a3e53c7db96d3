//! Structured message content.
//!
//! The formatter turns raw message text into an ordered sequence of
//! [`Block`]s. Blocks are UI-agnostic: the renderer translates them to
//! terminal styles at draw time.

use serde::{Deserialize, Serialize};

/// One structural unit of rendered message content.
///
/// Invariants upheld by the formatter: block order matches source order,
/// and no block is ever empty (no empty paragraph, no zero-item list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Block {
    /// Flowing text made of styled inline runs.
    Paragraph(Vec<InlineRun>),
    /// Verbatim fenced code block content, opaque to inline styling.
    CodeBlock(String),
    /// Maximal run of consecutive `- ` lines.
    BulletList(Vec<String>),
    /// Maximal run of consecutive `1. `-style lines.
    NumberedList(Vec<String>),
}

/// A span of paragraph text carrying one emphasis style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineRun {
    pub text: String,
    pub emphasis: Emphasis,
}

impl InlineRun {
    pub fn new(text: impl Into<String>, emphasis: Emphasis) -> Self {
        Self {
            text: text.into(),
            emphasis,
        }
    }

    /// A run with no emphasis.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Emphasis::None)
    }
}

/// Emphasis applied to an inline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Emphasis {
    #[default]
    None,
    Bold,
    Italic,
    Code,
}
