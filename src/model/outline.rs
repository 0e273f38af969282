//! Outline types: heading candidates and leveled outline entries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outline heading level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Level for the `rank`-th largest distinct font size (0-based).
    ///
    /// Only the two largest sizes get their own level; everything
    /// below collapses into H3.
    pub fn from_size_rank(rank: usize) -> Self {
        match rank {
            0 => HeadingLevel::H1,
            1 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }

    /// Level as its label ("H1", "H2", "H3").
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A span accepted as a heading, before levels are assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingCandidate {
    /// Cleaned heading text
    pub text: String,
    /// Font size the heading was set in
    pub font_size: f32,
    /// Page number (1-indexed)
    pub page: u32,
}

impl HeadingCandidate {
    /// Create a heading candidate.
    pub fn new(text: impl Into<String>, font_size: f32, page: u32) -> Self {
        Self {
            text: text.into(),
            font_size,
            page,
        }
    }
}

/// One entry of a document outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub level: HeadingLevel,
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
}

/// Title and outline of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineResult {
    pub title: String,
    pub outline: Vec<OutlineEntry>,
}

impl OutlineResult {
    /// Number of entries at the given level.
    pub fn count_level(&self, level: HeadingLevel) -> usize {
        self.outline.iter().filter(|e| e.level == level).count()
    }
}
