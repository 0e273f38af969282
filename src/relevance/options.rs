//! Relevance report options.

/// Bounds on the relevance report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankOptions {
    /// Sections listed in `extracted_sections`
    pub max_sections: usize,
    /// Top sections summarized in `sub_section_analysis`
    pub max_summaries: usize,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            max_sections: 20,
            max_summaries: 10,
        }
    }
}

impl RankOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of ranked sections reported.
    pub fn with_max_sections(mut self, max_sections: usize) -> Self {
        self.max_sections = max_sections;
        self
    }

    /// Set the number of sections summarized.
    pub fn with_max_summaries(mut self, max_summaries: usize) -> Self {
        self.max_summaries = max_summaries;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RankOptions::default();
        assert_eq!(options.max_sections, 20);
        assert_eq!(options.max_summaries, 10);
    }

    #[test]
    fn test_builder() {
        let options = RankOptions::new().with_max_sections(5).with_max_summaries(2);
        assert_eq!(options, RankOptions { max_sections: 5, max_summaries: 2 });
    }
}
