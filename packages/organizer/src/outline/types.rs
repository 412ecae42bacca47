//! Working types of the outline builder.

/// Where the builder stands between two blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    /// Nothing has been opened yet.
    AwaitingMarker,
    /// A marker was seen; the next title-like line names the node at `depth`.
    CapturingTitleLine { depth: usize },
    /// Blocks go to the content run of the deepest open node.
    AccumulatingContent,
}

/// An article heading that arrived as an anchored block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchoredHeading {
    /// Byte offset of the heading line within the run text.
    pub offset: usize,
    pub number: String,
}

/// Flattened text of consecutive content blocks.
///
/// Text blocks are joined with newlines; tables are inlined as Markdown
/// between blank lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentRun {
    text: String,
    anchors: Vec<AnchoredHeading>,
}

impl ContentRun {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run made of the given lines.
    #[must_use]
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut run = Self::new();
        for line in lines {
            run.push_line(line);
        }
        run
    }

    pub fn push_line(&mut self, line: &str) {
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str(line);
    }

    /// Append an anchored article heading line.
    pub fn push_heading(&mut self, line: &str, number: &str) {
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.anchors.push(AnchoredHeading {
            offset: self.text.len(),
            number: number.to_string(),
        });
        self.text.push_str(line);
    }

    /// Append a rendered Markdown table.
    pub fn push_table(&mut self, markdown: &str) {
        self.push_line("");
        self.push_line(markdown.trim_end());
        self.push_line("");
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn anchors(&self) -> &[AnchoredHeading] {
        &self.anchors
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
