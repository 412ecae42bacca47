//! Outline reconstruction from a block sequence.
//!
//! The builder keeps a stack of open nodes, one per depth of the scheme. A
//! marker closes every open node at its depth or deeper and opens a new one;
//! content blocks feed the content run of the deepest open node. Closing a
//! node that never received children synthesizes default children down to
//! the article level, so every article sits at the same depth.

use std::mem;

use super::classify::{is_stop_line, marker_remainder, HeadingClassifier};
use super::partition::ArticlePartitioner;
use super::scheme::{ArticleHeadingMode, HierarchyScheme, TitleLinePolicy};
use super::types::{BuilderState, ContentRun};
use crate::config::{PREAMBLE_DISPLAY_NAME, TITLE_LINE_MAX_WORDS};
use crate::extract::render_table;
use crate::mdx::text::{collapse_whitespace, is_all_caps, word_count};
use crate::types::{
    display_name, Block, Document, HeadingSignal, HeadingType, NodeContent, NodeOrigin,
    OutlineNode,
};

/// A node whose extent is not known yet.
#[derive(Debug)]
struct OpenNode {
    depth: usize,
    identifier: Option<String>,
    title: Option<String>,
    origin: NodeOrigin,
    children: Vec<OutlineNode>,
    run: ContentRun,
}

impl OpenNode {
    fn new(depth: usize, identifier: Option<String>, title: Option<String>, origin: NodeOrigin) -> Self {
        Self {
            depth,
            identifier,
            title,
            origin,
            children: Vec::new(),
            run: ContentRun::new(),
        }
    }

    fn display_name(&self, scheme: &HierarchyScheme) -> String {
        display_name(
            scheme.level(self.depth),
            self.title.as_deref(),
            self.identifier.as_deref(),
        )
    }
}

/// What a block means while a title is being captured.
enum TitleCandidate {
    /// Blank line: keep waiting.
    Skip,
    /// Title text for the open node.
    Line(String),
    /// Not a title: capture ends and the block is content.
    Stop,
}

/// Turns closed [`OpenNode`]s into finished [`OutlineNode`]s.
#[derive(Clone, Copy)]
struct NodeFinisher<'s> {
    scheme: &'s HierarchyScheme,
    partitioner: ArticlePartitioner,
}

impl NodeFinisher<'_> {
    fn finish(&self, node: OpenNode) -> OutlineNode {
        let level = self.scheme.level(node.depth);

        if node.depth >= self.scheme.leaf_depth() {
            let context = node.display_name(self.scheme);
            let articles = self.partitioner.partition(&node.run, &context);
            tracing::debug!(context = %context, articles = articles.len(), "Closed leaf node");
            return OutlineNode {
                level,
                identifier: node.identifier,
                title: node.title,
                origin: node.origin,
                content: NodeContent::Articles(articles),
            };
        }

        let mut children = node.children;
        if children.is_empty() {
            let mut child = OpenNode::new(
                node.depth + 1,
                None,
                Some(display_name(level, node.title.as_deref(), node.identifier.as_deref())),
                NodeOrigin::Default,
            );
            child.run = node.run;
            children.push(self.finish(child));
        } else if !node.run.is_blank() {
            tracing::warn!(
                level = level.label(),
                chars = node.run.text().len(),
                "Dropping content left on a node with children"
            );
        }

        OutlineNode {
            level,
            identifier: node.identifier,
            title: node.title,
            origin: node.origin,
            content: NodeContent::Children(children),
        }
    }

    /// Child holding the parent's content that precedes its first explicit
    /// child, or `None` when that content has no articles.
    fn direct_section(&self, parent: &mut OpenNode) -> Option<OutlineNode> {
        let run = mem::take(&mut parent.run);
        if run.is_blank() {
            return None;
        }
        if !self.partitioner.has_articles(&run) {
            tracing::debug!(
                node = %parent.display_name(self.scheme),
                chars = run.text().len(),
                "Discarding introductory text without articles"
            );
            return None;
        }

        let name = parent.display_name(self.scheme);
        let mut child = OpenNode::new(
            parent.depth + 1,
            None,
            Some(format!("{name} (Sección Directa)")),
            NodeOrigin::DirectSection,
        );
        child.run = run;
        Some(self.finish(child))
    }
}

/// State machine reconstructing the outline of one document.
pub struct OutlineBuilder<'s> {
    scheme: &'s HierarchyScheme,
    classifier: HeadingClassifier,
    partitioner: ArticlePartitioner,
    state: BuilderState,
    open: Vec<OpenNode>,
    roots: Vec<OutlineNode>,
    preamble: ContentRun,
}

impl<'s> OutlineBuilder<'s> {
    #[must_use]
    pub fn new(scheme: &'s HierarchyScheme) -> Self {
        Self {
            scheme,
            classifier: HeadingClassifier::for_scheme(scheme),
            partitioner: ArticlePartitioner::new(scheme.article_headings),
            state: BuilderState::AwaitingMarker,
            open: Vec::new(),
            roots: Vec::new(),
            preamble: ContentRun::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> BuilderState {
        self.state
    }

    fn finisher(&self) -> NodeFinisher<'s> {
        NodeFinisher {
            scheme: self.scheme,
            partitioner: self.partitioner,
        }
    }

    /// Feed the next block.
    pub fn push(&mut self, block: &Block) {
        let signal = self.classifier.classify(block);

        if let Some(depth) = self.scheme.depth_of(signal.kind) {
            let remainder = block
                .as_text()
                .and_then(|text| marker_remainder(&text.text, &signal));
            self.open_marker(depth, &signal.identifier, remainder);
            return;
        }

        if let BuilderState::CapturingTitleLine { depth } = self.state {
            match self.title_candidate(block, &signal) {
                TitleCandidate::Skip => return,
                TitleCandidate::Line(line) => {
                    if let Some(node) = self.open.get_mut(depth) {
                        node.title = Some(match node.title.take() {
                            Some(title) => format!("{title} {line}"),
                            None => line,
                        });
                    }
                    if self.scheme.title_lines == TitleLinePolicy::Single {
                        self.state = BuilderState::AccumulatingContent;
                    }
                    return;
                }
                TitleCandidate::Stop => self.state = BuilderState::AccumulatingContent,
            }
        }

        self.append_content(block, &signal);
    }

    /// Close every open node and return the outline.
    #[must_use]
    pub fn finish(mut self) -> Document {
        self.close_to(0);

        let preamble = mem::take(&mut self.preamble);
        if self.partitioner.has_articles(&preamble) {
            let node = self.preamble_node(preamble);
            self.roots.push(node);
        } else if !preamble.is_blank() && self.roots.is_empty() {
            tracing::warn!("No structural markers or articles found");
        }

        Document { nodes: self.roots }
    }

    fn title_candidate(&self, block: &Block, signal: &HeadingSignal) -> TitleCandidate {
        let Some(text_block) = block.as_text() else {
            return TitleCandidate::Stop;
        };
        let text = text_block.text.trim();
        if text.is_empty() {
            return TitleCandidate::Skip;
        }
        if signal.is_heading() || is_stop_line(text) || !text_block.emphasized {
            return TitleCandidate::Stop;
        }
        if !is_all_caps(text) && word_count(text) > TITLE_LINE_MAX_WORDS {
            return TitleCandidate::Stop;
        }
        TitleCandidate::Line(collapse_whitespace(text))
    }

    fn open_marker(&mut self, depth: usize, identifier: &str, remainder: Option<String>) {
        self.close_to(depth);

        if depth == 0 {
            let preamble = mem::take(&mut self.preamble);
            if self.partitioner.has_articles(&preamble) {
                let node = self.preamble_node(preamble);
                self.roots.push(node);
            } else if !preamble.is_blank() {
                tracing::debug!(chars = preamble.text().len(), "Discarding text before first marker");
            }
        }

        while self.open.len() < depth {
            self.open_implicit_ancestor();
        }
        self.flush_direct_section();

        let level = self.scheme.level(depth);
        tracing::debug!(level = level.label(), identifier, "Opened node");

        let captured = remainder.is_some();
        self.open.push(OpenNode::new(
            depth,
            Some(identifier.to_string()),
            remainder,
            NodeOrigin::Explicit,
        ));
        self.state = if captured {
            BuilderState::AccumulatingContent
        } else {
            BuilderState::CapturingTitleLine { depth }
        };
    }

    /// Open a node for a level the source skipped.
    fn open_implicit_ancestor(&mut self) {
        let depth = self.open.len();
        if depth == 0 {
            let mut node = OpenNode::new(
                0,
                None,
                Some(PREAMBLE_DISPLAY_NAME.to_string()),
                NodeOrigin::Preamble,
            );
            node.run = mem::take(&mut self.preamble);
            self.open.push(node);
            return;
        }

        self.flush_direct_section();
        let title = self
            .open
            .last()
            .map(|parent| parent.display_name(self.scheme));
        self.open
            .push(OpenNode::new(depth, None, title, NodeOrigin::Default));
    }

    fn flush_direct_section(&mut self) {
        let finisher = self.finisher();
        if let Some(parent) = self.open.last_mut() {
            if let Some(section) = finisher.direct_section(parent) {
                parent.children.push(section);
            }
        }
    }

    fn preamble_node(&self, run: ContentRun) -> OutlineNode {
        let mut node = OpenNode::new(
            0,
            None,
            Some(PREAMBLE_DISPLAY_NAME.to_string()),
            NodeOrigin::Preamble,
        );
        node.run = run;
        self.finisher().finish(node)
    }

    fn close_to(&mut self, depth: usize) {
        let finisher = self.finisher();
        while self.open.len() > depth {
            let Some(node) = self.open.pop() else {
                break;
            };
            let finished = finisher.finish(node);
            match self.open.last_mut() {
                Some(parent) => parent.children.push(finished),
                None => self.roots.push(finished),
            }
        }
    }

    fn append_content(&mut self, block: &Block, signal: &HeadingSignal) {
        let anchored = self.scheme.article_headings == ArticleHeadingMode::Anchored
            && signal.kind == HeadingType::Article;

        let run = match self.open.last_mut() {
            Some(node) => &mut node.run,
            None => &mut self.preamble,
        };
        match block {
            Block::Text(text) if anchored => run.push_heading(&text.text, &signal.identifier),
            Block::Text(text) => run.push_line(&text.text),
            Block::Table(table) => run.push_table(&render_table(&table.rows)),
        }

        if !self.open.is_empty() {
            self.state = BuilderState::AccumulatingContent;
        }
    }
}

/// Build the outline of a block sequence.
#[must_use]
pub fn build_outline(blocks: &[Block], scheme: &HierarchyScheme) -> Document {
    let mut builder = OutlineBuilder::new(scheme);
    for block in blocks {
        builder.push(block);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::scheme::{create_html_hierarchy, create_plan_hierarchy, create_pot_hierarchy};
    use crate::types::LevelKind;
    use pretty_assertions::assert_eq;

    fn numbers(node: &OutlineNode) -> Vec<String> {
        node.articles().iter().map(|a| a.number.clone()).collect()
    }

    fn assert_uniform_depth(document: &Document, depth: usize) {
        for node in &document.nodes {
            assert_eq!(node.depth(), depth, "node {}", node.display_name());
            fn check(node: &OutlineNode, remaining: usize) {
                if remaining == 1 {
                    assert!(node.is_leaf());
                } else {
                    assert!(!node.is_leaf());
                    for child in node.children() {
                        check(child, remaining - 1);
                    }
                }
            }
            check(node, depth);
        }
    }

    #[test]
    fn test_part_without_titles_gets_default_title() {
        let scheme = create_plan_hierarchy();
        let blocks = vec![
            Block::emphasized("PARTE I"),
            Block::emphasized("VISIÓN DE CIUDAD"),
            Block::text("Artículo 1. Objeto. Este título regula..."),
            Block::text("Artículo 2. Alcance. Aplica en todo el Distrito."),
        ];
        let document = build_outline(&blocks, &scheme);

        assert_eq!(document.nodes.len(), 1);
        let part = &document.nodes[0];
        assert_eq!(part.level, LevelKind::Part);
        assert_eq!(part.identifier.as_deref(), Some("I"));
        assert_eq!(part.title.as_deref(), Some("VISIÓN DE CIUDAD"));

        let titles = part.children();
        assert_eq!(titles.len(), 1);
        assert_eq!(titles[0].origin, NodeOrigin::Default);
        assert_eq!(titles[0].level, LevelKind::Title);
        assert_eq!(titles[0].display_name(), "VISIÓN DE CIUDAD");
        assert_eq!(numbers(&titles[0]), vec!["1", "2"]);

        let first = &titles[0].articles()[0];
        assert_eq!(first.title, "Objeto");
        assert_eq!(first.description_snippet, "Objeto.");
    }

    #[test]
    fn test_plain_block_after_marker_is_content() {
        let scheme = create_plan_hierarchy();
        let mut builder = OutlineBuilder::new(&scheme);
        builder.push(&Block::emphasized("PARTE I"));
        assert_eq!(builder.state(), BuilderState::CapturingTitleLine { depth: 0 });

        builder.push(&Block::text("Artículo 1. Objeto del plan."));
        assert_eq!(builder.state(), BuilderState::AccumulatingContent);

        let document = builder.finish();
        let part = &document.nodes[0];
        assert_eq!(part.title, None);
        assert_eq!(part.display_name(), "Parte I");
        assert_eq!(part.article_count(), 1);
    }

    #[test]
    fn test_non_emphasized_line_is_not_a_title() {
        let scheme = create_html_hierarchy();
        let blocks = vec![
            Block::emphasized("TÍTULO I"),
            Block::text("Disposiciones"),
            Block::anchored("Artículo 1. Objeto.", "1"),
        ];
        let document = build_outline(&blocks, &scheme);
        let title = &document.nodes[0].children()[0];
        assert_eq!(title.title, None);
        assert_eq!(title.identifier.as_deref(), Some("I"));
    }

    #[test]
    fn test_state_transitions() {
        let scheme = create_html_hierarchy();
        let mut builder = OutlineBuilder::new(&scheme);
        assert_eq!(builder.state(), BuilderState::AwaitingMarker);

        builder.push(&Block::text("ACUERDO 927 DE 2024"));
        assert_eq!(builder.state(), BuilderState::AwaitingMarker);

        builder.push(&Block::emphasized("PARTE I"));
        assert_eq!(builder.state(), BuilderState::CapturingTitleLine { depth: 0 });

        builder.push(&Block::text(""));
        assert_eq!(builder.state(), BuilderState::CapturingTitleLine { depth: 0 });

        builder.push(&Block::emphasized("VISIÓN DE CIUDAD"));
        assert_eq!(builder.state(), BuilderState::AccumulatingContent);

        builder.push(&Block::emphasized("CAPÍTULO 1"));
        assert_eq!(builder.state(), BuilderState::CapturingTitleLine { depth: 2 });
    }

    #[test]
    fn test_duplicate_and_out_of_order_numerals_kept_in_order() {
        let scheme = create_plan_hierarchy();
        let blocks = vec![
            Block::emphasized("PARTE I"),
            Block::emphasized("TÍTULO II"),
            Block::text("Artículo 1. Uno."),
            Block::emphasized("TÍTULO I"),
            Block::text("Artículo 2. Dos."),
            Block::emphasized("TÍTULO I"),
            Block::text("Artículo 3. Tres."),
        ];
        let document = build_outline(&blocks, &scheme);
        let ids: Vec<Option<&str>> = document.nodes[0]
            .children()
            .iter()
            .map(|t| t.identifier.as_deref())
            .collect();
        assert_eq!(ids, vec![Some("II"), Some("I"), Some("I")]);
    }

    #[test]
    fn test_direct_section_before_first_title() {
        let scheme = create_plan_hierarchy();
        let blocks = vec![
            Block::emphasized("PARTE II"),
            Block::emphasized("GESTIÓN"),
            Block::text("Artículo 10. Principios."),
            Block::emphasized("TÍTULO 1"),
            Block::emphasized("MOVILIDAD"),
            Block::text("Artículo 11. Red vial."),
        ];
        let document = build_outline(&blocks, &scheme);
        let children = document.nodes[0].children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].origin, NodeOrigin::DirectSection);
        assert_eq!(children[0].display_name(), "GESTIÓN (Sección Directa)");
        assert_eq!(numbers(&children[0]), vec!["10"]);
        assert_eq!(children[1].display_name(), "MOVILIDAD");
        assert_eq!(numbers(&children[1]), vec!["11"]);
    }

    #[test]
    fn test_intro_text_without_articles_is_not_a_section() {
        let scheme = create_plan_hierarchy();
        let blocks = vec![
            Block::emphasized("PARTE I"),
            Block::emphasized("VISIÓN"),
            Block::text("La presente parte desarrolla la visión de la ciudad para los próximos años."),
            Block::emphasized("TÍTULO 1"),
            Block::text("Artículo 1. Objeto."),
        ];
        let document = build_outline(&blocks, &scheme);
        let children = document.nodes[0].children();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].origin, NodeOrigin::Explicit);
    }

    #[test]
    fn test_articles_before_first_marker_form_preamble() {
        let scheme = create_plan_hierarchy();
        let blocks = vec![
            Block::text("Artículo 1. Adopción."),
            Block::emphasized("PARTE I"),
            Block::emphasized("VISIÓN"),
            Block::text("Artículo 2. Objeto."),
        ];
        let document = build_outline(&blocks, &scheme);
        assert_eq!(document.nodes.len(), 2);
        assert_eq!(document.nodes[0].origin, NodeOrigin::Preamble);
        assert_eq!(document.nodes[0].display_name(), "Documento Principal");
        assert_eq!(document.nodes[0].article_count(), 1);
        assert_eq!(document.nodes[1].article_count(), 1);
        assert_uniform_depth(&document, 2);
    }

    #[test]
    fn test_document_without_markers() {
        let scheme = create_pot_hierarchy();
        let blocks = vec![Block::text("Artículo 1. Único. Texto.")];
        let document = build_outline(&blocks, &scheme);
        assert_eq!(document.nodes.len(), 1);
        assert_eq!(document.nodes[0].origin, NodeOrigin::Preamble);
        assert_eq!(document.nodes[0].level, LevelKind::Book);
        assert_uniform_depth(&document, 2);
    }

    #[test]
    fn test_title_before_any_part_opens_preamble_ancestor() {
        let scheme = create_plan_hierarchy();
        let blocks = vec![
            Block::emphasized("TÍTULO 1"),
            Block::emphasized("DISPOSICIONES"),
            Block::text("Artículo 1. Objeto."),
            Block::emphasized("PARTE I"),
            Block::text("Artículo 2. Visión."),
        ];
        let document = build_outline(&blocks, &scheme);
        assert_eq!(document.nodes.len(), 2);
        assert_eq!(document.nodes[0].origin, NodeOrigin::Preamble);
        assert_eq!(document.nodes[0].children()[0].display_name(), "DISPOSICIONES");
        assert_uniform_depth(&document, 2);
    }

    #[test]
    fn test_multi_line_titles_joined() {
        let scheme = create_pot_hierarchy();
        let blocks = vec![
            Block::emphasized("LIBRO I"),
            Block::emphasized("COMPONENTE"),
            Block::emphasized("GENERAL"),
            Block::text(
                "El presente libro contiene las disposiciones aplicables a todo el territorio del Distrito Capital.",
            ),
            Block::emphasized("TÍTULO 1"),
            Block::emphasized("POLÍTICAS"),
            Block::emphasized("CAPÍTULO 1"),
            Block::text("Artículo 1. Objeto."),
        ];
        let document = build_outline(&blocks, &scheme);
        let book = &document.nodes[0];
        assert_eq!(book.display_name(), "COMPONENTE GENERAL");
        let title = &book.children()[0];
        assert_eq!(title.display_name(), "POLÍTICAS");
        assert!(title.articles()[0].body.starts_with("Artículo 1."));
    }

    #[test]
    fn test_chapter_line_stays_in_content_when_not_a_level() {
        let scheme = create_plan_hierarchy();
        let blocks = vec![
            Block::emphasized("TÍTULO 1"),
            Block::emphasized("CAPÍTULO 1"),
            Block::text("Artículo 1. Objeto."),
            Block::text("CAPÍTULO 2"),
            Block::text("Artículo 2. Alcance."),
        ];
        let document = build_outline(&blocks, &scheme);
        let title = &document.nodes[0].children()[0];
        assert_eq!(title.title, None);
        assert_eq!(numbers(title), vec!["1", "2"]);
        assert!(title.articles()[0].body.ends_with("CAPÍTULO 2"));
    }

    #[test]
    fn test_marker_remainder_used_as_title() {
        let scheme = create_html_hierarchy();
        let mut builder = OutlineBuilder::new(&scheme);
        builder.push(&Block::emphasized("TÍTULO II. DEL ORDENAMIENTO"));
        assert_eq!(builder.state(), BuilderState::AccumulatingContent);
        builder.push(&Block::anchored("Artículo 4. Suelo.", "4"));

        let document = builder.finish();
        let title = &document.nodes[0].children()[0];
        assert_eq!(title.display_name(), "DEL ORDENAMIENTO");
    }

    #[test]
    fn test_html_hierarchy_uniform_depth_and_order() {
        let scheme = create_html_hierarchy();
        let blocks = vec![
            Block::emphasized("ACUERDO 927 DE 2024"),
            Block::text("CONSIDERANDO que el artículo 3. del Decreto..."),
            Block::emphasized("PARTE I"),
            Block::emphasized("VISIÓN"),
            Block::anchored("Artículo 1. Objeto.", "1"),
            Block::emphasized("TÍTULO I"),
            Block::emphasized("PRINCIPIOS"),
            Block::emphasized("CAPÍTULO I"),
            Block::emphasized("ENFOQUES"),
            Block::anchored("Artículo 2. Enfoque de género.", "2"),
            Block::text("Artículo 3. Sin ancla, es texto del artículo 2."),
            Block::table(vec![vec!["Meta".to_string()], vec!["10".to_string()]]),
            Block::anchored("Artículo 4. Enfoque territorial.", "4"),
            Block::emphasized("TÍTULO II"),
            Block::anchored("Artículo 5. Metas.", "5"),
            Block::emphasized("PARTE II"),
            Block::anchored("Artículo 6. Programas.", "6"),
        ];
        let document = build_outline(&blocks, &scheme);
        assert_uniform_depth(&document, 3);

        let order: Vec<&str> = document.articles().iter().map(|a| a.number.as_str()).collect();
        assert_eq!(order, vec!["1", "2", "4", "5", "6"]);

        let part_one = &document.nodes[0];
        assert_eq!(part_one.children()[0].origin, NodeOrigin::DirectSection);
        let article_two = &part_one.children()[1].children()[0].articles()[0];
        assert!(article_two.body.contains("Sin ancla"));
        assert!(article_two.body.contains("| Meta |"));
    }
}
