use gpui_content_model::{
    Block, ContentModelError, DEFAULT_MAX_NORMALIZE_ITERATIONS, Document, Format, FormatContainer,
    ListItem, ListLevel, ListType, NormalizePass, NormalizePipeline, Paragraph, QUOTE_TAG, Segment,
    SegmentKind, Table, default_quote_format, normalize_content_model,
};

fn text(text: &str) -> Block {
    Paragraph::from_text(text).into_block()
}

#[test]
fn levelless_list_items_give_back_their_blocks() {
    let mut doc = Document::new(vec![
        ListItem::new(Vec::new(), Format::new())
            .with_blocks(vec![text("a"), text("b")])
            .into_block(),
        text("c"),
    ]);

    assert!(normalize_content_model(&mut doc));
    let texts: Vec<String> = doc
        .blocks
        .iter()
        .filter_map(Block::as_paragraph)
        .map(Paragraph::text)
        .collect();
    assert_eq!(texts, vec!["a", "b", "c"]);
}

#[test]
fn text_runs_with_equal_format_are_merged() {
    let bold = Format::new().with("fontWeight", "bold");
    let mut doc = Document::new(vec![
        Paragraph::new(vec![
            Segment::text("a"),
            Segment::text(""),
            Segment::text("b"),
            Segment::text("c").with_format(bold.clone()),
            Segment::text("d").selected(),
        ])
        .into_block(),
    ]);

    assert!(normalize_content_model(&mut doc));
    let paragraph = doc.blocks[0].as_paragraph().expect("paragraph");
    assert_eq!(paragraph.segments.len(), 3);
    assert_eq!(paragraph.segments[0].kind, SegmentKind::Text("ab".to_string()));
    assert_eq!(paragraph.segments[1].format, bold);
    assert!(paragraph.segments[2].is_selected);
}

#[test]
fn caret_only_paragraph_gets_a_line_break() {
    let mut doc = Document::new(vec![
        Paragraph::new(vec![Segment::selection_marker()]).into_block(),
    ]);

    assert!(normalize_content_model(&mut doc));
    let paragraph = doc.blocks[0].as_paragraph().expect("paragraph");
    assert_eq!(paragraph.segments.len(), 2);
    assert!(paragraph.segments[0].is_selection_marker());
    assert_eq!(paragraph.segments[1].kind, SegmentKind::Br);
}

#[test]
fn emptied_groups_disappear_but_cells_and_root_may_stay_empty() {
    let mut table = Table::new(1, 1);
    table.rows[0].cells[0].blocks = vec![Paragraph::new(Vec::new()).into_block()];
    let mut doc = Document::new(vec![
        FormatContainer::new(QUOTE_TAG, default_quote_format())
            .with_blocks(vec![Paragraph::new(vec![Segment::text("")]).into_block()])
            .into_block(),
        ListItem::new(vec![ListLevel::new(ListType::Ordered)], Format::new()).into_block(),
        table.into_block(),
    ]);

    assert!(normalize_content_model(&mut doc));
    assert_eq!(doc.blocks.len(), 1);
    let table = doc.blocks[0].as_table().expect("table");
    assert!(table.rows[0].cells[0].blocks.is_empty());

    let mut doc = Document::new(vec![Paragraph::new(Vec::new()).into_block()]);
    assert!(normalize_content_model(&mut doc));
    assert!(doc.blocks.is_empty());
}

#[test]
fn normalized_documents_stay_put() {
    let mut doc = Document::new(vec![
        text("a"),
        ListItem::new(vec![ListLevel::new(ListType::Unordered)], Format::new())
            .with_blocks(vec![text("b")])
            .into_block(),
    ]);
    let original = doc.clone();

    let pipeline = NormalizePipeline::default();
    assert_eq!(
        pipeline.run_to_fixpoint(&mut doc, DEFAULT_MAX_NORMALIZE_ITERATIONS).ok(),
        Some(false)
    );
    assert_eq!(doc, original);
}

struct AlwaysAppends;

impl NormalizePass for AlwaysAppends {
    fn id(&self) -> &'static str {
        "test.always_appends"
    }

    fn run(&self, blocks: &mut Vec<Block>) -> bool {
        blocks.push(Paragraph::from_text("again").into_block());
        true
    }
}

#[test]
fn a_pass_that_never_settles_is_an_error() {
    let pipeline = NormalizePipeline::new(vec![Box::new(AlwaysAppends)]);
    assert_eq!(pipeline.passes()[0].id(), "test.always_appends");

    let mut doc = Document::new(Vec::new());
    let result = pipeline.run_to_fixpoint(&mut doc, 3);
    assert!(matches!(
        result,
        Err(ContentModelError::NormalizeDidNotConverge { iterations: 3 })
    ));
    assert_eq!(doc.blocks.len(), 3);
}
