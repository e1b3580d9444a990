use gpui_content_model::{
    Block, Document, GroupPath, GroupStep, IterateSelectionsOption, ListFormatHolderMode,
    ListItem, ListLevel, ListType, Paragraph, Segment, SegmentRef, Table, TableCellContentMode,
    collect_selections, iterate_selections,
};

fn selected_text(text: &str) -> Block {
    Paragraph::from_text(text).select_all().into_block()
}

fn list_item(blocks: Vec<Block>) -> Block {
    ListItem::new(vec![ListLevel::new(ListType::Ordered)], Default::default())
        .with_blocks(blocks)
        .into_block()
}

#[test]
fn records_follow_document_order_into_table_cells() {
    let mut table = Table::new(2, 2);
    table.rows[1].cells[0].blocks = vec![selected_text("cell")];
    let doc = Document::new(vec![
        selected_text("a"),
        table.into_block(),
        Paragraph::from_text("b").into_block(),
    ]);

    let records = iterate_selections(&doc, &IterateSelectionsOption::default());

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].path, GroupPath::root());
    assert_eq!(records[0].block, Some(0));
    assert_eq!(records[0].segments, vec![SegmentRef::Paragraph(0)]);
    assert!(records[0].table_context.is_none());

    assert_eq!(
        records[1].path,
        GroupPath::root().child(GroupStep::TableCell {
            table: 1,
            row: 1,
            col: 0
        })
    );
    let context = records[1].table_context.as_ref().expect("table context");
    assert_eq!((context.row, context.col), (1, 0));
    assert!(!context.is_whole_table_selected);
}

#[test]
fn selected_cell_content_can_be_skipped() {
    let mut table = Table::new(1, 2);
    table.rows[0].cells[0].is_selected = true;
    let doc = Document::new(vec![table.into_block()]);

    let include = iterate_selections(&doc, &IterateSelectionsOption::default());
    assert_eq!(include.len(), 2);
    assert_eq!(include[0].block, None);
    assert_eq!(include[1].block, Some(0));

    let ignore = iterate_selections(
        &doc,
        &IterateSelectionsOption {
            content_under_selected_table_cell: TableCellContentMode::IgnoreForTable,
            ..Default::default()
        },
    );
    assert_eq!(ignore.len(), 1);
    assert_eq!(ignore[0].block, None);
    assert!(ignore[0].segments.is_empty());
}

#[test]
fn format_holder_follows_holder_mode() {
    let fully = Document::new(vec![list_item(vec![selected_text("a")])]);
    let records = iterate_selections(&fully, &IterateSelectionsOption::default());
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].segments, vec![SegmentRef::FormatHolder]);
    assert_eq!(
        records[1].path,
        GroupPath::root().child(GroupStep::ListItem(0))
    );

    let never = IterateSelectionsOption {
        include_list_format_holder: ListFormatHolderMode::Never,
        ..Default::default()
    };
    assert_eq!(iterate_selections(&fully, &never).len(), 1);

    let partly = Document::new(vec![list_item(vec![
        Paragraph::new(vec![Segment::text("a").selected(), Segment::text("b")]).into_block(),
    ])]);
    assert_eq!(
        iterate_selections(&partly, &IterateSelectionsOption::default()).len(),
        1
    );
    let any = IterateSelectionsOption {
        include_list_format_holder: ListFormatHolderMode::AnySegment,
        ..Default::default()
    };
    let records = iterate_selections(&partly, &any);
    assert_eq!(records.len(), 2);
    let holder = records[1].resolve_segments(&partly);
    assert_eq!(holder.len(), 1);
    assert!(holder[0].is_selection_marker());
    assert!(!holder[0].is_selected);
}

#[test]
fn range_ending_at_paragraph_start_drops_that_paragraph() {
    let doc = Document::new(vec![
        selected_text("a"),
        Paragraph::new(vec![Segment::selection_marker(), Segment::text("b")]).into_block(),
    ]);

    assert_eq!(
        iterate_selections(&doc, &IterateSelectionsOption::default()).len(),
        2
    );
    let records = collect_selections(&doc, &IterateSelectionsOption::default());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].block, Some(0));
}

#[test]
fn range_starting_at_paragraph_end_drops_that_paragraph() {
    let doc = Document::new(vec![
        Paragraph::new(vec![Segment::text("a"), Segment::selection_marker()]).into_block(),
        selected_text("b"),
    ]);

    let records = collect_selections(&doc, &IterateSelectionsOption::default());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].block, Some(1));
}

#[test]
fn caret_only_paragraphs_at_both_edges_are_dropped() {
    let doc = Document::new(vec![
        Paragraph::new(vec![Segment::selection_marker()]).into_block(),
        selected_text("b"),
        Paragraph::new(vec![Segment::selection_marker()]).into_block(),
    ]);

    assert_eq!(
        iterate_selections(&doc, &IterateSelectionsOption::default()).len(),
        3
    );
    let records = collect_selections(&doc, &IterateSelectionsOption::default());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].block, Some(1));
}

#[test]
fn lone_caret_is_kept() {
    let doc = Document::new(vec![
        Paragraph::new(vec![Segment::selection_marker()]).into_block(),
        Paragraph::from_text("b").into_block(),
    ]);

    let records = collect_selections(&doc, &IterateSelectionsOption::default());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].block, Some(0));
}

#[test]
fn nothing_selected_yields_no_records() {
    let doc = Document::new(vec![
        Paragraph::from_text("a").into_block(),
        Table::new(2, 2).into_block(),
    ]);
    assert!(collect_selections(&doc, &IterateSelectionsOption::default()).is_empty());
}
