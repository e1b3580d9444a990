use gpui_content_model::{
    Block, Direction, Document, Format, ListItem, ListLevel, ListType, Paragraph, Table, keys,
    set_model_direction,
};

fn list_item(list_type: ListType, blocks: Vec<Block>) -> Block {
    ListItem::new(vec![ListLevel::new(list_type)], Format::new())
        .with_blocks(blocks)
        .into_block()
}

fn text(text: &str) -> Block {
    Paragraph::from_text(text).into_block()
}

fn selected(text: &str) -> Block {
    Paragraph::from_text(text).select_all().into_block()
}

#[test]
fn flipping_direction_moves_indentation_and_is_idempotent() {
    let format = Format::new()
        .with(keys::MARGIN_LEFT, "40px")
        .with(keys::PADDING_LEFT, "5px");
    let mut doc = Document::new(vec![
        Paragraph::from_text("a")
            .select_all()
            .with_format(format)
            .into_block(),
    ]);

    assert!(set_model_direction(&mut doc, Direction::Rtl));
    let once = doc.clone();
    let block_format = once.blocks[0].format();
    assert_eq!(block_format.get(keys::DIRECTION), Some("rtl"));
    assert_eq!(block_format.get(keys::MARGIN_RIGHT), Some("40px"));
    assert_eq!(block_format.get(keys::PADDING_RIGHT), Some("5px"));
    assert!(!block_format.contains(keys::MARGIN_LEFT));
    assert!(!block_format.contains(keys::PADDING_LEFT));

    assert!(!set_model_direction(&mut doc, Direction::Rtl));
    assert_eq!(doc, once);
}

#[test]
fn left_to_right_on_unset_direction_is_a_no_op() {
    let original = Document::new(vec![selected("a")]);
    let mut doc = original.clone();

    assert!(!set_model_direction(&mut doc, Direction::Ltr));
    assert_eq!(doc, original);
}

#[test]
fn ordered_thread_changes_together() {
    let mut doc = Document::new(vec![
        list_item(ListType::Ordered, vec![selected("one")]),
        text("between"),
        list_item(ListType::Ordered, vec![text("two")]),
    ]);

    assert!(set_model_direction(&mut doc, Direction::Rtl));

    for ix in [0, 2] {
        let Block::ListItem(item) = &doc.blocks[ix] else {
            panic!("expected list item at {ix}");
        };
        assert_eq!(item.levels[0].format.direction(), Direction::Rtl);
        assert_eq!(item.format.direction(), Direction::Rtl);
        assert_eq!(item.blocks[0].format().direction(), Direction::Rtl);
    }
    assert!(doc.blocks[1].format().is_empty());
}

#[test]
fn bullet_thread_ends_at_other_content() {
    let mut doc = Document::new(vec![
        list_item(ListType::Unordered, vec![selected("one")]),
        text("between"),
        list_item(ListType::Unordered, vec![text("two")]),
    ]);

    assert!(set_model_direction(&mut doc, Direction::Rtl));

    let Block::ListItem(first) = &doc.blocks[0] else {
        panic!("expected list item");
    };
    assert_eq!(first.levels[0].format.direction(), Direction::Rtl);
    let Block::ListItem(last) = &doc.blocks[2] else {
        panic!("expected list item");
    };
    assert!(last.levels[0].format.is_empty());
}

#[test]
fn tables_in_list_items_mirror_cell_borders() {
    let mut table = Table::new(1, 2);
    table.rows[0].cells[0].format.set(keys::BORDER_LEFT, "1px solid red");
    let mut doc = Document::new(vec![list_item(
        ListType::Ordered,
        vec![selected("caption"), table.into_block()],
    )]);

    assert!(set_model_direction(&mut doc, Direction::Rtl));

    let Block::ListItem(item) = &doc.blocks[0] else {
        panic!("expected list item");
    };
    let Block::Table(table) = &item.blocks[1] else {
        panic!("expected table");
    };
    assert_eq!(table.format.direction(), Direction::Rtl);
    let cell = &table.rows[0].cells[0];
    assert_eq!(cell.format.get(keys::BORDER_RIGHT), Some("1px solid red"));
    assert!(!cell.format.contains(keys::BORDER_LEFT));
}
