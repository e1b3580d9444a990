use gpui_content_model::{
    Block, ContentModelError, DEFAULT_INDENT_STEP_PX, Direction, Document, Editor, EditorConfig,
    Indentation, ListType, Paragraph, default_quote_format, keys,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn editor_with_selected_paragraph(config: EditorConfig) -> Editor {
    Editor::with_config(
        Document::new(vec![Paragraph::from_text("a").select_all().into_block()]),
        config,
    )
}

fn margin_left(editor: &Editor) -> Option<String> {
    editor.doc().blocks[0]
        .format()
        .get(keys::MARGIN_LEFT)
        .map(str::to_string)
}

#[test]
fn undo_and_redo_walk_the_history() {
    init_tracing();
    let mut editor = editor_with_selected_paragraph(EditorConfig::default());
    let original = editor.doc().clone();

    assert!(editor.toggle_list(ListType::Ordered).expect("toggle"));
    assert!(matches!(editor.doc().blocks[0], Block::ListItem(_)));
    let listed = editor.doc().clone();

    assert!(editor.undo());
    assert_eq!(editor.doc(), &original);
    assert!(!editor.can_undo());
    assert!(editor.can_redo());

    assert!(editor.redo());
    assert_eq!(editor.doc(), &listed);
    assert!(!editor.redo());
}

#[test]
fn new_edits_clear_the_redo_stack() {
    init_tracing();
    let mut editor = editor_with_selected_paragraph(EditorConfig::default());

    assert!(editor.set_direction(Direction::Rtl).expect("direction"));
    assert!(editor.undo());
    assert!(editor.toggle_block_quote().expect("quote"));
    assert!(!editor.can_redo());

    let Block::FormatContainer(container) = &editor.doc().blocks[0] else {
        panic!("expected quote");
    };
    assert_eq!(container.format, default_quote_format());
}

#[test]
fn callbacks_reporting_no_change_are_rolled_back() {
    init_tracing();
    let mut editor = editor_with_selected_paragraph(EditorConfig::default());
    let original = editor.doc().clone();

    let changed = editor
        .format_content_model("scratch", |doc| {
            doc.blocks.clear();
            false
        })
        .expect("format");
    assert!(!changed);
    assert_eq!(editor.doc(), &original);
    assert!(!editor.can_undo());

    editor.doc_mut().blocks.clear();
    assert!(!editor.set_direction(Direction::Rtl).expect("direction"));
    assert!(!editor.can_undo());
}

#[test]
fn config_from_json_caps_history_and_sets_the_step() {
    init_tracing();
    let config =
        EditorConfig::from_json_str(r#"{"max_undo": 2, "indent_step_px": 20}"#).expect("config");
    assert_eq!(config.max_undo, 2);
    assert_eq!(config.indent_step_px, 20.0);
    assert_eq!(config.quote_format, default_quote_format());

    let mut editor = editor_with_selected_paragraph(config);
    for _ in 0..3 {
        assert!(editor.set_indentation(Indentation::Indent).expect("indent"));
    }
    assert_eq!(margin_left(&editor).as_deref(), Some("60px"));

    assert!(editor.undo());
    assert!(editor.undo());
    assert!(!editor.undo());
    assert_eq!(margin_left(&editor).as_deref(), Some("20px"));
}

#[test]
fn empty_config_takes_defaults() {
    let config = EditorConfig::from_json_str("{}").expect("config");
    assert_eq!(config.max_undo, 200);
    assert_eq!(config.indent_step_px, DEFAULT_INDENT_STEP_PX);
    assert_eq!(config, EditorConfig::default().with_defaults());
}

#[test]
fn invalid_config_is_rejected() {
    let err = EditorConfig::from_json_str(r#"{"max_undo": "lots"}"#).expect_err("invalid");
    assert!(matches!(err, ContentModelError::InvalidConfig(_)));
}

#[test]
fn failed_normalization_restores_the_document() {
    init_tracing();
    let config = EditorConfig {
        max_normalize_iterations: 1,
        ..Default::default()
    };
    let mut editor = editor_with_selected_paragraph(config);
    let original = editor.doc().clone();

    let result = editor.format_content_model("insertEmpty", |doc| {
        doc.blocks.push(Paragraph::new(Vec::new()).into_block());
        true
    });
    assert!(matches!(
        result,
        Err(ContentModelError::NormalizeDidNotConverge { iterations: 1 })
    ));
    assert_eq!(editor.doc(), &original);
    assert!(!editor.can_undo());
}
