mod common;

use common::{body_floor, text_positions};
use taxdoc_pdf::{Cell, LayoutConfig, Table, render_table_pages};

fn numbered_table(n: usize) -> Table {
    let mut table = Table::new(vec![Cell::text("Line"), Cell::text("Value")]);
    table.rows = (0..n)
        .map(|i| vec![Cell::text(format!("L{i:04}")), Cell::number(i)])
        .collect();
    table
}

fn line_labels(page: &taxdoc_pdf::RenderedPage) -> Vec<&str> {
    page.texts()
        .iter()
        .map(String::as_str)
        .filter(|t| t.len() == 5 && t.starts_with('L'))
        .collect()
}

#[test]
fn single_line_rows_fill_whole_pages() {
    common::init_logging();
    let config = LayoutConfig {
        repeat_table_headers: false,
        ..LayoutConfig::default()
    };
    let n = 200;
    let pages = render_table_pages(&numbered_table(n), &config, "Ledger");

    let row_h = config.line_height(config.table_font_size) + 2.0 * config.cell_padding;
    let page_h = config.content_height();
    let per_page = (page_h / row_h).floor() as usize;
    // The header band takes one row's height on the first page only.
    let first_page = ((page_h - row_h) / row_h).floor() as usize;
    let expected = 1 + (n - first_page).div_ceil(per_page);

    let total_h = (n + 1) as f32 * row_h;
    assert_eq!(expected, (total_h / page_h).ceil() as usize);
    assert_eq!(pages.len(), expected);

    assert_eq!(line_labels(&pages[0]).len(), first_page);
    for page in &pages[1..pages.len() - 1] {
        assert_eq!(line_labels(page).len(), per_page, "page {}", page.number());
        assert!(!page.texts().iter().any(|t| t == "Line"));
    }

    let drawn: Vec<&str> = pages.iter().flat_map(line_labels).collect();
    let expected_order: Vec<String> = (0..n).map(|i| format!("L{i:04}")).collect();
    assert_eq!(drawn, expected_order);
}

#[test]
fn row_taller_than_a_page_continues_on_following_pages() {
    let config = LayoutConfig::default();
    let mut table = Table::new(vec![Cell::text("Item"), Cell::text("Notes")]);
    table.rows = vec![
        vec![Cell::text("first"), Cell::text("short note")],
        vec![Cell::text("second"), Cell::text("word ".repeat(3000))],
        vec![Cell::text("third"), Cell::text("short note")],
    ];
    table.footers = vec![vec![Cell::text("Total"), Cell::text("3 items")]];
    let pages = render_table_pages(&table, &config, "Schedule");
    assert!(pages.len() > 2, "only {} pages", pages.len());

    let floor = body_floor(&config);
    let mut words = 0;
    for page in &pages {
        for (y, text) in text_positions(page) {
            if text.starts_with("word") {
                assert!(y >= floor, "page {}: line at y={y} below {floor}", page.number());
                assert!(y <= config.page_height());
                words += text.split_whitespace().count();
            }
        }
        // The header band repeats on every page and never stands alone.
        assert!(page.texts().iter().any(|t| t == "Item"), "page {}", page.number());
        assert!(
            page.texts()
                .iter()
                .any(|t| t.starts_with("word") || t == "first" || t == "third"),
            "page {} holds only a header band",
            page.number()
        );
    }
    assert_eq!(words, 3000);

    let last = pages.last().expect("pages");
    assert!(last.contains_text("third"));
    assert!(last.contains_text("3 items"));
}

#[test]
fn empty_table_keeps_header_with_placeholder() {
    let config = LayoutConfig::default();
    let table = Table::new(vec![Cell::text("Item"), Cell::text("Notes")])
        .with_placeholder("Nothing recorded.");
    let pages = render_table_pages(&table, &config, "Schedule");
    assert_eq!(pages.len(), 1);
    let texts = pages[0].texts();
    let header = texts.iter().position(|t| t == "Item").expect("header");
    let placeholder = texts.iter().position(|t| t == "Nothing recorded.").expect("placeholder");
    assert!(header < placeholder);
}
