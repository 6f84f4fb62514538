use std::ops::Range;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::layout::{TextLine, baseline_in, wrap_lines};
use super::{FOOTER_BAND, HEADER_BAND, INK, MUTED, PageCursor, RULE, Rgb, ZEBRA};
use crate::fonts::FontFace;
use crate::format::{
    Currency, format_date, format_money, format_percent, format_quantity, format_signed_money,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellAlign {
    Left,
    Center,
    Right,
}

/// What a cell holds. Decided by whoever builds the row, never inferred
/// from the text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    Text,
    Money,
    Number,
    Percent,
    Date,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub text: String,
    pub align: CellAlign,
    pub kind: CellKind,
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Cell {
            text: text.into(),
            align: CellAlign::Left,
            kind: CellKind::Text,
        }
    }

    pub fn money(amount: Decimal, currency: Currency) -> Self {
        Cell {
            text: format_money(amount, currency),
            align: CellAlign::Right,
            kind: CellKind::Money,
        }
    }

    /// Money with an explicit `+` on gains.
    pub fn signed_money(amount: Decimal, currency: Currency) -> Self {
        Cell {
            text: format_signed_money(amount, currency),
            align: CellAlign::Right,
            kind: CellKind::Money,
        }
    }

    pub fn number(value: impl std::fmt::Display) -> Self {
        Cell {
            text: value.to_string(),
            align: CellAlign::Right,
            kind: CellKind::Number,
        }
    }

    pub fn quantity(qty: Decimal) -> Self {
        Cell::number(format_quantity(qty))
    }

    pub fn percent(pct: Decimal) -> Self {
        Cell {
            text: format_percent(pct),
            align: CellAlign::Right,
            kind: CellKind::Percent,
        }
    }

    pub fn date(date: NaiveDate) -> Self {
        Cell {
            text: format_date(date),
            align: CellAlign::Left,
            kind: CellKind::Date,
        }
    }

    pub fn empty() -> Self {
        Cell::text("")
    }

    pub fn aligned(mut self, align: CellAlign) -> Self {
        self.align = align;
        self
    }
}

/// A grid of typed cells. Footer rows render bold on a tinted band right
/// after the last data row.
#[derive(Clone, Debug, Default)]
pub struct Table {
    pub headers: Vec<Cell>,
    pub rows: Vec<Vec<Cell>>,
    pub footers: Vec<Vec<Cell>>,
    /// Relative column widths; normalized to the printable width. Equal
    /// split when absent or when the count does not match the headers.
    pub column_widths: Option<Vec<f32>>,
    /// Shown across the table when there are no data rows.
    pub empty_placeholder: String,
}

impl Table {
    pub fn new(headers: Vec<Cell>) -> Self {
        Table {
            headers,
            ..Table::default()
        }
    }

    pub fn with_widths(mut self, widths: &[f32]) -> Self {
        self.column_widths = Some(widths.to_vec());
        self
    }

    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        self.empty_placeholder = text.into();
        self
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

fn resolve_column_widths(table: &Table, total: f32) -> Vec<f32> {
    let ncols = table.column_count().max(1);
    match &table.column_widths {
        Some(widths) if widths.len() == ncols && widths.iter().all(|w| *w > 0.0) => {
            let sum: f32 = widths.iter().sum();
            widths.iter().map(|w| w / sum * total).collect()
        }
        Some(widths) => {
            log::warn!(
                "table: {} column widths for {} columns, using equal split",
                widths.len(),
                ncols
            );
            vec![total / ncols as f32; ncols]
        }
        None => vec![total / ncols as f32; ncols],
    }
}

/// Type metrics and column geometry shared by every row of one table.
struct TableMetrics {
    col_widths: Vec<f32>,
    size: f32,
    line_h: f32,
    pad: f32,
    repeat_headers: bool,
}

impl TableMetrics {
    fn row_height(&self, lines: usize) -> f32 {
        lines as f32 * self.line_h + 2.0 * self.pad
    }
}

/// A row split across pages keeps at least this many lines together.
const MIN_SPLIT_LINES: usize = 3;

struct RowLayout {
    lines: usize,
    cell_lines: Vec<Vec<TextLine>>,
}

fn layout_row(cells: &[Cell], face: FontFace, m: &TableMetrics) -> RowLayout {
    let cell_lines: Vec<Vec<TextLine>> = m
        .col_widths
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let text = cells.get(i).map_or("", |c| c.text.as_str());
            wrap_lines(text, face, m.size, (w - 2.0 * m.pad).max(1.0))
        })
        .collect();
    RowLayout {
        lines: cell_lines.iter().map(Vec::len).max().unwrap_or(1).max(1),
        cell_lines,
    }
}

/// Draw lines `range` of a row with the first of them at the cursor.
fn draw_row_lines(
    cursor: &mut PageCursor,
    cells: &[Cell],
    layout: &RowLayout,
    range: Range<usize>,
    face: FontFace,
    m: &TableMetrics,
) {
    let top = cursor.y();
    let mut x = cursor.left();
    for (i, (lines, col_w)) in layout.cell_lines.iter().zip(&m.col_widths).enumerate() {
        let align = cells.get(i).map_or(CellAlign::Left, |c| c.align);
        for (li, line) in lines.iter().enumerate().take(range.end).skip(range.start) {
            let text_x = match align {
                CellAlign::Left => x + m.pad,
                CellAlign::Center => x + (col_w - line.width) / 2.0,
                CellAlign::Right => x + col_w - m.pad - line.width,
            };
            let line_top = top + m.pad + (li - range.start) as f32 * m.line_h;
            let baseline = baseline_in(line_top, m.line_h, m.size);
            cursor.text(text_x, baseline, face, m.size, INK, &line.text);
        }
        x += col_w;
    }
}

/// The header band of the table being rendered, repeated on continuation
/// pages.
struct HeaderBand<'t> {
    cells: &'t [Cell],
    layout: RowLayout,
}

impl HeaderBand<'_> {
    fn height(&self, m: &TableMetrics) -> f32 {
        m.row_height(self.layout.lines)
    }
}

fn draw_header_band(cursor: &mut PageCursor, header: &HeaderBand, m: &TableMetrics) {
    let top = cursor.y();
    let height = header.height(m);
    cursor.fill_rect(cursor.left(), top, cursor.width(), height, HEADER_BAND);
    let lines = 0..header.layout.lines;
    draw_row_lines(cursor, header.cells, &header.layout, lines, FontFace::Bold, m);
    let right = cursor.left() + cursor.width();
    cursor.hline(cursor.left(), right, top + height, 0.75, MUTED);
    cursor.advance(height);
}

/// Height that must fit before a row may start: the whole row when it fits
/// on a page below a header band, otherwise its first few lines.
fn lead_height(layout: &RowLayout, capacity: f32, m: &TableMetrics) -> f32 {
    let full = m.row_height(layout.lines);
    if full <= capacity {
        full
    } else {
        m.row_height(layout.lines.min(MIN_SPLIT_LINES))
    }
}

/// Place one row. A row taller than a page continues line by line on the
/// following pages, each part on its own band under a repeated header.
fn place_row(
    cursor: &mut PageCursor,
    header: &HeaderBand,
    cells: &[Cell],
    layout: &RowLayout,
    style: (FontFace, Option<Rgb>),
    m: &TableMetrics,
) {
    let (face, band) = style;
    let capacity = cursor.config().content_height() - header.height(m);
    if cursor.ensure_space(lead_height(layout, capacity, m)) && m.repeat_headers {
        draw_header_band(cursor, header, m);
    }

    let mut start = 0;
    loop {
        let rest = layout.lines - start;
        let end = if cursor.fits(m.row_height(rest)) {
            layout.lines
        } else {
            let room = ((cursor.remaining() - 2.0 * m.pad) / m.line_h).floor().max(1.0);
            start + (room as usize).min(rest)
        };
        let height = m.row_height(end - start);
        if let Some(color) = band {
            let top = cursor.y();
            cursor.fill_rect(cursor.left(), top, cursor.width(), height, color);
        }
        draw_row_lines(cursor, cells, layout, start..end, face, m);
        cursor.advance(height);
        if end == layout.lines {
            break;
        }
        log::debug!(
            "TABLE row split after line {} of {} on page {}",
            end,
            layout.lines,
            cursor.page_number()
        );
        start = end;
        cursor.break_page();
        if m.repeat_headers {
            draw_header_band(cursor, header, m);
        }
    }
}

/// Lay out `table` through the cursor, splitting between rows when a row
/// would cross the bottom margin. Every data and footer row is placed
/// exactly once and in order, so rows are never dropped or reordered; a row
/// taller than a page is split between its lines.
pub(crate) fn render_table(cursor: &mut PageCursor, table: &Table) {
    let cfg = cursor.config();
    let m = TableMetrics {
        col_widths: resolve_column_widths(table, cursor.width()),
        size: cfg.table_font_size,
        line_h: cfg.line_height(cfg.table_font_size),
        pad: cfg.cell_padding,
        repeat_headers: cfg.repeat_table_headers,
    };

    let header = HeaderBand {
        cells: &table.headers,
        layout: layout_row(&table.headers, FontFace::Bold, &m),
    };
    let row_layouts: Vec<RowLayout> = table
        .rows
        .iter()
        .map(|row| layout_row(row, FontFace::Regular, &m))
        .collect();
    let footer_layouts: Vec<RowLayout> = table
        .footers
        .iter()
        .map(|row| layout_row(row, FontFace::Bold, &m))
        .collect();

    // Keep the header band with the first row, or with the placeholder.
    let header_h = header.height(&m);
    let capacity = cfg.content_height() - header_h;
    let first_h = if table.rows.is_empty() {
        m.row_height(1)
    } else {
        row_layouts
            .first()
            .map_or(m.row_height(1), |l| lead_height(l, capacity, &m))
    };
    cursor.ensure_space(header_h + first_h);
    draw_header_band(cursor, &header, &m);

    if table.rows.is_empty() {
        let placeholder_h = m.row_height(1);
        if cursor.ensure_space(placeholder_h) && m.repeat_headers {
            draw_header_band(cursor, &header, &m);
        }
        let top = cursor.y();
        let text = table.empty_placeholder.as_str();
        let w = FontFace::Regular.text_width(text, m.size);
        let x = cursor.left() + (cursor.width() - w) / 2.0;
        let baseline = baseline_in(top + m.pad, m.line_h, m.size);
        cursor.text(x, baseline, FontFace::Regular, m.size, MUTED, text);
        cursor.advance(placeholder_h);
    }

    let start_page = cursor.page_number();
    for (ri, (row, layout)) in table.rows.iter().zip(&row_layouts).enumerate() {
        log::debug!(
            "TABLE row={} lines={} y={:.2} page={}",
            ri,
            layout.lines,
            cursor.y(),
            cursor.page_number()
        );
        let band = (ri % 2 == 1).then_some(ZEBRA);
        place_row(cursor, &header, row, layout, (FontFace::Regular, band), &m);
    }

    for (row, layout) in table.footers.iter().zip(&footer_layouts) {
        place_row(cursor, &header, row, layout, (FontFace::Bold, Some(FOOTER_BAND)), &m);
    }

    let right = cursor.left() + cursor.width();
    cursor.hline(cursor.left(), right, cursor.y(), 0.5, RULE);
    if cursor.page_number() != start_page {
        log::debug!(
            "table with {} rows spanned pages {}..={}",
            table.rows.len(),
            start_page,
            cursor.page_number()
        );
    }
    cursor.advance(cfg.paragraph_spacing);
}
