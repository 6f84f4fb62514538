mod cursor;
mod layout;
mod table;
mod writer;

use crate::format::file_name_component;
use crate::model::Jurisdiction;

pub use layout::CalloutKind;
pub use table::{Cell, CellAlign, CellKind, Table};

pub(crate) use cursor::{CursorState, PageChrome, PageCursor};
pub(crate) use layout::{TextStyle, callout, divider, heading, key_value_lines, paragraph, spacer};
pub(crate) use table::render_table;

pub(crate) type Rgb = [u8; 3];

pub(crate) const BRAND: Rgb = [30, 58, 138];
pub(crate) const INK: Rgb = [31, 41, 55];
pub(crate) const MUTED: Rgb = [107, 114, 128];
pub(crate) const RULE: Rgb = [209, 213, 219];
pub(crate) const WHITE: Rgb = [255, 255, 255];
pub(crate) const HEADER_BAND: Rgb = [226, 232, 240];
pub(crate) const ZEBRA: Rgb = [243, 244, 246];
pub(crate) const FOOTER_BAND: Rgb = [219, 234, 254];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    /// (width, height) in points.
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
        }
    }
}

/// Page geometry and typography. All lengths are in points.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
    pub page_size: PageSize,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    /// Height of the branded band painted at the top of every page.
    pub header_height: f32,
    /// Height reserved at the bottom of every page for the footer.
    pub footer_height: f32,
    pub body_font_size: f32,
    pub small_font_size: f32,
    pub table_font_size: f32,
    pub heading_font_size: f32,
    pub line_height_ratio: f32,
    pub cell_padding: f32,
    pub paragraph_spacing: f32,
    /// Repeat a table's header band at the top of continuation pages.
    pub repeat_table_headers: bool,
    pub brand: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            page_size: PageSize::A4,
            margin_top: 24.0,
            margin_bottom: 18.0,
            margin_left: 40.0,
            margin_right: 40.0,
            header_height: 56.0,
            footer_height: 40.0,
            body_font_size: 10.0,
            small_font_size: 7.5,
            table_font_size: 8.0,
            heading_font_size: 15.0,
            line_height_ratio: 1.35,
            cell_padding: 4.0,
            paragraph_spacing: 8.0,
            repeat_table_headers: true,
            brand: "Portfolio Tax Center".to_string(),
        }
    }
}

impl LayoutConfig {
    pub fn page_width(&self) -> f32 {
        self.page_size.dimensions().0
    }

    pub fn page_height(&self) -> f32 {
        self.page_size.dimensions().1
    }

    pub fn content_width(&self) -> f32 {
        self.page_width() - self.margin_left - self.margin_right
    }

    /// Cursor position of the first line below the header band.
    pub fn content_top(&self) -> f32 {
        self.header_height + self.margin_top
    }

    /// Lowest cursor position a block may extend to.
    pub fn content_bottom(&self) -> f32 {
        self.page_height() - self.footer_height - self.margin_bottom
    }

    /// Vertical space available for body content on one page.
    pub fn content_height(&self) -> f32 {
        self.content_bottom() - self.content_top()
    }

    pub fn line_height(&self, font_size: f32) -> f32 {
        font_size * self.line_height_ratio
    }
}

/// Lay out `table` alone, starting at the top of a fresh page headed
/// `section_title`. Pages carry only the brand band and page numbers.
pub fn render_table_pages(
    table: &Table,
    config: &LayoutConfig,
    section_title: &str,
) -> Vec<RenderedPage> {
    let chrome = PageChrome {
        report_title: String::new(),
        account_label: String::new(),
        period_label: String::new(),
        footer_note: String::new(),
        generated_on: None,
    };
    let mut cursor = PageCursor::new(config, chrome);
    cursor.begin_page(section_title);
    render_table(&mut cursor, table);
    cursor.finalize()
}

/// One finished page of a generated report.
#[derive(Clone, Debug)]
pub struct RenderedPage {
    pub(crate) number: usize,
    pub(crate) section: String,
    pub(crate) texts: Vec<String>,
    pub(crate) content: Vec<u8>,
}

impl RenderedPage {
    /// 1-based page number.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Running section title printed in this page's header.
    pub fn section(&self) -> &str {
        &self.section
    }

    /// Every string drawn on the page, in draw order.
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// Uncompressed PDF content stream.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts.iter().any(|t| t.contains(needle))
    }
}

/// The finished report: an ordered, immutable sequence of pages.
#[derive(Clone, Debug)]
pub struct GeneratedDocument {
    jurisdiction: Jurisdiction,
    title: String,
    period_label: String,
    page_size: PageSize,
    pages: Vec<RenderedPage>,
}

impl GeneratedDocument {
    pub(crate) fn new(
        jurisdiction: Jurisdiction,
        title: String,
        period_label: String,
        page_size: PageSize,
        pages: Vec<RenderedPage>,
    ) -> Self {
        GeneratedDocument {
            jurisdiction,
            title,
            period_label,
            page_size,
            pages,
        }
    }

    pub fn jurisdiction(&self) -> Jurisdiction {
        self.jurisdiction
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn period_label(&self) -> &str {
        &self.period_label
    }

    pub fn pages(&self) -> &[RenderedPage] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All drawn strings across every page, in document order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|p| p.texts.iter().map(String::as_str))
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.pages.iter().any(|p| p.contains_text(needle))
    }

    /// Serialize to PDF bytes.
    pub fn to_pdf(&self) -> Vec<u8> {
        writer::assemble(self)
    }

    /// Export name: `{Jurisdiction}_Tax_Report_{PeriodLabel}_{timestamp}.pdf`.
    pub fn file_name(&self, timestamp: i64) -> String {
        format!(
            "{}_Tax_Report_{}_{}.pdf",
            self.jurisdiction.file_prefix(),
            file_name_component(&self.period_label),
            timestamp
        )
    }
}
