use pdf_writer::{Content, Name, Str};

use super::{BRAND, LayoutConfig, MUTED, RULE, RenderedPage, Rgb, WHITE};
use crate::fonts::{FontFace, to_winansi_bytes};

/// Where the cursor sits on the current page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CursorState {
    /// Nothing has been written below the header band yet.
    AtMargin,
    MidPage,
    /// Fewer than three body lines remain before the bottom margin.
    NearBottom,
}

/// Running text repeated in every page's header and footer.
#[derive(Clone, Debug)]
pub(crate) struct PageChrome {
    pub(crate) report_title: String,
    pub(crate) account_label: String,
    pub(crate) period_label: String,
    pub(crate) footer_note: String,
    pub(crate) generated_on: Option<String>,
}

/// Mutable layout state for one generation run. Only [`PageCursor`]
/// touches it.
struct RenderState {
    /// Distance from the top edge of the page, in points.
    y: f32,
    /// 0-based index of the page currently open (or about to be opened).
    page_index: usize,
    content: Content,
    texts: Vec<String>,
    /// Section title painted in the open page's header.
    page_section: String,
    page_open: bool,
    pages: Vec<RenderedPage>,
}

/// Pagination state machine. Every layout primitive asks
/// [`ensure_space`](PageCursor::ensure_space) before drawing, then
/// [`advance`](PageCursor::advance)s past what it drew.
pub(crate) struct PageCursor<'a> {
    config: &'a LayoutConfig,
    chrome: PageChrome,
    section: String,
    state: RenderState,
}

impl<'a> PageCursor<'a> {
    pub(crate) fn new(config: &'a LayoutConfig, chrome: PageChrome) -> Self {
        PageCursor {
            config,
            chrome,
            section: String::new(),
            state: RenderState {
                y: config.content_top(),
                page_index: 0,
                content: Content::new(),
                texts: Vec::new(),
                page_section: String::new(),
                page_open: false,
                pages: Vec::new(),
            },
        }
    }

    pub(crate) fn config(&self) -> &'a LayoutConfig {
        self.config
    }

    /// Open a new physical page: close the current one (stamping its
    /// footer), paint the header band and reset the cursor.
    pub(crate) fn begin_page(&mut self, section_title: &str) {
        if self.state.page_open {
            self.close_page();
        }
        self.section = section_title.to_string();
        self.state.content = Content::new();
        self.state.texts.clear();
        self.state.page_open = true;
        self.paint_header();
        self.state.y = self.config.content_top();
        log::debug!(
            "begin_page: page={} section={:?}",
            self.state.page_index + 1,
            self.section
        );
    }

    /// Break to a new page if a block of `required` height would cross the
    /// bottom margin. Returns true when a break happened.
    ///
    /// A block taller than a whole page is let through at the top of a page
    /// rather than breaking forever; callers split such blocks themselves.
    pub(crate) fn ensure_space(&mut self, required: f32) -> bool {
        if !self.state.page_open {
            self.break_page();
            return false;
        }
        if self.fits(required) || self.at_top() {
            return false;
        }
        log::debug!(
            "page break: y={:.1} required={:.1} bottom={:.1} page={}",
            self.state.y,
            required,
            self.config.content_bottom(),
            self.state.page_index + 1
        );
        self.break_page();
        true
    }

    /// Continue the current section on a new page.
    pub(crate) fn break_page(&mut self) {
        let section = self.section.clone();
        self.begin_page(&section);
    }

    pub(crate) fn advance(&mut self, height: f32) {
        debug_assert!(height >= 0.0, "cursor must not move up: {height}");
        self.state.y += height.max(0.0);
    }

    /// Start `section_title` on a fresh page. An open page with nothing
    /// below its header is reused instead of being left blank.
    pub(crate) fn force_break(&mut self, section_title: &str) {
        if self.state.page_open && self.at_top() {
            self.section = section_title.to_string();
            self.state.content = Content::new();
            self.state.texts.clear();
            self.paint_header();
            return;
        }
        self.begin_page(section_title);
    }

    /// Change the running title used by headers of pages opened from now on.
    pub(crate) fn set_section(&mut self, section_title: &str) {
        self.section = section_title.to_string();
    }

    /// Stamp the footer on the last page and hand back all pages.
    pub(crate) fn finalize(mut self) -> Vec<RenderedPage> {
        if !self.state.page_open && self.state.pages.is_empty() {
            self.break_page();
        }
        if self.state.page_open {
            self.close_page();
        }
        log::debug!("finalize: {} pages", self.state.pages.len());
        self.state.pages
    }

    pub(crate) fn state(&self) -> CursorState {
        if self.at_top() {
            CursorState::AtMargin
        } else if self.remaining() < 3.0 * self.config.line_height(self.config.body_font_size) {
            CursorState::NearBottom
        } else {
            CursorState::MidPage
        }
    }

    pub(crate) fn y(&self) -> f32 {
        self.state.y
    }

    pub(crate) fn page_number(&self) -> usize {
        self.state.page_index + 1
    }

    pub(crate) fn left(&self) -> f32 {
        self.config.margin_left
    }

    pub(crate) fn width(&self) -> f32 {
        self.config.content_width()
    }

    pub(crate) fn remaining(&self) -> f32 {
        (self.config.content_bottom() - self.state.y).max(0.0)
    }

    pub(crate) fn fits(&self, height: f32) -> bool {
        self.state.y + height <= self.config.content_bottom() + 0.01
    }

    pub(crate) fn at_top(&self) -> bool {
        (self.state.y - self.config.content_top()).abs() < 0.5
    }

    // Drawing primitives. Coordinates are measured from the top edge.

    pub(crate) fn text(
        &mut self,
        x: f32,
        baseline: f32,
        face: FontFace,
        size: f32,
        color: Rgb,
        text: &str,
    ) {
        if text.is_empty() {
            return;
        }
        let y = self.config.page_height() - baseline;
        let bytes = to_winansi_bytes(text);
        let content = &mut self.state.content;
        content.begin_text();
        set_fill(content, color);
        content.set_font(Name(face.pdf_name().as_bytes()), size);
        content.next_line(x, y);
        content.show(Str(&bytes));
        content.end_text();
        self.state.texts.push(text.to_string());
    }

    pub(crate) fn text_right(
        &mut self,
        right: f32,
        baseline: f32,
        face: FontFace,
        size: f32,
        color: Rgb,
        text: &str,
    ) {
        let w = face.text_width(text, size);
        self.text(right - w, baseline, face, size, color, text);
    }

    pub(crate) fn fill_rect(&mut self, x: f32, top: f32, w: f32, h: f32, color: Rgb) {
        let y = self.config.page_height() - top - h;
        let content = &mut self.state.content;
        content.save_state();
        set_fill(content, color);
        content.rect(x, y, w, h);
        content.fill_nonzero();
        content.restore_state();
    }

    pub(crate) fn hline(&mut self, x1: f32, x2: f32, top: f32, width: f32, color: Rgb) {
        let y = self.config.page_height() - top;
        let content = &mut self.state.content;
        content.save_state();
        content.set_line_width(width);
        content.set_stroke_rgb(
            color[0] as f32 / 255.0,
            color[1] as f32 / 255.0,
            color[2] as f32 / 255.0,
        );
        content.move_to(x1, y);
        content.line_to(x2, y);
        content.stroke();
        content.restore_state();
    }

    fn close_page(&mut self) {
        self.paint_footer();
        let content = std::mem::replace(&mut self.state.content, Content::new());
        let raw = content.finish();
        self.state.pages.push(RenderedPage {
            number: self.state.page_index + 1,
            section: std::mem::take(&mut self.state.page_section),
            texts: std::mem::take(&mut self.state.texts),
            content: raw.as_slice().to_vec(),
        });
        self.state.page_index += 1;
        self.state.page_open = false;
    }

    fn paint_header(&mut self) {
        let cfg = self.config;
        let page_w = cfg.page_width();
        let right = page_w - cfg.margin_right;
        let band = cfg.header_height;

        self.fill_rect(0.0, 0.0, page_w, band, BRAND);
        let brand = cfg.brand.clone();
        let title = self.chrome.report_title.clone();
        let section = self.section.clone();
        let account = self.chrome.account_label.clone();
        self.state.page_section = section.clone();

        self.text(cfg.margin_left, band * 0.4, FontFace::Bold, 13.0, WHITE, &brand);
        self.text_right(right, band * 0.4, FontFace::Regular, 9.0, WHITE, &title);
        self.text(cfg.margin_left, band * 0.8, FontFace::Bold, 10.5, WHITE, &section);
        self.text_right(right, band * 0.8, FontFace::Regular, 8.0, WHITE, &account);
    }

    fn paint_footer(&mut self) {
        let cfg = self.config;
        let top = cfg.page_height() - cfg.footer_height;
        let right = cfg.page_width() - cfg.margin_right;
        let size = cfg.small_font_size;

        self.hline(cfg.margin_left, right, top + 6.0, 0.5, RULE);

        let page_label = format!("Page {}", self.state.page_index + 1);
        self.text(cfg.margin_left, top + 18.0, FontFace::Bold, size, MUTED, &page_label);

        let period = self.chrome.period_label.clone();
        let period_w = FontFace::Regular.text_width(&period, size);
        let center = cfg.margin_left + (cfg.content_width() - period_w) / 2.0;
        self.text(center, top + 18.0, FontFace::Regular, size, MUTED, &period);

        if let Some(date) = self.chrome.generated_on.clone() {
            let stamp = format!("Generated {date}");
            self.text_right(right, top + 18.0, FontFace::Regular, size, MUTED, &stamp);
        }

        let note = self.chrome.footer_note.clone();
        self.text(cfg.margin_left, top + 29.0, FontFace::Regular, size - 0.5, MUTED, &note);
    }
}

fn set_fill(content: &mut Content, [r, g, b]: Rgb) {
    content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
}
