use super::{BRAND, INK, MUTED, PageCursor, RULE, Rgb};
use crate::fonts::FontFace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalloutKind {
    Info,
    Warning,
    Success,
}

impl CalloutKind {
    fn background(&self) -> Rgb {
        match self {
            CalloutKind::Info => [239, 246, 255],
            CalloutKind::Warning => [255, 251, 235],
            CalloutKind::Success => [236, 253, 245],
        }
    }

    fn accent(&self) -> Rgb {
        match self {
            CalloutKind::Info => [37, 99, 235],
            CalloutKind::Warning => [217, 119, 6],
            CalloutKind::Success => [5, 150, 105],
        }
    }
}

pub(super) struct TextLine {
    pub(super) text: String,
    pub(super) width: f32,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct TextStyle {
    pub(crate) face: FontFace,
    pub(crate) size: f32,
    pub(crate) color: Rgb,
}

impl TextStyle {
    pub(crate) fn body(cursor: &PageCursor) -> Self {
        TextStyle {
            face: FontFace::Regular,
            size: cursor.config().body_font_size,
            color: INK,
        }
    }

    pub(crate) fn small(cursor: &PageCursor) -> Self {
        TextStyle {
            face: FontFace::Regular,
            size: cursor.config().small_font_size + 0.5,
            color: MUTED,
        }
    }

    pub(crate) fn bold(self) -> Self {
        TextStyle {
            face: FontFace::Bold,
            ..self
        }
    }
}

/// Baseline for text of `size` centred in a line box starting at `top`.
pub(super) fn baseline_in(top: f32, line_h: f32, size: f32) -> f32 {
    top + (line_h - size) / 2.0 + size * 0.78
}

fn finish_line(current: &mut String, current_w: &mut f32) -> TextLine {
    let line = TextLine {
        text: std::mem::take(current),
        width: *current_w,
    };
    *current_w = 0.0;
    line
}

/// Greedy word wrap against Helvetica metrics. Explicit newlines start a
/// new line; a single word wider than `max_width` is split by character.
pub(super) fn wrap_lines(text: &str, face: FontFace, size: f32, max_width: f32) -> Vec<TextLine> {
    let space_w = face.space_width(size);
    let mut lines = Vec::new();

    for source_line in text.split('\n') {
        let mut current = String::new();
        let mut current_w = 0.0f32;

        for word in source_line.split_whitespace() {
            let ww = face.text_width(word, size);
            let proposed = if current.is_empty() {
                ww
            } else {
                current_w + space_w + ww
            };
            if !current.is_empty() && proposed > max_width {
                lines.push(finish_line(&mut current, &mut current_w));
            }

            if ww > max_width {
                let mut buf = [0u8; 4];
                for ch in word.chars() {
                    let cw = face.text_width(ch.encode_utf8(&mut buf), size);
                    if !current.is_empty() && current_w + cw > max_width {
                        lines.push(finish_line(&mut current, &mut current_w));
                    }
                    current.push(ch);
                    current_w += cw;
                }
                continue;
            }

            if !current.is_empty() {
                current.push(' ');
                current_w += space_w;
            }
            current.push_str(word);
            current_w += ww;
        }

        if !current.is_empty() {
            lines.push(finish_line(&mut current, &mut current_w));
        }
    }

    if lines.is_empty() {
        lines.push(TextLine {
            text: String::new(),
            width: 0.0,
        });
    }
    lines
}

/// Wrapped paragraph at the printable width. The paragraph moves to the
/// next page as a whole unless it is taller than a page on its own.
pub(crate) fn paragraph(cursor: &mut PageCursor, text: &str, style: TextStyle) {
    let cfg = cursor.config();
    let line_h = cfg.line_height(style.size);
    let lines = wrap_lines(text, style.face, style.size, cursor.width());
    let block_h = lines.len() as f32 * line_h;

    if block_h <= cfg.content_height() {
        cursor.ensure_space(block_h);
    }
    for line in &lines {
        cursor.ensure_space(line_h);
        let baseline = baseline_in(cursor.y(), line_h, style.size);
        cursor.text(cursor.left(), baseline, style.face, style.size, style.color, &line.text);
        cursor.advance(line_h);
    }
    cursor.advance(cfg.paragraph_spacing);
}

/// Section heading. Level 1 is the large branded title with a rule below;
/// level 2 is a bold body-size subheading. Both keep with the next line.
pub(crate) fn heading(cursor: &mut PageCursor, text: &str, level: u8) {
    let cfg = cursor.config();
    let (size, color) = if level <= 1 {
        (cfg.heading_font_size, BRAND)
    } else {
        (cfg.body_font_size + 1.5, INK)
    };
    let line_h = cfg.line_height(size);
    let rule_gap = if level <= 1 { 6.0 } else { 2.0 };
    let next_line = cfg.line_height(cfg.body_font_size);

    cursor.ensure_space(line_h + rule_gap + next_line);
    let top = cursor.y();
    let baseline = baseline_in(top, line_h, size);
    cursor.text(cursor.left(), baseline, FontFace::Bold, size, color, text);
    cursor.advance(line_h);
    if level <= 1 {
        let right = cursor.left() + cursor.width();
        cursor.hline(cursor.left(), right, cursor.y() + 2.0, 1.0, BRAND);
    }
    cursor.advance(rule_gap);
}

/// Two-column label/value list. A long value wraps under itself and may
/// continue on the next page.
pub(crate) fn key_value_lines(cursor: &mut PageCursor, pairs: &[(String, String)]) {
    let cfg = cursor.config();
    let size = cfg.body_font_size;
    let line_h = cfg.line_height(size);
    let label_w = pairs
        .iter()
        .map(|(label, _)| FontFace::Bold.text_width(label, size))
        .fold(0.0f32, f32::max)
        + 12.0;
    let value_w = (cursor.width() - label_w).max(1.0);

    for (label, value) in pairs {
        let value_lines = wrap_lines(value, FontFace::Regular, size, value_w);
        let row_h = value_lines.len() as f32 * line_h;
        if row_h <= cfg.content_height() {
            cursor.ensure_space(row_h);
        }
        for (i, line) in value_lines.iter().enumerate() {
            cursor.ensure_space(line_h);
            let baseline = baseline_in(cursor.y(), line_h, size);
            if i == 0 {
                cursor.text(cursor.left(), baseline, FontFace::Bold, size, MUTED, label);
            }
            let value_x = cursor.left() + label_w;
            cursor.text(value_x, baseline, FontFace::Regular, size, INK, &line.text);
            cursor.advance(line_h);
        }
    }
    cursor.advance(cfg.paragraph_spacing);
}

/// Colour-coded box with an accent bar, a bold title and wrapped body text.
pub(crate) fn callout(cursor: &mut PageCursor, kind: CalloutKind, title: &str, body: &str) {
    let cfg = cursor.config();
    let pad = 8.0;
    let accent_w = 3.0;
    let size = cfg.body_font_size - 0.5;
    let line_h = cfg.line_height(size);
    let text_x = cursor.left() + accent_w + pad;
    let text_w = cursor.width() - accent_w - 2.0 * pad;

    let body_lines = wrap_lines(body, FontFace::Regular, size, text_w);
    let box_height = |lines: usize, titled: bool| {
        let title_h = if titled { line_h } else { 0.0 };
        2.0 * pad + title_h + lines as f32 * line_h
    };

    // A box taller than a page continues as untitled boxes on later pages.
    let mut rest: &[TextLine] = &body_lines;
    let mut titled = true;
    loop {
        let full = box_height(rest.len(), titled);
        if full <= cfg.content_height() {
            cursor.ensure_space(full);
        } else {
            cursor.ensure_space(box_height(1, titled));
        }
        let take = if cursor.fits(full) {
            rest.len()
        } else {
            let room = (cursor.remaining() - box_height(0, titled)) / line_h;
            (room.floor().max(1.0) as usize).min(rest.len())
        };
        let height = box_height(take, titled);

        let top = cursor.y();
        cursor.fill_rect(cursor.left(), top, cursor.width(), height, kind.background());
        cursor.fill_rect(cursor.left(), top, accent_w, height, kind.accent());
        let mut line_top = top + pad;
        if titled {
            let baseline = baseline_in(line_top, line_h, size);
            cursor.text(text_x, baseline, FontFace::Bold, size, kind.accent(), title);
            line_top += line_h;
        }
        for line in &rest[..take] {
            let baseline = baseline_in(line_top, line_h, size);
            cursor.text(text_x, baseline, FontFace::Regular, size, INK, &line.text);
            line_top += line_h;
        }
        cursor.advance(height);

        rest = &rest[take..];
        if rest.is_empty() {
            break;
        }
        titled = false;
        cursor.break_page();
    }

    cursor.advance(cfg.paragraph_spacing);
}

/// Vertical gap, suppressed at the top of a page.
pub(crate) fn spacer(cursor: &mut PageCursor, height: f32) {
    if !cursor.at_top() {
        cursor.advance(height.min(cursor.remaining()));
    }
}

/// Thin horizontal rule across the printable width.
pub(crate) fn divider(cursor: &mut PageCursor) {
    cursor.ensure_space(8.0);
    let right = cursor.left() + cursor.width();
    cursor.hline(cursor.left(), right, cursor.y() + 4.0, 0.5, RULE);
    cursor.advance(8.0);
}
