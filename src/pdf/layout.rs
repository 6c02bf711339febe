use crate::config::PageGeometry;
use crate::error::Error;
use crate::fonts::Font;

use super::compose::{Block, ManifestDocument, place_note, place_signature};
use super::table::place_table;

pub type Rgb = [u8; 3];

pub const BLACK: Rgb = [0, 0, 0];
pub const WHITE: Rgb = [255, 255, 255];

#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub width: f32,
}

impl TextLine {
    fn measured(text: String, font: Font, font_size: f32) -> Self {
        let width = font.text_width(&text, font_size);
        Self { text, width }
    }
}

/// One primitive on a page, in PDF user space (origin bottom-left, points).
#[derive(Clone, Debug, PartialEq)]
pub enum DrawItem {
    Text {
        x: f32,
        y: f32,
        font: Font,
        size: f32,
        color: Rgb,
        text: String,
    },
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgb,
    },
    StrokeRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        line_width: f32,
        color: Rgb,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        line_width: f32,
        color: Rgb,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameKind {
    /// Carries order rows; counted in "Página X de Y".
    Data,
    Signature,
}

/// Recorded state of one physical page after the layout pass.
#[derive(Clone, Debug, PartialEq)]
pub struct PageFrame {
    pub kind: FrameKind,
    pub items: Vec<DrawItem>,
}

impl PageFrame {
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    /// Every text string drawn on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            DrawItem::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Wrap one hard line into lines no wider than `max_width`. Words wider than
/// the whole line are broken between characters.
pub fn wrap_line(text: &str, font: Font, font_size: f32, max_width: f32) -> Vec<TextLine> {
    let space_w = font.space_width(font_size);
    let mut lines: Vec<TextLine> = Vec::new();
    let mut current = String::new();
    let mut current_w: f32 = 0.0;

    for word in text.split_whitespace() {
        let ww = font.text_width(word, font_size);
        let proposed = if current.is_empty() {
            ww
        } else {
            current_w + space_w + ww
        };
        if proposed <= max_width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_w = proposed;
            continue;
        }

        if !current.is_empty() {
            lines.push(TextLine {
                text: std::mem::take(&mut current),
                width: current_w,
            });
            current_w = 0.0;
        }

        if ww <= max_width {
            current.push_str(word);
            current_w = ww;
            continue;
        }

        for ch in word.chars() {
            let cw = font.char_width_1000(ch) * font_size / 1000.0;
            if !current.is_empty() && current_w + cw > max_width {
                lines.push(TextLine {
                    text: std::mem::take(&mut current),
                    width: current_w,
                });
                current_w = 0.0;
            }
            current.push(ch);
            current_w += cw;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(TextLine {
            text: current,
            width: current_w,
        });
    }
    lines
}

/// Wrap every hard line of a cell. Blank hard lines are kept as blank lines.
pub fn wrap_lines(hard_lines: &[String], font: Font, font_size: f32, max_width: f32) -> Vec<TextLine> {
    hard_lines
        .iter()
        .flat_map(|line| wrap_line(line, font, font_size, max_width))
        .collect()
}

/// A single line that never exceeds `max_width`; overlong text is cut and
/// given the ellipsis suffix.
pub fn fit_line(text: &str, font: Font, font_size: f32, max_width: f32) -> TextLine {
    let full = TextLine::measured(text.to_string(), font, font_size);
    if full.width <= max_width {
        return full;
    }
    let ellipsis = super::cell::ELLIPSIS;
    let ellipsis_w = font.text_width(ellipsis, font_size);
    let mut kept = String::new();
    let mut kept_w: f32 = 0.0;
    for ch in text.chars() {
        let cw = font.char_width_1000(ch) * font_size / 1000.0;
        if kept_w + cw + ellipsis_w > max_width {
            break;
        }
        kept.push(ch);
        kept_w += cw;
    }
    let mut out = kept.trim_end().to_string();
    out.push_str(ellipsis);
    TextLine::measured(out, font, font_size)
}

/// Distance from the top of a line box to its baseline.
pub fn baseline_offset(font_size: f32, leading: f32) -> f32 {
    (leading - font_size) / 2.0 + font_size * crate::fonts::ASCENDER_RATIO
}

/// Layout-pass cursor: the frames finished so far plus the one being filled.
pub(crate) struct Flow<'a> {
    pub(crate) page: &'a PageGeometry,
    frames: Vec<PageFrame>,
    current: PageFrame,
    slot_top: f32,
}

impl<'a> Flow<'a> {
    pub(crate) fn new(page: &'a PageGeometry) -> Self {
        Self {
            page,
            frames: Vec::new(),
            current: PageFrame::new(FrameKind::Data),
            slot_top: page.content_top(),
        }
    }

    pub(crate) fn slot_top(&self) -> f32 {
        self.slot_top
    }

    pub(crate) fn remaining(&self) -> f32 {
        self.slot_top - self.page.content_bottom()
    }

    /// Height of the whole content area, the most any block can occupy.
    pub(crate) fn page_room(&self) -> f32 {
        self.page.content_top() - self.page.content_bottom()
    }

    /// Nothing has been drawn on the current frame yet, though leading
    /// spacers may have moved the cursor down.
    pub(crate) fn is_blank(&self) -> bool {
        self.current.items.is_empty()
    }

    /// Move the cursor back to the top of the current frame, dropping any
    /// leading spacers. Only valid on a blank frame.
    fn rewind(&mut self) {
        self.slot_top = self.page.content_top();
    }

    /// Make sure `needed` points are left below the cursor. A blank frame
    /// gives up its leading spacers first; otherwise a new frame of `kind`
    /// is opened.
    pub(crate) fn ensure_room(&mut self, needed: f32, kind: FrameKind) {
        if self.remaining() >= needed {
            return;
        }
        if self.is_blank() {
            self.rewind();
        } else {
            self.new_page(kind);
        }
    }

    pub(crate) fn advance(&mut self, h: f32) {
        self.slot_top -= h;
    }

    pub(crate) fn push(&mut self, item: DrawItem) {
        self.current.items.push(item);
    }

    pub(crate) fn extend(&mut self, items: impl IntoIterator<Item = DrawItem>) {
        self.current.items.extend(items);
    }

    pub(crate) fn mark(&mut self, kind: FrameKind) {
        self.current.kind = kind;
    }

    /// Close the current frame and open a fresh one of `kind`.
    pub(crate) fn new_page(&mut self, kind: FrameKind) {
        let finished = std::mem::replace(&mut self.current, PageFrame::new(kind));
        self.frames.push(finished);
        self.slot_top = self.page.content_top();
    }

    /// Continue the current content on a new frame of the same kind.
    pub(crate) fn overflow(&mut self) {
        let kind = self.current.kind;
        self.new_page(kind);
    }

    pub(crate) fn kind(&self) -> FrameKind {
        self.current.kind
    }

    fn finish(mut self) -> Vec<PageFrame> {
        if !self.current.items.is_empty() || self.frames.is_empty() {
            self.frames.push(self.current);
        }
        self.frames
    }
}

/// Layout pass: place every block into physical page frames. The running
/// header is not drawn here; `header::stamp` adds it once the frame count is known.
/// Fails when a table row is too tall to fit on any page.
pub fn flow(doc: &ManifestDocument, page: &PageGeometry) -> Result<Vec<PageFrame>, Error> {
    let mut flow = Flow::new(page);
    for block in &doc.blocks {
        match block {
            Block::Spacer(h) => {
                let h = h.min(flow.remaining().max(0.0));
                flow.advance(h);
            }
            Block::PageBreak => {
                if flow.is_blank() {
                    flow.rewind();
                } else {
                    flow.new_page(FrameKind::Data);
                }
            }
            Block::Table(table) => place_table(table, &mut flow)?,
            Block::Signature(sig) => place_signature(sig, &mut flow),
            Block::Note(text) => place_note(text, &mut flow),
        }
    }
    Ok(flow.finish())
}
