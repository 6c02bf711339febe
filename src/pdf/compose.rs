use crate::fonts::Font;

use super::layout::{BLACK, DrawItem, Flow, FrameKind, baseline_offset, wrap_line};
use super::paginate::Page;
use super::table::TableBlock;

const INCH: f32 = 72.0;

/// Gap between the running header area and each data table.
pub const TABLE_TOP_GAP: f32 = 0.10 * INCH;
pub const SIGNATURE_TOP_GAP: f32 = 2.0 * INCH;
pub const NOTE_TOP_GAP: f32 = 0.3 * INCH;

pub const CLOSING_NOTE: &str = "Este documento es un manifiesto de entrega generado automáticamente. \
                                Para cualquier aclaración, contactar con el área de logística.";

const NOTE_FONT_SIZE: f32 = 9.0;
const NOTE_LEADING: f32 = 10.8;

/// Two mirrored columns, each with a signature rule, a bold caption and
/// blank `Nombre:`/`Fecha:`/`Hora:` rows.
#[derive(Clone, Debug, PartialEq)]
pub struct SignatureBlock {
    pub captions: [&'static str; 2],
    pub fields: [&'static str; 3],
    /// Widths of the left column, the two gutter columns and the right column.
    pub col_widths: [f32; 4],
    pub font_size: f32,
    pub row_height: f32,
}

impl Default for SignatureBlock {
    fn default() -> Self {
        Self {
            captions: ["Entregado por", "Recibido por"],
            fields: ["Nombre:", "Fecha:", "Hora:"],
            col_widths: [3.0 * INCH, 0.5 * INCH, 0.5 * INCH, 3.0 * INCH],
            font_size: 11.0,
            row_height: 19.2,
        }
    }
}

impl SignatureBlock {
    // blank spacer row, rule row, caption row, then one row per field
    fn row_count(&self) -> usize {
        3 + self.fields.len()
    }

    pub fn height(&self) -> f32 {
        self.row_count() as f32 * self.row_height
    }

    pub fn width(&self) -> f32 {
        self.col_widths.iter().sum()
    }

    fn draw(&self, left: f32, top: f32) -> Vec<DrawItem> {
        let [left_w, gutter_a, gutter_b, right_w] = self.col_widths;
        let columns = [(left, left_w), (left + left_w + gutter_a + gutter_b, right_w)];
        let leading = self.font_size * 1.2;
        let pad_top = (self.row_height - leading) / 2.0;
        let baseline = |row: usize| {
            top - row as f32 * self.row_height - pad_top - baseline_offset(self.font_size, leading)
        };
        let centered = |text: &str, font: Font, (x, w): (f32, f32), y: f32| DrawItem::Text {
            x: x + (w - font.text_width(text, self.font_size)) / 2.0,
            y,
            font,
            size: self.font_size,
            color: BLACK,
            text: text.to_string(),
        };

        let mut items = Vec::new();
        for (col, caption) in columns.into_iter().zip(self.captions) {
            let (x, w) = col;
            let rule_y = baseline(1);
            items.push(DrawItem::Line {
                x1: x + 0.1 * w,
                y1: rule_y,
                x2: x + 0.9 * w,
                y2: rule_y,
                line_width: 0.75,
                color: BLACK,
            });
            items.push(centered(caption, Font::Bold, col, baseline(2)));
            for (fi, field) in self.fields.iter().enumerate() {
                items.push(centered(field, Font::Regular, col, baseline(3 + fi)));
            }
        }
        items
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Spacer(f32),
    Table(TableBlock),
    PageBreak,
    Signature(SignatureBlock),
    Note(String),
}

/// The whole manifest as a flowing block list, before physical layout.
#[derive(Clone, Debug, PartialEq)]
pub struct ManifestDocument {
    pub pages: Vec<Page>,
    pub date_label: String,
    pub total_orders: usize,
    pub blocks: Vec<Block>,
}

impl ManifestDocument {
    pub fn data_page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn signature(&self) -> Option<&SignatureBlock> {
        self.blocks.iter().find_map(|b| match b {
            Block::Signature(sig) => Some(sig),
            _ => None,
        })
    }
}

/// Assemble data pages and their tables into one flowing document: a page
/// break between data pages, then one break, the signature block and the
/// closing note. With no data pages the signature block opens the document.
pub fn compose(
    pages: &[Page],
    tables: Vec<TableBlock>,
    date_label: &str,
    total_orders: usize,
) -> ManifestDocument {
    let mut blocks = Vec::with_capacity(tables.len() * 3 + 5);
    for (i, table) in tables.into_iter().enumerate() {
        if i > 0 {
            blocks.push(Block::PageBreak);
        }
        blocks.push(Block::Spacer(TABLE_TOP_GAP));
        blocks.push(Block::Table(table));
    }
    if !pages.is_empty() {
        blocks.push(Block::PageBreak);
    }
    blocks.push(Block::Spacer(SIGNATURE_TOP_GAP));
    blocks.push(Block::Signature(SignatureBlock::default()));
    blocks.push(Block::Spacer(NOTE_TOP_GAP));
    blocks.push(Block::Note(CLOSING_NOTE.to_string()));

    ManifestDocument {
        pages: pages.to_vec(),
        date_label: date_label.to_string(),
        total_orders,
        blocks,
    }
}

pub(crate) fn place_signature(sig: &SignatureBlock, flow: &mut Flow<'_>) {
    flow.ensure_room(sig.height(), FrameKind::Signature);
    flow.mark(FrameKind::Signature);
    let left = (flow.page.width - sig.width()) / 2.0;
    let items = sig.draw(left, flow.slot_top());
    flow.extend(items);
    flow.advance(sig.height());
}

pub(crate) fn place_note(text: &str, flow: &mut Flow<'_>) {
    let page = flow.page;
    let lines = wrap_line(text, Font::Regular, NOTE_FONT_SIZE, page.content_width());
    let height = lines.len() as f32 * NOTE_LEADING;
    let kind = flow.kind();
    flow.ensure_room(height, kind);
    let first_baseline = flow.slot_top() - baseline_offset(NOTE_FONT_SIZE, NOTE_LEADING);
    for (i, line) in lines.into_iter().enumerate() {
        flow.push(DrawItem::Text {
            x: page.content_left() + (page.content_width() - line.width) / 2.0,
            y: first_baseline - i as f32 * NOTE_LEADING,
            font: Font::Regular,
            size: NOTE_FONT_SIZE,
            color: BLACK,
            text: line.text,
        });
    }
    flow.advance(height);
}
