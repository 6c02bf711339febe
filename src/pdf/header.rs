use crate::config::PageGeometry;
use crate::fonts::Font;

use super::layout::{BLACK, DrawItem, FrameKind, PageFrame};

pub const TITLE: &str = "MANIFIESTO DE ENTREGA";
const TITLE_SIZE: f32 = 14.0;
const SUBTITLE_SIZE: f32 = 9.0;
/// Baselines measured down from the top edge of the page.
const TITLE_OFFSET: f32 = 22.0;
const SUBTITLE_OFFSET: f32 = 36.0;

#[derive(Clone, Debug, PartialEq)]
pub struct RunningHeader {
    pub date_label: String,
    pub total_orders: usize,
}

/// `Fecha: .. | Total: .. órdenes`, with `| Página X de Y` appended only when
/// `page` is given and there is more than one data page.
pub fn subtitle_text(date_label: &str, total_orders: usize, page: Option<(usize, usize)>) -> String {
    let mut text = format!("Fecha: {date_label} | Total: {total_orders} órdenes");
    if let Some((number, total)) = page
        && total > 1
    {
        text.push_str(&format!(" | Página {number} de {total}"));
    }
    text
}

fn centered(text: String, font: Font, size: f32, page: &PageGeometry, offset: f32) -> DrawItem {
    DrawItem::Text {
        x: (page.width - font.text_width(&text, size)) / 2.0,
        y: page.height - offset,
        font,
        size,
        color: BLACK,
        text,
    }
}

/// Stamp pass: with the layout finished and the number of data frames known,
/// draw the title and subtitle on every frame. Only data frames are numbered.
pub fn stamp(frames: &mut [PageFrame], header: &RunningHeader, page: &PageGeometry) {
    let data_total = frames.iter().filter(|f| f.kind == FrameKind::Data).count();
    let mut data_number = 0usize;

    for frame in frames.iter_mut() {
        let page_of = match frame.kind {
            FrameKind::Data => {
                data_number += 1;
                Some((data_number, data_total))
            }
            FrameKind::Signature => None,
        };
        let subtitle = subtitle_text(&header.date_label, header.total_orders, page_of);
        log::debug!("stamp: {subtitle}");
        frame
            .items
            .push(centered(TITLE.to_string(), Font::Bold, TITLE_SIZE, page, TITLE_OFFSET));
        frame
            .items
            .push(centered(subtitle, Font::Regular, SUBTITLE_SIZE, page, SUBTITLE_OFFSET));
    }
}
