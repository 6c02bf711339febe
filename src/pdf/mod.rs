pub mod cell;
pub mod compose;
pub mod header;
pub mod layout;
pub mod paginate;
pub mod row;
pub mod table;

use chrono::Datelike;
use pdf_writer::{Content, Date, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::config::{ManifestConfig, PageGeometry};
use crate::error::Error;
use crate::fonts::{Font, FontEntry, register_font, to_winansi_bytes};
use crate::model::OrderRecord;

use compose::{ManifestDocument, compose};
use header::{RunningHeader, stamp};
use layout::{DrawItem, FrameKind, PageFrame, Rgb, flow};
use paginate::paginate;
use row::RowFormatter;
use table::{TableGeometry, build_table};

/// The fully laid-out and stamped manifest, ready to be serialized.
#[derive(Clone, Debug)]
pub struct ManifestLayout {
    pub document: ManifestDocument,
    pub frames: Vec<PageFrame>,
    pub page: PageGeometry,
}

impl ManifestLayout {
    pub fn page_count(&self) -> usize {
        self.frames.len()
    }

    pub fn data_frame_count(&self) -> usize {
        self.frames
            .iter()
            .filter(|f| f.kind == FrameKind::Data)
            .count()
    }
}

/// Run the whole layout pipeline: format rows, paginate, build one table per
/// data page, compose, flow into frames, then stamp the running header.
pub fn layout(records: &[OrderRecord], config: &ManifestConfig) -> Result<ManifestLayout, Error> {
    let t0 = std::time::Instant::now();
    let resolved = config.validate()?;
    let page = resolved.page;

    let rows = RowFormatter::new(resolved.policies).format_all(records);
    let t_format = t0.elapsed();

    let pages = paginate(rows.len(), resolved.capacity);
    let t_paginate = t0.elapsed();

    let geometry = TableGeometry {
        left: page.content_left(),
        col_widths: resolved.col_widths,
    };
    let tables = pages
        .iter()
        .map(|p| build_table(p, &rows, &geometry))
        .collect();
    let t_tables = t0.elapsed();

    let date_label = config.date_label();
    let document = compose(&pages, tables, &date_label, records.len());
    let mut frames = flow(&document, &page)?;
    let t_layout = t0.elapsed();

    stamp(
        &mut frames,
        &RunningHeader {
            date_label,
            total_orders: records.len(),
        },
        &page,
    );
    let t_stamp = t0.elapsed();

    log::info!(
        "Layout phases: format={:.1}ms, paginate={:.1}ms, tables={:.1}ms, flow={:.1}ms, stamp={:.1}ms ({} data pages, {} frames)",
        t_format.as_secs_f64() * 1000.0,
        (t_paginate - t_format).as_secs_f64() * 1000.0,
        (t_tables - t_paginate).as_secs_f64() * 1000.0,
        (t_layout - t_tables).as_secs_f64() * 1000.0,
        (t_stamp - t_layout).as_secs_f64() * 1000.0,
        pages.len(),
        frames.len(),
    );

    Ok(ManifestLayout {
        document,
        frames,
        page,
    })
}

pub fn render(records: &[OrderRecord], config: &ManifestConfig) -> Result<Vec<u8>, Error> {
    let laid_out = layout(records, config)?;
    write_pdf(&laid_out, config)
}

fn rgb_f32([r, g, b]: Rgb) -> (f32, f32, f32) {
    (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}

fn draw_frame(frame: &PageFrame) -> Content {
    let mut content = Content::new();
    let mut current_fill: Option<Rgb> = None;

    for item in &frame.items {
        match item {
            DrawItem::Text {
                x,
                y,
                font,
                size,
                color,
                text,
            } => {
                if current_fill != Some(*color) {
                    let (r, g, b) = rgb_f32(*color);
                    content.set_fill_rgb(r, g, b);
                    current_fill = Some(*color);
                }
                content.begin_text();
                content.set_font(Name(font.pdf_name().as_bytes()), *size);
                content.next_line(*x, *y);
                content.show(Str(&to_winansi_bytes(text)));
                content.end_text();
            }
            DrawItem::FillRect { x, y, w, h, color } => {
                if current_fill != Some(*color) {
                    let (r, g, b) = rgb_f32(*color);
                    content.set_fill_rgb(r, g, b);
                    current_fill = Some(*color);
                }
                content.rect(*x, *y, *w, *h).fill_nonzero();
            }
            DrawItem::StrokeRect {
                x,
                y,
                w,
                h,
                line_width,
                color,
            } => {
                let (r, g, b) = rgb_f32(*color);
                content.save_state();
                content.set_line_width(*line_width);
                content.set_stroke_rgb(r, g, b);
                content.rect(*x, *y, *w, *h).stroke();
                content.restore_state();
            }
            DrawItem::Line {
                x1,
                y1,
                x2,
                y2,
                line_width,
                color,
            } => {
                let (r, g, b) = rgb_f32(*color);
                content.save_state();
                content.set_line_width(*line_width);
                content.set_stroke_rgb(r, g, b);
                content.move_to(*x1, *y1);
                content.line_to(*x2, *y2);
                content.stroke();
                content.restore_state();
            }
        }
    }
    content
}

/// Serialize stamped frames. Only the manifest date is embedded, so identical
/// input and config give byte-identical output.
pub fn write_pdf(laid_out: &ManifestLayout, config: &ManifestConfig) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();
    if laid_out.frames.is_empty() {
        return Err(Error::Pdf("layout produced no pages".into()));
    }

    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    let fonts: Vec<FontEntry> = Font::ALL
        .into_iter()
        .map(|font| register_font(&mut pdf, font, &mut alloc))
        .collect();

    let date = config.manifest_date;
    let year = u16::try_from(date.year())
        .map_err(|_| Error::Pdf(format!("manifest date {date} cannot be stored in a PDF")))?;
    let title = format!("Manifiesto de entrega {}", config.date_label());
    pdf.document_info(info_id)
        .title(TextStr(&title))
        .producer(TextStr(concat!("manifest-pdf ", env!("CARGO_PKG_VERSION"))))
        .creation_date(Date::new(year).month(date.month() as u8).day(date.day() as u8));

    let n = laid_out.frames.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, frame) in laid_out.frames.iter().enumerate() {
        let raw = draw_frame(frame).finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    let geometry = &laid_out.page;
    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, geometry.width, geometry.height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        let mut font_dict = resources.fonts();
        for entry in &fonts {
            font_dict.pair(Name(entry.font.pdf_name().as_bytes()), entry.font_ref);
        }
    }

    let bytes = pdf.finish();
    log::info!(
        "PDF assembly: {} pages, {} bytes in {:.1}ms",
        n,
        bytes.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );
    Ok(bytes)
}
