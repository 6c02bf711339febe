use crate::error::Error;
use crate::fonts::Font;
use crate::model::{COLUMN_COUNT, CellPolicy, Column, FormattedRow, RenderedCell};

use super::layout::{
    BLACK, DrawItem, Flow, Rgb, TextLine, WHITE, baseline_offset, fit_line, wrap_lines,
};
use super::paginate::Page;

pub const HEADER_FILL: Rgb = [0x2c, 0x3e, 0x50];
pub const STRIPE_FILLS: [Rgb; 2] = [WHITE, [0xf8, 0xf9, 0xfa]];
pub const GRID_COLOR: Rgb = [128, 128, 128];
pub const GRID_WIDTH: f32 = 0.5;
pub const CELL_PADDING_H: f32 = 6.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowStyle {
    pub font: Font,
    pub font_size: f32,
    pub leading: f32,
    pub padding_v: f32,
    pub text_color: Rgb,
    pub align: HAlign,
    /// Center lines vertically; otherwise they hang from the top padding.
    pub v_center: bool,
}

pub const HEADER_STYLE: RowStyle = RowStyle {
    font: Font::Bold,
    font_size: 10.0,
    leading: 11.0,
    padding_v: 8.0,
    text_color: WHITE,
    align: HAlign::Center,
    v_center: true,
};

pub const BODY_STYLE: RowStyle = RowStyle {
    font: Font::Regular,
    font_size: 8.0,
    leading: 9.0,
    padding_v: 4.0,
    text_color: BLACK,
    align: HAlign::Left,
    v_center: false,
};

/// Horizontal placement of the seven columns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableGeometry {
    pub left: f32,
    pub col_widths: [f32; COLUMN_COUNT],
}

impl TableGeometry {
    pub fn width(&self) -> f32 {
        self.col_widths.iter().sum()
    }

    fn col_x(&self, col: usize) -> f32 {
        self.left + self.col_widths[..col].iter().sum::<f32>()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RowLayout {
    pub cells: Vec<Vec<TextLine>>,
    pub height: f32,
    pub fill: Rgb,
    pub style: RowStyle,
}

/// One independent table instance: the header row plus the rows of one data page.
#[derive(Clone, Debug, PartialEq)]
pub struct TableBlock {
    pub page: Page,
    pub geometry: TableGeometry,
    pub header: RowLayout,
    pub rows: Vec<RowLayout>,
}

fn cell_lines(cell: &RenderedCell, style: &RowStyle, text_w: f32) -> Vec<TextLine> {
    if cell.is_empty() {
        return Vec::new();
    }
    match cell.policy {
        CellPolicy::Wrap => wrap_lines(&cell.lines, style.font, style.font_size, text_w),
        CellPolicy::Truncate(_) => {
            let text = cell.lines.first().map(String::as_str).unwrap_or("");
            vec![fit_line(text, style.font, style.font_size, text_w)]
        }
    }
}

fn layout_row(cells: &[RenderedCell], geometry: &TableGeometry, style: RowStyle, fill: Rgb) -> RowLayout {
    let cells: Vec<Vec<TextLine>> = cells
        .iter()
        .zip(geometry.col_widths.iter())
        .map(|(cell, col_w)| {
            let text_w = (col_w - 2.0 * CELL_PADDING_H).max(1.0);
            cell_lines(cell, &style, text_w)
        })
        .collect();
    let max_lines = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);
    let height = 2.0 * style.padding_v + max_lines as f32 * style.leading;
    RowLayout {
        cells,
        height,
        fill,
        style,
    }
}

pub fn header_cells() -> [RenderedCell; COLUMN_COUNT] {
    Column::ALL.map(|c| RenderedCell {
        lines: vec![c.label().to_string()],
        policy: CellPolicy::Wrap,
    })
}

/// Lay out the rows of `page` (a slice of `rows`) as a table with its own
/// header row. Striping restarts with the first data row of every table.
pub fn build_table(page: &Page, rows: &[FormattedRow], geometry: &TableGeometry) -> TableBlock {
    let header = layout_row(&header_cells(), geometry, HEADER_STYLE, HEADER_FILL);
    let rows = page
        .slice(rows)
        .iter()
        .enumerate()
        .map(|(i, row)| layout_row(&row.cells, geometry, BODY_STYLE, STRIPE_FILLS[i % 2]))
        .collect();
    TableBlock {
        page: *page,
        geometry: *geometry,
        header,
        rows,
    }
}

fn draw_row(row: &RowLayout, geometry: &TableGeometry, row_top: f32) -> Vec<DrawItem> {
    let style = &row.style;
    let row_bottom = row_top - row.height;
    let mut items = Vec::new();

    for (ci, col_w) in geometry.col_widths.iter().enumerate() {
        items.push(DrawItem::FillRect {
            x: geometry.col_x(ci),
            y: row_bottom,
            w: *col_w,
            h: row.height,
            color: row.fill,
        });
    }

    for (ci, lines) in row.cells.iter().enumerate() {
        if lines.iter().all(|l| l.text.is_empty()) {
            continue;
        }
        let cell_x = geometry.col_x(ci);
        let col_w = geometry.col_widths[ci];
        let text_w = col_w - 2.0 * CELL_PADDING_H;
        let content_h = lines.len() as f32 * style.leading;
        let v_offset = if style.v_center {
            ((row.height - 2.0 * style.padding_v - content_h) / 2.0).max(0.0)
        } else {
            0.0
        };
        let first_baseline =
            row_top - style.padding_v - v_offset - baseline_offset(style.font_size, style.leading);

        for (li, line) in lines.iter().enumerate() {
            if line.text.is_empty() {
                continue;
            }
            let x = match style.align {
                HAlign::Left => cell_x + CELL_PADDING_H,
                HAlign::Center => cell_x + CELL_PADDING_H + (text_w - line.width).max(0.0) / 2.0,
            };
            items.push(DrawItem::Text {
                x,
                y: first_baseline - li as f32 * style.leading,
                font: style.font,
                size: style.font_size,
                color: style.text_color,
                text: line.text.clone(),
            });
        }
    }

    for (ci, col_w) in geometry.col_widths.iter().enumerate() {
        items.push(DrawItem::StrokeRect {
            x: geometry.col_x(ci),
            y: row_bottom,
            w: *col_w,
            h: row.height,
            line_width: GRID_WIDTH,
            color: GRID_COLOR,
        });
    }
    items
}

fn place_row(row: &RowLayout, geometry: &TableGeometry, flow: &mut Flow<'_>) {
    let items = draw_row(row, geometry, flow.slot_top());
    flow.extend(items);
    flow.advance(row.height);
}

/// Place a table into the flow. Rows are never split; when the next row does
/// not fit, the table continues on a new frame with the header row repeated.
/// A row taller than a page minus the header row is a layout error.
pub(crate) fn place_table(table: &TableBlock, flow: &mut Flow<'_>) -> Result<(), Error> {
    let geometry = &table.geometry;
    let header_h = table.header.height;
    let row_room = flow.page_room() - header_h;

    if let Some((ri, row)) = table
        .rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.height > row_room)
    {
        return Err(Error::Layout(format!(
            "row {} is {:.1}pt tall, a page holds {:.1}pt below the table header",
            table.page.start + ri + 1,
            row.height,
            row_room
        )));
    }

    log::debug!(
        "TABLE page={}/{} rows={} slot_top={:.2}",
        table.page.number,
        table.page.total,
        table.rows.len(),
        flow.slot_top()
    );

    // Keep the header together with at least the first row.
    let first_h = table.rows.first().map_or(0.0, |r| r.height);
    let kind = flow.kind();
    flow.ensure_room(header_h + first_h, kind);
    place_row(&table.header, geometry, flow);

    for (ri, row) in table.rows.iter().enumerate() {
        if flow.remaining() < row.height {
            log::debug!(
                "TABLE page={} continues on a new frame before row {}",
                table.page.number,
                ri
            );
            flow.overflow();
            place_row(&table.header, geometry, flow);
        }
        place_row(row, geometry, flow);
    }
    Ok(())
}
