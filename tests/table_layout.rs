mod common;

use manifest_pdf::{Error, Font};
use manifest_pdf::model::{CellPolicy, Column};
use manifest_pdf::pdf::layout::{DrawItem, FrameKind, fit_line, wrap_line};
use manifest_pdf::pdf::paginate::paginate;
use manifest_pdf::pdf::row::RowFormatter;
use manifest_pdf::pdf::table::{
    BODY_STYLE, CELL_PADDING_H, HEADER_STYLE, STRIPE_FILLS, TableGeometry, build_table,
};

fn tall_product(lines: usize) -> String {
    (1..=lines)
        .map(|i| format!("Caja {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn subtitle(frame: &manifest_pdf::pdf::layout::PageFrame) -> &str {
    frame
        .texts()
        .find(|t| t.starts_with("Fecha:"))
        .expect("frame carries a subtitle")
}

fn geometry() -> TableGeometry {
    let resolved = common::config().validate().unwrap();
    TableGeometry {
        left: resolved.page.content_left(),
        col_widths: resolved.col_widths,
    }
}

fn text_items(items: &[DrawItem]) -> Vec<(f32, f32, Font, f32, String)> {
    items
        .iter()
        .filter_map(|item| match item {
            DrawItem::Text {
                x,
                y,
                font,
                size,
                text,
                ..
            } => Some((*x, *y, *font, *size, text.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn wrapped_lines_fit_the_width() {
    let text = "Caja de cartón corrugado con refuerzo lateral y asas de plástico";
    let lines = wrap_line(text, Font::Regular, 8.0, 60.0);
    assert!(lines.len() > 2);
    for line in &lines {
        assert!(line.width <= 60.0 + 0.01, "{line:?}");
    }
    let rejoined = lines
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    assert_eq!(rejoined, text);
}

#[test]
fn words_wider_than_the_column_are_broken() {
    let word = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let lines = wrap_line(word, Font::Regular, 8.0, 30.0);
    assert!(lines.len() > 1);
    for line in &lines {
        assert!(line.width <= 30.0 + 0.01, "{line:?}");
    }
    let rejoined: String = lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(rejoined, word);
}

#[test]
fn empty_text_wraps_to_one_blank_line() {
    let lines = wrap_line("", Font::Regular, 8.0, 50.0);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].text, "");
}

#[test]
fn fit_line_adds_ellipsis_within_width() {
    let fitted = fit_line("Distribuidora del Norte S.A. de C.V.", Font::Regular, 8.0, 50.0);
    assert!(fitted.text.ends_with("..."));
    assert!(fitted.width <= 50.0 + 0.01);

    let short = fit_line("Norte", Font::Regular, 8.0, 50.0);
    assert_eq!(short.text, "Norte");
}

#[test]
fn striping_restarts_with_every_table() {
    let records = common::records(7);
    let rows = RowFormatter::default().format_all(&records);
    let pages = paginate(rows.len(), std::num::NonZeroUsize::new(4).unwrap());
    let geometry = geometry();

    for page in &pages {
        let table = build_table(page, &rows, &geometry);
        assert_eq!(table.rows.len(), page.len());
        assert_eq!(table.header.style, HEADER_STYLE);
        for (i, row) in table.rows.iter().enumerate() {
            assert_eq!(row.fill, STRIPE_FILLS[i % 2]);
            assert_eq!(row.style, BODY_STYLE);
        }
    }
}

#[test]
fn row_height_grows_with_wrapped_content() {
    let mut records = common::records(2);
    records[1].product = "Refacciones varias para motor diesel, filtros de aceite, \
                          bandas de distribución y juego completo de empaques"
        .into();
    let rows = RowFormatter::default().format_all(&records);
    let page = paginate(rows.len(), std::num::NonZeroUsize::new(18).unwrap())[0];
    let table = build_table(&page, &rows, &geometry());

    let single = 2.0 * BODY_STYLE.padding_v + BODY_STYLE.leading;
    assert!((table.rows[0].height - single).abs() < 0.01);
    assert!(table.rows[1].height > single + BODY_STYLE.leading - 0.01);
}

#[test]
fn embedded_line_break_renders_two_lines_in_one_cell() {
    let _ = env_logger::try_init();
    let mut records = common::records(1);
    records[0].product = "Caja A\nCaja B".into();
    let layout = manifest_pdf::layout_manifest(&records, &common::config()).unwrap();

    let texts = text_items(&layout.frames[0].items);
    let first = texts.iter().find(|t| t.4 == "Caja A").expect("first line drawn");
    let second = texts.iter().find(|t| t.4 == "Caja B").expect("second line drawn");
    assert_eq!(first.0, second.0);
    assert!((first.1 - second.1 - BODY_STYLE.leading).abs() < 0.01);
}

#[test]
fn body_text_stays_inside_its_column() {
    let mut records = common::records(6);
    records[2].customer = "Comercializadora Internacional de Productos Alimenticios".into();
    records[3].tracking = "MX12345678901234567890".into();
    let layout = manifest_pdf::layout_manifest(&records, &common::config()).unwrap();
    let geometry = geometry();

    let mut edges = vec![geometry.left];
    for w in geometry.col_widths {
        edges.push(edges.last().unwrap() + w);
    }
    for (x, _, font, size, text) in text_items(&layout.frames[0].items) {
        if font != BODY_STYLE.font || size != BODY_STYLE.font_size {
            continue;
        }
        let Some(col) = edges.windows(2).position(|e| x >= e[0] && x < e[1]) else {
            continue;
        };
        let right = edges[col + 1] - CELL_PADDING_H;
        let width = font.text_width(&text, BODY_STYLE.font_size);
        assert!(x + width <= right + 0.01, "{text:?} overflows column {col}");
    }
}

#[test]
fn truncated_column_stays_on_one_line() {
    let mut config = common::config();
    config.columns.policies[Column::Customer.position()] = CellPolicy::Truncate(80);
    let mut records = common::records(1);
    records[0].customer = "Comercializadora Internacional de Productos Alimenticios del Bajío".into();

    let layout = manifest_pdf::layout_manifest(&records, &config).unwrap();
    let texts = text_items(&layout.frames[0].items);
    let customer: Vec<_> = texts
        .iter()
        .filter(|t| t.4.starts_with("Comercializadora"))
        .collect();
    assert_eq!(customer.len(), 1);
    assert!(customer[0].4.ends_with("..."));
}

#[test]
fn oversized_page_continues_with_repeated_header() {
    let _ = env_logger::try_init();
    let mut config = common::config();
    config.rows_per_page = 60;
    let layout = manifest_pdf::layout_manifest(&common::records(60), &config).unwrap();

    assert_eq!(layout.document.data_page_count(), 1);
    assert!(layout.data_frame_count() >= 2);
    for frame in layout.frames.iter().filter(|f| f.kind == FrameKind::Data) {
        let texts: Vec<&str> = frame.texts().collect();
        assert!(texts.contains(&Column::Address.label()));
        assert!(texts.contains(&Column::Product.label()));
    }

    // Continuation frames are numbered against the real frame count.
    let total = layout.data_frame_count();
    for (i, frame) in layout
        .frames
        .iter()
        .filter(|f| f.kind == FrameKind::Data)
        .enumerate()
    {
        assert_eq!(
            subtitle(frame),
            format!("Fecha: 07/03/2025 | Total: 60 órdenes | Página {} de {total}", i + 1)
        );
    }

    // Every row is placed exactly once.
    let sequence: Vec<String> = layout
        .frames
        .iter()
        .flat_map(|f| f.texts())
        .filter(|t| t.parse::<usize>().is_ok())
        .map(str::to_string)
        .collect();
    let expected: Vec<String> = (1..=60).map(|n| n.to_string()).collect();
    assert_eq!(sequence, expected);
}

#[test]
fn rows_stay_inside_the_content_area() {
    let _ = env_logger::try_init();
    let config = common::config();
    let page = config.page_geometry();
    let layout = manifest_pdf::layout_manifest(&common::records(37), &config).unwrap();

    for frame in &layout.frames {
        for item in &frame.items {
            if let DrawItem::StrokeRect { y, h, .. } = item {
                assert!(*y >= page.content_bottom() - 0.01);
                assert!(y + h <= page.content_top() + 0.01);
            }
        }
    }
}

#[test]
fn tall_first_row_does_not_leave_a_blank_page() {
    let _ = env_logger::try_init();
    // Header and row together fill all but a point of the content area, more
    // than is left below the gap above the table.
    let mut records = common::records(1);
    records[0].product = tall_product(54);
    let config = common::config();
    let page = config.page_geometry();
    let layout = manifest_pdf::layout_manifest(&records, &config).unwrap();

    assert_eq!(layout.data_frame_count(), 1);
    assert_eq!(layout.page_count(), 2);
    let data = &layout.frames[0];
    assert!(data.texts().any(|t| t == "Caja 54"));
    assert_eq!(subtitle(data), "Fecha: 07/03/2025 | Total: 1 órdenes");

    for frame in &layout.frames {
        assert!(frame.texts().count() > 2, "frame holds only the running header");
        for item in &frame.items {
            if let DrawItem::StrokeRect { y, h, .. } = item {
                assert!(*y >= page.content_bottom() - 0.01);
                assert!(y + h <= page.content_top() + 0.01);
            }
        }
    }
}

#[test]
fn tall_row_after_other_rows_moves_to_a_new_frame() {
    let _ = env_logger::try_init();
    let mut records = common::records(3);
    records[2].product = tall_product(50);
    let layout = manifest_pdf::layout_manifest(&records, &common::config()).unwrap();

    assert_eq!(layout.data_frame_count(), 2);
    assert_eq!(subtitle(&layout.frames[0]), "Fecha: 07/03/2025 | Total: 3 órdenes | Página 1 de 2");
    assert_eq!(subtitle(&layout.frames[1]), "Fecha: 07/03/2025 | Total: 3 órdenes | Página 2 de 2");
    let second: Vec<&str> = layout.frames[1].texts().collect();
    assert!(second.contains(&"3"));
    assert!(second.contains(&Column::Product.label()));
}

#[test]
fn row_taller_than_a_page_is_a_layout_error() {
    let _ = env_logger::try_init();
    let mut records = common::records(2);
    records[0].product = tall_product(80);

    match manifest_pdf::layout_manifest(&records, &common::config()) {
        Err(Error::Layout(msg)) => assert!(msg.starts_with("row 1 is"), "{msg}"),
        other => panic!("expected layout error, got {other:?}"),
    }
    assert!(matches!(
        manifest_pdf::render_manifest(&records, &common::config()),
        Err(Error::Layout(_))
    ));
}
