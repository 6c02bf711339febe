#![allow(dead_code)]

use std::io::{Cursor, Write};

use chrono::NaiveDate;
use manifest_pdf::{ManifestConfig, OrderRecord};
use zip::write::SimpleFileOptions;

pub const HEADERS: [&str; 7] = [
    "Guía de Envío",
    "Cliente",
    "Ciudad",
    "Estado",
    "Calle",
    "Número",
    "Productos",
];

pub fn manifest_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
}

pub fn config() -> ManifestConfig {
    ManifestConfig::for_date(manifest_date())
}

pub fn record(index: usize) -> OrderRecord {
    OrderRecord {
        index,
        tracking: format!("TRK-{:04}", index + 1),
        customer: format!("Cliente {}", index + 1),
        city: "Monterrey".into(),
        region: "Nuevo León".into(),
        street: Some("Av. Juárez".into()),
        number: Some(format!("{}", 100 + index)),
        product: "Caja".into(),
    }
}

pub fn records(n: usize) -> Vec<OrderRecord> {
    (0..n).map(record).collect()
}

// ---------------------------------------------------------------------------
// In-memory workbooks
// ---------------------------------------------------------------------------

pub fn column_letters(mut col: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (col % 26) as u8);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap()
}

pub fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// A workbook with one sheet whose `<sheetData>` body is `sheet_data`, and a
/// shared string table holding `shared`.
pub fn xlsx_from_sheet_data(sheet_data: &str, shared: &[String]) -> Vec<u8> {
    let content_types = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>
</Types>"#;
    let root_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;
    let workbook = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="Pedidos" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#;
    let workbook_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>
</Relationships>"#;
    let sheet = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{sheet_data}</sheetData></worksheet>"#
    );
    let items: String = shared
        .iter()
        .map(|s| format!(r#"<si><t xml:space="preserve">{}</t></si>"#, xml_escape(s)))
        .collect();
    let shared_strings = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{n}" uniqueCount="{n}">{items}</sst>"#,
        n = shared.len()
    );

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, body) in [
        ("[Content_Types].xml", content_types.to_string()),
        ("_rels/.rels", root_rels.to_string()),
        ("xl/workbook.xml", workbook.to_string()),
        ("xl/_rels/workbook.xml.rels", workbook_rels.to_string()),
        ("xl/worksheets/sheet1.xml", sheet),
        ("xl/sharedStrings.xml", shared_strings),
    ] {
        zip.start_file(name, options).expect("start zip entry");
        zip.write_all(body.as_bytes()).expect("write zip entry");
    }
    zip.finish().expect("finish zip").into_inner()
}

/// A workbook whose first sheet holds `rows` as shared-string cells. Empty
/// strings leave the cell out entirely, as spreadsheet applications do.
pub fn xlsx_bytes(rows: &[Vec<&str>]) -> Vec<u8> {
    let mut shared: Vec<String> = Vec::new();
    let mut sheet_data = String::new();
    for (ri, row) in rows.iter().enumerate() {
        sheet_data.push_str(&format!(r#"<row r="{}">"#, ri + 1));
        for (ci, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let idx = shared.len();
            shared.push(value.to_string());
            sheet_data.push_str(&format!(
                r#"<c r="{}{}" t="s"><v>{idx}</v></c>"#,
                column_letters(ci),
                ri + 1
            ));
        }
        sheet_data.push_str("</row>");
    }
    xlsx_from_sheet_data(&sheet_data, &shared)
}

/// Header row followed by one row per record, in `HEADERS` order.
pub fn xlsx_for_records(records: &[OrderRecord]) -> Vec<u8> {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.tracking.clone(),
                r.customer.clone(),
                r.city.clone(),
                r.region.clone(),
                r.street.clone().unwrap_or_default(),
                r.number.clone().unwrap_or_default(),
                r.product.clone(),
            ]
        })
        .collect();
    let mut table: Vec<Vec<&str>> = vec![HEADERS.to_vec()];
    table.extend(rows.iter().map(|r| r.iter().map(String::as_str).collect()));
    xlsx_bytes(&table)
}

// ---------------------------------------------------------------------------
// PDF inspection
// ---------------------------------------------------------------------------

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

/// Inflated bodies of every FlateDecode stream, in file order.
pub fn content_streams(pdf: &[u8]) -> Vec<Vec<u8>> {
    let mut streams = Vec::new();
    let mut pos = 0;
    while let Some(start) = find(pdf, b"stream\n", pos) {
        pos = start + b"stream\n".len();
        if start >= 3 && &pdf[start - 3..start] == b"end" {
            continue;
        }
        let Some(end) = find(pdf, b"\nendstream", pos) else {
            break;
        };
        if let Ok(inflated) = miniz_oxide::inflate::decompress_to_vec_zlib(&pdf[pos..end]) {
            streams.push(inflated);
        }
        pos = end;
    }
    streams
}

fn winansi_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn hex_value(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}

/// Every string operand in a content stream, decoded. Literal `( .. )` and
/// hex `< .. >` strings are both handled.
pub fn stream_strings(stream: &[u8]) -> Vec<String> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < stream.len() {
        match stream[i] {
            b'(' => {
                let mut depth = 1;
                let mut bytes = Vec::new();
                i += 1;
                while i < stream.len() {
                    let b = stream[i];
                    match b {
                        b'\\' if i + 1 < stream.len() => {
                            i += 1;
                            match stream[i] {
                                b'n' => bytes.push(b'\n'),
                                b'r' => bytes.push(b'\r'),
                                b't' => bytes.push(b'\t'),
                                b'b' => bytes.push(0x08),
                                b'f' => bytes.push(0x0c),
                                d @ b'0'..=b'7' => {
                                    let mut value = (d - b'0') as u32;
                                    let mut n = 1;
                                    while n < 3 && i + 1 < stream.len() && (b'0'..=b'7').contains(&stream[i + 1]) {
                                        i += 1;
                                        value = value * 8 + (stream[i] - b'0') as u32;
                                        n += 1;
                                    }
                                    bytes.push(value as u8);
                                }
                                other => bytes.push(other),
                            }
                        }
                        b'(' => {
                            depth += 1;
                            bytes.push(b);
                        }
                        b')' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                            bytes.push(b);
                        }
                        _ => bytes.push(b),
                    }
                    i += 1;
                }
                out.push(winansi_to_string(&bytes));
            }
            b'<' if stream.get(i + 1) != Some(&b'<') => {
                let mut digits = Vec::new();
                i += 1;
                while i < stream.len() && stream[i] != b'>' {
                    if let Some(d) = hex_value(stream[i]) {
                        digits.push(d);
                    }
                    i += 1;
                }
                if digits.len() % 2 == 1 {
                    digits.push(0);
                }
                let bytes: Vec<u8> = digits.chunks(2).map(|p| p[0] << 4 | p[1]).collect();
                out.push(winansi_to_string(&bytes));
            }
            _ => {}
        }
        i += 1;
    }
    out
}

/// Shown text of each page, one list per content stream.
pub fn page_texts(pdf: &[u8]) -> Vec<Vec<String>> {
    content_streams(pdf)
        .iter()
        .map(|s| stream_strings(s))
        .collect()
}

/// The `/Count` of the page tree.
pub fn page_tree_count(pdf: &[u8]) -> Option<usize> {
    let at = find(pdf, b"/Count ", 0)? + b"/Count ".len();
    let digits: String = pdf[at..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .map(|&b| b as char)
        .collect();
    digits.parse().ok()
}

pub fn contains(pdf: &[u8], needle: &str) -> bool {
    find(pdf, needle.as_bytes(), 0).is_some()
}
