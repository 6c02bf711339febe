mod sheet;

use std::collections::HashMap;
use std::io::{Read, Seek};
use std::path::Path;

use crate::error::Error;
use crate::model::OrderRecord;

use sheet::{first_sheet_path, parse_shared_strings, read_rows, read_zip_text};

pub const COL_TRACKING: &str = "Guía de Envío";
pub const COL_CUSTOMER: &str = "Cliente";
pub const COL_CITY: &str = "Ciudad";
pub const COL_REGION: &str = "Estado";
pub const COL_STREET: &str = "Calle";
pub const COL_NUMBER: &str = "Número";
pub const COL_PRODUCT: &str = "Productos";

/// Header names every input sheet must carry, in the order they are reported
/// when missing.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    COL_TRACKING,
    COL_CUSTOMER,
    COL_CITY,
    COL_REGION,
    COL_STREET,
    COL_NUMBER,
    COL_PRODUCT,
];

/// The first worksheet of a workbook: its header row and the data rows below it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Sheet {
    /// Split raw rows at the first row with any non-blank cell.
    fn from_rows(raw: Vec<Vec<Option<String>>>) -> Self {
        let mut rows = raw.into_iter().skip_while(|row| is_blank(row));
        let headers = rows
            .next()
            .map(|row| {
                row.into_iter()
                    .map(|cell| cell.map(|s| s.trim().to_string()).unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default();
        Self {
            headers,
            rows: rows.collect(),
        }
    }

    /// Position of each header name. On duplicates the leftmost column wins.
    fn header_positions(&self) -> HashMap<&str, usize> {
        let mut positions = HashMap::new();
        for (i, name) in self.headers.iter().enumerate() {
            if !name.is_empty() {
                positions.entry(name.as_str()).or_insert(i);
            }
        }
        positions
    }
}

fn is_blank(row: &[Option<String>]) -> bool {
    row.iter()
        .all(|cell| cell.as_deref().is_none_or(|s| s.trim().is_empty()))
}

pub fn parse(path: &Path) -> Result<Vec<OrderRecord>, Error> {
    let file = std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
        ),
        _ => Error::Io(e),
    })?;
    let sheet = read_sheet(file)?;
    records_from_sheet(&sheet)
}

pub fn parse_bytes(bytes: &[u8]) -> Result<Vec<OrderRecord>, Error> {
    let sheet = read_sheet(std::io::Cursor::new(bytes))?;
    records_from_sheet(&sheet)
}

pub fn read_sheet<R: Read + Seek>(reader: R) -> Result<Sheet, Error> {
    let mut zip = zip::ZipArchive::new(reader)
        .map_err(|_| Error::InvalidXlsx("file is not a ZIP archive".into()))?;

    let shared = parse_shared_strings(&mut zip)?;
    let sheet_path = first_sheet_path(&mut zip)?;
    let xml_text = read_zip_text(&mut zip, &sheet_path)
        .ok_or_else(|| Error::InvalidXlsx(format!("missing worksheet {sheet_path}")))?;
    let raw = read_rows(&xml_text, &shared)?;

    let sheet = Sheet::from_rows(raw);
    log::debug!(
        "sheet {sheet_path}: {} shared strings, {} header cells, {} data rows",
        shared.len(),
        sheet.headers.len(),
        sheet.rows.len()
    );
    Ok(sheet)
}

/// Column of every required header, or the names of the missing ones.
fn required_positions(sheet: &Sheet) -> Result<[usize; 7], Error> {
    let positions = sheet.header_positions();
    let mut columns = [0usize; 7];
    let mut missing = Vec::new();
    for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
        match positions.get(name) {
            Some(&pos) => *slot = pos,
            None => missing.push(name.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(Error::MissingColumns(missing));
    }
    Ok(columns)
}

/// Check the required columns and turn every non-blank data row into an
/// order. Indices are assigned after blank rows are dropped, so the printed
/// sequence has no gaps.
pub fn records_from_sheet(sheet: &Sheet) -> Result<Vec<OrderRecord>, Error> {
    let [tracking, customer, city, region, street, number, product] = required_positions(sheet)?;

    let mut records = Vec::with_capacity(sheet.rows.len());
    let mut skipped = 0usize;
    for row in &sheet.rows {
        if is_blank(row) {
            skipped += 1;
            continue;
        }
        let text = |i: usize| {
            row.get(i)
                .and_then(|cell| cell.as_deref())
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };
        let optional = |i: usize| Some(text(i)).filter(|s| !s.is_empty());
        records.push(OrderRecord {
            index: records.len(),
            tracking: text(tracking),
            customer: text(customer),
            city: text(city),
            region: text(region),
            street: optional(street),
            number: optional(number),
            product: text(product),
        });
    }

    if skipped > 0 {
        log::warn!("skipped {skipped} blank rows");
    }
    log::info!("loaded {} orders", records.len());
    Ok(records)
}
