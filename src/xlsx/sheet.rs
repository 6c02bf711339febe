use std::collections::HashMap;
use std::io::{Read, Seek};

use crate::error::Error;

const SML_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const DEFAULT_SHEET: &str = "xl/worksheets/sheet1.xml";
// Column XFD, the last one a worksheet can address.
const MAX_COLUMNS: usize = 16_384;

fn sml<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Option<roxmltree::Node<'a, 'a>> {
    node.children()
        .find(|n| n.tag_name().name() == name && n.tag_name().namespace() == Some(SML_NS))
}

fn sml_children<'a>(
    node: roxmltree::Node<'a, 'a>,
    name: &'static str,
) -> impl Iterator<Item = roxmltree::Node<'a, 'a>> {
    node.children()
        .filter(move |n| n.tag_name().name() == name && n.tag_name().namespace() == Some(SML_NS))
}

pub(super) fn read_zip_text<R: Read + Seek>(zip: &mut zip::ZipArchive<R>, name: &str) -> Option<String> {
    let mut content = String::new();
    zip.by_name(name).ok()?.read_to_string(&mut content).ok()?;
    Some(content)
}

/// Visible text of a string item (`<si>` or `<is>`): every `<t>` outside the
/// phonetic `<rPh>` runs, concatenated.
fn string_item_text(node: roxmltree::Node) -> String {
    node.descendants()
        .filter(|n| n.has_tag_name((SML_NS, "t")))
        .filter(|n| !n.ancestors().any(|a| a.has_tag_name((SML_NS, "rPh"))))
        .filter_map(|n| n.text())
        .collect()
}

pub(super) fn parse_shared_strings<R: Read + Seek>(zip: &mut zip::ZipArchive<R>) -> Result<Vec<String>, Error> {
    let Some(xml_text) = read_zip_text(zip, "xl/sharedStrings.xml") else {
        return Ok(Vec::new());
    };
    let xml = roxmltree::Document::parse(&xml_text)?;
    Ok(sml_children(xml.root_element(), "si")
        .map(string_item_text)
        .collect())
}

fn parse_workbook_rels<R: Read + Seek>(zip: &mut zip::ZipArchive<R>) -> HashMap<String, String> {
    let mut rels = HashMap::new();
    let Some(xml_text) = read_zip_text(zip, "xl/_rels/workbook.xml.rels") else {
        return rels;
    };
    let Ok(xml) = roxmltree::Document::parse(&xml_text) else {
        return rels;
    };
    for rel in xml
        .root_element()
        .children()
        .filter(|n| n.has_tag_name((PKG_REL_NS, "Relationship")))
    {
        if let (Some(id), Some(target)) = (rel.attribute("Id"), rel.attribute("Target")) {
            rels.insert(id.to_string(), target.to_string());
        }
    }
    rels
}

fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{target}"),
    }
}

/// ZIP path of the first worksheet listed in the workbook, falling back to
/// the conventional `sheet1.xml`.
pub(super) fn first_sheet_path<R: Read + Seek>(zip: &mut zip::ZipArchive<R>) -> Result<String, Error> {
    let workbook = read_zip_text(zip, "xl/workbook.xml")
        .ok_or_else(|| Error::InvalidXlsx("missing xl/workbook.xml (is this an XLSX file?)".into()))?;
    let xml = roxmltree::Document::parse(&workbook)?;
    let first = sml(xml.root_element(), "sheets")
        .and_then(|sheets| sml_children(sheets, "sheet").next());
    let Some(sheet) = first else {
        return Err(Error::InvalidXlsx("workbook has no sheets".into()));
    };
    let name = sheet.attribute("name").unwrap_or("?");
    let rels = parse_workbook_rels(zip);
    let path = sheet
        .attribute((REL_NS, "id"))
        .and_then(|rid| rels.get(rid))
        .map(|target| resolve_target(target))
        .unwrap_or_else(|| DEFAULT_SHEET.to_string());
    log::debug!("first sheet '{name}' at {path}");
    Ok(path)
}

/// 0-based column of a cell reference such as `C7` or `AB12`.
fn column_index(cell_ref: &str) -> Option<usize> {
    let letters: String = cell_ref
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if letters.is_empty() {
        return None;
    }
    letters
        .chars()
        .try_fold(0usize, |acc, c| {
            let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
            acc.checked_mul(26)?.checked_add(digit)
        })
        .map(|n| n - 1)
        .filter(|&col| col < MAX_COLUMNS)
}

/// Numbers are stored as their XML text; integral values print without a
/// fractional part so tracking codes and house numbers read naturally.
fn format_number(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e21 => format!("{v:.0}"),
        Ok(v) if v.is_finite() => v.to_string(),
        _ => {
            log::warn!("unparseable numeric cell value {raw:?}, keeping it as text");
            raw.to_string()
        }
    }
}

fn cell_value(cell: roxmltree::Node, shared: &[String]) -> Option<String> {
    let raw_v = sml(cell, "v").and_then(|v| v.text());
    let value = match cell.attribute("t").unwrap_or("n") {
        "s" => {
            let idx: usize = raw_v?.trim().parse().ok()?;
            let s = shared.get(idx);
            if s.is_none() {
                log::warn!("shared string index {idx} out of range ({} strings)", shared.len());
            }
            s?.clone()
        }
        "inlineStr" => sml(cell, "is").map(string_item_text)?,
        "b" => match raw_v?.trim() {
            "1" => "TRUE".to_string(),
            _ => "FALSE".to_string(),
        },
        "str" | "e" | "d" => raw_v?.to_string(),
        _ => format_number(raw_v?),
    };
    Some(value)
}

/// Every row of the sheet as a sparse list of cell values indexed by column.
pub(super) fn read_rows(xml_text: &str, shared: &[String]) -> Result<Vec<Vec<Option<String>>>, Error> {
    let xml = roxmltree::Document::parse(xml_text)?;
    let Some(sheet_data) = sml(xml.root_element(), "sheetData") else {
        return Err(Error::InvalidXlsx("worksheet has no sheetData".into()));
    };

    let mut rows = Vec::new();
    for row in sml_children(sheet_data, "row") {
        let mut values: Vec<Option<String>> = Vec::new();
        let mut next_col = 0usize;
        for cell in sml_children(row, "c") {
            let col = cell
                .attribute("r")
                .and_then(column_index)
                .unwrap_or(next_col);
            next_col = col + 1;
            if values.len() <= col {
                values.resize(col + 1, None);
            }
            values[col] = cell_value(cell, shared);
        }
        rows.push(values);
    }
    Ok(rows)
}
