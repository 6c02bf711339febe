use crate::fonts::is_encodable;
use crate::model::{CellPolicy, RenderedCell};

pub const ELLIPSIS: &str = "...";

/// Split a raw value into hard lines the PDF backend can show: line endings
/// normalized, tabs flattened, control characters dropped and anything outside
/// WinAnsi replaced by `?`.
pub fn escape_lines(raw: &str) -> Vec<String> {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed
        .split('\n')
        .map(|line| {
            line.chars()
                .filter_map(|c| match c {
                    '\t' => Some(' '),
                    c if c.is_control() => None,
                    c if is_encodable(c) => Some(c),
                    _ => Some('?'),
                })
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect()
}

/// Cut `text` to `max_len` characters and append the ellipsis when it is longer.
pub fn truncate_chars(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_len).collect();
    cut.truncate(cut.trim_end().len());
    cut.push_str(ELLIPSIS);
    cut
}

pub fn render_cell(value: Option<&str>, policy: CellPolicy) -> RenderedCell {
    let Some(raw) = value else {
        return RenderedCell::empty(policy);
    };
    let lines = escape_lines(raw);
    if lines.is_empty() {
        return RenderedCell::empty(policy);
    }
    let lines = match policy {
        CellPolicy::Wrap => lines,
        CellPolicy::Truncate(max_len) => {
            let joined = lines
                .iter()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            vec![truncate_chars(&joined, max_len)]
        }
    };
    RenderedCell { lines, policy }
}
