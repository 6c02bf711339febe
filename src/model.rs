use serde::{Deserialize, Serialize};

/// One delivery order as read from the input sheet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderRecord {
    /// 0-based position in the input. Drives the printed sequence number.
    pub index: usize,
    pub tracking: String,
    pub customer: String,
    pub city: String,
    pub region: String,
    pub street: Option<String>,
    pub number: Option<String>,
    pub product: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellPolicy {
    #[default]
    Wrap,
    /// Single line, cut to at most this many characters plus an ellipsis.
    Truncate(usize),
}

/// Layout-safe cell content. Each entry of `lines` is a hard line; the
/// boundaries between entries are the explicit line breaks of the source text.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedCell {
    pub lines: Vec<String>,
    pub policy: CellPolicy,
}

impl RenderedCell {
    pub fn empty(policy: CellPolicy) -> Self {
        Self {
            lines: Vec::new(),
            policy,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.is_empty())
    }

    /// Hard lines joined with `\n`, mostly useful for inspection.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Sequence,
    Tracking,
    Customer,
    City,
    Region,
    Address,
    Product,
}

pub const COLUMN_COUNT: usize = 7;

impl Column {
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::Sequence,
        Column::Tracking,
        Column::Customer,
        Column::City,
        Column::Region,
        Column::Address,
        Column::Product,
    ];

    /// Header label printed in the table.
    pub fn label(self) -> &'static str {
        match self {
            Column::Sequence => "#",
            Column::Tracking => "Guía",
            Column::Customer => "Cliente",
            Column::City => "Ciudad",
            Column::Region => "Estado",
            Column::Address => "Dirección",
            Column::Product => "Producto",
        }
    }

    pub fn position(self) -> usize {
        self as usize
    }
}

/// One order mapped to its seven cells, in `Column::ALL` order.
#[derive(Clone, Debug, PartialEq)]
pub struct FormattedRow {
    pub cells: [RenderedCell; COLUMN_COUNT],
}

impl FormattedRow {
    pub fn cell(&self, column: Column) -> &RenderedCell {
        &self.cells[column.position()]
    }
}
