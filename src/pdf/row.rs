use crate::model::{COLUMN_COUNT, CellPolicy, Column, FormattedRow, OrderRecord};

use super::cell::render_cell;

/// Street and house number joined by one space; either part may be missing.
pub fn compose_address(street: Option<&str>, number: Option<&str>) -> String {
    [street, number]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct RowFormatter {
    policies: [CellPolicy; COLUMN_COUNT],
}

impl RowFormatter {
    pub fn new(policies: [CellPolicy; COLUMN_COUNT]) -> Self {
        Self { policies }
    }

    pub fn format(&self, record: &OrderRecord) -> FormattedRow {
        let address = compose_address(record.street.as_deref(), record.number.as_deref());
        let sequence = (record.index + 1).to_string();
        let cells = Column::ALL.map(|column| {
            let value: &str = match column {
                Column::Sequence => &sequence,
                Column::Tracking => &record.tracking,
                Column::Customer => &record.customer,
                Column::City => &record.city,
                Column::Region => &record.region,
                Column::Address => &address,
                Column::Product => &record.product,
            };
            render_cell(Some(value), self.policies[column.position()])
        });
        FormattedRow { cells }
    }

    pub fn format_all(&self, records: &[OrderRecord]) -> Vec<FormattedRow> {
        records.iter().map(|r| self.format(r)).collect()
    }
}

impl Default for RowFormatter {
    fn default() -> Self {
        Self::new([CellPolicy::Wrap; COLUMN_COUNT])
    }
}
