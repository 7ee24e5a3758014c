//! Mapping of the vendor worksheet to vendor records.

use calamine::{Data, Range};
use log::debug;
use stocksync_core::{RawValue, VendorRecord};

use crate::errors::InventoryError;

/// Position of the header row and names of the columns to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    /// 0-based sheet row holding the column names
    pub header_row: usize,
    pub code_column: String,
    pub quantity_column: String,
    pub price_column: String,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            header_row: 17,
            code_column: "Код".to_string(),
            quantity_column: "Количество".to_string(),
            price_column: "Цена".to_string(),
        }
    }
}

fn raw_value(cell: Option<&Data>) -> RawValue {
    match cell {
        None | Some(Data::Empty) => RawValue::Empty,
        Some(Data::Int(value)) => RawValue::Integer(*value),
        Some(Data::Float(value)) => RawValue::Float(*value),
        Some(Data::String(value)) => RawValue::Text(value.clone()),
        Some(Data::Error(_)) => RawValue::Empty,
        Some(other) => RawValue::Text(other.to_string()),
    }
}

fn find_column(header: &[Data], name: &str, row: usize) -> Result<usize, InventoryError> {
    header
        .iter()
        .position(|cell| matches!(cell, Data::String(s) if s.trim() == name))
        .ok_or_else(|| InventoryError::MissingColumn {
            column: name.to_string(),
            row,
        })
}

/// Reads vendor records from the rows below the layout's header row.
///
/// Rows where code, quantity and price are all empty are skipped.
pub fn records_from_range(
    range: &Range<Data>,
    layout: &SheetLayout,
) -> Result<Vec<VendorRecord>, InventoryError> {
    let start_row = range.start().map_or(0, |(row, _)| row as usize);
    let missing_header = || InventoryError::MissingColumn {
        column: layout.code_column.clone(),
        row: layout.header_row,
    };
    let header_offset = layout
        .header_row
        .checked_sub(start_row)
        .ok_or_else(missing_header)?;

    let mut rows = range.rows().skip(header_offset);
    let header = rows.next().ok_or_else(missing_header)?;
    let code_idx = find_column(header, &layout.code_column, layout.header_row)?;
    let quantity_idx = find_column(header, &layout.quantity_column, layout.header_row)?;
    let price_idx = find_column(header, &layout.price_column, layout.header_row)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in rows {
        let record = VendorRecord {
            code: raw_value(row.get(code_idx)),
            quantity: raw_value(row.get(quantity_idx)),
            price: raw_value(row.get(price_idx)),
        };
        if record.code.is_empty() && record.quantity.is_empty() && record.price.is_empty() {
            skipped += 1;
            continue;
        }
        records.push(record);
    }

    debug!(
        "[Inventory] Read {} vendor records ({} empty rows skipped)",
        records.len(),
        skipped
    );
    Ok(records)
}
