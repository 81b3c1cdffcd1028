//! Merges per-page grids into one table, aligning columns by header label.

use crate::core::normalize::{clean_text, normalize_raw};
use crate::domain::model::{CellValue, RawTable, UnifiedTable};
use std::collections::{HashMap, HashSet};

/// Union of header labels in first-seen order.
#[derive(Debug, Default)]
struct ColumnArena {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl ColumnArena {
    fn intern(&mut self, label: &str) -> usize {
        if let Some(&position) = self.index.get(label) {
            return position;
        }
        let position = self.labels.len();
        self.labels.push(label.to_string());
        self.index.insert(label.to_string(), position);
        position
    }
}

/// Maps each source column position to its slot in the unified table.
/// `None` marks a repeated label whose cells are discarded.
type ColumnRemap = Vec<Option<usize>>;

fn header_label(cell: &Option<String>) -> String {
    cell.as_deref().map(clean_text).unwrap_or_default()
}

fn build_remap(arena: &mut ColumnArena, table_index: usize, header: &[Option<String>]) -> ColumnRemap {
    let mut seen = HashSet::new();
    header
        .iter()
        .map(header_label)
        .map(|label| {
            if seen.insert(label.clone()) {
                Some(arena.intern(&label))
            } else {
                tracing::debug!(
                    "Table {} repeats header '{}'; keeping the first occurrence",
                    table_index,
                    label
                );
                None
            }
        })
        .collect()
}

/// Concatenates `tables` in order into one table whose columns are the union
/// of all header labels. Cells are normalized on the way in and a row gets
/// `Null` for every column its own table lacks.
///
/// Tables without a data row contribute neither rows nor columns.
pub fn unify(tables: &[RawTable]) -> UnifiedTable {
    let mut arena = ColumnArena::default();
    let contributing: Vec<(usize, &RawTable, ColumnRemap)> = tables
        .iter()
        .enumerate()
        .filter(|(_, table)| table.has_data())
        .map(|(index, table)| {
            let remap = build_remap(&mut arena, index, table.header().unwrap_or(&[]));
            (index, table, remap)
        })
        .collect();

    let width = arena.labels.len();
    let mut unified = UnifiedTable::new(arena.labels);

    for (index, table, remap) in contributing {
        for raw_row in table.data_rows() {
            if raw_row.len() > remap.len() {
                tracing::debug!(
                    "Table {} has a row wider than its header ({} > {}); extra cells dropped",
                    index,
                    raw_row.len(),
                    remap.len()
                );
            }
            let mut row = vec![CellValue::Null; width];
            for (position, cell) in raw_row.iter().enumerate() {
                if let Some(Some(target)) = remap.get(position) {
                    row[*target] = normalize_raw(cell.as_deref());
                }
            }
            unified.push_row(row);
        }
    }

    unified
}
