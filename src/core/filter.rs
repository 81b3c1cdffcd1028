use crate::domain::model::UnifiedTable;

/// Removes rows whose cells are all `Null`, returning how many went away.
/// An empty string counts as a value.
pub fn drop_empty_rows(table: &mut UnifiedTable) -> usize {
    let before = table.row_count();
    table
        .rows_mut()
        .retain(|row| row.iter().any(|cell| !cell.is_null()));
    before - table.row_count()
}

pub fn filter_empty(mut table: UnifiedTable) -> UnifiedTable {
    drop_empty_rows(&mut table);
    table
}
