use crate::domain::model::{CellValue, LegendMap, UnifiedTable};

/// Rewrites coded values of the legend columns into their descriptions, then
/// turns every empty string in the table into `Null`.
///
/// Returns the number of substituted cells. Substitution is exact and
/// case-sensitive, and only touches the columns the legend names.
pub fn apply_legends(table: &mut UnifiedTable, legend: &LegendMap) -> usize {
    let targets: Vec<(usize, &std::collections::HashMap<String, String>)> = table
        .columns()
        .iter()
        .enumerate()
        .filter_map(|(index, label)| legend.codes_for(label).map(|codes| (index, codes)))
        .collect();

    let mut substitutions = 0;
    for row in table.rows_mut().iter_mut() {
        for (index, codes) in &targets {
            let cell = &mut row[*index];
            if let Some(description) = cell.as_str().and_then(|code| codes.get(code)) {
                *cell = CellValue::Text(description.clone());
                substitutions += 1;
            }
        }
        for cell in row.iter_mut() {
            if cell.as_str() == Some("") {
                *cell = CellValue::Null;
            }
        }
    }

    tracing::debug!(
        "Legend applied to {} column(s), {} cell(s) substituted",
        targets.len(),
        substitutions
    );
    substitutions
}

pub fn resolve_legends(mut table: UnifiedTable, legend: &LegendMap) -> UnifiedTable {
    apply_legends(&mut table, legend);
    table
}
