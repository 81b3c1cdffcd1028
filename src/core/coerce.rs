//! Applies the target schema's column types to a unified table.

use crate::domain::model::{CellValue, ColumnType, TargetSchema, UnifiedTable};

/// Total integer parse: a trimmed integer literal, or a float literal with no
/// fractional part that fits in `i64` (`"12.0"`, `"1e3"`). Anything else is
/// `None`.
pub fn parse_nullable_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    let value = trimmed.parse::<f64>().ok()?;
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound.
    if value.is_finite()
        && value.fract() == 0.0
        && value >= i64::MIN as f64
        && value < i64::MAX as f64
    {
        Some(value as i64)
    } else {
        None
    }
}

fn coerce_text(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Null => CellValue::Text(String::new()),
        CellValue::Integer(n) => CellValue::Text(n.to_string()),
        CellValue::Text(s) => CellValue::Text(s.clone()),
    }
}

fn coerce_integer(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Integer(n) => CellValue::Integer(*n),
        CellValue::Text(s) => parse_nullable_integer(s).map_or(CellValue::Null, CellValue::Integer),
        CellValue::Null => CellValue::Null,
    }
}

/// Coerces every schema column present in `table` in place. Columns the
/// schema does not declare are left alone.
///
/// Returns how many non-empty values could not be read as integers and were
/// nulled.
pub fn apply_schema(table: &mut UnifiedTable, schema: &TargetSchema) -> usize {
    let targets: Vec<(usize, &str, ColumnType)> = schema
        .columns()
        .iter()
        .filter_map(|(label, column_type)| {
            table
                .column_index(label)
                .map(|index| (index, label.as_str(), *column_type))
        })
        .collect();

    let mut misses = 0;
    for row in table.rows_mut().iter_mut() {
        for (index, label, column_type) in &targets {
            let cell = &mut row[*index];
            let coerced = match column_type {
                ColumnType::Text => coerce_text(cell),
                ColumnType::NullableInteger => {
                    let coerced = coerce_integer(cell);
                    if coerced.is_null() && !cell.is_null() {
                        tracing::debug!("Column {}: '{}' is not an integer, storing null", label, cell);
                        misses += 1;
                    }
                    coerced
                }
            };
            *cell = coerced;
        }
    }

    if misses > 0 {
        tracing::warn!("{} value(s) could not be read as integers and were nulled", misses);
    }
    misses
}

pub fn coerce(mut table: UnifiedTable, schema: &TargetSchema) -> UnifiedTable {
    apply_schema(&mut table, schema);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: Vec<Vec<CellValue>>) -> UnifiedTable {
        let mut table = UnifiedTable::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            table.push_row(row);
        }
        table
    }

    #[test]
    fn test_parse_nullable_integer() {
        assert_eq!(parse_nullable_integer("12"), Some(12));
        assert_eq!(parse_nullable_integer(" -3 "), Some(-3));
        assert_eq!(parse_nullable_integer("12.0"), Some(12));
        assert_eq!(parse_nullable_integer("1e3"), Some(1000));
        assert_eq!(parse_nullable_integer("12.5"), None);
        assert_eq!(parse_nullable_integer("abc"), None);
        assert_eq!(parse_nullable_integer(""), None);
        assert_eq!(parse_nullable_integer("NaN"), None);
        assert_eq!(parse_nullable_integer("inf"), None);
        assert_eq!(parse_nullable_integer("1e30"), None);
    }

    #[test]
    fn test_dut_column_becomes_nullable_integer() {
        let mut t = table(
            &["DUT"],
            vec![
                vec![CellValue::text("12")],
                vec![CellValue::text("abc")],
                vec![CellValue::Null],
            ],
        );

        let misses = apply_schema(&mut t, &TargetSchema::rol_procedimentos());

        assert_eq!(misses, 1);
        assert_eq!(t.cell(0, "DUT").and_then(CellValue::as_i64), Some(12));
        assert_eq!(t.cell(1, "DUT"), Some(&CellValue::Null));
        assert_eq!(t.cell(2, "DUT"), Some(&CellValue::Null));
    }

    #[test]
    fn test_text_column_null_becomes_empty_string() {
        let t = coerce(
            table(
                &["PROCEDIMENTO"],
                vec![
                    vec![CellValue::Null],
                    vec![CellValue::text("Exame")],
                    vec![CellValue::Integer(7)],
                ],
            ),
            &TargetSchema::rol_procedimentos(),
        );

        assert_eq!(t.cell(0, "PROCEDIMENTO"), Some(&CellValue::text("")));
        assert_eq!(t.cell(1, "PROCEDIMENTO"), Some(&CellValue::text("Exame")));
        assert_eq!(t.cell(2, "PROCEDIMENTO"), Some(&CellValue::text("7")));
    }

    #[test]
    fn test_undeclared_columns_are_untouched() {
        let t = coerce(
            table(&["EXTRA", "DUT"], vec![vec![CellValue::Null, CellValue::text("7")]]),
            &TargetSchema::rol_procedimentos(),
        );

        assert_eq!(t.columns(), ["EXTRA", "DUT"]);
        assert_eq!(t.rows()[0], vec![CellValue::Null, CellValue::Integer(7)]);
    }

    #[test]
    fn test_schema_columns_missing_from_data_are_ignored() {
        let t = coerce(
            table(&["OD"], vec![vec![CellValue::text("Seg. Odontológica")]]),
            &TargetSchema::rol_procedimentos(),
        );

        assert_eq!(t.columns(), ["OD"]);
        assert_eq!(t.row_count(), 1);
    }
}
