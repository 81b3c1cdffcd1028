use rol_etl::core::coerce::coerce;
use rol_etl::core::filter::filter_empty;
use rol_etl::core::legend::resolve_legends;
use rol_etl::core::normalize::normalize;
use rol_etl::core::orchestrator::normalize_pages;
use rol_etl::core::unify::unify;
use rol_etl::{CellValue, EtlError, LegendMap, RawTable, TargetSchema, UnifiedTable};

fn text(s: &str) -> CellValue {
    CellValue::text(s)
}

#[test]
fn test_normalize_examples() {
    assert_eq!(normalize(&text("Texto\ncom\nquebras")), text("Texto com quebras"));
    assert_eq!(
        normalize(&text("Texto   com   muitos    espaços")),
        text("Texto com muitos espaços")
    );
    assert_eq!(normalize(&text("Texto\tcom\ttabs")), text("Texto com tabs"));
    assert_eq!(normalize(&CellValue::Null), CellValue::Null);
    assert_eq!(normalize(&text("")), text(""));
    assert_eq!(normalize(&text("   ")), text(""));
}

#[test]
fn test_normalize_is_idempotent_over_messy_cells() {
    let cells = [
        "  Consulta \n\n médica ",
        "\tRN\r\n465/2021\t",
        "a\u{2028}b",
        "já  normalizado",
        "",
    ];
    for cell in cells {
        let once = normalize(&text(cell));
        assert_eq!(normalize(&once), once);
        let rendered = once.as_str().unwrap();
        assert!(!rendered.contains('\n') && !rendered.contains('\r'));
        assert!(!rendered.contains("  "));
    }
}

#[test]
fn test_unify_disjoint_headers() {
    let a = RawTable::from_rows([vec![Some("A")], vec![Some("1")]]);
    let b = RawTable::from_rows([vec![Some("B")], vec![Some("2")]]);

    let table = unify(&[a, b]);

    assert_eq!(table.columns(), ["A", "B"]);
    assert_eq!(table.cell(0, "B"), Some(&CellValue::Null));
    assert_eq!(table.cell(1, "A"), Some(&CellValue::Null));
    assert_eq!(table.cell(0, "A"), Some(&text("1")));
    assert_eq!(table.cell(1, "B"), Some(&text("2")));
}

#[test]
fn test_filter_legend_coerce_chain() {
    let mut table = UnifiedTable::new(vec![
        "PROCEDIMENTO".to_string(),
        "OD".to_string(),
        "AMB".to_string(),
        "DUT".to_string(),
    ]);
    table.push_row(vec![text("Consulta"), text("OD"), text("AMB"), text("12")]);
    table.push_row(vec![CellValue::Null, CellValue::Null, CellValue::Null, CellValue::Null]);
    table.push_row(vec![text(""), text("X"), CellValue::Null, text("abc")]);

    let table = filter_empty(table);
    assert_eq!(table.row_count(), 2);

    let table = resolve_legends(table, &LegendMap::rol_procedimentos());
    assert_eq!(table.cell(0, "OD"), Some(&text("Seg. Odontológica")));
    assert_eq!(table.cell(0, "AMB"), Some(&text("Seg. Ambulatorial")));
    assert_eq!(table.cell(1, "OD"), Some(&text("X")));
    assert_eq!(table.cell(1, "PROCEDIMENTO"), Some(&CellValue::Null));

    let table = coerce(table, &TargetSchema::rol_procedimentos());
    assert_eq!(table.cell(0, "DUT"), Some(&CellValue::Integer(12)));
    assert_eq!(table.cell(1, "DUT"), Some(&CellValue::Null));
    assert_eq!(table.cell(1, "PROCEDIMENTO"), Some(&text("")));
    assert_eq!(table.cell(1, "AMB"), Some(&text("")));
}

#[test]
fn test_two_page_example() {
    let first = RawTable::from_rows([
        vec![Some("PROCEDIMENTO"), Some("OD")],
        vec![Some("Consulta"), Some("OD")],
    ]);
    let second = RawTable::from_rows([
        vec![Some("PROCEDIMENTO"), Some("OD")],
        vec![Some("Exame"), Some("OD")],
    ]);

    let (table, _) = normalize_pages(
        vec![vec![first], vec![second]],
        &TargetSchema::rol_procedimentos(),
        &LegendMap::rol_procedimentos(),
    )
    .unwrap();

    assert_eq!(table.row_count(), 2);
    assert_eq!(
        table.column_values("PROCEDIMENTO").unwrap(),
        vec![&text("Consulta"), &text("Exame")]
    );
    assert_eq!(
        table.column_values("OD").unwrap(),
        vec![&text("Seg. Odontológica"), &text("Seg. Odontológica")]
    );
}

#[test]
fn test_empty_page_list_is_rejected() {
    let result = normalize_pages(
        Vec::new(),
        &TargetSchema::rol_procedimentos(),
        &LegendMap::rol_procedimentos(),
    );

    assert!(matches!(result, Err(EtlError::EmptyInput { pages: 0 })));
}

#[test]
fn test_every_row_has_every_column_and_no_line_breaks() {
    let pages = vec![
        vec![RawTable::from_rows([
            vec![Some("PROCEDIMENTO"), Some("DUT")],
            vec![Some("Linha\num"), Some("1")],
        ])],
        vec![RawTable::from_rows([
            vec![Some("GRUPO"), Some("PROCEDIMENTO"), Some("EXTRA")],
            vec![Some("Grupo\nA"), Some("Linha dois"), None],
        ])],
    ];

    let (table, _) = normalize_pages(
        pages,
        &TargetSchema::rol_procedimentos(),
        &LegendMap::rol_procedimentos(),
    )
    .unwrap();

    assert_eq!(table.columns(), ["PROCEDIMENTO", "DUT", "GRUPO", "EXTRA"]);
    for row in table.rows() {
        assert_eq!(row.len(), 4);
        for cell in row {
            if let Some(s) = cell.as_str() {
                assert!(!s.contains('\n'));
            }
        }
    }
    // Undeclared column keeps its null; declared text columns get "".
    assert_eq!(table.cell(0, "EXTRA"), Some(&CellValue::Null));
    assert_eq!(table.cell(0, "GRUPO"), Some(&text("")));
    assert_eq!(table.cell(1, "DUT"), Some(&CellValue::Null));
}
