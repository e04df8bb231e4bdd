//! Filled workbooks survive an XLSX round trip (fill -> save -> read -> locate)

use sheetfill::prelude::*;
use sheetfill::{XlsxReader, XlsxWriter};
use std::io::Cursor;

fn round_trip(wb: &Workbook) -> Workbook {
    let mut buf = Vec::new();
    XlsxWriter::write(wb, Cursor::new(&mut buf)).unwrap();
    XlsxReader::read(Cursor::new(&buf)).unwrap()
}

/// A placed block keeps its values and types
#[test]
fn test_roundtrip_placed_block() {
    let mut wb = Workbook::new();
    let sheet = wb.worksheet_mut(0).unwrap();

    let data = TableData {
        values: vec![
            PlacementValue::from("north"),
            PlacementValue::from(12.5),
            PlacementValue::from(true),
            PlacementValue::from("south"),
            PlacementValue::from(-3),
            PlacementValue::from(false),
        ],
        max_rows: 3,
        max_cols: 2,
    };
    place(sheet, StartPoint::new(4, 1), &data).unwrap();

    let wb2 = round_trip(&wb);
    let sheet2 = wb2.worksheet(0).unwrap();

    assert_eq!(sheet2.get_value("B5").unwrap().as_string(), Some("north"));
    assert_eq!(sheet2.get_value("B6").unwrap().as_number(), Some(12.5));
    assert_eq!(sheet2.get_value("B7").unwrap().as_bool(), Some(true));
    assert_eq!(sheet2.get_value("C5").unwrap().as_string(), Some("south"));
    assert_eq!(sheet2.get_value("C6").unwrap().as_number(), Some(-3.0));
    assert_eq!(sheet2.get_value("C7").unwrap().as_bool(), Some(false));
    assert_eq!(sheet2.cell_count(), 6);
}

/// Value search gives the same answer before and after saving
#[test]
fn test_locate_after_roundtrip() {
    let mut wb = Workbook::new();
    let sheet = wb.worksheet_mut(0).unwrap();
    sheet.set_cell_value("A1", "Header").unwrap();
    sheet.set_cell_value("D3", "Quota").unwrap();
    sheet.set_cell_value("A4", 202311).unwrap();
    sheet.set_cell_formula("B8", "=SUM(A1:A4)").unwrap();

    let wb2 = round_trip(&wb);
    let sheet2 = wb2.worksheet(0).unwrap();

    let quota = locate(sheet2, &CellCoordinates::value("QUOTA")).unwrap();
    assert_eq!(quota.address().to_string(), "D3");

    let period = locate(sheet2, &CellCoordinates::value(202311).first_column()).unwrap();
    assert_eq!(period.address().to_string(), "A4");

    let total = locate(sheet2, &CellCoordinates::value("sum(a1:a4)")).unwrap();
    assert_eq!(total.address().to_string(), "B8");
}

/// Blank cells created by the placer's accessors are kept
#[test]
fn test_roundtrip_blank_layout() {
    let mut wb = Workbook::new();
    let sheet = wb.worksheet_mut(0).unwrap();
    sheet.get_or_create_cell(2, 2).unwrap();
    sheet.get_or_create_row(6).unwrap();

    let wb2 = round_trip(&wb);
    let sheet2 = wb2.worksheet(0).unwrap();

    assert!(sheet2.cell_at(2, 2).is_some_and(|c| c.is_empty()));
    assert!(sheet2.row(6).is_some());
    assert!(locate(sheet2, &CellCoordinates::at(2, 2)).is_some());
    assert!(locate(sheet2, &CellCoordinates::at(6, 0)).is_none());
}

/// Sheets are found by name after a round trip through a file
#[test]
fn test_roundtrip_file_with_named_sheets() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("named.xlsx");

    let mut wb = Workbook::empty();
    wb.add_worksheet_with_name("Q&A <draft>").unwrap();
    wb.add_worksheet_with_name("Summary").unwrap();
    wb.worksheet_by_name_mut("Summary")
        .unwrap()
        .set_cell_value("A1", "total")
        .unwrap();
    wb.save(&path).unwrap();

    let wb2 = Workbook::open(&path).unwrap();
    assert_eq!(wb2.sheet_names(), vec!["Q&A <draft>", "Summary"]);
    let summary = wb2.worksheet_by_name("summary").unwrap();
    assert!(locate(summary, &CellCoordinates::value("Total")).is_some());
}

/// Text that resembles Excel's `_xHHHH_` escapes, or holds control
/// characters, reads back unchanged
#[test]
fn test_roundtrip_text_with_escape_lookalikes() {
    let mut wb = Workbook::new();
    let sheet = wb.worksheet_mut(0).unwrap();

    let data = TableData {
        values: vec![
            PlacementValue::from("SKU_x0041_"),
            PlacementValue::from("bell\u{7}\u{1b}[0m"),
            PlacementValue::from("a\tb\nc"),
        ],
        max_rows: 3,
        max_cols: 1,
    };
    place(sheet, StartPoint::new(0, 0), &data).unwrap();
    sheet
        .set_cell_value(
            "B1",
            CellValue::formula_with_cached("\"_x005F_\"", Some(CellValue::string("_x005F_"))),
        )
        .unwrap();

    let wb2 = round_trip(&wb);
    let sheet2 = wb2.worksheet(0).unwrap();

    assert_eq!(sheet2.get_value("A1").unwrap().as_string(), Some("SKU_x0041_"));
    assert_eq!(sheet2.get_value("A2").unwrap().as_string(), Some("bell\u{7}\u{1b}[0m"));
    assert_eq!(sheet2.get_value("A3").unwrap().as_string(), Some("a\tb\nc"));
    assert_eq!(
        sheet2.get_value("B1").unwrap(),
        CellValue::formula_with_cached("\"_x005F_\"", Some(CellValue::string("_x005F_")))
    );
    assert!(locate(sheet2, &CellCoordinates::value("sku_x0041_")).is_some());
}
