//! Example: fill a table below a label in a template workbook
//!
//! Usage: cargo run --example fill_template [output.xlsx]

use sheetfill::prelude::*;

fn main() -> Result<()> {
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/tmp/filled.xlsx".to_string());
    let template = std::env::temp_dir().join("sheetfill_template.xlsx");

    // Build a small template with a label to anchor the table on
    let mut workbook = Workbook::empty();
    let sheet = workbook.get_or_create_worksheet("Report")?;
    sheet.set_cell_value("A1", "Monthly report")?;
    sheet.set_cell_value("B3", "Figures")?;
    workbook.save(&template)?;

    let op = WorkbookOperation::builder(&template)
        .start_at_value("Report", "figures")
        .data(TableData::new([120.0, 95.5, 143.25, 88.0, 101.0, 99.75], 3, 2))
        .save_as(&output)
        .build()?;

    let report = OperationService::new(Settings::from_env()).execute(&op)?;
    println!(
        "Wrote {} value(s) to {} ({} dropped)",
        report.written, output, report.truncated
    );
    Ok(())
}
