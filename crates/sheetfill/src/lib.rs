//! # sheetfill
//!
//! Find cells in a worksheet by value or position, and fill rectangular
//! blocks of a worksheet with values.
//!
//! ## Features
//!
//! - Locate the first cell holding a value (case-insensitive text, exact
//!   numbers, booleans, formula text), optionally restricted by a filter
//! - Locate cells by row/column or A1 address
//! - Place a list of values into a block, column by column, wrapping at the
//!   block edges
//! - Open a template workbook, fill it, and save the result as XLSX
//!
//! ## Example
//!
//! ```rust
//! use sheetfill::prelude::*;
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//! sheet.set_cell_value("B2", "Totals").unwrap();
//!
//! // Find the anchor cell
//! let anchor = locate(sheet, &CellCoordinates::value("totals")).unwrap();
//! assert_eq!(anchor.address().to_string(), "B2");
//!
//! // Fill a 2x2 block starting at the anchor
//! let start = StartPoint::from(anchor);
//! let data = TableData::new([1, 2, 3, 4], 2, 2);
//! place(sheet, start, &data).unwrap();
//!
//! assert_eq!(sheet.get_value("C3").unwrap(), CellValue::Number(4.0));
//!
//! // Save to file
//! // workbook.save("output.xlsx").unwrap();
//! ```

pub mod error;
pub mod filter;
pub mod inspect;
pub mod io;
pub mod locate;
pub mod operation;
pub mod place;
pub mod prelude;
pub mod settings;

pub use error::{Error, Result};
pub use filter::CellFilter;
pub use inspect::{read_cell_value, CellKind, CellReading, ReadValue};
pub use io::{create_workbook_file, write_cell_to_file, TemplateReader, WorkbookExt, WorkbookWriter};
pub use locate::{
    cell_at_intersection, left_cell, locate, right_cell, CellCoordinates, CellRef, SearchBuilder,
    SearchValue,
};
pub use operation::{OperationService, StartAt, WorkbookOperation, WorkbookOperationBuilder};
pub use place::{
    place, place_rows, place_with_order, FillOrder, PlacementReport, PlacementValue, StartPoint,
    TableData,
};
pub use settings::{Settings, DEFAULT_TEMPLATE_PATH, TEMPLATE_PATH_ENV};

// Re-export core types
pub use sheetfill_core::{
    CellAddress, CellData, CellError, CellValue, Row, Workbook, Worksheet, MAX_COLS, MAX_ROWS,
    MAX_SHEET_NAME_LEN,
};

// Re-export I/O types
pub use sheetfill_xlsx::{XlsxError, XlsxReader, XlsxWriter};
