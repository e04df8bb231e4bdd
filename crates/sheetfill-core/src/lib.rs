//! # sheetfill-core
//!
//! Sparse workbook model for the sheetfill library.
//!
//! - [`Workbook`] owns named [`Worksheet`]s
//! - a [`Worksheet`] holds sparse [`Row`]s, each holding sparse [`CellData`]
//! - [`CellValue`] is the typed cell content, [`CellAddress`] an A1 position
//!
//! Rows and cells only exist once something creates them. The
//! `get_or_create_*` accessors return the existing entry or a blank one.
//!
//! ## Example
//!
//! ```rust
//! use sheetfill_core::{CellValue, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! sheet.set_cell_value("A1", "Hello").unwrap();
//! sheet.get_or_create_row(4).unwrap().set_value(2, 3.5).unwrap();
//!
//! assert_eq!(sheet.get_value_at(4, 2), CellValue::Number(3.5));
//! assert!(sheet.row(3).is_none());
//! ```

pub mod cell;
pub mod error;
pub mod row;
pub mod workbook;
pub mod worksheet;

pub use cell::{CellAddress, CellData, CellError, CellValue, SharedString};
pub use error::{Error, Result};
pub use row::Row;
pub use workbook::Workbook;
pub use worksheet::Worksheet;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
