//! # sheetfill-xlsx
//!
//! XLSX (Office Open XML) reader and writer for the sheetfill workbook model.
//!
//! Only sheet names and cell values are read and written: shared and inline
//! strings, numbers, booleans, errors, and formulas with their cached
//! results. Styling is not preserved.
//!
//! ```rust
//! use sheetfill_core::Workbook;
//! use sheetfill_xlsx::{XlsxReader, XlsxWriter};
//!
//! let mut workbook = Workbook::new();
//! workbook.worksheet_mut(0).unwrap().set_cell_value("B2", "hello").unwrap();
//!
//! let bytes = XlsxWriter::write_bytes(&workbook).unwrap();
//! let back = XlsxReader::read_bytes(&bytes).unwrap();
//! assert_eq!(back, workbook);
//! ```

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;
