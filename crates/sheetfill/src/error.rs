//! Error type for sheetfill operations

use sheetfill_xlsx::XlsxError;
use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by sheetfill.
///
/// Cells that cannot be found are not errors; lookups return `None`.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing a workbook failed
    #[error("Workbook I/O failed: {0}")]
    Io(#[from] XlsxError),

    /// The workbook has no sheet with this name
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// An operation was built without a required part
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Workbook model error (bad address, position outside sheet limits, ...)
    #[error(transparent)]
    Core(#[from] sheetfill_core::Error),
}
