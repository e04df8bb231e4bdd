//! Errors raised by the workbook model

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while addressing or editing a workbook
#[derive(Debug, Error)]
pub enum Error {
    /// Text that is not an A1-style cell reference
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Row index past the last row a sheet can hold
    #[error("Row {0} is beyond the last sheet row ({1})")]
    RowOutOfBounds(u32, u32),

    /// Column index past the last column a sheet can hold
    #[error("Column {0} is beyond the last sheet column ({1})")]
    ColumnOutOfBounds(u32, u16),

    /// Sheet name that Excel would not accept
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// Sheet name already used in the workbook (ignoring case)
    #[error("Sheet name already exists: {0}")]
    DuplicateSheetName(String),
}
