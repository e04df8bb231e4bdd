//! Errors from reading or writing XLSX packages

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors from reading or writing an XLSX package
#[derive(Debug, Error)]
pub enum XlsxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a readable ZIP archive
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A package part is not well-formed XML
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The archive is not a spreadsheet package
    #[error("Not an XLSX workbook: {0}")]
    InvalidFormat(String),

    /// A part the workbook needs is absent from the archive
    #[error("Package part not found: {0}")]
    MissingPart(String),

    /// A part holds a value that cannot be interpreted
    #[error("Malformed worksheet data: {0}")]
    Parse(String),

    /// The package describes a workbook the model rejects
    #[error("Invalid workbook content: {0}")]
    Core(#[from] sheetfill_core::Error),
}
