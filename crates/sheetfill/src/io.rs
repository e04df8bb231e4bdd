//! Workbook file I/O
//!
//! [`WorkbookExt`] adds `open`/`save` to [`Workbook`]. [`TemplateReader`] and
//! [`WorkbookWriter`] are the services used by workbook operations.

use std::path::{Path, PathBuf};

use sheetfill_core::{CellValue, Workbook};
use sheetfill_xlsx::{XlsxReader, XlsxWriter};

use crate::error::{Error, Result};
use crate::settings::Settings;

/// Extension trait for Workbook to add file I/O
pub trait WorkbookExt: Sized {
    /// Open a workbook from an `.xlsx` or `.xlsm` file
    fn open<P: AsRef<Path>>(path: P) -> Result<Self>;

    /// Save the workbook to an `.xlsx` file
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    /// Read a workbook from XLSX bytes
    fn from_xlsx_bytes(bytes: &[u8]) -> Result<Self>;

    /// Serialize the workbook to XLSX bytes
    fn to_xlsx_bytes(&self) -> Result<Vec<u8>>;
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

impl WorkbookExt for Workbook {
    fn open<P: AsRef<Path>>(path: P) -> Result<Workbook> {
        let path = path.as_ref();
        match extension(path).as_deref() {
            Some("xlsx") | Some("xlsm") => Ok(XlsxReader::read_file(path)?),
            _ => Err(Error::InvalidOperation(format!(
                "Unsupported file format: {}",
                path.display()
            ))),
        }
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        match extension(path).as_deref() {
            Some("xlsx") => Ok(XlsxWriter::write_file(self, path)?),
            _ => Err(Error::InvalidOperation(format!(
                "Unsupported file format: {}",
                path.display()
            ))),
        }
    }

    fn from_xlsx_bytes(bytes: &[u8]) -> Result<Workbook> {
        Ok(XlsxReader::read_bytes(bytes)?)
    }

    fn to_xlsx_bytes(&self) -> Result<Vec<u8>> {
        Ok(XlsxWriter::write_bytes(self)?)
    }
}

/// Opens template workbooks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateReader {
    template_path: PathBuf,
}

impl TemplateReader {
    /// Reader for the template at `template_path`
    pub fn new<P: Into<PathBuf>>(template_path: P) -> Self {
        Self {
            template_path: template_path.into(),
        }
    }

    /// Reader for the template configured in `settings`
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.template_path())
    }

    /// Path of the configured template
    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    /// Open the configured template
    pub fn read_template(&self) -> Result<Workbook> {
        self.read_template_from(&self.template_path)
    }

    /// Open the workbook at `path`
    pub fn read_template_from<P: AsRef<Path>>(&self, path: P) -> Result<Workbook> {
        let path = path.as_ref();
        log::debug!("reading template {}", path.display());
        Workbook::open(path)
    }

    /// Read a workbook from XLSX bytes
    pub fn read_bytes(&self, bytes: &[u8]) -> Result<Workbook> {
        Workbook::from_xlsx_bytes(bytes)
    }
}

impl Default for TemplateReader {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Persists workbooks
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkbookWriter;

impl WorkbookWriter {
    /// Write `workbook` to `path`, replacing any existing file
    pub fn write_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> Result<()> {
        let path = path.as_ref();
        log::debug!(
            "writing {} sheet(s) to {}",
            workbook.sheet_count(),
            path.display()
        );
        workbook.save(path)
    }

    /// Serialize `workbook` to XLSX bytes
    pub fn write_bytes(workbook: &Workbook) -> Result<Vec<u8>> {
        workbook.to_xlsx_bytes()
    }
}

/// Create a workbook file with a single empty sheet
pub fn create_workbook_file<P: AsRef<Path>>(path: P) -> Result<()> {
    WorkbookWriter::write_file(&Workbook::new(), path)
}

/// Write `text` into one cell of the workbook at `path` and save it in place.
///
/// The sheet, row, and cell are created when missing.
pub fn write_cell_to_file<P: AsRef<Path>>(
    path: P,
    sheet: &str,
    row: u32,
    col: u16,
    text: &str,
) -> Result<()> {
    let path = path.as_ref();
    let mut workbook = Workbook::open(path)?;
    workbook
        .get_or_create_worksheet(sheet)?
        .get_or_create_row(row)?
        .get_or_create_cell(col)?
        .set_value(CellValue::string(text));
    WorkbookWriter::write_file(&workbook, path)
}
