//! Template-driven workbook operations
//!
//! A [`WorkbookOperation`] describes one "open template, find the anchor,
//! place a table, save" job. [`OperationService`] runs it.
//!
//! ```no_run
//! use sheetfill::{OperationService, Settings, TableData, WorkbookOperation};
//!
//! let op = WorkbookOperation::builder("template/Report.xlsx")
//!     .start_at_value("Summary", "TOTALS")
//!     .data(TableData::new([1.0, 2.0, 3.0], 3, 1))
//!     .save_as("out/report.xlsx")
//!     .build()?;
//!
//! OperationService::new(Settings::default()).execute(&op)?;
//! # Ok::<(), sheetfill::Error>(())
//! ```

use std::path::{Path, PathBuf};

use sheetfill_core::Workbook;

use crate::error::{Error, Result};
use crate::filter::CellFilter;
use crate::io::{TemplateReader, WorkbookWriter};
use crate::locate::{locate, CellCoordinates, SearchValue};
use crate::place::{place, PlacementReport, StartPoint, TableData};
use crate::settings::Settings;

/// Where the table of an operation starts
#[derive(Debug, Clone)]
pub enum StartAt {
    /// A fixed position
    Coordinates { row: u32, col: u16 },
    /// The first cell holding `value` that passes `filter`, or A1 if none does
    Search { value: SearchValue, filter: CellFilter },
}

impl StartAt {
    fn coordinates(&self) -> CellCoordinates {
        match self {
            StartAt::Coordinates { row, col } => CellCoordinates::at(*row, *col),
            StartAt::Search { value, filter } => {
                CellCoordinates::value(value.clone()).filter(filter.clone())
            }
        }
    }

    fn fallback(&self) -> StartPoint {
        match self {
            StartAt::Coordinates { row, col } => StartPoint::new(*row, *col),
            StartAt::Search { .. } => StartPoint::default(),
        }
    }
}

/// One template-filling job
#[derive(Debug, Clone)]
pub struct WorkbookOperation {
    /// Template to open; the service's configured template when `None`
    pub template: Option<PathBuf>,
    /// Where the filled workbook is written
    pub output: PathBuf,
    /// Sheet the table goes into
    pub sheet: String,
    /// Anchor of the table
    pub start: StartAt,
    /// Values and block size
    pub data: TableData,
}

impl WorkbookOperation {
    /// Start building an operation on the given template
    pub fn builder<P: Into<PathBuf>>(template: P) -> WorkbookOperationBuilder {
        WorkbookOperationBuilder {
            template: Some(template.into()),
            ..WorkbookOperationBuilder::default()
        }
    }

    /// Start building an operation on the service's configured template
    pub fn with_default_template() -> WorkbookOperationBuilder {
        WorkbookOperationBuilder::default()
    }
}

/// Builder for [`WorkbookOperation`]
#[derive(Debug, Clone, Default)]
pub struct WorkbookOperationBuilder {
    template: Option<PathBuf>,
    output: Option<PathBuf>,
    target: Option<(String, StartAt)>,
    data: Option<TableData>,
}

impl WorkbookOperationBuilder {
    /// Start the table at a fixed position of `sheet`
    pub fn start_at(mut self, sheet: &str, row: u32, col: u16) -> Self {
        self.target = Some((sheet.to_string(), StartAt::Coordinates { row, col }));
        self
    }

    /// Start the table at the first cell of `sheet` holding `text`
    pub fn start_at_value(self, sheet: &str, text: &str) -> Self {
        self.start_at_value_filtered(sheet, text, CellFilter::NoFilter)
    }

    /// Start the table at the first cell of `sheet` holding `text` that
    /// passes `filter`
    pub fn start_at_value_filtered(mut self, sheet: &str, text: &str, filter: CellFilter) -> Self {
        self.target = Some((
            sheet.to_string(),
            StartAt::Search {
                value: SearchValue::from(text),
                filter,
            },
        ));
        self
    }

    /// Set the values to place
    pub fn data(mut self, data: TableData) -> Self {
        self.data = Some(data);
        self
    }

    /// Set the output path
    pub fn save_as<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Finish building.
    ///
    /// Fails with [`Error::InvalidOperation`] when the sheet and start,
    /// the data, or the output path is missing.
    pub fn build(self) -> Result<WorkbookOperation> {
        let (sheet, start) = self
            .target
            .ok_or_else(|| Error::InvalidOperation("no sheet or start position given".into()))?;
        let data = self
            .data
            .ok_or_else(|| Error::InvalidOperation("no table data given".into()))?;
        let output = self
            .output
            .ok_or_else(|| Error::InvalidOperation("no output path given".into()))?;

        Ok(WorkbookOperation {
            template: self.template,
            output,
            sheet,
            start,
            data,
        })
    }
}

/// Runs workbook operations
#[derive(Debug, Clone, Default)]
pub struct OperationService {
    reader: TemplateReader,
}

impl OperationService {
    /// Service whose default template comes from `settings`
    pub fn new(settings: Settings) -> Self {
        Self {
            reader: TemplateReader::from_settings(&settings),
        }
    }

    /// Template opened for operations that name none
    pub fn default_template(&self) -> &Path {
        self.reader.template_path()
    }

    /// Place the operation's table into an already opened workbook.
    ///
    /// When the start cell cannot be found, a fixed start falls back to its
    /// own row and column and a value search falls back to A1.
    pub fn apply(&self, workbook: &mut Workbook, op: &WorkbookOperation) -> Result<PlacementReport> {
        let sheet = workbook
            .worksheet_by_name_mut(&op.sheet)
            .ok_or_else(|| Error::SheetNotFound(op.sheet.clone()))?;

        let start = match locate(sheet, &op.start.coordinates()) {
            Some(cell) => StartPoint::from(cell),
            None => {
                let fallback = op.start.fallback();
                log::debug!(
                    "start cell not found in '{}', using row {} column {}",
                    op.sheet,
                    fallback.row,
                    fallback.col
                );
                fallback
            }
        };

        place(sheet, start, &op.data)
    }

    /// Open the template, place the table, and write the result.
    ///
    /// Nothing is written when any step before saving fails.
    pub fn execute(&self, op: &WorkbookOperation) -> Result<PlacementReport> {
        let mut workbook = match &op.template {
            Some(path) => self.reader.read_template_from(path)?,
            None => self.reader.read_template()?,
        };
        let report = self.apply(&mut workbook, op)?;
        WorkbookWriter::write_file(&workbook, &op.output)?;
        log::debug!(
            "wrote {} value(s) to '{}' in {}",
            report.written,
            op.sheet,
            op.output.display()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetfill_core::CellValue;

    fn template() -> Workbook {
        let mut workbook = Workbook::empty();
        let sheet = workbook.get_or_create_worksheet("One").unwrap();
        sheet.set_cell_value("C2", "anchor").unwrap();
        sheet.set_cell_value("A5", "anchor").unwrap();
        workbook
    }

    fn builder() -> WorkbookOperationBuilder {
        WorkbookOperation::builder("in.xlsx")
            .data(TableData::new(["x", "y"], 2, 1))
            .save_as("out.xlsx")
    }

    #[test]
    fn test_build_requires_all_parts() {
        let err = WorkbookOperation::builder("in.xlsx").build().unwrap_err();
        assert!(matches!(err, Error::InvalidOperation(_)));

        let err = WorkbookOperation::builder("in.xlsx")
            .start_at("One", 0, 0)
            .save_as("out.xlsx")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOperation(_)));

        let err = WorkbookOperation::builder("in.xlsx")
            .start_at("One", 0, 0)
            .data(TableData::default())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOperation(_)));
    }

    #[test]
    fn test_apply_at_found_value() {
        let mut workbook = template();
        let op = builder().start_at_value("One", "ANCHOR").build().unwrap();

        let report = OperationService::default().apply(&mut workbook, &op).unwrap();

        assert_eq!(report.written, 2);
        let sheet = workbook.worksheet_by_name("One").unwrap();
        assert_eq!(sheet.get_value("C2").unwrap(), CellValue::string("x"));
        assert_eq!(sheet.get_value("C3").unwrap(), CellValue::string("y"));
    }

    #[test]
    fn test_apply_with_filter() {
        let mut workbook = template();
        let op = builder()
            .start_at_value_filtered("One", "anchor", CellFilter::FirstColumn)
            .build()
            .unwrap();

        OperationService::default().apply(&mut workbook, &op).unwrap();

        let sheet = workbook.worksheet_by_name("One").unwrap();
        assert_eq!(sheet.get_value("A5").unwrap(), CellValue::string("x"));
        assert_eq!(sheet.get_value("C2").unwrap(), CellValue::string("anchor"));
    }

    #[test]
    fn test_missing_value_falls_back_to_origin() {
        let mut workbook = template();
        let op = builder().start_at_value("One", "nowhere").build().unwrap();

        OperationService::default().apply(&mut workbook, &op).unwrap();

        let sheet = workbook.worksheet_by_name("One").unwrap();
        assert_eq!(sheet.get_value("A1").unwrap(), CellValue::string("x"));
        assert_eq!(sheet.get_value("A2").unwrap(), CellValue::string("y"));
    }

    #[test]
    fn test_missing_cell_falls_back_to_coordinates() {
        let mut workbook = template();
        let op = builder().start_at("One", 9, 3).build().unwrap();

        OperationService::default().apply(&mut workbook, &op).unwrap();

        let sheet = workbook.worksheet_by_name("One").unwrap();
        assert_eq!(sheet.get_value_at(9, 3), CellValue::string("x"));
        assert_eq!(sheet.get_value_at(10, 3), CellValue::string("y"));
    }

    #[test]
    fn test_unknown_sheet() {
        let mut workbook = template();
        let op = builder().start_at("Two", 0, 0).build().unwrap();

        let err = OperationService::default().apply(&mut workbook, &op).unwrap_err();

        assert!(matches!(err, Error::SheetNotFound(name) if name == "Two"));
    }

    #[test]
    fn test_default_template_from_settings() {
        let service = OperationService::new(Settings::new("forms/blank.xlsx"));
        assert_eq!(service.default_template(), Path::new("forms/blank.xlsx"));

        let op = WorkbookOperation::with_default_template()
            .start_at("One", 0, 0)
            .data(TableData::default())
            .save_as("out.xlsx")
            .build()
            .unwrap();
        assert!(op.template.is_none());
    }
}
