//! Cell locator
//!
//! Finds the first cell of a worksheet described by a [`CellCoordinates`]
//! query, either by explicit position or by value. Lookups never
//! create rows or cells; a missing cell is `None`.
//!
//! ```rust
//! use sheetfill::{locate, CellCoordinates, Worksheet};
//!
//! let mut sheet = Worksheet::new("One");
//! sheet.set_cell_value("E7", "TARGET").unwrap();
//!
//! let found = locate(&sheet, &CellCoordinates::value("target")).unwrap();
//! assert_eq!((found.row(), found.col()), (6, 4));
//!
//! let by_address = CellCoordinates::address("E7").unwrap();
//! assert_eq!(locate(&sheet, &by_address), Some(found));
//! ```

use sheetfill_core::{CellAddress, CellData, CellValue, Worksheet};

use crate::error::Result;
use crate::filter::CellFilter;

/// A borrowed view of an existing cell and its position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRef<'a> {
    row: u32,
    col: u16,
    data: &'a CellData,
}

impl<'a> CellRef<'a> {
    /// Create a view of `data` at (`row`, `col`)
    pub fn new(row: u32, col: u16, data: &'a CellData) -> Self {
        Self { row, col, data }
    }

    /// Row index (0-based)
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Column index (0-based)
    pub fn col(&self) -> u16 {
        self.col
    }

    /// The stored cell
    pub fn data(&self) -> &'a CellData {
        self.data
    }

    /// The cell's value
    pub fn value(&self) -> &'a CellValue {
        &self.data.value
    }

    /// The cell's position as an address
    pub fn address(&self) -> CellAddress {
        CellAddress::new(self.row, self.col)
    }
}

/// A value to search a worksheet for
#[derive(Debug, Clone, PartialEq)]
pub enum SearchValue {
    /// Matches text cells, ignoring case, and formula cells by formula text
    Text(String),
    /// Matches numeric cells holding exactly this number
    Number(f64),
    /// Matches numeric cells holding exactly this integer
    Integer(i64),
    /// Matches boolean cells holding this value
    Boolean(bool),
}

impl SearchValue {
    /// Check whether a cell value matches this search value.
    ///
    /// Blank and error cells never match. Formula text is compared without
    /// its leading `=`, so `"SUM(A1:A3)"` and `"=sum(a1:a3)"` both match a
    /// cell holding `=SUM(A1:A3)`.
    pub fn matches(&self, value: &CellValue) -> bool {
        match (value, self) {
            (CellValue::String(s), SearchValue::Text(t)) => eq_ignore_case(s.as_str(), t),
            (CellValue::Number(n), SearchValue::Number(x)) => n == x,
            (CellValue::Number(n), SearchValue::Integer(i)) => *n == *i as f64,
            (CellValue::Boolean(b), SearchValue::Boolean(x)) => b == x,
            (CellValue::Formula { .. }, SearchValue::Text(t)) => value
                .formula_source()
                .is_some_and(|f| eq_ignore_case(f, t.strip_prefix('=').unwrap_or(t))),
            _ => false,
        }
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

impl From<&str> for SearchValue {
    fn from(s: &str) -> Self {
        SearchValue::Text(s.to_string())
    }
}

impl From<String> for SearchValue {
    fn from(s: String) -> Self {
        SearchValue::Text(s)
    }
}

impl From<f64> for SearchValue {
    fn from(n: f64) -> Self {
        SearchValue::Number(n)
    }
}

impl From<i64> for SearchValue {
    fn from(n: i64) -> Self {
        SearchValue::Integer(n)
    }
}

impl From<i32> for SearchValue {
    fn from(n: i32) -> Self {
        SearchValue::Integer(n as i64)
    }
}

impl From<bool> for SearchValue {
    fn from(b: bool) -> Self {
        SearchValue::Boolean(b)
    }
}

/// What to look for in a worksheet.
///
/// With both `row` and `col` set the lookup is by position and `target` is
/// ignored. Otherwise, with `target` set, the first cell matching it in
/// row-major order that passes `filter` is found. With neither, nothing is.
#[derive(Debug, Clone, Default)]
pub struct CellCoordinates {
    /// Row index for a lookup by position
    pub row: Option<u32>,
    /// Column index for a lookup by position
    pub col: Option<u16>,
    /// Value for a lookup by value
    pub target: Option<SearchValue>,
    /// Applied to value matches
    pub filter: CellFilter,
}

impl CellCoordinates {
    /// Look up the cell at a position
    pub fn at(row: u32, col: u16) -> Self {
        Self {
            row: Some(row),
            col: Some(col),
            ..Self::default()
        }
    }

    /// Look up the cell at an A1-style address such as `"B3"`
    pub fn address(address: &str) -> Result<Self> {
        let addr = CellAddress::parse(address)?;
        Ok(Self::at(addr.row, addr.col))
    }

    /// Look up the first cell holding a value
    pub fn value<V: Into<SearchValue>>(target: V) -> Self {
        Self {
            target: Some(target.into()),
            ..Self::default()
        }
    }

    /// Start a [`SearchBuilder`]
    pub fn builder() -> SearchBuilder {
        SearchBuilder::default()
    }

    /// Only accept value matches in column 0
    pub fn first_column(self) -> Self {
        self.filter(CellFilter::FirstColumn)
    }

    /// Only accept value matches in row 0
    pub fn first_row(self) -> Self {
        self.filter(CellFilter::FirstRow)
    }

    /// Replace the filter
    pub fn filter(mut self, filter: CellFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Replace the filter with a closure
    pub fn filter_fn<F>(self, predicate: F) -> Self
    where
        F: Fn(&CellRef<'_>) -> bool + Send + Sync + 'static,
    {
        self.filter(CellFilter::custom(predicate))
    }

    /// Both row and column are set
    pub fn is_by_position(&self) -> bool {
        self.row.is_some() && self.col.is_some()
    }

    /// A target value is set
    pub fn is_by_value(&self) -> bool {
        self.target.is_some()
    }
}

/// Step-by-step construction of [`CellCoordinates`]
#[derive(Debug, Clone, Default)]
pub struct SearchBuilder {
    coordinates: CellCoordinates,
}

impl SearchBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the row index
    pub fn row_number(mut self, row: u32) -> Self {
        self.coordinates.row = Some(row);
        self
    }

    /// Set the column index
    pub fn column_number(mut self, col: u16) -> Self {
        self.coordinates.col = Some(col);
        self
    }

    /// Set the value to search for
    pub fn cell_value<V: Into<SearchValue>>(mut self, target: V) -> Self {
        self.coordinates.target = Some(target.into());
        self
    }

    /// Set the filter
    pub fn filter(mut self, filter: CellFilter) -> Self {
        self.coordinates.filter = filter;
        self
    }

    /// Only accept value matches in column 0
    pub fn first_column(self) -> Self {
        self.filter(CellFilter::FirstColumn)
    }

    /// Only accept value matches in row 0
    pub fn first_row(self) -> Self {
        self.filter(CellFilter::FirstRow)
    }

    /// Set row and column from an A1-style address
    pub fn address(self, address: &str) -> Result<Self> {
        let addr = CellAddress::parse(address)?;
        Ok(self.row_number(addr.row).column_number(addr.col))
    }

    /// Finish building
    pub fn build(self) -> CellCoordinates {
        self.coordinates
    }
}

/// Find the cell described by `query`.
///
/// A lookup by position returns the existing cell there, or `None` when the
/// row or cell does not exist (including positions past the last row). No
/// value comparison takes place.
///
/// A lookup by value scans rows in ascending order and cells within each row
/// in ascending column order, returning the first match accepted by the
/// filter.
pub fn locate<'a>(sheet: &'a Worksheet, query: &CellCoordinates) -> Option<CellRef<'a>> {
    if let (Some(row), Some(col)) = (query.row, query.col) {
        return cell_at(sheet, row, col);
    }

    let target = query.target.as_ref()?;
    let found = sheet
        .rows()
        .flat_map(|row| {
            row.cells()
                .map(move |(col, data)| CellRef::new(row.index(), col, data))
        })
        .filter(|cell| target.matches(cell.value()))
        .find(|cell| query.filter.accepts(cell));

    if found.is_none() {
        log::debug!("no cell in '{}' matches {:?}", sheet.name(), target);
    }
    found
}

fn cell_at(sheet: &Worksheet, row: u32, col: u16) -> Option<CellRef<'_>> {
    sheet
        .row(row)
        .and_then(|r| r.cell(col))
        .map(|data| CellRef::new(row, col, data))
}

/// The cell in the row of `row_source` and the column of `column_source`
pub fn cell_at_intersection<'a>(
    sheet: &'a Worksheet,
    column_source: &CellRef<'_>,
    row_source: &CellRef<'_>,
) -> Option<CellRef<'a>> {
    cell_at(sheet, row_source.row(), column_source.col())
}

/// The cell one column to the right of `cell`
pub fn right_cell<'a>(sheet: &'a Worksheet, cell: &CellRef<'_>) -> Option<CellRef<'a>> {
    let col = cell.col().checked_add(1)?;
    cell_at(sheet, cell.row(), col)
}

/// The cell one column to the left of `cell`; `None` in column 0
pub fn left_cell<'a>(sheet: &'a Worksheet, cell: &CellRef<'_>) -> Option<CellRef<'a>> {
    let col = cell.col().checked_sub(1)?;
    cell_at(sheet, cell.row(), col)
}
