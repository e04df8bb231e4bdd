//! Table placer
//!
//! Writes a flat list of values into a rectangular block of a worksheet.
//! The default fill is column-major: down the first column of the block,
//! then down the next, wrapping back to the first column when the block is
//! full. Values beyond the block's capacity are dropped.

use sheetfill_core::{CellAddress, CellValue, Worksheet, MAX_COLS, MAX_ROWS};

use crate::error::Result;
use crate::locate::CellRef;

/// Top-left cell of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StartPoint {
    /// Row index (0-based)
    pub row: u32,
    /// Column index (0-based)
    pub col: u16,
}

impl StartPoint {
    /// Create a start point
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }
}

impl From<CellAddress> for StartPoint {
    fn from(addr: CellAddress) -> Self {
        Self::new(addr.row, addr.col)
    }
}

impl From<CellRef<'_>> for StartPoint {
    fn from(cell: CellRef<'_>) -> Self {
        Self::new(cell.row(), cell.col())
    }
}

/// A value that can be placed into a cell.
///
/// Integers are stored as numbers.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementValue {
    /// Text cell
    Text(String),
    /// Numeric cell
    Number(f64),
    /// Boolean cell
    Boolean(bool),
}

impl From<&str> for PlacementValue {
    fn from(s: &str) -> Self {
        PlacementValue::Text(s.to_string())
    }
}

impl From<String> for PlacementValue {
    fn from(s: String) -> Self {
        PlacementValue::Text(s)
    }
}

impl From<f64> for PlacementValue {
    fn from(n: f64) -> Self {
        PlacementValue::Number(n)
    }
}

impl From<i32> for PlacementValue {
    fn from(n: i32) -> Self {
        PlacementValue::Number(n as f64)
    }
}

impl From<i64> for PlacementValue {
    fn from(n: i64) -> Self {
        PlacementValue::Number(n as f64)
    }
}

impl From<bool> for PlacementValue {
    fn from(b: bool) -> Self {
        PlacementValue::Boolean(b)
    }
}

impl From<&PlacementValue> for CellValue {
    fn from(value: &PlacementValue) -> Self {
        match value {
            PlacementValue::Text(s) => CellValue::string(s.as_str()),
            PlacementValue::Number(n) => CellValue::Number(*n),
            PlacementValue::Boolean(b) => CellValue::Boolean(*b),
        }
    }
}

/// Values to place and the size of the block they go into
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableData {
    /// Values in fill order
    pub values: Vec<PlacementValue>,
    /// Block height
    pub max_rows: u32,
    /// Block width
    pub max_cols: u16,
}

impl TableData {
    /// Create table data from values convertible to [`PlacementValue`]
    pub fn new<I, V>(values: I, max_rows: u32, max_cols: u16) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<PlacementValue>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            max_rows,
            max_cols,
        }
    }

    /// Number of cells in the block
    pub fn capacity(&self) -> u64 {
        self.max_rows as u64 * self.max_cols as u64
    }
}

/// Order in which a block is filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillOrder {
    /// Down each column, then across
    #[default]
    ColumnMajor,
    /// Across each row, then down
    RowMajor,
}

/// Outcome of a placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlacementReport {
    /// Cells written
    pub written: usize,
    /// Values dropped because the block was full
    pub truncated: usize,
}

/// Place `data` column-major into the block starting at `start`.
///
/// Rows and cells are created as needed; existing cells are overwritten.
/// Cells of the block beyond the last value are left untouched. Returns an
/// error without writing anything if the filled part of the block would
/// extend past the sheet's last row or column.
pub fn place(sheet: &mut Worksheet, start: StartPoint, data: &TableData) -> Result<PlacementReport> {
    place_with_order(sheet, start, data, FillOrder::ColumnMajor)
}

/// Place `data` into the block starting at `start` in the given order
pub fn place_with_order(
    sheet: &mut Worksheet,
    start: StartPoint,
    data: &TableData,
    order: FillOrder,
) -> Result<PlacementReport> {
    let count = data.values.len().min(clamp_to_usize(data.capacity()));
    let report = PlacementReport {
        written: count,
        truncated: data.values.len() - count,
    };
    if report.truncated > 0 {
        log::warn!(
            "block of {}x{} at {} holds {} of {} values, dropping the rest",
            data.max_rows,
            data.max_cols,
            CellAddress::new(start.row, start.col),
            count,
            data.values.len()
        );
    }
    if count == 0 {
        return Ok(report);
    }

    // Extent of the cells that will actually be written
    let n = count as u64;
    let (rows_used, cols_used) = match order {
        FillOrder::ColumnMajor => {
            let rows = data.max_rows as u64;
            (n.min(rows), ceil_div(n, rows))
        }
        FillOrder::RowMajor => {
            let cols = data.max_cols as u64;
            (ceil_div(n, cols), n.min(cols))
        }
    };
    check_extent(start, rows_used, cols_used)?;

    let values = &data.values[..count];
    match order {
        FillOrder::ColumnMajor => {
            let (mut row, mut col) = (start.row, start.col);
            for value in values {
                write_value(sheet, row, col, value)?;
                row += 1;
                if row - start.row >= data.max_rows {
                    row = start.row;
                    col += 1;
                    if col - start.col >= data.max_cols {
                        col = start.col;
                    }
                }
            }
        }
        FillOrder::RowMajor => {
            let (mut row, mut col) = (start.row, start.col);
            for value in values {
                write_value(sheet, row, col, value)?;
                col += 1;
                if col - start.col >= data.max_cols {
                    col = start.col;
                    row += 1;
                    if row - start.row >= data.max_rows {
                        row = start.row;
                    }
                }
            }
        }
    }

    log::debug!(
        "placed {} value(s) at {} in '{}'",
        count,
        CellAddress::new(start.row, start.col),
        sheet.name()
    );
    Ok(report)
}

/// Place `values` row by row, `cells_per_row` to a row, with no limit on
/// the number of rows.
///
/// A `cells_per_row` of zero places nothing.
pub fn place_rows(
    sheet: &mut Worksheet,
    start: StartPoint,
    cells_per_row: u16,
    values: &[PlacementValue],
) -> Result<PlacementReport> {
    if cells_per_row == 0 || values.is_empty() {
        return Ok(PlacementReport {
            written: 0,
            truncated: values.len(),
        });
    }

    let n = values.len() as u64;
    let per_row = cells_per_row as u64;
    check_extent(start, ceil_div(n, per_row), n.min(per_row))?;

    for (index, value) in values.iter().enumerate() {
        let index = index as u64;
        // Both offsets are within the extent checked above
        let row = start.row + (index / per_row) as u32;
        let col = start.col + (index % per_row) as u16;
        write_value(sheet, row, col, value)?;
    }

    log::debug!(
        "placed {} value(s) in rows of {} at {} in '{}'",
        values.len(),
        cells_per_row,
        CellAddress::new(start.row, start.col),
        sheet.name()
    );
    Ok(PlacementReport {
        written: values.len(),
        truncated: 0,
    })
}

fn write_value(sheet: &mut Worksheet, row: u32, col: u16, value: &PlacementValue) -> Result<()> {
    sheet
        .get_or_create_row(row)?
        .get_or_create_cell(col)?
        .set_value(CellValue::from(value));
    Ok(())
}

/// Reject a block of `rows` x `cols` cells at `start` that leaves the sheet
fn check_extent(start: StartPoint, rows: u64, cols: u64) -> Result<()> {
    let last_row = start.row as u64 + rows - 1;
    if last_row >= MAX_ROWS as u64 {
        return Err(sheetfill_core::Error::RowOutOfBounds(
            u32::try_from(last_row).unwrap_or(u32::MAX),
            MAX_ROWS - 1,
        )
        .into());
    }
    let last_col = start.col as u64 + cols - 1;
    if last_col >= MAX_COLS as u64 {
        return Err(sheetfill_core::Error::ColumnOutOfBounds(
            u32::try_from(last_col).unwrap_or(u32::MAX),
            MAX_COLS - 1,
        )
        .into());
    }
    Ok(())
}

fn ceil_div(n: u64, d: u64) -> u64 {
    (n + d - 1) / d
}

fn clamp_to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}
