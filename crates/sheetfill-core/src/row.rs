//! Row type

use std::collections::BTreeMap;

use crate::cell::{CellData, CellValue};
use crate::error::{Error, Result};
use crate::MAX_COLS;

/// A worksheet row: an index and its sparse cells, ordered by column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    /// Row index (0-based)
    index: u32,
    /// Column index → cell
    cells: BTreeMap<u16, CellData>,
}

impl Row {
    /// Create a new empty row
    pub fn new(index: u32) -> Self {
        Self {
            index,
            cells: BTreeMap::new(),
        }
    }

    /// Row index (0-based)
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Get an existing cell
    pub fn cell(&self, col: u16) -> Option<&CellData> {
        self.cells.get(&col)
    }

    /// Get the cell at `col`, creating a blank one if it does not exist.
    ///
    /// Calling this twice for the same column returns the same cell.
    pub fn get_or_create_cell(&mut self, col: u16) -> Result<&mut CellData> {
        if col >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col as u32, MAX_COLS - 1));
        }
        Ok(self.cells.entry(col).or_default())
    }

    /// Set a cell's value, creating the cell if needed
    pub fn set_value<V: Into<CellValue>>(&mut self, col: u16, value: V) -> Result<()> {
        self.get_or_create_cell(col)?.set_value(value);
        Ok(())
    }

    /// Iterate cells in ascending column order
    pub fn cells(&self) -> impl Iterator<Item = (u16, &CellData)> {
        self.cells.iter().map(|(c, d)| (*c, d))
    }

    /// Number of existing cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check if the row has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Column of the last existing cell
    pub fn last_column(&self) -> Option<u16> {
        self.cells.keys().next_back().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut row = Row::new(3);
        row.get_or_create_cell(2).unwrap().set_value("x");
        let cell = row.get_or_create_cell(2).unwrap();
        assert_eq!(cell.value.as_string(), Some("x"));
        assert_eq!(row.cell_count(), 1);
    }

    #[test]
    fn test_created_cell_is_blank() {
        let mut row = Row::new(0);
        assert!(row.get_or_create_cell(5).unwrap().is_empty());
        assert!(row.cell(5).is_some());
        assert!(row.cell(4).is_none());
    }

    #[test]
    fn test_cells_in_column_order() {
        let mut row = Row::new(0);
        row.set_value(7, 1.0).unwrap();
        row.set_value(0, 2.0).unwrap();
        row.set_value(3, 3.0).unwrap();
        let cols: Vec<u16> = row.cells().map(|(c, _)| c).collect();
        assert_eq!(cols, vec![0, 3, 7]);
        assert_eq!(row.last_column(), Some(7));
    }

    #[test]
    fn test_column_bounds() {
        let mut row = Row::new(0);
        assert!(matches!(
            row.get_or_create_cell(MAX_COLS),
            Err(Error::ColumnOutOfBounds(..))
        ));
    }
}
