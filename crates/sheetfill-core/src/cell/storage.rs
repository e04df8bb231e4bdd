//! Per-cell storage

use super::CellValue;

/// Data stored for a single cell.
///
/// A cell that exists but has never been written holds [`CellValue::Empty`].
/// Existence is significant: a blank cell created by a write stays in its row
/// and is saved back out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellData {
    /// The cell's value
    pub value: CellValue,
}

impl CellData {
    /// Create a new cell with a value
    pub fn new(value: CellValue) -> Self {
        Self { value }
    }

    /// Create a blank cell
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if the cell holds no value
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Replace the cell's value
    pub fn set_value<V: Into<CellValue>>(&mut self, value: V) {
        self.value = value.into();
    }
}

impl From<CellValue> for CellData {
    fn from(value: CellValue) -> Self {
        Self::new(value)
    }
}
