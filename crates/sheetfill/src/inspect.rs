//! Typed reading of located cells

use sheetfill_core::CellValue;

use crate::locate::CellRef;

/// The kind of value a cell holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Text,
    Number,
    Boolean,
    Formula,
    Blank,
    Error,
}

/// A value read from a cell
#[derive(Debug, Clone, PartialEq)]
pub enum ReadValue {
    Text(String),
    Number(f64),
    Boolean(bool),
    /// Formula source without the leading `=`
    Formula(String),
    /// Blank and error cells carry no readable value
    Unhandled,
}

/// Kind and value of a cell
#[derive(Debug, Clone, PartialEq)]
pub struct CellReading {
    pub kind: CellKind,
    pub value: ReadValue,
}

/// Read the value of a cell together with its kind
pub fn read_cell_value(cell: &CellRef<'_>) -> CellReading {
    let (kind, value) = match cell.value() {
        CellValue::String(s) => (CellKind::Text, ReadValue::Text(s.as_str().to_string())),
        CellValue::Number(n) => (CellKind::Number, ReadValue::Number(*n)),
        CellValue::Boolean(b) => (CellKind::Boolean, ReadValue::Boolean(*b)),
        CellValue::Formula { .. } => (
            CellKind::Formula,
            ReadValue::Formula(cell.value().formula_source().unwrap_or_default().to_string()),
        ),
        CellValue::Empty => (CellKind::Blank, ReadValue::Unhandled),
        CellValue::Error(_) => (CellKind::Error, ReadValue::Unhandled),
    };
    CellReading { kind, value }
}
