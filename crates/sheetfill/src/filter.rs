//! Positional filters applied to value-search matches

use std::fmt;
use std::sync::Arc;

use crate::locate::CellRef;

/// Predicate over a matching cell, applied after value matching.
///
/// The built-in variants cover the common layouts; [`CellFilter::Custom`]
/// takes any predicate over the cell's position and value.
#[derive(Clone, Default)]
pub enum CellFilter {
    /// Accept every match
    #[default]
    NoFilter,
    /// Accept matches in column 0 only
    FirstColumn,
    /// Accept matches in row 0 only
    FirstRow,
    /// Accept matches the predicate returns `true` for
    Custom(Arc<dyn Fn(&CellRef<'_>) -> bool + Send + Sync>),
}

impl CellFilter {
    /// Wrap a closure as a filter
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&CellRef<'_>) -> bool + Send + Sync + 'static,
    {
        CellFilter::Custom(Arc::new(predicate))
    }

    /// Check whether a cell passes the filter
    pub fn accepts(&self, cell: &CellRef<'_>) -> bool {
        match self {
            CellFilter::NoFilter => true,
            CellFilter::FirstColumn => cell.col() == 0,
            CellFilter::FirstRow => cell.row() == 0,
            CellFilter::Custom(predicate) => predicate(cell),
        }
    }
}

impl fmt::Debug for CellFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellFilter::NoFilter => f.write_str("NoFilter"),
            CellFilter::FirstColumn => f.write_str("FirstColumn"),
            CellFilter::FirstRow => f.write_str("FirstRow"),
            CellFilter::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetfill_core::CellData;

    #[test]
    fn test_builtin_filters() {
        let data = CellData::default();
        let origin = CellRef::new(0, 0, &data);
        let inner = CellRef::new(3, 2, &data);
        let first_col = CellRef::new(3, 0, &data);

        assert!(CellFilter::NoFilter.accepts(&inner));
        assert!(CellFilter::FirstColumn.accepts(&first_col));
        assert!(!CellFilter::FirstColumn.accepts(&inner));
        assert!(CellFilter::FirstRow.accepts(&origin));
        assert!(!CellFilter::FirstRow.accepts(&first_col));
    }

    #[test]
    fn test_custom_filter() {
        let data = CellData::default();
        let below_header = CellFilter::custom(|cell| cell.row() > 0);

        assert!(!below_header.accepts(&CellRef::new(0, 4, &data)));
        assert!(below_header.accepts(&CellRef::new(1, 4, &data)));
        assert_eq!(format!("{:?}", below_header), "Custom(..)");
    }
}
