//! Prelude module - common imports for sheetfill users
//!
//! ```rust
//! use sheetfill::prelude::*;
//! ```

pub use crate::{
    // Locating
    locate,
    // Placing
    place,
    place_with_order,
    CellAddress,
    CellCoordinates,
    CellFilter,
    CellRef,
    // Cell types
    CellValue,
    // Error types
    Error,
    FillOrder,
    // Operations
    OperationService,
    PlacementValue,
    Result,
    SearchValue,
    Settings,
    StartPoint,
    TableData,
    // Main types
    Workbook,
    // Extension traits
    WorkbookExt,
    WorkbookOperation,
    Worksheet,
};
