//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellValue`] - The value stored in a cell
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellData`] - The stored cell

mod address;
mod storage;
mod value;

pub use address::CellAddress;
pub use storage::CellData;
pub use value::{CellError, CellValue, SharedString};
