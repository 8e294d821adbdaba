//! Layout shapes and the arithmetic that turns them into rows of cells.
//!
//! - [`registry`]: the fixed catalog of layout types and their slots
//! - [`rows`]: which slots share a row for each layout type
//! - [`spacer`]: widths of the cells in one row, including the filler spacer

pub mod registry;
pub mod rows;
pub mod spacer;

pub use registry::{check_registry, lookup, LayoutDefinition, LayoutType, SlotDef, LAYOUTS};
pub use rows::rows_for;
pub use spacer::{layout_row, CellWidth, RowCell, SPACER_THRESHOLD};
