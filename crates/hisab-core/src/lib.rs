//! Hisab Core - Tabular results and the rules shared by every export
//!
//! This crate holds everything the renderers agree on before any bytes are
//! written:
//!
//! - `TabularResult` - ordered columns and rows as fetched from the database
//! - `ColumnKind` / `ClassifiedTable` - one semantic tag per column
//! - Value coercion for human-formatted numbers and dates
//! - Display formatting, column width estimation and density tiers
//! - Report titles, safe file names and the dashboard's row filters

mod classify;
mod coerce;
mod error;
mod format;
mod layout;
mod naming;
pub mod prepare;
mod types;

pub use classify::*;
pub use coerce::*;
pub use error::*;
pub use format::*;
pub use layout::*;
pub use naming::*;
pub use prepare::{RowFilters, prepare_for_display};
pub use types::*;
