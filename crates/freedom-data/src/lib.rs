//! Data layer for the freedom index dashboard.
//!
//! Decodes spreadsheet sources into raw rows, normalises them into canonical
//! records, filters, orders and pages them for tabular display, and derives
//! the aggregate statistics behind the charts.

pub mod aggregator;
pub mod analysis;
pub mod filter;
pub mod normalizer;
pub mod reader;
pub mod table;

pub use freedom_core as core;
