//! Reusable line-level widgets shared by the table and chart views.

pub mod bar_chart;
pub mod header;
pub mod indicators;
