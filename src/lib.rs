//! Scan a folder of data files, analyze each one and assemble a single
//! HTML dashboard.
//!
//! ```text
//!  folder ─▶ data::discovery ─▶ data::loader ─▶ analysis ─▶ viz ─▶ report
//! ```

pub mod analysis;
pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod report;
pub mod state;
pub mod viz;
