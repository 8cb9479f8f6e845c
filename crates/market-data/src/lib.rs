//! # Market Data
//!
//! Loads chronologically ordered price rows from CSV exports.
//!
//! Column names are matched case-insensitively, so `Open`, `open` and `OPEN` all work.
//! `open` and `close` are required for candles; `high`, `low` and a date column
//! (`date`, `timestamp` or `time`) are picked up when present. Dated rows are sorted
//! chronologically before they are returned.

pub mod csv_loader;
pub mod error;

pub use csv_loader::CsvLoader;
pub use error::LoaderError;
