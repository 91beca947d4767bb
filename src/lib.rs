//! Consolidates the monthly form 5.1 (COVID-19 mortality by subject) tables from
//! spreadsheet releases into one dataset keyed by region.

pub mod compile;
pub mod config;
pub mod export;
pub mod process;
pub mod reference;

pub use compile::{compile_files, discover_inputs, run, CompileSummary, ConsolidatedDataset};
pub use config::{Config, NumericPolicy};
pub use reference::ReferenceTables;
