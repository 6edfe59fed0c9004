//! modsweep-inventory: collection engine and output parsing
//!
//! Turns raw device CLI output into structured inventory records, runs the
//! bounded-concurrency sweep across a fleet, and renders the unified report.

pub mod collector;
pub mod error;
pub mod parser;
pub mod report;
pub mod types;

pub use collector::{CollectOptions, Collector};
pub use error::ReportError;
pub use parser::parse_inventory;
pub use report::{RenderedReport, render};
pub use types::{CollectionReport, HostResult, InventoryItem};
