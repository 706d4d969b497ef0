pub mod analytics;
pub mod config;
pub mod error;
pub mod filter;
pub mod ingestion;
pub mod model;
pub mod server;
pub mod service;

#[cfg(test)]
mod test_support;

pub use config::Settings;
pub use error::{DataLoadError, ErrorKind, Result, SalesError};
pub use filter::FilterSpec;
pub use model::{SalesRecord, SalesTable, TableView};
pub use service::SalesService;
