//! Ingestion Module
//!
//! Turns the remote Arrow snapshot into an immutable `SalesTable`:
//! - `source`: where the bytes come from
//! - `retry`: bounded exponential backoff around the fetch
//! - `decode`: Arrow IPC file / stream decoding
//! - `schema`: required columns, type coercion, cleaning
//! - `pipeline`: the `TableLoader` tying it together

pub mod decode;
pub mod pipeline;
pub mod retry;
pub mod schema;
pub mod source;

pub use decode::decode_arrow;
pub use pipeline::{IngestionPipeline, LoadedTable, TableLoader};
pub use retry::{retry_with_backoff, retry_with_sleeper, RetryPolicy};
pub use schema::{build_table, parse_date, validate_columns, CleaningReport, REQUIRED_COLUMNS};
pub use source::{ByteSource, HttpSource, StaticSource};
