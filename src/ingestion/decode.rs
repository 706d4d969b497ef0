//! Arrow IPC Decoding
//!
//! The snapshot is published as an Arrow IPC file. Some mirrors serve the streaming
//! variant instead, so the stream reader is tried before giving up.

use crate::error::DataLoadError;
use polars::prelude::*;
use std::io::Cursor;
use tracing::debug;

/// Decode an Arrow IPC payload (file format first, then stream format)
pub fn decode_arrow(bytes: &[u8]) -> Result<DataFrame, DataLoadError> {
    if bytes.is_empty() {
        return Err(DataLoadError::Decode("payload is empty".to_string()));
    }

    let file_err = match IpcReader::new(Cursor::new(bytes)).finish() {
        Ok(df) => return Ok(df),
        Err(e) => e,
    };

    debug!("IPC file reader rejected payload ({}), trying stream reader", file_err);

    IpcStreamReader::new(Cursor::new(bytes))
        .finish()
        .map_err(|stream_err| {
            DataLoadError::Decode(format!(
                "file reader: {}; stream reader: {}",
                file_err, stream_err
            ))
        })
}
