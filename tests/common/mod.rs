#![allow(dead_code)]

use polars::prelude::*;
use std::sync::Arc;
use superstore_insights::ingestion::{IngestionPipeline, RetryPolicy, StaticSource};
use superstore_insights::service::SalesService;

/// Five line items over three orders, shaped like the upstream snapshot
pub fn sample_frame() -> DataFrame {
    df![
        "Order ID" => ["ORD-001", "ORD-001", "ORD-002", "ORD-003", "ORD-003"],
        "Order Date" => ["2023-01-15", "2023-01-15", "2023-02-20", "2023-03-10", "2023-03-10"],
        "Ship Date" => ["2023-01-20", "2023-01-20", "2023-02-25", "2023-03-15", "2023-03-15"],
        "Customer ID" => ["CUST-001", "CUST-001", "CUST-002", "CUST-003", "CUST-003"],
        "Customer Name" => ["John Doe", "John Doe", "Jane Smith", "Bob Wilson", "Bob Wilson"],
        "Segment" => ["Consumer", "Consumer", "Corporate", "Home Office", "Home Office"],
        "State" => ["New York", "New York", "California", "Illinois", "Illinois"],
        "Region" => ["East", "East", "West", "Central", "Central"],
        "Category" => ["Technology", "Office Supplies", "Furniture", "Technology", "Office Supplies"],
        "Sub-Category" => ["Phones", "Paper", "Chairs", "Computers", "Binders"],
        "Product Name" => ["iPhone", "A4 Paper", "Office Chair", "Laptop", "Ring Binder"],
        "Sales" => [500.0, 50.0, 300.0, 1000.0, 25.0],
        "Quantity" => [1i64, 5, 1, 1, 10],
        "Discount" => [0.0, 0.1, 0.2, 0.0, 0.15],
        "Profit" => [100.0, 10.0, -20.0, 200.0, 5.0]
    ]
    .unwrap()
}

pub fn ipc_file_bytes(df: &DataFrame) -> Vec<u8> {
    let mut df = df.clone();
    let mut buf = Vec::new();
    IpcWriter::new(&mut buf).finish(&mut df).unwrap();
    buf
}

pub fn ipc_stream_bytes(df: &DataFrame) -> Vec<u8> {
    let mut df = df.clone();
    let mut buf = Vec::new();
    IpcStreamWriter::new(&mut buf).finish(&mut df).unwrap();
    buf
}

pub fn static_pipeline(payload: Vec<u8>) -> IngestionPipeline {
    IngestionPipeline::new(Arc::new(StaticSource::new(payload)), RetryPolicy::no_retry())
}

/// Service over the sample frame, served from memory
pub fn sample_service() -> SalesService {
    SalesService::new(Arc::new(static_pipeline(ipc_file_bytes(&sample_frame()))))
}
