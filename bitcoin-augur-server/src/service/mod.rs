//! Background mempool collection service

mod mempool_collector;

pub use mempool_collector::{CollectorError, MempoolCollector};
