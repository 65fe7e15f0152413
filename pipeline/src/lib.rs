//! A small, resilient stream-processing pipeline: an unreliable-data
//! generator that manufactures a line-delimited JSON record stream with
//! injected faults and duplicates, and a processor that validates,
//! deduplicates and routes every record to a clean or dead-letter sink.

pub mod api;
pub mod config;
pub mod dedup;
pub mod generator;
pub mod process;
pub mod record;
pub mod sinks;
pub mod time;
pub mod validate;
