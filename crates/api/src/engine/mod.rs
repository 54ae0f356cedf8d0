//! Domain engines behind the HTTP handlers.
//!
//! Each engine runs its storage work against the pool (or one transaction
//! when the operation must be atomic) and writes audit entries through the
//! shared [`activity::ActivityRecorder`]. Handlers stay thin: extract, call
//! an engine, wrap the result in the response envelope.

pub mod activity;
pub mod annotation;
pub mod assignment;
pub mod ingestion;
pub mod progress;
pub mod statistics;
