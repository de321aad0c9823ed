//! STTK stock write-off reporting.
//!
//! [`penalty`] holds the pure computation pipeline (loss, variance, ledger).
//! [`workflows::sttk`] wraps it in the report submission, approval and
//! dashboard workflow served over HTTP.

pub mod config;
pub mod error;
pub mod penalty;
pub mod telemetry;
pub mod workflows;
