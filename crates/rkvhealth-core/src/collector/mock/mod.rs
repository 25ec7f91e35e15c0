//! In-memory metrics source for testing.
//!
//! This module provides `MockSource` and pre-built server scenarios for
//! testing the collector, analysis and scheduler without a running server.

mod scenarios;
mod source;

pub use source::MockSource;
