//! rkvhealth-core: health inspection for key-value servers.
//!
//! Provides:
//! - `collector`: metrics source abstraction, `INFO` parsing and normalization
//! - `model`: per-cycle snapshot data types
//! - `analysis`: derived metrics and threshold rules producing warnings
//! - `scheduler`: single-shot and continuous collect/analyze/present cycles
//! - `fmt`: shared formatting helpers for presenters
//!
//! With `redis-source` feature (default):
//! - `collector::RedisSource`: metrics source over a live connection

pub mod analysis;
pub mod collector;
pub mod fmt;
pub mod model;
pub mod scheduler;
