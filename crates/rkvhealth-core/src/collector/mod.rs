//! Metrics collection from a key-value server.
//!
//! This module reads the server's self-reported `INFO` sections and slow log
//! through the [`MetricsSource`] trait and normalizes them into a
//! [`HealthSnapshot`](crate::model::HealthSnapshot).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                  Collector                   │
//! │   fetch raw sections ──► normalize (units,   │
//! │   + slow log               defaults)         │
//! └──────────────────────┬───────────────────────┘
//!                        │
//!                ┌───────▼───────┐
//!                │ MetricsSource │ (trait)
//!                └───────┬───────┘
//!                        │
//!           ┌────────────┴────────────┐
//!           │                         │
//!    ┌──────▼──────┐           ┌──────▼──────┐
//!    │ RedisSource │           │ MockSource  │
//!    │ (network)   │           │ (testing)   │
//!    └─────────────┘           └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use rkvhealth_core::collector::{Collector, MockSource};
//!
//! let mut collector = Collector::new(MockSource::healthy_master());
//! let snapshot = collector.collect().unwrap();
//! assert_eq!(snapshot.memory.used_memory_mb, 50.0);
//! ```

#[allow(clippy::module_inception)]
mod collector;
pub mod info;
pub mod mock;
pub mod normalize;
#[cfg(feature = "redis-source")]
mod redis_source;
pub mod traits;

pub use collector::{CollectError, Collector, CollectorTiming, DEFAULT_SLOW_LOG_COUNT};
pub use mock::MockSource;
#[cfg(feature = "redis-source")]
pub use redis_source::{RedisSource, SourceConfig};
pub use traits::{InfoCategory, MetricsSource, RawFields, SourceError};
