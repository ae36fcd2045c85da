//! DriveSafe Core - driving telemetry analysis
//!
//! This crate turns a vehicle's recorded telemetry log into trips, unsafe
//! driving events, map markers and a cached 1-100 safety score. The
//! implementation prioritizes:
//!
//! 1. **Determinism** - Detection and scoring are pure functions of the log
//! 2. **Logging** - Every decision point logged with run and trip context
//! 3. **Resilience** - Malformed records and store failures degrade, never abort
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `records` - Log record model, line codec and record construction
//! - `storage` - Log and score stores, session recording
//! - `trips` - Trip reconstruction from connection markers
//! - `events` - The four detectors and the combined marker merger
//! - `scoring` - Metrics, score curves and snapshots
//! - `cache` - Freshness-aware score cache with listeners
//! - `pipeline` - Per-channel analysis orchestration
//! - `config` - Thresholds and tuning constants
//! - `logging` - Structured logging with run context

pub mod cache;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod pipeline;
pub mod records;
pub mod scoring;
pub mod storage;
pub mod trips;

pub use cache::{ChannelTripSource, ScoreCache, SubscriptionId, TripSource};
pub use config::{CacheConfig, Config, DetectionConfig, ScoringConfig};
pub use error::{Result, TelemetryError};
pub use events::{detect_all, merge_events, CombinedEventPin, EventPin, EventType, PinsByType};
pub use logging::{init_logger, LogContext};
pub use pipeline::{analyze_channel, analyze_trip, AnalysisContext, ChannelAnalysis, TripAnalysis};
pub use records::{DataRecord, LogRecord};
pub use scoring::{ScoreSnapshot, ScoringEngine};
pub use storage::{Channel, JsonFileScoreStore, JsonLinesLogStore, LogStore, ScoreStore};
pub use trips::{reconstruct, Trip};
