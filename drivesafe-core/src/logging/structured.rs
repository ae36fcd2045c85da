//! Structured logging utilities.
//!
//! Provides context-aware logging with run_id, channel and trip_id included
//! in every log message.

use std::fmt;

/// Install the `env_logger` backend.
///
/// Safe to call repeatedly; only the first call takes effect.
pub fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_millis()
        .try_init();
}

/// Logging context for one analysis run.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub run_id: String,
    pub channel: Option<String>,
    pub trip_id: Option<u32>,
}

impl LogContext {
    pub fn new(run_id: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            channel: None,
            trip_id: None,
        }
    }

    pub fn with_channel(&self, channel: &str) -> Self {
        Self {
            run_id: self.run_id.clone(),
            channel: Some(channel.to_string()),
            trip_id: self.trip_id,
        }
    }

    pub fn with_trip(&self, trip_id: u32) -> Self {
        Self {
            run_id: self.run_id.clone(),
            channel: self.channel.clone(),
            trip_id: Some(trip_id),
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[run={}]", self.run_id)?;
        if let Some(channel) = &self.channel {
            write!(f, " [channel={}]", channel)?;
        }
        if let Some(trip) = self.trip_id {
            write!(f, " [trip={}]", trip)?;
        }
        Ok(())
    }
}

/// Log an info message with context.
#[macro_export]
macro_rules! log_info {
    ($ctx:expr, $event:expr, $($key:ident = $value:expr),* $(,)?) => {
        log::info!(
            concat!("{} {}", $(" ", stringify!($key), "={:?}"),*),
            $ctx,
            $event,
            $($value),*
        );
    };
}

/// Log a warning message with context.
#[macro_export]
macro_rules! log_warn {
    ($ctx:expr, $event:expr, $($key:ident = $value:expr),* $(,)?) => {
        log::warn!(
            concat!("{} {}", $(" ", stringify!($key), "={:?}"),*),
            $ctx,
            $event,
            $($value),*
        );
    };
}

/// Log an error message with context.
#[macro_export]
macro_rules! log_error {
    ($ctx:expr, $event:expr, $($key:ident = $value:expr),* $(,)?) => {
        log::error!(
            concat!("{} {}", $(" ", stringify!($key), "={:?}"),*),
            $ctx,
            $event,
            $($value),*
        );
    };
}

/// Log a debug message with context.
#[macro_export]
macro_rules! log_debug {
    ($ctx:expr, $event:expr, $($key:ident = $value:expr),* $(,)?) => {
        log::debug!(
            concat!("{} {}", $(" ", stringify!($key), "={:?}"),*),
            $ctx,
            $event,
            $($value),*
        );
    };
}
