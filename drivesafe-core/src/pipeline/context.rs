//! Analysis run context.
//!
//! Tags every log line of one analysis pass with a run id and channel.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::logging::structured::LogContext;
use crate::storage::log_store::Channel;

/// Context for one analysis pass over a channel.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    pub run_id: String,
    pub channel: Channel,
    pub started_at: DateTime<Utc>,
}

impl AnalysisContext {
    pub fn new(channel: Channel) -> Self {
        let run_id = format!("run-{}", &Uuid::new_v4().to_string()[..8]);
        Self {
            run_id,
            channel,
            started_at: Utc::now(),
        }
    }

    pub fn log_context(&self) -> LogContext {
        LogContext::new(&self.run_id).with_channel(self.channel.as_str())
    }

    /// Log context narrowed to one trip.
    pub fn trip_context(&self, trip_id: u32) -> LogContext {
        self.log_context().with_trip(trip_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_ids_are_unique_and_prefixed() {
        let a = AnalysisContext::new(Channel::Sim);
        let b = AnalysisContext::new(Channel::Sim);
        assert!(a.run_id.starts_with("run-"));
        assert_eq!(a.run_id.len(), 12);
        assert_ne!(a.run_id, b.run_id);
    }

    #[test]
    fn test_log_context_carries_channel_and_trip() {
        let ctx = AnalysisContext::new(Channel::Real);
        let rendered = ctx.trip_context(3).to_string();
        assert!(rendered.starts_with(&format!("[run={}]", ctx.run_id)));
        assert!(rendered.ends_with("[channel=real] [trip=3]"));
    }
}
