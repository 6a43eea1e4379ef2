use crate::layout::Resolution;
use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Counters accumulated while building scenario tables.
#[derive(Debug, Default, Clone)]
pub struct ReflowMetrics {
    scenarios: u64,
    placements: u64,
    displaced: u64,
    attempts: u64,
    exhausted: u64,
}

impl ReflowMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_scenario(&mut self) {
        self.scenarios = self.scenarios.saturating_add(1);
    }

    pub fn record_resolution(&mut self, resolution: &Resolution) {
        self.placements = self
            .placements
            .saturating_add(resolution.placements.len() as u64);
        self.displaced = self.displaced.saturating_add(resolution.displaced as u64);
        self.attempts = self.attempts.saturating_add(resolution.attempts);
        self.exhausted = self
            .exhausted
            .saturating_add(resolution.exhausted.len() as u64);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            scenarios: self.scenarios,
            placements: self.placements,
            displaced: self.displaced,
            attempts: self.attempts,
            exhausted: self.exhausted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub scenarios: u64,
    pub placements: u64,
    pub displaced: u64,
    pub attempts: u64,
    pub exhausted: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "reflow_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("scenarios".to_string(), json!(self.scenarios));
        map.insert("placements".to_string(), json!(self.placements));
        map.insert("displaced".to_string(), json!(self.displaced));
        map.insert("attempts".to_string(), json!(self.attempts));
        map.insert("exhausted".to_string(), json!(self.exhausted));
        map
    }
}
