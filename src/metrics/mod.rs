use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Counters accumulated by the shell loop.
#[derive(Debug, Default, Clone)]
pub struct ShellMetrics {
    events: u64,
    resizes: u64,
    rotations: u64,
    flushes: u64,
}

impl ShellMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&mut self) {
        self.events = self.events.saturating_add(1);
    }

    pub fn record_resize(&mut self) {
        self.resizes = self.resizes.saturating_add(1);
    }

    pub fn record_rotation(&mut self) {
        self.rotations = self.rotations.saturating_add(1);
    }

    pub fn record_flush(&mut self) {
        self.flushes = self.flushes.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            events: self.events,
            resizes: self.resizes,
            rotations: self.rotations,
            flushes: self.flushes,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub events: u64,
    pub resizes: u64,
    pub rotations: u64,
    pub flushes: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        let mut fields = LogFields::new();
        fields.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        fields.insert("events".to_string(), json!(self.events));
        fields.insert("resizes".to_string(), json!(self.resizes));
        fields.insert("rotations".to_string(), json!(self.rotations));
        fields.insert("flushes".to_string(), json!(self.flushes));
        LogEvent::with_fields(
            LogLevel::Info,
            target.to_string(),
            "shell_metrics".to_string(),
            fields,
        )
    }
}
