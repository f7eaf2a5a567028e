//! Server-side telemetry. Per the delivery guarantee, a sink failure MUST
//! NOT break the HTTP request it was emitted from — failures are counted
//! and logged, never propagated.
use serde::Serialize;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

/// A telemetry event sink. `emit` may fail (network blip, serialization
/// error downstream); the caller always treats that failure as
/// non-fatal.
pub trait TelemetrySink: Send + Sync {
    fn emit(&self, event_name: &str, data: serde_json::Value) -> anyhow::Result<()>;
}

/// Default sink: logs every event at `info` level.
pub struct LoggingTelemetrySink;

impl TelemetrySink for LoggingTelemetrySink {
    fn emit(&self, event_name: &str, data: serde_json::Value) -> anyhow::Result<()> {
        log::info!("TELEMETRY {}: {}", event_name, data);
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InitServedEvent {
    pub player_id: String,
    pub restore_state_present: bool,
    /// `"FREE_SPINS"` or `"NONE"`.
    pub restore_mode: String,
    pub spins_remaining: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpinProcessedEvent {
    pub player_id: String,
    pub client_request_id: String,
    pub lock_acquire_ms: f64,
    pub lock_wait_retries: u32,
    pub is_bonus_continuation: bool,
    pub bonus_continuation_count: i32,
    pub config_hash: String,
    /// `"base"`, `"buy"`, or `"hype"`.
    pub mode: String,
    pub round_id: String,
    pub bonus_variant: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpinRejectedEvent {
    pub player_id: String,
    pub client_request_id: Option<String>,
    pub reason: String,
    pub lock_acquire_ms: f64,
    pub lock_wait_retries: u32,
}

/// Owns the active sink and the count of failed emissions, for the
/// `spin_processed`/`init_served`/`spin_rejected` events in the delivery
/// contract.
pub struct TelemetryService {
    sink: Box<dyn TelemetrySink>,
    sink_errors: AtomicU64,
}

impl Default for TelemetryService {
    fn default() -> Self {
        Self::new(Box::new(LoggingTelemetrySink))
    }
}

impl TelemetryService {
    pub fn new(sink: Box<dyn TelemetrySink>) -> Self {
        Self {
            sink,
            sink_errors: AtomicU64::new(0),
        }
    }

    pub fn sink_error_count(&self) -> u64 {
        self.sink_errors.load(Ordering::Relaxed)
    }

    fn safe_emit<T: Serialize>(&self, event_name: &str, event: &T) {
        let data = match serde_json::to_value(event) {
            Ok(value) => value,
            Err(err) => {
                self.sink_errors.fetch_add(1, Ordering::Relaxed);
                log::warn!("telemetry event {} failed to serialize: {}", event_name, err);
                return;
            }
        };
        if let Err(err) = self.sink.emit(event_name, data) {
            let count = self.sink_errors.fetch_add(1, Ordering::Relaxed) + 1;
            log::warn!(
                "telemetry sink error (count={}): {} - {}",
                count,
                event_name,
                err
            );
        }
    }

    pub fn emit_init_served(&self, event: &InitServedEvent) {
        self.safe_emit("init_served", event);
    }

    pub fn emit_spin_processed(&self, event: &SpinProcessedEvent) {
        self.safe_emit("spin_processed", event);
    }

    pub fn emit_spin_rejected(&self, event: &SpinRejectedEvent) {
        self.safe_emit("spin_rejected", event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FailingSink;
    impl TelemetrySink for FailingSink {
        fn emit(&self, _event_name: &str, _data: serde_json::Value) -> anyhow::Result<()> {
            anyhow::bail!("sink unavailable")
        }
    }

    struct RecordingSink {
        events: std::sync::Arc<Mutex<Vec<String>>>,
    }
    impl TelemetrySink for RecordingSink {
        fn emit(&self, event_name: &str, _data: serde_json::Value) -> anyhow::Result<()> {
            self.events.lock().unwrap().push(event_name.to_string());
            Ok(())
        }
    }

    #[test]
    fn sink_failure_is_counted_not_propagated() {
        let service = TelemetryService::new(Box::new(FailingSink));
        service.emit_init_served(&InitServedEvent {
            player_id: "p1".to_string(),
            restore_state_present: false,
            restore_mode: "NONE".to_string(),
            spins_remaining: None,
        });
        assert_eq!(service.sink_error_count(), 1);
    }

    #[test]
    fn successful_emit_reaches_the_sink() {
        let events = std::sync::Arc::new(Mutex::new(Vec::new()));
        let service = TelemetryService::new(Box::new(RecordingSink {
            events: events.clone(),
        }));
        service.emit_spin_rejected(&SpinRejectedEvent {
            player_id: "p1".to_string(),
            client_request_id: Some("req-1".to_string()),
            reason: "ROUND_IN_PROGRESS".to_string(),
            lock_acquire_ms: 1.2,
            lock_wait_retries: 0,
        });
        assert_eq!(service.sink_error_count(), 0);
        assert_eq!(events.lock().unwrap().as_slice(), ["spin_rejected"]);
    }

    #[test]
    fn recording_sink_observes_the_event_name() {
        let events = std::sync::Arc::new(Mutex::new(Vec::new()));
        let service = TelemetryService::new(Box::new(RecordingSink {
            events: events.clone(),
        }));
        service.emit_init_served(&InitServedEvent {
            player_id: "p1".to_string(),
            restore_state_present: true,
            restore_mode: "FREE_SPINS".to_string(),
            spins_remaining: Some(7),
        });
        assert_eq!(events.lock().unwrap().as_slice(), ["init_served"]);
    }
}
