use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

/// Diagnostic sink injected into sessions and the registry.
///
/// Lets hosts route bridge diagnostics wherever their platform logs go (or
/// nowhere) without the core depending on a logging backend.
pub trait SessionLogger: Send + Sync {
    fn info(&self, message: &str);

    fn error(&self, message: &str);

    /// Record how long a named processing stage took for one request.
    fn timing(&self, stage: &str, duration_ms: f64);

    /// Record seconds of audio handled by one request. Default: no-op.
    fn audio_processed(&self, _seconds: f64) {}

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullSessionLogger;

impl SessionLogger for NullSessionLogger {
    fn info(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
    fn timing(&self, _stage: &str, _duration_ms: f64) {}
}

#[derive(Default)]
struct TimingLedger {
    timings: HashMap<String, Vec<f64>>,
    audio_seconds: f64,
    requests: usize,
}

/// Forwards messages to the `log` facade and keeps per-stage timings for a
/// summary report.
pub struct LogSessionLogger {
    ledger: Mutex<TimingLedger>,
    start_time: Instant,
}

impl LogSessionLogger {
    pub fn new() -> Self {
        Self {
            ledger: Mutex::new(TimingLedger::default()),
            start_time: Instant::now(),
        }
    }

    fn ledger(&self) -> std::sync::MutexGuard<'_, TimingLedger> {
        self.ledger
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Returns the formatted summary string, or `None` if nothing was timed.
    pub fn summary_string(&self) -> Option<String> {
        let ledger = self.ledger();
        if ledger.timings.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Bridge summary ({} requests, {:.1}s of audio):",
            ledger.requests, ledger.audio_seconds
        )];

        let mut stages: Vec<_> = ledger.timings.keys().collect();
        stages.sort();
        let mut busy_ms = 0.0;
        for stage in stages {
            let durations = &ledger.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            busy_ms += total_ms;
            let avg_ms = total_ms / durations.len() as f64;
            let pct = if elapsed_ms > 0.0 {
                total_ms / elapsed_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!(
                "  {stage:10}: avg {avg_ms:7.1}ms  total {total_ms:8.0}ms  ({pct:4.1}%)"
            ));
        }

        if ledger.audio_seconds > 0.0 {
            let rtf = busy_ms / 1000.0 / ledger.audio_seconds;
            lines.push(format!("  Real-time factor: {rtf:.2}"));
        }

        Some(lines.join("\n"))
    }

    /// Returns the timing data for a given stage.
    pub fn timings_for(&self, stage: &str) -> Option<Vec<f64>> {
        self.ledger().timings.get(stage).cloned()
    }
}

impl Default for LogSessionLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionLogger for LogSessionLogger {
    fn info(&self, message: &str) {
        log::info!("{message}");
    }

    fn error(&self, message: &str) {
        log::error!("{message}");
    }

    fn timing(&self, stage: &str, duration_ms: f64) {
        log::debug!("{stage} took {duration_ms:.1}ms");
        self.ledger()
            .timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn audio_processed(&self, seconds: f64) {
        let mut ledger = self.ledger();
        ledger.requests += 1;
        ledger.audio_seconds += seconds;
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
