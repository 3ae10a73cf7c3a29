use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

/// Classified outcome of a single reachability probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeOutcome {
    /// Round-trip time in milliseconds.
    Success(f64),
    Timeout,
    TransientError,
    PermissionDenied,
}

/// Most recent per-host status, as shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeStatus {
    Pending,
    Latency(f64),
    Timeout,
    PermissionDenied,
}

impl std::fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeStatus::Pending => write!(f, "init..."),
            ProbeStatus::Latency(ms) => write!(f, "{ms:.2} ms"),
            ProbeStatus::Timeout => write!(f, "timeout"),
            ProbeStatus::PermissionDenied => write!(f, "perm err"),
        }
    }
}

/// Direction of the rolling average relative to its previous value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Trend {
    Up,
    Down,
    #[default]
    Flat,
}

/// Rolling monitoring state for a single target.
///
/// The history window holds the most recent probe outcomes in temporal
/// order (`None` = failed probe) and is capped at `capacity`; every
/// derived field is recomputed from the window on each update.
#[derive(Debug, Clone)]
pub struct HostRecord {
    pub target: String,
    pub display_name: String,
    pub last_status: ProbeStatus,
    history: VecDeque<Option<f64>>,
    capacity: usize,
    pub is_up: bool,
    pub avg_latency_ms: f64,
    pub jitter_ms: f64,
    pub success_rate_pct: f64,
    pub trend: Trend,
    pub probe_count: u64,
    pub last_updated: DateTime<Utc>,
}

impl HostRecord {
    pub fn new(target: impl Into<String>, capacity: usize) -> Self {
        let target = target.into();
        Self {
            display_name: target.clone(),
            target,
            last_status: ProbeStatus::Pending,
            history: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
            is_up: false,
            avg_latency_ms: 0.0,
            jitter_ms: 0.0,
            success_rate_pct: 0.0,
            trend: Trend::Flat,
            probe_count: 0,
            last_updated: Utc::now(),
        }
    }

    /// Record one probe outcome and recompute the derived metrics.
    ///
    /// `PermissionDenied` is never recorded: the scheduler reports it
    /// through `mark_permission_denied` and retries after a cooldown.
    pub fn update(&mut self, outcome: ProbeOutcome) {
        let sample = match outcome {
            ProbeOutcome::Success(ms) => Some(ms),
            ProbeOutcome::Timeout | ProbeOutcome::TransientError => None,
            ProbeOutcome::PermissionDenied => return self.mark_permission_denied(),
        };

        self.probe_count += 1;
        self.last_updated = Utc::now();

        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(sample);

        match sample {
            Some(ms) => {
                self.is_up = true;
                self.last_status = ProbeStatus::Latency(ms);
            }
            None => {
                self.is_up = false;
                self.last_status = ProbeStatus::Timeout;
            }
        }

        self.recalculate();
    }

    /// Flag a privilege failure without touching history or counters.
    pub fn mark_permission_denied(&mut self) {
        self.last_status = ProbeStatus::PermissionDenied;
    }

    #[allow(dead_code)] // Inspection API, exercised by tests
    pub fn history(&self) -> &VecDeque<Option<f64>> {
        &self.history
    }

    fn recalculate(&mut self) {
        let samples: Vec<f64> = self.history.iter().copied().flatten().collect();

        if samples.is_empty() {
            self.avg_latency_ms = 0.0;
            self.jitter_ms = 0.0;
            self.success_rate_pct = 0.0;
            self.trend = Trend::Flat;
            return;
        }

        let new_avg = samples.iter().sum::<f64>() / samples.len() as f64;
        if self.avg_latency_ms != 0.0 {
            self.trend = if new_avg > self.avg_latency_ms {
                Trend::Up
            } else if new_avg < self.avg_latency_ms {
                Trend::Down
            } else {
                Trend::Flat
            };
        }
        self.avg_latency_ms = new_avg;

        let max = samples.iter().copied().fold(f64::MIN, f64::max);
        let min = samples.iter().copied().fold(f64::MAX, f64::min);
        self.jitter_ms = max - min;
        self.success_rate_pct = samples.len() as f64 / self.history.len() as f64 * 100.0;
    }
}

/// One entry of the host table.
///
/// Exactly one probe task writes a slot; the dashboard takes short read
/// locks when snapshotting, so readers may observe a record between two
/// consecutive updates.
pub struct HostSlot {
    target: String,
    record: RwLock<HostRecord>,
}

impl HostSlot {
    fn new(target: String, capacity: usize) -> Self {
        Self { record: RwLock::new(HostRecord::new(target.clone(), capacity)), target }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn update(&self, outcome: ProbeOutcome) {
        self.write().update(outcome);
    }

    pub fn mark_permission_denied(&self) {
        self.write().mark_permission_denied();
    }

    pub fn set_display_name(&self, name: String) {
        self.write().display_name = name;
    }

    /// Point-in-time copy of the record.
    pub fn snapshot(&self) -> HostRecord {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, HostRecord> {
        self.record.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HostRecord> {
        self.record.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The full set of monitored hosts, built once at startup.
///
/// Insertion order is the expander's first-occurrence order and is what
/// the dashboard displays.
pub struct HostTable {
    slots: Vec<Arc<HostSlot>>,
}

impl HostTable {
    pub fn new(targets: Vec<String>, history_size: usize) -> Self {
        let slots =
            targets.into_iter().map(|t| Arc::new(HostSlot::new(t, history_size))).collect();
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Arc<HostSlot>] {
        &self.slots
    }

    pub fn snapshot(&self) -> Vec<HostRecord> {
        self.slots.iter().map(|slot| slot.snapshot()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_window_has_zero_metrics() {
        let record = HostRecord::new("192.0.2.1", 10);
        assert!(!record.is_up);
        assert_eq!(record.probe_count, 0);
        assert!(approx(record.avg_latency_ms, 0.0));
        assert!(approx(record.jitter_ms, 0.0));
        assert!(approx(record.success_rate_pct, 0.0));
        assert_eq!(record.trend, Trend::Flat);
        assert_eq!(record.last_status, ProbeStatus::Pending);
    }

    #[test]
    fn window_evicts_oldest_entry() {
        let mut record = HostRecord::new("192.0.2.1", 3);
        record.update(ProbeOutcome::Success(100.0));
        record.update(ProbeOutcome::Timeout);
        record.update(ProbeOutcome::Success(50.0));
        record.update(ProbeOutcome::Success(80.0));

        assert_eq!(record.probe_count, 4);
        assert_eq!(record.history().len(), 3);
        assert_eq!(record.history()[0], None);
        assert_eq!(record.history()[1], Some(50.0));
        assert_eq!(record.history()[2], Some(80.0));

        assert!(approx(record.avg_latency_ms, 65.0));
        assert!(approx(record.jitter_ms, 30.0));
        assert!(approx(record.success_rate_pct, 200.0 / 3.0));
        assert!(record.is_up);
    }

    #[test]
    fn trend_follows_average_movement() {
        let mut record = HostRecord::new("192.0.2.1", 10);
        record.update(ProbeOutcome::Success(40.0));
        // No previous non-zero average yet.
        assert_eq!(record.trend, Trend::Flat);

        record.update(ProbeOutcome::Success(90.0));
        assert!(approx(record.avg_latency_ms, 65.0));
        assert_eq!(record.trend, Trend::Up);

        record.update(ProbeOutcome::Success(65.0));
        assert!(approx(record.avg_latency_ms, 65.0));
        assert_eq!(record.trend, Trend::Flat);

        record.update(ProbeOutcome::Success(1.0));
        assert_eq!(record.trend, Trend::Down);
    }

    #[test]
    fn failure_marks_host_down_but_keeps_window_metrics() {
        let mut record = HostRecord::new("192.0.2.1", 10);
        record.update(ProbeOutcome::Success(20.0));
        assert!(record.is_up);

        record.update(ProbeOutcome::TransientError);
        assert!(!record.is_up);
        assert_eq!(record.last_status, ProbeStatus::Timeout);
        assert!(approx(record.avg_latency_ms, 20.0));
        assert!(approx(record.success_rate_pct, 50.0));
    }

    #[test]
    fn host_with_no_successes_stays_down() {
        let mut record = HostRecord::new("192.0.2.1", 4);
        for _ in 0..6 {
            record.update(ProbeOutcome::Timeout);
        }
        assert!(!record.is_up);
        assert_eq!(record.history().len(), 4);
        assert_eq!(record.probe_count, 6);
        assert!(approx(record.success_rate_pct, 0.0));
        assert!(approx(record.avg_latency_ms, 0.0));
    }

    #[test]
    fn permission_denied_is_never_recorded() {
        let mut record = HostRecord::new("192.0.2.1", 10);
        record.update(ProbeOutcome::Success(12.0));

        record.update(ProbeOutcome::PermissionDenied);
        record.update(ProbeOutcome::PermissionDenied);

        assert_eq!(record.probe_count, 1);
        assert_eq!(record.history().len(), 1);
        assert_eq!(record.last_status, ProbeStatus::PermissionDenied);
        // The recorded metrics are untouched.
        assert!(record.is_up);
        assert!(approx(record.avg_latency_ms, 12.0));
    }

    #[test]
    fn table_snapshot_reflects_slot_updates() {
        let table = HostTable::new(vec!["192.0.2.1".into(), "192.0.2.2".into()], 10);
        table.slots()[1].update(ProbeOutcome::Success(5.0));
        table.slots()[1].set_display_name("two.example".into());

        let snap = table.snapshot();
        assert_eq!(snap.len(), 2);
        assert!(!snap[0].is_up);
        assert!(snap[1].is_up);
        assert_eq!(snap[1].display_name, "two.example");
    }
}
