use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::debug;

use super::checker::Pinger;
use super::types::{HostSlot, HostTable, ProbeOutcome};

/// Timing knobs for the probe loops.
#[derive(Debug, Clone, Copy)]
pub struct ProbeSettings {
    /// Sleep between two probes of the same host. The sleep always runs
    /// for the full interval; probe latency is not subtracted.
    pub interval: Duration,
    pub timeout: Duration,
    /// Back-off before retrying after a privilege failure.
    pub permission_cooldown: Duration,
    /// Ceiling on simultaneously running probe loops.
    pub max_workers: usize,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(2),
            permission_cooldown: Duration::from_secs(5),
            max_workers: 50,
        }
    }
}

/// Spawns one long-lived probing task per host.
///
/// Tasks are admitted through a semaphore sized
/// `min(host_count, max_workers)` and hold their permit for the process
/// lifetime, so hosts beyond the ceiling stay pending until a slot frees
/// (which, with infinite loops, is never). This mirrors the fixed
/// thread-pool behavior the tool always had; raise `max_workers` to
/// cover larger target sets.
pub struct ProbeScheduler {
    pinger: Arc<dyn Pinger>,
    settings: ProbeSettings,
}

impl ProbeScheduler {
    pub fn new(pinger: Arc<dyn Pinger>, settings: ProbeSettings) -> Self {
        Self { pinger, settings }
    }

    /// Start a probe loop for every slot in the table.
    pub fn spawn_all(&self, table: &HostTable) -> Vec<JoinHandle<()>> {
        let workers = table.len().min(self.settings.max_workers).max(1);
        debug!(hosts = table.len(), workers, "starting probe loops");

        let pool = Arc::new(Semaphore::new(workers));
        table.slots().iter().cloned().map(|slot| self.spawn_one(slot, pool.clone())).collect()
    }

    fn spawn_one(&self, slot: Arc<HostSlot>, pool: Arc<Semaphore>) -> JoinHandle<()> {
        let pinger = self.pinger.clone();
        let settings = self.settings;

        tokio::spawn(async move {
            // Held until the task dies with the process.
            let Ok(_permit) = pool.acquire_owned().await else {
                return;
            };

            let name = pinger.display_name(slot.target()).await;
            slot.set_display_name(name);

            loop {
                let outcome = pinger.probe(slot.target(), settings.timeout).await;

                if outcome == ProbeOutcome::PermissionDenied {
                    slot.mark_permission_denied();
                    tokio::time::sleep(settings.permission_cooldown).await;
                    continue;
                }

                slot.update(outcome);
                tokio::time::sleep(settings.interval).await;
            }
        })
    }
}
