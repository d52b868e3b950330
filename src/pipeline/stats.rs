use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters observed across pipeline runs. Observational only; no run reads them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub hits: u64,
    pub misses: u64,
    pub generated: u64,
    pub persist_failures: u64,
    pub race_losses: u64,
    pub failures: u64,
}

impl PipelineStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Default)]
pub(crate) struct AtomicStats {
    pub(crate) hits: AtomicU64,
    pub(crate) misses: AtomicU64,
    pub(crate) generated: AtomicU64,
    pub(crate) persist_failures: AtomicU64,
    pub(crate) race_losses: AtomicU64,
    pub(crate) failures: AtomicU64,
}

impl AtomicStats {
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn to_stats(&self) -> PipelineStats {
        PipelineStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            generated: self.generated.load(Ordering::Relaxed),
            persist_failures: self.persist_failures.load(Ordering::Relaxed),
            race_losses: self.race_losses.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}
