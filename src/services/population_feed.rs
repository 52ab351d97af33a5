use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use tokio::sync::{watch, Notify};
use tracing::{debug, warn};

use crate::database::population_repo;
use crate::models::{CandidateSourceRow, ProfileType};

const REFRESH_INTERVAL: Duration = Duration::from_secs(3);

/// Full replacement snapshot of one population (never an incremental diff).
/// The sequence number lets deck holders tell whether their last recompute is
/// stale; a newer snapshot always supersedes work derived from an older one.
#[derive(Debug, Clone)]
pub struct PopulationSnapshot {
    pub seq: u64,
    pub records: Arc<Vec<CandidateSourceRow>>,
}

impl PopulationSnapshot {
    fn empty() -> Self {
        PopulationSnapshot {
            seq: 0,
            records: Arc::new(vec![]),
        }
    }
}

/// Republishes the visitor and exhibitor populations on watch channels. The
/// background task is woken by `nudge()` after a write and by a periodic
/// tick; it publishes only when the population actually changed. It never
/// terminates on its own; dropping the feed's receivers is the unsubscribe.
pub struct PopulationFeed {
    visitors: watch::Sender<PopulationSnapshot>,
    exhibitors: watch::Sender<PopulationSnapshot>,
    notify: Notify,
}

impl PopulationFeed {
    pub fn new() -> Arc<Self> {
        let (visitors, _) = watch::channel(PopulationSnapshot::empty());
        let (exhibitors, _) = watch::channel(PopulationSnapshot::empty());
        Arc::new(PopulationFeed {
            visitors,
            exhibitors,
            notify: Notify::new(),
        })
    }

    /// Latest published snapshot of the given population. Unknown roles see a
    /// permanently empty population.
    pub fn latest(&self, population: ProfileType) -> PopulationSnapshot {
        match population {
            ProfileType::Visitor => self.visitors.borrow().clone(),
            ProfileType::Exhibitor => self.exhibitors.borrow().clone(),
            ProfileType::Unknown => PopulationSnapshot::empty(),
        }
    }

    /// Wake the refresh task early, e.g. right after a connect or an
    /// interests save.
    pub fn nudge(&self) {
        self.notify.notify_one();
    }

    /// Drives the feed until the server shuts down.
    pub async fn run(self: Arc<Self>, pool: SqlitePool) {
        let mut tick = tokio::time::interval(REFRESH_INTERVAL);
        loop {
            tokio::select! {
                _ = tick.tick() => {}
                _ = self.notify.notified() => {}
            }
            self.refresh_now(&pool).await;
        }
    }

    /// One refresh pass over both populations.
    pub async fn refresh_now(&self, pool: &SqlitePool) {
        self.refresh(pool, ProfileType::Visitor).await;
        self.refresh(pool, ProfileType::Exhibitor).await;
    }

    async fn refresh(&self, pool: &SqlitePool, population: ProfileType) {
        let channel = match population {
            ProfileType::Visitor => &self.visitors,
            ProfileType::Exhibitor => &self.exhibitors,
            ProfileType::Unknown => return,
        };

        // On failure keep serving the previous snapshot; the view degrades,
        // it never crashes.
        let records = match population_repo::load_population(pool, population).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!("population refresh ({}) failed: {}", population.as_str(), e);
                return;
            }
        };

        let stale = {
            let current = channel.borrow();
            *current.records != records
        };
        if stale {
            let seq = channel.borrow().seq + 1;
            debug!(
                "population {} changed, publishing snapshot #{} ({} records)",
                population.as_str(),
                seq,
                records.len()
            );
            channel.send_replace(PopulationSnapshot {
                seq,
                records: Arc::new(records),
            });
        }
    }
}
