use crate::project::ProjectId;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Keyed lock table: one async mutex per project id.
///
/// Read-modify-write sequences on durable project state (timeline appends,
/// tuning feedback) hold the project's guard for their whole duration. Distinct
/// projects never contend.
///
/// Entries are never evicted: the table holds one small mutex per project seen
/// since construction. Long-lived services with an unbounded project set should
/// recreate the owning store periodically.
#[derive(Debug, Default)]
pub struct ProjectLocks {
    locks: DashMap<ProjectId, Arc<Mutex<()>>>,
}

impl ProjectLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the guard for `project`, waiting for any current holder.
    pub async fn lock(&self, project: &ProjectId) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the shard lock is released before awaiting.
        let mutex = self
            .locks
            .entry(project.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }
}
