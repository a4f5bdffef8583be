use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-user critical sections for ledger credits.
///
/// Two credits for the same user never interleave their balance
/// read-modify-write. Credits for different users run concurrently.
#[derive(Debug, Default)]
pub(crate) struct UserLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `uid`. Released when the guard drops.
    pub(crate) async fn lock(&self, uid: &str) -> OwnedMutexGuard<()> {
        let user_lock = {
            let mut locks = self.locks.lock().await;
            // Entries only referenced by the map are idle
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(uid.to_string()).or_default())
        };

        user_lock.lock_owned().await
    }

    /// Number of users with a tracked lock
    #[cfg(test)]
    pub(crate) async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}
