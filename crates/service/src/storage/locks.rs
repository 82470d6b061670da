use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockMap = DashMap<String, Arc<Mutex<()>>>;

/// Per-key async mutexes so two writers of the same document never interleave.
///
/// An entry lives only while some task holds or waits for its lock; the last
/// [`KeyGuard`] to drop removes it.
#[derive(Clone, Default)]
pub struct KeyLocks {
    inner: Arc<LockMap>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`; released when the guard drops.
    pub async fn lock(&self, key: &str) -> KeyGuard {
        let mutex = self
            .inner
            .entry(key.to_string())
            .or_default()
            .value()
            .clone();
        let guard = mutex.lock_owned().await;
        KeyGuard { key: key.to_string(), map: self.inner.clone(), guard: Some(guard) }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// Held lock on one key.
pub struct KeyGuard {
    key: String,
    map: Arc<LockMap>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        // Release first so the guard's own Arc is gone; waiters still hold a
        // clone, which keeps the count above one.
        drop(self.guard.take());
        self.map.remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_key_is_exclusive() {
        let locks = KeyLocks::new();
        let guard = locks.lock("a").await;
        let second = tokio::time::timeout(Duration::from_millis(50), locks.lock("a")).await;
        assert!(second.is_err(), "second lock on same key should wait");
        drop(guard);
        let again = tokio::time::timeout(Duration::from_millis(50), locks.lock("a")).await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn different_keys_do_not_block() {
        let locks = KeyLocks::new();
        let _a = locks.lock("a").await;
        let b = tokio::time::timeout(Duration::from_millis(50), locks.lock("b")).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn released_keys_are_forgotten() {
        let locks = KeyLocks::new();
        let a = locks.lock("a").await;
        let b = locks.lock("b").await;
        assert_eq!(locks.len(), 2);
        drop(a);
        assert_eq!(locks.len(), 1);
        drop(b);
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn entry_survives_while_someone_waits() {
        let locks = KeyLocks::new();
        let first = locks.lock("k").await;
        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.lock("k").await;
            })
        };
        // let the waiter clone the mutex and park on it
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(first);
        assert!(tokio::time::timeout(Duration::from_secs(1), waiter).await.is_ok());
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn many_writers_leave_no_entries() {
        let locks = KeyLocks::new();
        let mut tasks = Vec::new();
        for i in 0..32 {
            let locks = locks.clone();
            tasks.push(tokio::spawn(async move {
                let _g = locks.lock(if i % 2 == 0 { "even" } else { "odd" }).await;
                tokio::task::yield_now().await;
            }));
        }
        for t in tasks {
            t.await.unwrap();
        }
        assert_eq!(locks.len(), 0);
    }
}
