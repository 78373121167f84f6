use std::{future::Future, hash::Hash, panic::AssertUnwindSafe, sync::Arc};

use dashmap::{mapref::entry::Entry, DashMap};
use futures::future::{FutureExt, Shared};
use tokio::sync::oneshot;

type Flight<T, E> = Shared<oneshot::Receiver<Result<T, Arc<E>>>>;

#[derive(Debug)]
pub enum FlightError<E> {
    /// The shared call returned an error; every waiter gets the same one.
    Failed(Arc<E>),
    /// The task running the call panicked before producing a result.
    Aborted,
}

/// Collapses concurrent calls for the same key into one execution.
///
/// The first caller for a key spawns the work; later callers await the same
/// result until it completes. The key is released once the work finishes, so
/// the next call after that starts a fresh execution.
pub struct Singleflight<K, T, E> {
    pending: Arc<DashMap<K, Flight<T, E>>>,
}

impl<K, T, E> Clone for Singleflight<K, T, E> {
    fn clone(&self) -> Self {
        Self {
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<K, T, E> Default for Singleflight<K, T, E>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self {
            pending: Arc::new(DashMap::new()),
        }
    }
}

impl<K, T, E> Singleflight<K, T, E>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `work` unless a call for `key` is already in flight, in which case
    /// its result is awaited instead. `work` runs on its own task so a caller
    /// that disconnects does not cancel it for the others.
    pub async fn run<F>(&self, key: K, work: F) -> Result<T, FlightError<E>>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        let flight = match self.pending.entry(key.clone()) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                let (tx, rx) = oneshot::channel();
                let flight = rx.shared();
                entry.insert(flight.clone());

                let pending = Arc::clone(&self.pending);
                tokio::spawn(async move {
                    let outcome = AssertUnwindSafe(work).catch_unwind().await;
                    pending.remove(&key);
                    // A panic drops `tx`, which waiters observe as `Aborted`.
                    if let Ok(result) = outcome {
                        let _ = tx.send(result.map_err(Arc::new));
                    }
                });
                flight
            }
        };

        match flight.await {
            Ok(result) => result.map_err(FlightError::Failed),
            Err(_) => Err(FlightError::Aborted),
        }
    }

    #[cfg(test)]
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }
}
