use std::sync::{Arc, Mutex, PoisonError};

/// Errors surfaced by snapshot stores. Kept as a boxed trait object so the
/// persistence backend stays swappable behind the trait.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Storage seam for the registry/ledger collections: the entire collection
/// is loaded once at open and rewritten wholesale on every mutation. There
/// is no incremental append protocol; the in-memory copy is the source of
/// truth for the life of the process.
pub trait SnapshotStore<R>: Send + Sync {
    fn load(&self) -> Result<Vec<R>, StoreError>;
    fn save(&self, rows: &[R]) -> Result<(), StoreError>;
}

/// In-memory store, used by tests and any caller that does not need
/// durability. Clones share the same backing rows.
#[derive(Clone)]
pub struct MemoryStore<R> {
    rows: Arc<Mutex<Vec<R>>>,
}

impl<R> MemoryStore<R> {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Clone + Send + Sync> SnapshotStore<R> for MemoryStore<R> {
    fn load(&self) -> Result<Vec<R>, StoreError> {
        let rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(rows.clone())
    }

    fn save(&self, rows: &[R]) -> Result<(), StoreError> {
        let mut guard = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = rows.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_and_shares_rows() {
        let store = MemoryStore::new();
        let handle = store.clone();

        store.save(&[1u32, 2, 3]).unwrap();
        assert_eq!(handle.load().unwrap(), vec![1, 2, 3]);

        store.save(&[9u32]).unwrap();
        assert_eq!(handle.load().unwrap(), vec![9]);
    }
}
