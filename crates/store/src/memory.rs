//! Keyed in-memory store with generated sequential identifiers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use orderflow_core::id::EntityId;
use orderflow_core::Entity;

/// Seed for the per-store id counter (ids start at `XXX-1001`).
const FIRST_SEQ: u64 = 1001;

/// Keyed entity store abstraction.
///
/// One implementation exists (`InMemoryStore`); the trait keeps engines
/// decoupled from it so tests can substitute instrumented fakes.
pub trait EntityStore<E: Entity>: Send + Sync {
    /// Snapshot read of a single entity.
    fn get(&self, id: E::Id) -> Option<E>;

    /// Insert a new entity, assigning the next generated identifier.
    fn create(&self, build: impl FnOnce(E::Id) -> E) -> E;

    /// Overwrite an existing entity (or insert one carrying a known id).
    fn put(&self, entity: E);

    /// Mutate an entity in place under the store's write lock.
    ///
    /// The closure runs while the lock is held, so the read-compute-write
    /// sequence is atomic relative to every other access to this store.
    /// Returns `None` when the id does not resolve.
    fn update<R>(&self, id: E::Id, apply: impl FnOnce(&mut E) -> R) -> Option<R>;

    fn delete(&self, id: E::Id) -> bool;

    /// Snapshot of all entities, in unspecified order.
    fn list_all(&self) -> Vec<E>;

    /// Remove everything and reset the id counter (reseed support).
    fn clear(&self);
}

/// In-memory store: `RwLock`'d map plus an atomic id counter.
#[derive(Debug)]
pub struct InMemoryStore<E: Entity> {
    inner: RwLock<HashMap<E::Id, E>>,
    next_seq: AtomicU64,
}

impl<E: Entity> InMemoryStore<E> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            next_seq: AtomicU64::new(FIRST_SEQ),
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn next_id(&self) -> E::Id {
        E::Id::from_seq(self.next_seq.fetch_add(1, Ordering::SeqCst))
    }
}

impl<E: Entity> Default for InMemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> EntityStore<E> for InMemoryStore<E> {
    fn get(&self, id: E::Id) -> Option<E> {
        let map = self.inner.read().expect("store lock poisoned");
        map.get(&id).cloned()
    }

    fn create(&self, build: impl FnOnce(E::Id) -> E) -> E {
        let entity = build(self.next_id());
        let mut map = self.inner.write().expect("store lock poisoned");
        map.insert(entity.id(), entity.clone());
        entity
    }

    fn put(&self, entity: E) {
        let mut map = self.inner.write().expect("store lock poisoned");
        map.insert(entity.id(), entity);
    }

    fn update<R>(&self, id: E::Id, apply: impl FnOnce(&mut E) -> R) -> Option<R> {
        let mut map = self.inner.write().expect("store lock poisoned");
        map.get_mut(&id).map(apply)
    }

    fn delete(&self, id: E::Id) -> bool {
        let mut map = self.inner.write().expect("store lock poisoned");
        map.remove(&id).is_some()
    }

    fn list_all(&self) -> Vec<E> {
        let map = self.inner.read().expect("store lock poisoned");
        map.values().cloned().collect()
    }

    fn clear(&self) {
        let mut map = self.inner.write().expect("store lock poisoned");
        map.clear();
        self.next_seq.store(FIRST_SEQ, Ordering::SeqCst);
    }
}

impl<E: Entity, S: EntityStore<E> + ?Sized> EntityStore<E> for Arc<S> {
    fn get(&self, id: E::Id) -> Option<E> {
        (**self).get(id)
    }

    fn create(&self, build: impl FnOnce(E::Id) -> E) -> E {
        (**self).create(build)
    }

    fn put(&self, entity: E) {
        (**self).put(entity)
    }

    fn update<R>(&self, id: E::Id, apply: impl FnOnce(&mut E) -> R) -> Option<R> {
        (**self).update(id, apply)
    }

    fn delete(&self, id: E::Id) -> bool {
        (**self).delete(id)
    }

    fn list_all(&self) -> Vec<E> {
        (**self).list_all()
    }

    fn clear(&self) {
        (**self).clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderflow_core::id::ProductId;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Widget {
        id: ProductId,
        name: String,
    }

    impl Entity for Widget {
        type Id = ProductId;

        fn id(&self) -> ProductId {
            self.id
        }
    }

    fn widget(id: ProductId, name: &str) -> Widget {
        Widget {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn create_assigns_monotonic_ids_from_1001() {
        let store = InMemoryStore::<Widget>::new();
        let a = store.create(|id| widget(id, "a"));
        let b = store.create(|id| widget(id, "b"));
        assert_eq!(a.id.to_string(), "PRD-1001");
        assert_eq!(b.id.to_string(), "PRD-1002");
    }

    #[test]
    fn get_returns_a_snapshot_clone() {
        let store = InMemoryStore::<Widget>::new();
        let created = store.create(|id| widget(id, "a"));
        let mut read = store.get(created.id).unwrap();
        read.name = "mutated".to_string();
        assert_eq!(store.get(created.id).unwrap().name, "a");
    }

    #[test]
    fn update_mutates_in_place_and_reports_absence() {
        let store = InMemoryStore::<Widget>::new();
        let created = store.create(|id| widget(id, "a"));
        let out = store.update(created.id, |w| {
            w.name = "b".to_string();
            42
        });
        assert_eq!(out, Some(42));
        assert_eq!(store.get(created.id).unwrap().name, "b");
        assert_eq!(store.update(ProductId::from_seq(9), |_| ()), None);
    }

    #[test]
    fn clear_resets_the_id_counter() {
        let store = InMemoryStore::<Widget>::new();
        store.create(|id| widget(id, "a"));
        store.create(|id| widget(id, "b"));
        store.clear();
        assert!(store.list_all().is_empty());
        let again = store.create(|id| widget(id, "c"));
        assert_eq!(again.id.to_string(), "PRD-1001");
    }

    #[test]
    fn concurrent_creates_never_collide() {
        let store = Arc::new(InMemoryStore::<Widget>::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    store.create(|id| widget(id, "x"));
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        let all = store.list_all();
        assert_eq!(all.len(), 800);
        let mut seqs: Vec<u64> = all.iter().map(|w| w.id.seq()).collect();
        seqs.sort_unstable();
        seqs.dedup();
        assert_eq!(seqs.len(), 800);
    }
}
