use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};
use std::future::Future;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use tracing::trace;

type ErasedSlot = Arc<dyn Any + Send + Sync>;

type TypedSlot<T> = Arc<OnceCell<Arc<T>>>;

/// A named cache entry, bound to the type of value it holds.
pub struct CacheKey<T> {
    name: &'static str,
    marker: PhantomData<fn() -> T>,
}

impl<T> CacheKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

fn new_slot<T: Send + Sync + 'static>() -> (ErasedSlot, TypedSlot<T>) {
    let slot: TypedSlot<T> = Arc::new(OnceCell::new());
    let erased: ErasedSlot = slot.clone();

    (erased, slot)
}

/// Memoizes expensive loads (subprocesses, file reads) for the lifetime
/// of the instance, keyed by a cache key and the workspace root it was
/// loaded for. Each pair is materialized at most once, and concurrent
/// callers for the same pair wait on the first producer.
#[derive(Default)]
pub struct DataCache {
    slots: Mutex<FxHashMap<(&'static str, TypeId, PathBuf), ErasedSlot>>,
}

impl DataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load_and_cache<T, E, F, Fut>(
        &self,
        key: &CacheKey<T>,
        scope: &Path,
        producer: F,
    ) -> Result<Arc<T>, E>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let name = key.name();
        let slot = self.get_slot(key, scope);

        if slot.initialized() {
            trace!(key = name, scope = ?scope, "Cache hit");
        }

        let value = slot
            .get_or_try_init(|| async move {
                trace!(key = name, scope = ?scope, "Cache miss, loading");

                Ok::<_, E>(Arc::new(producer().await?))
            })
            .await?;

        Ok(Arc::clone(value))
    }

    pub fn contains<T: Send + Sync + 'static>(&self, key: &CacheKey<T>, scope: &Path) -> bool {
        self.slots
            .lock()
            .unwrap_or_else(|error| error.into_inner())
            .get(&(key.name(), TypeId::of::<T>(), scope.to_path_buf()))
            .and_then(|slot| Arc::clone(slot).downcast::<OnceCell<Arc<T>>>().ok())
            .is_some_and(|slot| slot.initialized())
    }

    fn get_slot<T: Send + Sync + 'static>(&self, key: &CacheKey<T>, scope: &Path) -> TypedSlot<T> {
        let mut slots = self.slots.lock().unwrap_or_else(|error| error.into_inner());
        let id = (key.name(), TypeId::of::<T>(), scope.to_path_buf());

        if let Some(slot) = slots
            .get(&id)
            .and_then(|slot| Arc::clone(slot).downcast::<OnceCell<Arc<T>>>().ok())
        {
            return slot;
        }

        let (erased, slot) = new_slot::<T>();
        slots.insert(id, erased);
        slot
    }
}
