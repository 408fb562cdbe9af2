//! Memoisation of per-directory resolution results.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::BundleResult;
use crate::models::FileListsByAssetType;

/// Computation handed to a [`CacheHelper`] on a miss.
pub type ComputeFn<'a> = dyn FnMut() -> BundleResult<FileListsByAssetType> + 'a;

/// Cache collaborator used by the dependency resolver.
///
/// Implementations must run at most one computation per key at a time: concurrent callers
/// asking for the same key wait for the first computation instead of starting their own.
/// Failed computations must not be stored.
pub trait CacheHelper: Send + Sync {
  /// Return the cached value for `key`, computing and storing it on a miss.
  fn get_or_compute(
    &self,
    key: &str,
    compute: &mut ComputeFn<'_>,
  ) -> BundleResult<FileListsByAssetType>;
}

type Slot = Arc<Mutex<Option<FileListsByAssetType>>>;

/// In-process cache with one lock per key.
#[derive(Debug, Default)]
pub struct MemoryCache {
  slots: Mutex<HashMap<String, Slot>>,
}

impl MemoryCache {
  /// Empty cache.
  pub fn new() -> Self {
    Self::default()
  }

  /// Drop the entry for `key`, e.g. after files in that directory changed.
  pub fn invalidate(&self, key: &str) {
    self.slots.lock().remove(key);
  }

  /// Drop every entry.
  pub fn clear(&self) {
    self.slots.lock().clear();
  }

  /// Number of keys holding a computed value.
  ///
  /// Keys whose computation is still running on another thread are not counted.
  pub fn len(&self) -> usize {
    self
      .slots
      .lock()
      .values()
      .filter(|slot| slot.try_lock().is_some_and(|value| value.is_some()))
      .count()
  }

  /// Returns `true` when no value has been computed yet.
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  fn slot(&self, key: &str) -> Slot {
    let mut slots = self.slots.lock();
    Arc::clone(slots.entry(key.to_string()).or_default())
  }

  /// Drop the slot for `key` after a failed computation, unless another caller is waiting on it.
  fn release_failed(&self, key: &str, slot: &Slot) {
    let mut slots = self.slots.lock();
    // Clones are only handed out under this lock, so two owners means the map and `slot`.
    let unused = slots
      .get(key)
      .is_some_and(|stored| Arc::ptr_eq(stored, slot) && Arc::strong_count(slot) == 2);
    if unused {
      slots.remove(key);
    }
  }

  #[cfg(test)]
  fn slot_count(&self) -> usize {
    self.slots.lock().len()
  }
}

impl CacheHelper for MemoryCache {
  fn get_or_compute(
    &self,
    key: &str,
    compute: &mut ComputeFn<'_>,
  ) -> BundleResult<FileListsByAssetType> {
    let slot = self.slot(key);
    let mut value = slot.lock();
    if let Some(cached) = value.as_ref() {
      tracing::debug!(key, "asset cache hit");
      return Ok(cached.clone());
    }

    tracing::debug!(key, "asset cache miss");
    match compute() {
      Ok(computed) => {
        *value = Some(computed.clone());
        Ok(computed)
      }
      Err(err) => {
        drop(value);
        self.release_failed(key, &slot);
        Err(err)
      }
    }
  }
}

/// Cache that never stores anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl CacheHelper for NoCache {
  fn get_or_compute(
    &self,
    _key: &str,
    compute: &mut ComputeFn<'_>,
  ) -> BundleResult<FileListsByAssetType> {
    compute()
  }
}
