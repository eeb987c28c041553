use super::result::PathTranslationResult;
use crate::error::MapResult;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

/// Path cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

impl PathCacheStats {
    /// Cache hit ratio (0.0 - 1.0). Returns 0.0 if no lookups have occurred.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

type Slot = Arc<OnceLock<MapResult<Arc<PathTranslationResult>>>>;

/// Compute-once memo of translation results, failures included.
///
/// The map lock is held only to find or create a key's slot. The translation
/// itself runs in the slot, so concurrent callers of one key wait for a single
/// computation while other keys proceed.
#[derive(Debug, Default)]
pub(crate) struct ResultCache {
    slots: Mutex<HashMap<String, Slot>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResultCache {
    pub(crate) fn get_or_translate<F>(
        &self,
        key: String,
        translate: F,
    ) -> MapResult<Arc<PathTranslationResult>>
    where
        F: FnOnce() -> MapResult<PathTranslationResult>,
    {
        let slot = {
            let mut slots = self.slots.lock().expect("path cache mutex poisoned");
            Arc::clone(slots.entry(key).or_default())
        };

        let mut computed = false;
        let result = slot.get_or_init(|| {
            computed = true;
            translate().map(Arc::new)
        });
        if computed {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        result.clone()
    }

    pub(crate) fn stats(&self) -> PathCacheStats {
        let slots = self.slots.lock().expect("path cache mutex poisoned");
        PathCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: slots.len(),
        }
    }
}
