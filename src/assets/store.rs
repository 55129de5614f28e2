use std::{
    collections::HashMap,
    sync::{Arc, Mutex, OnceLock},
};

use crate::{
    assets::decode::{PreparedImage, decode_image_source},
    foundation::error::{ForgeError, ForgeResult},
};

type DecodeSlot = Arc<OnceLock<Result<Arc<PreparedImage>, String>>>;

/// Deduplicating image decode cache.
///
/// Guarantees at most one in-flight decode per distinct source string:
/// concurrent callers for the same source share one decode via a pending map
/// of once-cells. Completed decodes are cached by source string and reused
/// while the entry still reports non-zero dimensions; a broken entry is
/// treated as a miss and redecoded. Failures are never cached, so a source
/// that later becomes readable decodes on the next load.
///
/// The cache is unbounded: source strings are few and session-scoped. Hosts
/// running huge multi-session batches should call [`ImageCache::clear`]
/// between sessions.
#[derive(Default)]
pub struct ImageCache {
    loaded: Mutex<HashMap<String, Arc<PreparedImage>>>,
    pending: Mutex<HashMap<String, DecodeSlot>>,
}

impl ImageCache {
    /// Construct an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `src`, or return the cached decode for it.
    pub fn load(&self, src: &str) -> ForgeResult<Arc<PreparedImage>> {
        if let Some(img) = self.lookup_valid(src) {
            return Ok(img);
        }

        let slot = {
            let mut pending = self.pending.lock().expect("image cache pending lock");
            pending
                .entry(src.to_string())
                .or_insert_with(|| Arc::new(OnceLock::new()))
                .clone()
        };

        // First caller runs the decode; racers block here until it finishes.
        let outcome = slot
            .get_or_init(|| decode_image_source(src).map(Arc::new).map_err(|e| e.to_string()))
            .clone();

        {
            let mut pending = self.pending.lock().expect("image cache pending lock");
            pending.remove(src);
        }

        match outcome {
            Ok(img) => {
                let mut loaded = self.loaded.lock().expect("image cache loaded lock");
                loaded.insert(src.to_string(), img.clone());
                Ok(img)
            }
            Err(msg) => Err(ForgeError::decode(msg)),
        }
    }

    /// Drop all cached and pending entries.
    pub fn clear(&self) {
        self.loaded.lock().expect("image cache loaded lock").clear();
        self.pending
            .lock()
            .expect("image cache pending lock")
            .clear();
    }

    /// Number of completed cache entries (diagnostics and tests).
    pub fn len(&self) -> usize {
        self.loaded.lock().expect("image cache loaded lock").len()
    }

    /// Whether the cache holds no completed entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup_valid(&self, src: &str) -> Option<Arc<PreparedImage>> {
        let mut loaded = self.loaded.lock().expect("image cache loaded lock");
        match loaded.get(src) {
            Some(img) if img.width > 0 && img.height > 0 => Some(img.clone()),
            Some(_) => {
                // Stale or broken entry: drop it and redecode.
                loaded.remove(src);
                None
            }
            None => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
