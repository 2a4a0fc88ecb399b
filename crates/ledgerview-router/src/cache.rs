//! Single-flight cache for deferred views
//!
//! Each key owns one `OnceCell`. Concurrent loads of the same key wait on the
//! same cell, so a factory runs at most once at a time per key. Successful
//! loads stay cached for the life of the cache; a failed load leaves the cell
//! empty and the next caller tries again.

use crate::error::{RouterError, RouterResult};
use crate::views::{View, ViewFactory};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

type Slot = Arc<OnceCell<Arc<View>>>;

/// Cache of loaded views keyed by `route/slot`
#[derive(Debug, Default)]
pub struct ViewCache {
    slots: Mutex<HashMap<String, Slot>>,
    loads: AtomicUsize,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache key for a route slot
    pub fn key(route: &str, slot: &str) -> String {
        format!("{}/{}", route, slot)
    }

    fn slot(&self, key: &str) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        slots.entry(key.to_string()).or_default().clone()
    }

    /// Return the cached view or run the factory, collapsing concurrent loads
    pub async fn get_or_load(
        &self,
        route: &str,
        slot: &str,
        factory: &Arc<dyn ViewFactory>,
    ) -> RouterResult<Arc<View>> {
        let key = Self::key(route, slot);
        let cell = self.slot(&key);

        if let Some(view) = cell.get() {
            log::debug!("View cache hit for {}", key);
            return Ok(view.clone());
        }

        let view = cell
            .get_or_try_init(|| async {
                self.loads.fetch_add(1, Ordering::SeqCst);
                log::info!("Loading deferred view for {}", key);
                match factory.load().await {
                    Ok(view) => Ok(Arc::new(view)),
                    Err(message) => {
                        log::warn!("Deferred view for {} failed to load: {}", key, message);
                        Err(RouterError::ViewLoad {
                            route: route.to_string(),
                            message,
                        })
                    }
                }
            })
            .await?;

        Ok(view.clone())
    }

    /// Whether a view has been loaded for this route slot
    pub fn is_cached(&self, route: &str, slot: &str) -> bool {
        let slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        slots
            .get(&Self::key(route, slot))
            .map_or(false, |cell| cell.initialized())
    }

    /// Number of factory invocations so far
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}
