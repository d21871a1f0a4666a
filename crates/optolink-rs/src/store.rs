// crates/optolink-rs/src/store.rs

//! The process-wide handle to the current model generation.

use crate::model::Model;
use log::{debug, info};
use std::sync::{Arc, RwLock};

/// Holds the currently active [`Model`] generation.
///
/// The store starts unloaded and is replaced wholesale on each successful
/// reload. Readers take a [`snapshot`](ModelStore::snapshot) once per
/// logical operation and keep using that `Arc`; a concurrent swap then
/// cannot pull the generation out from under them. The displaced
/// generation is released as a unit once its last snapshot is dropped.
#[derive(Debug, Default)]
pub struct ModelStore {
    current: RwLock<Option<Arc<Model>>>,
}

impl ModelStore {
    /// Creates an unloaded store.
    pub fn new() -> Self {
        ModelStore {
            current: RwLock::new(None),
        }
    }

    /// True once a generation has been installed.
    pub fn is_loaded(&self) -> bool {
        self.current.read().unwrap().is_some()
    }

    /// Captures the active generation.
    ///
    /// Returns `None` while the store is unloaded. Callers must capture
    /// once per logical operation rather than re-reading mid-use.
    pub fn snapshot(&self) -> Option<Arc<Model>> {
        self.current.read().unwrap().clone()
    }

    /// Installs a fully compiled generation, replacing the previous one.
    ///
    /// The swap is a single pointer replacement; readers observe either
    /// the old generation or the new one, never a half-built model.
    pub fn install(&self, model: Model) -> Arc<Model> {
        let generation = Arc::new(model);
        let previous = self
            .current
            .write()
            .unwrap()
            .replace(Arc::clone(&generation));
        match previous {
            Some(old) => debug!(
                "replaced model generation ({} devices -> {} devices)",
                old.devices.len(),
                generation.devices.len()
            ),
            None => info!(
                "installed initial model generation ({} devices)",
                generation.devices.len()
            ),
        }
        generation
    }

    /// Tears the active generation down, returning to the unloaded state.
    pub fn clear(&self) {
        self.current.write().unwrap().take();
    }
}
