// crates/optolink-rs-xcfg/src/reload.rs

//! The reload coordinator: compile a candidate off to the side, and only
//! swap it in once it compiled completely.

use crate::compiler::compile;
use crate::dom::Document;
use crate::error::XcfgError;
use log::{error, info, warn};
use optolink_rs::model::Model;
use optolink_rs::store::ModelStore;
use std::sync::{Arc, Mutex};

/// Drives initial loads and subsequent reloads of a [`ModelStore`].
///
/// A reload compiles an entire candidate generation without touching the
/// live one. On success the candidate is installed with a single pointer
/// swap; in-flight readers keep the snapshot they already took and the
/// displaced generation is freed when the last such snapshot drops. On any
/// failure the candidate is dropped and the live generation stays
/// authoritative.
///
/// Reloads do not nest: a request arriving while another reload is running
/// is rejected with [`XcfgError::ReloadInProgress`] rather than queued.
pub struct Reloader {
    store: Arc<ModelStore>,
    in_progress: Mutex<()>,
}

impl Reloader {
    pub fn new(store: Arc<ModelStore>) -> Reloader {
        Reloader {
            store,
            in_progress: Mutex::new(()),
        }
    }

    /// The store this coordinator installs into.
    pub fn store(&self) -> &Arc<ModelStore> {
        &self.store
    }

    /// Compiles `xml` and installs the result.
    ///
    /// Returns the newly installed generation so the caller can use it
    /// without a second store read.
    pub fn reload_from_str(&self, xml: &str) -> Result<Arc<Model>, XcfgError> {
        let Ok(_guard) = self.in_progress.try_lock() else {
            warn!("reload requested while another reload is in progress");
            return Err(XcfgError::ReloadInProgress);
        };

        let doc = Document::parse_str(xml).map_err(|e| {
            error!("configuration rejected, document not parseable: {}", e);
            e
        })?;
        let model = compile(&doc).map_err(|e| {
            error!("configuration rejected, keeping current model: {}", e);
            e
        })?;

        info!(
            "installing model generation ({} devices, default {})",
            model.devices.len(),
            model.config.device_id
        );
        Ok(self.store.install(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &str = r#"
        <V-Control>
          <protocols><protocol name="KW2"/></protocols>
          <devices><device ID="2094" name="V200KW2" protocol="KW2"/></devices>
          <commands>
            <command name="getTempA" protocmd="getaddr"><addr>0800</addr></command>
          </commands>
          <config><device ID="2094"/></config>
        </V-Control>"#;

    // Same shape, but the device references a protocol that is never
    // defined, which fails the compile after parsing succeeded.
    const BAD_PROTOCOL: &str = r#"
        <V-Control>
          <protocols><protocol name="KW2"/></protocols>
          <devices><device ID="2094" name="V200KW2" protocol="GWG"/></devices>
          <config><device ID="2094"/></config>
        </V-Control>"#;

    #[test]
    fn initial_load_installs() {
        let reloader = Reloader::new(Arc::new(ModelStore::new()));
        let model = reloader.reload_from_str(GOOD).unwrap();
        assert_eq!(model.config.device_id, "2094");
        assert!(reloader.store().is_loaded());
    }

    #[test]
    fn failed_reload_keeps_previous_generation() {
        let store = Arc::new(ModelStore::new());
        let reloader = Reloader::new(store.clone());

        let first = reloader.reload_from_str(GOOD).unwrap();
        let err = reloader.reload_from_str(BAD_PROTOCOL).unwrap_err();
        assert!(matches!(err, XcfgError::UnknownProtocol { .. }));

        let live = store.snapshot().unwrap();
        assert!(Arc::ptr_eq(&first, &live));
    }

    #[test]
    fn failed_initial_load_leaves_store_empty() {
        let reloader = Reloader::new(Arc::new(ModelStore::new()));
        assert!(reloader.reload_from_str("<V-Control>").is_err());
        assert!(!reloader.store().is_loaded());
    }

    #[test]
    fn successful_reload_replaces_generation() {
        let store = Arc::new(ModelStore::new());
        let reloader = Reloader::new(store.clone());

        let first = reloader.reload_from_str(GOOD).unwrap();
        let second = reloader.reload_from_str(GOOD).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&second, &store.snapshot().unwrap()));
        // Both generations answer the same queries.
        assert_eq!(
            first.device("2094").unwrap().command("getTempA").is_some(),
            second.device("2094").unwrap().command("getTempA").is_some()
        );
    }
}
