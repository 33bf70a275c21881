//! Config Handle - owner of the published configuration snapshot
//!
//! Holds everything a load pass needs and publishes each result wholesale
//! through a `watch` channel. Consumers either keep a receiver from
//! [`ConfigHandle::subscribe`] or take the current snapshot; they never see a
//! partially rebuilt device list.
//!
//! ```text
//! reload() ──► load() ──► Arc<Snapshot> ──► watch::Sender ──► Receivers
//! ```

use super::{load, open_source, LoadError, LoadOutcome, Snapshot};
use crate::config::Settings;
use crate::controller::InputBackend;
use crate::source::{ConfigSource, SourceError};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

type SourceFactory = Box<dyn Fn() -> Result<Option<Box<dyn ConfigSource>>, SourceError>>;

pub struct ConfigHandle {
    settings: Settings,
    backend: Box<dyn InputBackend>,
    source: SourceFactory,
    sender: watch::Sender<Arc<Snapshot>>,
}

impl ConfigHandle {
    /// Handle reading the mapping file named in `settings` on every reload
    pub fn new(settings: Settings, backend: Box<dyn InputBackend>) -> Self {
        let path = settings.config_path.clone();
        Self::with_source(settings, backend, move || open_source(&path))
    }

    /// Handle obtaining a fresh configuration source from `source` on every reload
    pub fn with_source<F>(settings: Settings, backend: Box<dyn InputBackend>, source: F) -> Self
    where
        F: Fn() -> Result<Option<Box<dyn ConfigSource>>, SourceError> + 'static,
    {
        let (sender, _) = watch::channel(Arc::new(Snapshot::empty(LoadOutcome::Pending)));
        Self {
            settings,
            backend,
            source: Box::new(source),
            sender,
        }
    }

    /// Runs a full load pass and publishes its result
    ///
    /// On error an empty snapshot is published and the error is returned.
    pub fn reload(&mut self) -> Result<Arc<Snapshot>, LoadError> {
        info!("Reloading configuration");
        let result = (self.source)()
            .map_err(LoadError::from)
            .and_then(|source| load(&self.settings, source, self.backend.as_mut()));

        match result {
            Ok(snapshot) => Ok(self.publish(snapshot)),
            Err(e) => {
                error!("Configuration reload failed: {}", e);
                self.publish(Snapshot::empty(LoadOutcome::Failed(e.to_string())));
                Err(e)
            }
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.sender.subscribe()
    }

    pub fn current(&self) -> Arc<Snapshot> {
        self.sender.borrow().clone()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn publish(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        self.sender.send_replace(snapshot.clone());
        snapshot
    }
}
