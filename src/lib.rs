pub mod error;
pub mod intake;
pub mod notify;
pub mod publish;
pub mod stages;
pub mod store;
pub mod types;
pub mod workflow;

use std::sync::Arc;

use notify::{Notification, NotificationSink, NullSink};
use store::{KeyValueStore, MemoryStore, KEY_USER_DATA};
use types::{UserData, WorkflowConfig};

/// Application context — one per session, handed to components at
/// construction. Owns the config and the external collaborators (the
/// persisted store and the notification sink).
#[derive(Clone)]
pub struct AppContext {
    pub config: WorkflowConfig,
    pub store: Arc<dyn KeyValueStore>,
    pub notifier: Arc<dyn NotificationSink>,
}

impl AppContext {
    pub fn new(
        config: WorkflowConfig,
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            config,
            store,
            notifier,
        }
    }

    /// Default wiring: in-process store, discarded notifications.
    pub fn in_memory() -> Self {
        Self::new(
            WorkflowConfig::default(),
            Arc::new(MemoryStore::new()),
            Arc::new(NullSink),
        )
    }

    /// Session identity under the `userData` key, if the login page wrote
    /// one. This core never writes the key.
    pub fn current_user(&self) -> Option<UserData> {
        let raw = self.store.get(KEY_USER_DATA)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                tracing::warn!(%err, "malformed userData record ignored");
                None
            }
        }
    }

    pub(crate) fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }
}
