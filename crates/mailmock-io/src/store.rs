//! Reactive configuration store.
//!
//! [`ConfigStore`] wraps the [`EmailConfig`] record in a Dioxus signal
//! and writes every mutation through to localStorage.  Components read
//! via [`ConfigStore::get`] (which subscribes them to changes) and
//! mutate via point updates; the record itself stays total at all
//! times (see `mailmock-core::config`).

use dioxus::prelude::*;
use mailmock_core::{ConfigField, EmailConfig};

use crate::storage;

/// Handle to the shared configuration record.
///
/// Cheap to copy; hand it around via context.  Updates are applied in
/// handler order; each touches a single field, so edits to different
/// fields cannot clobber each other, and two rapid edits to the same
/// field are last-write-wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfigStore {
    config: Signal<EmailConfig>,
}

impl ConfigStore {
    /// Current record.  Subscribes the calling scope to changes.
    #[must_use]
    pub fn get(&self) -> EmailConfig {
        self.config.read().clone()
    }

    /// Replace exactly one field, leaving the others untouched, and
    /// persist the result.
    pub fn update(&self, field: ConfigField, value: impl Into<String>) {
        let next = self.config.peek().updated(field, value);
        persist(&next);
        let mut config = self.config;
        config.set(next);
    }

    /// Restore the compiled-in default record and persist it.
    pub fn reset(&self) {
        let defaults = EmailConfig::default();
        persist(&defaults);
        let mut config = self.config;
        config.set(defaults);
    }
}

/// Create the store, hydrating from localStorage when a persisted
/// record exists.
///
/// Call once at the app root and share the handle via
/// `use_context_provider`.
#[must_use]
pub fn use_config_store() -> ConfigStore {
    let config = use_signal(|| storage::load().unwrap_or_default());
    ConfigStore { config }
}

/// Write-through persistence; the in-memory record stays authoritative
/// if the write fails.
fn persist(config: &EmailConfig) {
    if let Err(e) = storage::save(config) {
        web_sys::console::warn_1(&format!("config persistence failed: {e}").into());
    }
}
