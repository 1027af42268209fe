//! localStorage persistence for the editable configuration.
//!
//! The serialized record lives under one fixed key.  Reads happen once
//! at startup (hydration); writes happen on every mutation.  All
//! functions require a browser environment (`wasm32-unknown-unknown`
//! target).

use mailmock_core::EmailConfig;
use wasm_bindgen::JsValue;

/// Fixed storage identifier for the persisted record.
pub const STORAGE_KEY: &str = "email-editor-storage";

/// Errors that can occur when persisting the configuration.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// `window.localStorage` is missing or access to it was denied.
    #[error("localStorage unavailable")]
    Unavailable,

    /// A browser API call returned an error (e.g., quota exceeded).
    #[error("browser API error: {0}")]
    JsError(String),

    /// The record could not be serialized.
    #[error("serialization failed: {0}")]
    Serialize(String),
}

impl From<JsValue> for StorageError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Load the persisted record, if a usable one exists.
///
/// Returns `None` when storage is unavailable, the key is absent, or
/// the stored JSON does not parse; hydration falls back to defaults
/// in all of those cases rather than failing startup.
#[must_use]
pub fn load() -> Option<EmailConfig> {
    let storage = local_storage().ok()?;
    let raw = storage.get_item(STORAGE_KEY).ok()??;
    serde_json::from_str(&raw).ok()
}

/// Persist the record under [`STORAGE_KEY`].
///
/// # Errors
///
/// Returns [`StorageError::Unavailable`] when localStorage is missing,
/// [`StorageError::Serialize`] if the record cannot be serialized, and
/// [`StorageError::JsError`] if the write itself fails (e.g., quota).
pub fn save(config: &EmailConfig) -> Result<(), StorageError> {
    let storage = local_storage()?;
    let json = serde_json::to_string(config).map_err(|e| StorageError::Serialize(e.to_string()))?;
    storage.set_item(STORAGE_KEY, &json)?;
    Ok(())
}

/// Obtain `window.localStorage`.
fn local_storage() -> Result<web_sys::Storage, StorageError> {
    let window = web_sys::window().ok_or(StorageError::Unavailable)?;
    window
        .local_storage()
        .map_err(StorageError::from)?
        .ok_or(StorageError::Unavailable)
}
