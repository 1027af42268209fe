//! The editor shell: wires uploads into the cropper, the cropper into
//! the store, and the export button into the capture pipeline.
//!
//! Holds only transient UI flags (export in flight, cropper source,
//! popup visibility); durable state lives in the [`ConfigStore`].

use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::LdTrash2;
use mailmock_core::{ConfigField, EXPORT_SCALE, export_filename};

use crate::capture::{self, CaptureError};
use crate::download::{self, DownloadError};
use crate::raster::CropSource;
use crate::store::ConfigStore;

use super::cropper::ImageCropper;
use super::email_view::EmailView;
use super::export_popup::ExportPopup;

/// Element id of the exportable preview subtree.
const PREVIEW_REGION_ID: &str = "email-preview";

/// Failures along the export path, folded into one UI-visible state.
#[derive(Debug, thiserror::Error)]
enum ExportError {
    /// The preview subtree is not in the document.
    #[error("preview subtree not found")]
    MissingPreview,

    /// Capturing the subtree failed.
    #[error(transparent)]
    Capture(#[from] CaptureError),

    /// Triggering the download failed.
    #[error(transparent)]
    Download(#[from] DownloadError),
}

/// Top-level editor component.
#[component]
pub fn Editor() -> Element {
    let store = use_context::<ConfigStore>();
    let mut exporting = use_signal(|| false);
    let mut export_error = use_signal(|| Option::<String>::None);
    let mut upload_error = use_signal(|| Option::<String>::None);
    let mut cropper_source = use_signal(|| Option::<Rc<CropSource>>::None);
    // Bumped per upload; keys the cropper so each new image mounts with
    // a fresh centered selection.
    let mut crop_session = use_signal(|| 0u32);
    let mut show_export_popup = use_signal(|| false);

    let on_avatar_upload = move |bytes: Vec<u8>| match CropSource::from_bytes(&bytes) {
        Ok(source) => {
            upload_error.set(None);
            crop_session += 1;
            cropper_source.set(Some(Rc::new(source)));
        }
        Err(e) => upload_error.set(Some(format!("Could not read that image: {e}"))),
    };

    let on_crop_complete = move |url: String| {
        store.update(ConfigField::ProfilePicture, url);
    };

    let on_cropper_close = move |()| cropper_source.set(None);

    let export_click = move |_| {
        // At most one export in flight; a second click is a no-op.
        if *exporting.peek() {
            return;
        }
        exporting.set(true);
        export_error.set(None);
        spawn(async move {
            // Yield to the browser event loop so the disabled button
            // state paints before the capture work starts.
            gloo_timers::future::TimeoutFuture::new(0).await;

            match export_preview().await {
                Ok(()) => show_export_popup.set(true),
                Err(e) => {
                    web_sys::console::error_1(&format!("export failed: {e}").into());
                    export_error.set(Some("Export failed. Please try again.".into()));
                }
            }
            exporting.set(false);
        });
    };

    rsx! {
        div { class: "flex flex-col items-center",
            // Action bar
            div { class: "mb-4 flex gap-2",
                button {
                    class: "button-primary",
                    disabled: exporting(),
                    onclick: export_click,
                    if exporting() { "Exporting..." } else { "Export as PNG" }
                }
                button {
                    class: "button-outline flex items-center gap-2",
                    onclick: move |_| store.reset(),
                    Icon { icon: LdTrash2, width: 16, height: 16 }
                    "Clear All"
                }
            }

            if let Some(ref err) = export_error() {
                p { class: "text-sm text-red-700 mb-2", "{err}" }
            }
            if let Some(ref err) = upload_error() {
                p { class: "text-sm text-red-700 mb-2", "{err}" }
            }

            // The exportable subtree.
            div { id: PREVIEW_REGION_ID,
                EmailView { on_avatar_upload: on_avatar_upload }
            }

            if let Some(ref source) = cropper_source() {
                ImageCropper {
                    key: "{crop_session}",
                    source: Rc::clone(source),
                    on_crop_complete: on_crop_complete,
                    on_close: on_cropper_close,
                }
            }

            ExportPopup {
                is_open: show_export_popup(),
                on_close: move |()| show_export_popup.set(false),
            }
        }
    }
}

/// Capture the preview subtree, name the artifact from the current
/// timestamp, and hand it to the browser as a download.
#[allow(clippy::future_not_send)] // WASM is single-threaded; DOM types are !Send
async fn export_preview() -> Result<(), ExportError> {
    let element = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(PREVIEW_REGION_ID))
        .ok_or(ExportError::MissingPreview)?;

    let png = capture::capture_element_png(&element, EXPORT_SCALE).await?;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let millis = js_sys::Date::now().max(0.0) as u64;
    let filename = export_filename(millis);

    download::trigger_download(&png, &filename, "image/png")?;
    Ok(())
}
