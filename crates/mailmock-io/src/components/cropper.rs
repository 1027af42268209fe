//! Modal avatar cropper.
//!
//! Shows the uploaded image scaled into a bounded viewport with a
//! draggable, resizable square selection (masked as a circle).  The
//! geometry lives in `mailmock-core::crop`; this component only turns
//! mouse events into display-pixel deltas and renders the result.
//!
//! The parent remounts this component (via a `key`) for each new
//! source image, so the selection state always starts fresh from the
//! centered default.

use std::rc::Rc;

use dioxus::prelude::*;
use mailmock_core::crop::{self, CropRect, Dimensions};

use crate::raster::{self, CropSource};

/// Bounded viewport the source image is scaled to fit.
const VIEWPORT: Dimensions = Dimensions {
    width: 560,
    height: 384,
};

/// An in-progress mouse interaction with the selection.
#[derive(Debug, Clone, Copy)]
struct Drag {
    mode: DragMode,
    /// Last pointer position in client coordinates; deltas between
    /// events are space-independent, so client space works for both
    /// moving and resizing.
    last: (f64, f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragMode {
    Move,
    Resize,
}

/// Props for the [`ImageCropper`] component.
#[derive(Props, Clone)]
pub struct ImageCropperProps {
    /// The staged upload being cropped.
    source: Rc<CropSource>,
    /// Called with the cropped avatar as a JPEG data URL.
    on_crop_complete: EventHandler<String>,
    /// Called when the dialog closes (after Apply or on Cancel).
    on_close: EventHandler<()>,
}

impl PartialEq for ImageCropperProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.source, &other.source)
    }
}

/// Crop dialog: Closed -> awaiting selection -> committed -> Closed.
///
/// Cancel closes without invoking the completion callback; Apply
/// resolves the selection into source pixels, copies that square 1:1,
/// and hands the encoded result to the caller before closing.
#[component]
pub fn ImageCropper(props: ImageCropperProps) -> Element {
    let natural = props.source.natural();
    let display = crop::fit_within(natural, VIEWPORT);

    let mut selection = use_signal(|| CropRect::initial(display));
    let mut drag = use_signal(|| Option::<Drag>::None);
    let mut apply_error = use_signal(|| Option::<String>::None);

    let begin_move = move |evt: MouseEvent| {
        evt.prevent_default();
        let point = evt.client_coordinates();
        drag.set(Some(Drag {
            mode: DragMode::Move,
            last: (point.x, point.y),
        }));
    };

    let begin_resize = move |evt: MouseEvent| {
        evt.prevent_default();
        evt.stop_propagation();
        let point = evt.client_coordinates();
        drag.set(Some(Drag {
            mode: DragMode::Resize,
            last: (point.x, point.y),
        }));
    };

    let track = move |evt: MouseEvent| {
        let Some(active) = *drag.peek() else {
            return;
        };
        let point = evt.client_coordinates();
        let dx = point.x - active.last.0;
        let dy = point.y - active.last.1;
        let next = match active.mode {
            DragMode::Move => selection.peek().dragged(dx, dy, display),
            // A single delta drives both dimensions; diagonal motion
            // averages out so the square grows smoothly.
            DragMode::Resize => selection.peek().resized((dx + dy) / 2.0, display),
        };
        selection.set(next);
        drag.set(Some(Drag {
            last: (point.x, point.y),
            ..active
        }));
    };

    let end_drag = move |_| drag.set(None);

    let apply = {
        let source = Rc::clone(&props.source);
        let on_crop_complete = props.on_crop_complete;
        let on_close = props.on_close;
        move |_| {
            // No committed selection (degenerate display box): no-op.
            let Some(rect) = crop::resolve(*selection.peek(), display, natural) else {
                return;
            };
            match raster::cropped_data_url(&source.image, rect) {
                Ok(url) => {
                    on_crop_complete.call(url);
                    on_close.call(());
                }
                Err(e) => apply_error.set(Some(format!("Crop failed: {e}"))),
            }
        }
    };

    let rect = selection();
    let selection_style = format!(
        "left: {:.4}%; top: {:.4}%; width: {:.4}%; height: {:.4}%;",
        rect.x, rect.y, rect.width, rect.height,
    );
    let stage_style = format!(
        "width: {}px; height: {}px;",
        display.width, display.height,
    );

    rsx! {
        div { class: "modal-backdrop fixed inset-0 flex items-center justify-center p-4",
            div { class: "modal-panel bg-white rounded-lg p-6",
                h2 { class: "text-xl font-semibold text-gray-900 mb-4", "Crop Profile Picture" }

                div { class: "flex justify-center",
                    div {
                        class: "crop-stage relative",
                        style: "{stage_style}",
                        onmousemove: track,
                        onmouseup: end_drag,
                        onmouseleave: end_drag,

                        img {
                            class: "crop-image",
                            src: "{props.source.data_url}",
                            alt: "Crop me",
                            draggable: "false",
                        }
                        // Square selection, displayed as a circle; the
                        // committed raster is always the square.
                        div {
                            class: "crop-selection",
                            style: "{selection_style}",
                            onmousedown: begin_move,
                            div { class: "crop-handle", onmousedown: begin_resize }
                        }
                    }
                }

                if let Some(ref err) = apply_error() {
                    p { class: "text-sm text-red-700 mt-2", "{err}" }
                }

                div { class: "flex justify-end gap-2 mt-4",
                    button {
                        class: "button-outline",
                        onclick: move |_| props.on_close.call(()),
                        "Cancel"
                    }
                    button { class: "button-primary", onclick: apply, "Apply Crop" }
                }
            }
        }
    }
}
