//! Dioxus UI components for mailmock.
//!
//! Provides the editor shell, the editable mock-message preview, the
//! avatar cropper dialog, and the post-export popup.

mod cropper;
mod editor;
mod email_view;
mod export_popup;

pub use cropper::ImageCropper;
pub use editor::Editor;
pub use email_view::EmailView;
pub use export_popup::ExportPopup;
