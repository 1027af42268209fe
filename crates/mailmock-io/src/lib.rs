//! mailmock-io: Browser I/O and Dioxus component library.
//!
//! Handles localStorage persistence, contenteditable reads, DOM
//! subtree capture, Blob downloads, data-URL encoding, the waitlist
//! network call, and provides the UI components for the mailmock web
//! application.

pub mod capture;
pub mod components;
pub mod download;
pub mod editable;
pub mod raster;
pub mod storage;
pub mod store;
pub mod waitlist;

pub use components::{Editor, EmailView, ExportPopup, ImageCropper};
pub use store::{ConfigStore, use_config_store};
