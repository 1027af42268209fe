//! mailmock-core: Pure domain logic for the email mockup editor (sans-IO).
//!
//! Owns the editable configuration record, the contenteditable line
//! encoding, crop-selection geometry and the 1:1 pixel crop, export
//! naming/supersampling math, and the waitlist request/response schema.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! strings and pixel buffers and returns structured data.  All browser
//! interaction (DOM, localStorage, canvas, fetch) lives in
//! `mailmock-io`.

pub mod config;
pub mod crop;
pub mod export;
pub mod lines;
pub mod waitlist;

pub use config::{ConfigField, EmailConfig};
pub use crop::{CropError, CropRect, Dimensions, PixelRect};
pub use export::{EXPORT_SCALE, export_filename, supersampled};
pub use lines::{decode_lines, encode_lines};
pub use waitlist::{WaitlistReply, WaitlistRequest};
