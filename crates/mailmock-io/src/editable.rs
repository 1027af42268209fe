//! Reading edited content back out of contenteditable regions.
//!
//! Editable regions are plain DOM nodes identified by element id; the
//! binder reads their content on blur and forwards it to the store.
//! A missing region is a no-op (`None`), never an error; the region
//! may legitimately be unmounted by the time a stale blur fires.

/// Plain text of an editable region, for single-line fields.
#[must_use]
pub fn region_text(id: &str) -> Option<String> {
    let element = document()?.get_element_by_id(id)?;
    Some(element.text_content().unwrap_or_default())
}

/// Inner markup of an editable region, for the multi-line body field
/// (decoded by `mailmock_core::lines::decode_lines`).
#[must_use]
pub fn region_html(id: &str) -> Option<String> {
    let element = document()?.get_element_by_id(id)?;
    Some(element.inner_html())
}

fn document() -> Option<web_sys::Document> {
    web_sys::window()?.document()
}
