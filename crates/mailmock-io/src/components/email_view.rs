//! The mock email message: status bar, navigation, subject, sender,
//! and body, rendered as the exportable preview.
//!
//! Text fields are edited in place: each region is contenteditable and
//! commits to the store on blur (see `editable`).  There is no
//! keystroke-by-keystroke sync: the DOM is the edit buffer and the
//! store captures it at well-defined commit points, so the view renders
//! one-way from state.

use dioxus::html::HasFileData;
use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{
    LdArchive, LdChevronDown, LdChevronLeft, LdCornerUpLeft, LdEllipsis, LdMapPin, LdReply,
    LdStar, LdTrash2, LdUpload,
};
use mailmock_core::ConfigField;
use mailmock_core::lines::{decode_lines, encode_lines};

use crate::editable;
use crate::store::ConfigStore;

/// Element ids of the editable regions, read back on blur.
const REGION_TIME: &str = "region-time";
const REGION_BATTERY: &str = "region-battery";
const REGION_SUBJECT: &str = "region-subject";
const REGION_LABEL: &str = "region-label";
const REGION_SENDER_NAME: &str = "region-sender-name";
const REGION_BODY: &str = "region-body";

/// Props for the [`EmailView`] component.
#[derive(Props, Clone, PartialEq)]
pub struct EmailViewProps {
    /// Fired with the raw file bytes when an avatar image is chosen.
    on_avatar_upload: EventHandler<Vec<u8>>,
}

/// The rendered mock message.  This subtree is what the export pipeline
/// captures, so everything in it must be self-contained (inline SVG,
/// data-URL images, no external fetches).
#[component]
#[allow(clippy::too_many_lines)]
pub fn EmailView(props: EmailViewProps) -> Element {
    let store = use_context::<ConfigStore>();
    let config = store.get();
    let mut hovering_avatar = use_signal(|| false);

    let body_html = encode_lines(&config.email_content);
    let avatar_initials = initials(&config.sender_name);

    let handle_file = move |evt: FormEvent| async move {
        if let Some(file) = evt.files().first() {
            match file.read_bytes().await {
                Ok(bytes) => props.on_avatar_upload.call(bytes.to_vec()),
                Err(e) => {
                    web_sys::console::error_1(&format!("avatar read failed: {e}").into());
                }
            }
        }
    };

    rsx! {
        div { class: "email-frame bg-white font-sans",
            // Status bar
            div { class: "flex justify-between items-center px-4 py-2 text-sm font-medium",
                div { class: "flex items-center",
                    span {
                        id: REGION_TIME,
                        class: "font-semibold cursor-text hover:bg-gray-100 px-1 rounded",
                        contenteditable: "true",
                        onblur: move |_| commit_text(store, ConfigField::Time, REGION_TIME),
                        "{config.time}"
                    }
                }
                div { class: "flex items-center gap-1",
                    // Signal bars
                    div { class: "flex items-end gap-05",
                        div { class: "signal-dot h-1" }
                        div { class: "signal-dot h-15" }
                        div { class: "signal-dot h-2" }
                        div { class: "signal-dot h-25" }
                    }
                    // WiFi glyph
                    svg {
                        class: "w-4 h-4 ml-1",
                        view_box: "0 0 24 24",
                        fill: "currentColor",
                        path { d: "M1 9l2 2c4.97-4.97 13.03-4.97 18 0l2-2C16.93 2.93 7.07 2.93 1 9zm8 8l3 3 3-3c-1.65-1.66-4.34-1.66-6 0zm-4-4l2 2c2.76-2.76 7.24-2.76 10 0l2-2C15.14 9.14 8.87 9.14 5 13z" }
                    }
                    // Battery
                    div { class: "flex items-center ml-1",
                        div { class: "battery-shell",
                            div { class: "battery-fill" }
                            div { class: "battery-cap" }
                        }
                        span {
                            id: REGION_BATTERY,
                            class: "text-xs ml-1 cursor-text hover:bg-gray-100 px-1 rounded",
                            contenteditable: "true",
                            onblur: move |_| commit_text(store, ConfigField::Battery, REGION_BATTERY),
                            "{config.battery}"
                        }
                    }
                }
            }

            // Navigation bar
            div { class: "flex items-center justify-between px-4 py-3 border-b border-gray-200",
                div { class: "flex items-center gap-4",
                    button { class: "icon-button text-gray-700",
                        Icon { icon: LdChevronLeft, width: 24, height: 24 }
                    }
                    button { class: "icon-button text-gray-700",
                        Icon { icon: LdMapPin, width: 20, height: 20 }
                    }
                }
                div { class: "flex items-center gap-4",
                    button { class: "icon-button text-gray-700",
                        Icon { icon: LdArchive, width: 20, height: 20 }
                    }
                    button { class: "icon-button text-gray-700",
                        Icon { icon: LdTrash2, width: 20, height: 20 }
                    }
                    button { class: "icon-button text-gray-700",
                        Icon { icon: LdReply, width: 20, height: 20 }
                    }
                    button { class: "icon-button text-gray-700",
                        Icon { icon: LdEllipsis, width: 20, height: 20 }
                    }
                }
            }

            // Subject row
            div { class: "flex items-center justify-between px-4 py-4",
                div { class: "flex items-center gap-3",
                    h1 {
                        id: REGION_SUBJECT,
                        class: "text-xl font-normal text-gray-900 cursor-text hover:bg-gray-100 px-1 rounded",
                        contenteditable: "true",
                        onblur: move |_| commit_text(store, ConfigField::Subject, REGION_SUBJECT),
                        "{config.subject}"
                    }
                    span {
                        id: REGION_LABEL,
                        class: "text-sm text-gray-500 bg-gray-100 px-2 py-1 rounded cursor-text hover:bg-gray-200",
                        contenteditable: "true",
                        onblur: move |_| commit_text(store, ConfigField::Label, REGION_LABEL),
                        "{config.label}"
                    }
                }
                button { class: "icon-button text-gray-400",
                    Icon { icon: LdStar, width: 20, height: 20 }
                }
            }

            // Sender row
            div { class: "flex items-center justify-between px-4 py-2",
                div { class: "flex items-center gap-3",
                    label {
                        class: "avatar-upload relative cursor-pointer",
                        onmouseenter: move |_| hovering_avatar.set(true),
                        onmouseleave: move |_| hovering_avatar.set(false),
                        input {
                            r#type: "file",
                            accept: "image/*",
                            class: "hidden",
                            onchange: handle_file,
                        }
                        if config.profile_picture.is_empty() {
                            div { class: "avatar avatar-fallback", "{avatar_initials}" }
                        } else {
                            img {
                                class: "avatar",
                                src: "{config.profile_picture}",
                                alt: "{config.sender_name}",
                            }
                        }
                        if hovering_avatar() {
                            div { class: "avatar-overlay flex items-center justify-center text-white",
                                Icon { icon: LdUpload, width: 16, height: 16 }
                            }
                        }
                    }
                    div { class: "flex flex-col",
                        span {
                            id: REGION_SENDER_NAME,
                            class: "font-medium text-gray-900 cursor-text hover:bg-gray-100 px-1 rounded",
                            contenteditable: "true",
                            onblur: move |_| {
                                commit_text(store, ConfigField::SenderName, REGION_SENDER_NAME);
                            },
                            "{config.sender_name}"
                        }
                        div { class: "flex items-center gap-1 text-sm text-gray-500",
                            span { "to me" }
                            Icon { icon: LdChevronDown, width: 12, height: 12 }
                        }
                    }
                }
                div { class: "flex items-center gap-3",
                    button { class: "icon-button text-gray-600",
                        Icon { icon: LdCornerUpLeft, width: 16, height: 16 }
                    }
                    button { class: "icon-button text-gray-600",
                        Icon { icon: LdEllipsis, width: 16, height: 16 }
                    }
                }
            }

            // Body: rendered from the stored plain text, read back as
            // markup and decoded on blur.
            div {
                id: REGION_BODY,
                class: "px-4 py-4 text-gray-900 leading-relaxed cursor-text hover:bg-gray-50 rounded mx-2",
                contenteditable: "true",
                onblur: move |_| commit_body(store),
                dangerous_inner_html: "{body_html}",
            }
        }
    }
}

/// Commit a single-line editable region to the store.  A missing
/// region is a no-op.
fn commit_text(store: ConfigStore, field: ConfigField, region: &str) {
    if let Some(text) = editable::region_text(region) {
        store.update(field, text);
    }
}

/// Commit the multi-line body region, decoding its markup back to
/// plain text.
fn commit_body(store: ConfigStore) {
    if let Some(html) = editable::region_html(REGION_BODY) {
        store.update(ConfigField::EmailContent, decode_lines(&html));
    }
}

/// Uppercase initials for the avatar fallback: first letter of each
/// word of the sender name.
fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_take_first_letter_of_each_word() {
        assert_eq!(initials("Alex Keene"), "AK");
        assert_eq!(initials("alex keene jr"), "AKJ");
        assert_eq!(initials("Solo"), "S");
        assert_eq!(initials("  spaced   out  "), "SO");
        assert_eq!(initials(""), "");
    }
}
