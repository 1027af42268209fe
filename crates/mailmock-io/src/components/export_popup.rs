//! Post-export popup with the waitlist signup form.
//!
//! Shown after a successful export.  Validation happens before any
//! network call; a submit while one is in flight is ignored; a
//! successful signup shows the server's message and auto-closes after
//! two seconds.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdArrowRight, LdDownload, LdX};
use mailmock_core::waitlist::{INVALID_EMAIL_MESSAGE, is_valid_email};

use crate::waitlist;

/// Props for the [`ExportPopup`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ExportPopupProps {
    /// Whether the popup is visible.
    is_open: bool,
    /// Called when the popup should close (X, skip, or auto-close).
    on_close: EventHandler<()>,
}

/// Modal shown once an export has been handed to the browser.
#[component]
pub fn ExportPopup(props: ExportPopupProps) -> Element {
    let mut email = use_signal(String::new);
    let mut loading = use_signal(|| false);
    // User-facing outcome: (text, is_success).
    let mut message = use_signal(|| Option::<(String, bool)>::None);

    if !props.is_open {
        return rsx! {};
    }

    let on_close = props.on_close;
    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if *loading.peek() {
            return;
        }
        message.set(None);

        let address = email.peek().clone();
        if !is_valid_email(&address) {
            message.set(Some((INVALID_EMAIL_MESSAGE.to_owned(), false)));
            return;
        }

        loading.set(true);
        spawn(async move {
            let referrer = waitlist::detect_referrer();
            let reply = waitlist::join_waitlist(&address, referrer.as_deref()).await;
            let success = reply.is_success();
            message.set(Some((reply.message().to_owned(), success)));
            loading.set(false);

            if success {
                // Leave the confirmation visible briefly, then close.
                gloo_timers::future::TimeoutFuture::new(2_000).await;
                on_close.call(());
            }
        });
    };

    let email_value = email();
    let is_loading = loading();

    rsx! {
        div { class: "modal-backdrop fixed inset-0 flex items-center justify-center p-4",
            div { class: "modal-panel bg-white rounded-lg p-6 relative",
                button {
                    class: "modal-close text-gray-400",
                    onclick: move |_| props.on_close.call(()),
                    Icon { icon: LdX, width: 20, height: 20 }
                }

                div { class: "text-center mb-6",
                    div { class: "popup-badge flex items-center justify-center",
                        Icon { icon: LdDownload, width: 32, height: 32 }
                    }
                    h2 { class: "text-xl font-semibold text-gray-900 mb-2",
                        "Your image will download shortly!"
                    }
                    p { class: "text-gray-600 text-sm",
                        "Stay updated with Adsone - our platform to automate and "
                        "optimize marketing campaigns across Meta, Google, Bing, "
                        "and more."
                    }
                }

                form { class: "space-y-4", onsubmit: handle_submit,
                    div { class: "flex gap-2",
                        input {
                            r#type: "email",
                            class: "email-input",
                            placeholder: "Enter your email",
                            value: "{email_value}",
                            disabled: is_loading,
                            oninput: move |evt| email.set(evt.value().to_lowercase()),
                        }
                        button {
                            r#type: "submit",
                            class: "button-primary",
                            disabled: email_value.is_empty() || is_loading,
                            if is_loading {
                                span { class: "spinner" }
                            } else {
                                Icon { icon: LdArrowRight, width: 20, height: 20 }
                            }
                        }
                    }

                    if let Some((ref text, success)) = message() {
                        div {
                            class: if success {
                                "notice notice-success text-sm p-3 rounded"
                            } else {
                                "notice notice-error text-sm p-3 rounded"
                            },
                            "{text}"
                        }
                    }

                    button {
                        r#type: "button",
                        class: "link-button w-full text-sm text-gray-500 underline",
                        onclick: move |_| props.on_close.call(()),
                        "Skip for now"
                    }
                }
            }
        }
    }
}
