//! mailmock web application entry point.

use dioxus::prelude::*;
use mailmock_io::Editor;

fn main() {
    dioxus::launch(app);
}

/// Root application component.
///
/// Hydrates the configuration store, shares it via context, and lays
/// out the page shell around the editor.
fn app() -> Element {
    let store = mailmock_io::use_config_store();
    use_context_provider(|| store);

    rsx! {
        // Static stylesheet: the utility classes and component styles
        // used by the mailmock-io components.
        style { dangerous_inner_html: include_str!("../assets/main.css") }

        div { class: "min-h-screen bg-gray-50 flex flex-col items-center justify-center p-6",
            header { class: "mb-8 text-center",
                h1 { class: "text-2xl font-semibold text-gray-900", "mailmock" }
                p { class: "text-gray-500 text-sm",
                    "Email-style ad mockups, exported as PNG"
                }
            }

            Editor {}
        }
    }
}
