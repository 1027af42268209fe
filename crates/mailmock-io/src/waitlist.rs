//! Waitlist signup over `fetch`.
//!
//! Serializes the request with the schema from `mailmock-core`, POSTs
//! it, and feeds the raw status + body back through the core parser so
//! the UI only ever sees a validated [`WaitlistReply`].

use mailmock_core::WaitlistReply;
use mailmock_core::waitlist::{WAITLIST_ENDPOINT, WaitlistRequest, strip_scheme};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

/// Errors from the transport layer of a signup attempt.
#[derive(Debug, thiserror::Error)]
pub enum WaitlistError {
    /// A browser API call returned an error (network failure included).
    #[error("browser API error: {0}")]
    JsError(String),

    /// The request body could not be serialized.
    #[error("request serialization failed: {0}")]
    Serialize(String),
}

impl From<JsValue> for WaitlistError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Submit a signup and return the validated outcome.
///
/// Transport failures are logged and folded into
/// [`WaitlistReply::Failed`]; the caller only distinguishes the three
/// UI-visible outcomes.
#[allow(clippy::future_not_send)] // WASM is single-threaded; fetch types are !Send
pub async fn join_waitlist(email: &str, referrer: Option<&str>) -> WaitlistReply {
    match submit(email, referrer).await {
        Ok(reply) => reply,
        Err(e) => {
            web_sys::console::error_1(&format!("waitlist call failed: {e}").into());
            WaitlistReply::Failed
        }
    }
}

/// Where this visit came from, for the signup payload: the page URL's
/// `ref` query parameter, else the document referrer with its scheme
/// stripped, else nothing.
#[must_use]
pub fn detect_referrer() -> Option<String> {
    let window = web_sys::window()?;

    let href = window.location().href().ok()?;
    if let Ok(url) = web_sys::Url::new(&href)
        && let Some(param) = url.search_params().get("ref")
        && !param.is_empty()
    {
        return Some(param);
    }

    let referrer = window.document()?.referrer();
    if referrer.is_empty() {
        None
    } else {
        Some(strip_scheme(&referrer).to_owned())
    }
}

#[allow(clippy::future_not_send)] // WASM is single-threaded; fetch types are !Send
async fn submit(email: &str, referrer: Option<&str>) -> Result<WaitlistReply, WaitlistError> {
    let body = serde_json::to_string(&WaitlistRequest { email, referrer })
        .map_err(|e| WaitlistError::Serialize(e.to_string()))?;

    let init = web_sys::RequestInit::new();
    init.set_method("POST");
    init.set_body(&JsValue::from_str(&body));

    let request = web_sys::Request::new_with_str_and_init(WAITLIST_ENDPOINT, &init)?;
    request.headers().set("Content-Type", "application/json")?;

    let window =
        web_sys::window().ok_or_else(|| WaitlistError::JsError("no global window".into()))?;
    let response: web_sys::Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()
        .map_err(|_| WaitlistError::JsError("fetch did not return a Response".into()))?;

    let status = response.status();
    let text = JsFuture::from(response.text()?)
        .await?
        .as_string()
        .unwrap_or_default();

    Ok(mailmock_core::waitlist::parse_response(status, &text))
}
