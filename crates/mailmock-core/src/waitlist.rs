//! Waitlist signup: email validation and the response schema.
//!
//! The network call itself lives in `mailmock-io`; this module owns the
//! pure parts: the submit-time email check and the typed decoding of
//! the server's success/rejection bodies, so dynamic payloads are
//! validated before anything reaches the UI.

use serde::{Deserialize, Serialize};

/// Endpoint receiving waitlist signups.
pub const WAITLIST_ENDPOINT: &str = "https://waitlist.adsone.app/api/v1/waitlist";

/// Inline error for a rejected email address.
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email";

/// Fallback text for any failure the server did not explain.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong";

/// Fallback text for a success response without a message.
const DEFAULT_SUCCESS_MESSAGE: &str = "Successfully joined the waitlist!";

/// Request body for a signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WaitlistRequest<'a> {
    /// Address being signed up.
    pub email: &'a str,
    /// Where the visitor came from, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<&'a str>,
}

/// `200 OK` body: `{ "data": { "message": ... } }`.
#[derive(Debug, Deserialize)]
struct SuccessBody {
    data: Option<SuccessData>,
}

#[derive(Debug, Deserialize)]
struct SuccessData {
    message: Option<String>,
}

/// `400 Bad Request` body: `{ "message": ... }`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Validated outcome of a signup attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitlistReply {
    /// Signed up; carries the server's (or the fallback) message.
    Joined(String),
    /// The server rejected the address with a reason.
    Rejected(String),
    /// Network failure, unexpected status, or unparseable body.
    Failed,
}

impl WaitlistReply {
    /// User-facing text for this outcome.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Joined(message) | Self::Rejected(message) => message,
            Self::Failed => GENERIC_FAILURE_MESSAGE,
        }
    }

    /// Whether the signup went through.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Joined(_))
    }
}

/// Check an address before issuing the network call.
///
/// Same acceptance as the form's original `\S+@\S+\.\S+` test: some
/// non-whitespace before an `@`, then a contiguous non-whitespace run
/// containing an interior dot.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    email.char_indices().any(|(i, c)| {
        c == '@'
            && email[..i]
                .chars()
                .next_back()
                .is_some_and(|prev| !prev.is_whitespace())
            && has_dotted_tail(&email[i + 1..])
    })
}

/// Matches `\S+\.\S+` anchored at the start of `rest`.
fn has_dotted_tail(rest: &str) -> bool {
    let run = rest
        .split(char::is_whitespace)
        .next()
        .unwrap_or_default();
    run.char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + c.len_utf8() < run.len())
}

/// Strip a leading `http://` or `https://` from a referrer URL.
#[must_use]
pub fn strip_scheme(referrer: &str) -> &str {
    referrer
        .strip_prefix("https://")
        .or_else(|| referrer.strip_prefix("http://"))
        .unwrap_or(referrer)
}

/// Decode a waitlist response into a validated outcome.
///
/// `200` with a well-formed body is a success (server message, else the
/// stock one); `400` with a message is a rejection; everything else,
/// including unparseable bodies, is a generic failure.
#[must_use]
pub fn parse_response(status: u16, body: &str) -> WaitlistReply {
    match status {
        200 => serde_json::from_str::<SuccessBody>(body).map_or(WaitlistReply::Failed, |parsed| {
            WaitlistReply::Joined(
                parsed
                    .data
                    .and_then(|data| data.message)
                    .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_owned()),
            )
        }),
        400 => serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.message)
            .map_or(WaitlistReply::Failed, WaitlistReply::Rejected),
        _ => WaitlistReply::Failed,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plausible_addresses() {
        for email in [
            "user@example.com",
            "a@b.c",
            "first.last@sub.domain.io",
            "  padded@example.com  ",
        ] {
            assert!(is_valid_email(email), "rejected {email:?}");
        }
    }

    #[test]
    fn rejects_implausible_addresses() {
        for email in [
            "not-an-email",
            "",
            "@example.com",
            "user@",
            "user@nodot",
            "user@dot.",
            "user@.com",
            "user @example.com",
        ] {
            assert!(!is_valid_email(email), "accepted {email:?}");
        }
    }

    #[test]
    fn request_body_omits_missing_referrer() {
        let with = serde_json::to_string(&WaitlistRequest {
            email: "a@b.c",
            referrer: Some("example.org"),
        })
        .unwrap();
        assert_eq!(with, r#"{"email":"a@b.c","referrer":"example.org"}"#);

        let without = serde_json::to_string(&WaitlistRequest {
            email: "a@b.c",
            referrer: None,
        })
        .unwrap();
        assert_eq!(without, r#"{"email":"a@b.c"}"#);
    }

    #[test]
    fn success_uses_server_message() {
        let reply = parse_response(200, r#"{"data":{"message":"Welcome aboard"}}"#);
        assert_eq!(reply, WaitlistReply::Joined("Welcome aboard".into()));
        assert!(reply.is_success());
    }

    #[test]
    fn success_without_message_uses_fallback() {
        let reply = parse_response(200, r#"{"data":{}}"#);
        assert_eq!(reply.message(), "Successfully joined the waitlist!");
        let reply = parse_response(200, "{}");
        assert_eq!(reply.message(), "Successfully joined the waitlist!");
    }

    #[test]
    fn malformed_success_body_is_a_failure() {
        let reply = parse_response(200, "<html>oops</html>");
        assert_eq!(reply, WaitlistReply::Failed);
        assert_eq!(reply.message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn rejection_carries_server_reason() {
        let reply = parse_response(400, r#"{"message":"Email already registered"}"#);
        assert_eq!(reply, WaitlistReply::Rejected("Email already registered".into()));
        assert!(!reply.is_success());
    }

    #[test]
    fn rejection_without_reason_is_generic() {
        assert_eq!(parse_response(400, "{}"), WaitlistReply::Failed);
        assert_eq!(parse_response(400, "not json"), WaitlistReply::Failed);
    }

    #[test]
    fn other_statuses_are_failures() {
        for status in [301, 404, 500, 503] {
            assert_eq!(parse_response(status, "{}"), WaitlistReply::Failed);
        }
    }

    #[test]
    fn referrer_scheme_is_stripped() {
        assert_eq!(strip_scheme("https://example.org/page"), "example.org/page");
        assert_eq!(strip_scheme("http://example.org"), "example.org");
        assert_eq!(strip_scheme("example.org"), "example.org");
    }
}
