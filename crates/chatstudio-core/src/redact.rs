//! PII redaction for prompts.
//!
//! [`sanitize`] replaces email addresses and phone-like digit runs with fixed
//! markers before a prompt is stored or sent. Emails are replaced first; the
//! markers contain no `@` and no digits, so running `sanitize` twice is a
//! no-op.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Marker substituted for every email address.
pub const EMAIL_MARKER: &str = "[REDACTED_EMAIL]";

/// Marker substituted for every phone-like number.
pub const PHONE_MARKER: &str = "[REDACTED_PHONE]";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").expect("email pattern compiles")
});

// Optional `+`, a digit, then 7+ characters from digits/space/hyphen/parens.
// The run must end on a digit so trailing separators stay in the text.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+|\b)[0-9][0-9 ()\-]{6,}[0-9]\b").expect("phone pattern compiles")
});

/// Redact emails, then phone numbers, from `text`.
pub fn sanitize(text: &str) -> String {
    let without_emails = EMAIL_RE.replace_all(text, EMAIL_MARKER);
    match PHONE_RE.replace_all(&without_emails, PHONE_MARKER) {
        Cow::Borrowed(_) => without_emails.into_owned(),
        Cow::Owned(redacted) => redacted,
    }
}
