//! Credential resolution for the inference service.
//!
//! The studio never stores credentials. Each invocation supplies one
//! explicitly or falls back to an environment variable.

pub mod env;

pub use env::{API_KEY_ENV, EnvCredentialSource};

use secrecy::SecretString;

/// Resolve the credential for one invocation.
///
/// An explicit value wins; otherwise `source` is consulted. Blank values
/// count as missing at both levels.
pub fn resolve_api_key(explicit: Option<&str>, source: &EnvCredentialSource) -> Option<SecretString> {
    match explicit.map(str::trim) {
        Some(key) if !key.is_empty() => Some(SecretString::from(key)),
        _ => source.get(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_explicit_key_wins() {
        // SAFETY: Unique variable name, only touched by this test.
        unsafe { std::env::set_var("CHATSTUDIO_TEST_KEY_EXPLICIT", "sk-env") };
        let source = EnvCredentialSource::new("CHATSTUDIO_TEST_KEY_EXPLICIT");

        let key = resolve_api_key(Some("  sk-flag "), &source).unwrap();
        assert_eq!(key.expose_secret(), "sk-flag");

        // SAFETY: Same test, cleanup of the var set above.
        unsafe { std::env::remove_var("CHATSTUDIO_TEST_KEY_EXPLICIT") };
    }

    #[test]
    fn test_blank_explicit_falls_back_to_env() {
        // SAFETY: Unique variable name, only touched by this test.
        unsafe { std::env::set_var("CHATSTUDIO_TEST_KEY_FALLBACK", "sk-env") };
        let source = EnvCredentialSource::new("CHATSTUDIO_TEST_KEY_FALLBACK");

        let key = resolve_api_key(Some("   "), &source).unwrap();
        assert_eq!(key.expose_secret(), "sk-env");

        // SAFETY: Same test, cleanup of the var set above.
        unsafe { std::env::remove_var("CHATSTUDIO_TEST_KEY_FALLBACK") };
    }

    #[test]
    fn test_nothing_configured() {
        let source = EnvCredentialSource::new("CHATSTUDIO_TEST_KEY_NEVER_SET");
        assert!(resolve_api_key(None, &source).is_none());
    }
}
