//! Environment variable credential source.

use secrecy::SecretString;

/// Default environment variable holding the inference API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Reads the inference credential from an environment variable.
///
/// Read at call time, never cached, so each invocation sees the current
/// process environment.
#[derive(Debug, Clone)]
pub struct EnvCredentialSource {
    var: String,
}

impl EnvCredentialSource {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Name of the variable this source reads.
    pub fn var(&self) -> &str {
        &self.var
    }

    /// Current value, trimmed. Unset, blank, or non-Unicode values are `None`.
    pub fn get(&self) -> Option<SecretString> {
        match std::env::var(&self.var) {
            Ok(val) if !val.trim().is_empty() => Some(SecretString::from(val.trim())),
            Ok(_) => None,
            Err(std::env::VarError::NotPresent) => None,
            // Exists but not valid Unicode: treat as not found
            Err(std::env::VarError::NotUnicode(_)) => None,
        }
    }
}

impl Default for EnvCredentialSource {
    fn default() -> Self {
        Self::new(API_KEY_ENV)
    }
}
