//! Credential handling for the session.
//!
//! The credential is a bearer secret held in memory for the lifetime of one
//! session. It is wrapped so it cannot leak through `Debug` output, and the
//! store tracks a generation counter so a cached provider binding built from
//! an old credential can be detected and rebuilt.

use std::env;
use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Environment variable consulted as the external secret source.
pub const CREDENTIAL_ENV: &str = "OPENAI_API_KEY";

/// An API credential that prevents accidental logging.
///
/// The value is wrapped in `SecretString`, which zeroizes memory on drop and
/// requires an explicit [`ApiKey::expose_secret`] call to read. `Debug`
/// prints a redacted placeholder.
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    /// Create a new API key from a string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(SecretString::from(key.into()))
    }

    /// Expose the secret value.
    ///
    /// Called in exactly two places: building the `Authorization` header and
    /// comparing a proposed new value against the stored one.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey([REDACTED])")
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// In-memory credential store for one session.
///
/// Holds at most one credential plus a generation counter that increments
/// whenever the stored value actually changes. The session compares the
/// counter against the generation its provider binding was built from to
/// decide when the binding is stale.
#[derive(Debug, Default)]
pub struct CredentialStore {
    key: Option<ApiKey>,
    generation: u64,
}

impl CredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            key: None,
            generation: 0,
        }
    }

    /// Create a store seeded from the external secret source.
    ///
    /// Reads [`CREDENTIAL_ENV`]; absence is not an error.
    pub fn from_env() -> Self {
        let mut store = Self::new();
        if let Ok(value) = env::var(CREDENTIAL_ENV) {
            store.adopt_secret(&value);
        }
        store
    }

    /// Adopt a value from the external secret source.
    ///
    /// Adoption only happens when the value is non-empty and the store is
    /// currently empty; a value the user already entered always wins.
    pub fn adopt_secret(&mut self, value: &str) {
        if self.key.is_none() && !value.is_empty() {
            self.key = Some(ApiKey::new(value));
            self.generation += 1;
        }
    }

    /// Overwrite the stored credential.
    ///
    /// The empty string clears the store. The generation counter moves only
    /// when the stored value actually changes; rewriting the same value is a
    /// no-op and leaves any provider binding intact.
    pub fn set(&mut self, value: &str) {
        let changed = match &self.key {
            Some(current) => current.expose_secret() != value,
            None => !value.is_empty(),
        };
        if !changed {
            return;
        }
        self.key = if value.is_empty() {
            None
        } else {
            Some(ApiKey::new(value))
        };
        self.generation += 1;
    }

    /// Returns the stored credential, if any.
    pub fn get(&self) -> Option<&ApiKey> {
        self.key.as_ref()
    }

    /// Returns true if a credential is set.
    pub fn is_set(&self) -> bool {
        self.key.is_some()
    }

    /// Returns the current generation counter.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
