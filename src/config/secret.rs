//! Secret key value object.

use std::collections::HashSet;

use super::constants::{
    INSECURE_SECRET_KEY_PREFIX, MIN_SECRET_KEY_LENGTH, MIN_SECRET_KEY_UNIQUE_CHARS, REDACTED,
};

/// Signing secret for the application.
///
/// Never printed: both `Debug` and `Display` write `[REDACTED]`.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(String);

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SecretKey").field(&REDACTED).finish()
    }
}

impl std::fmt::Display for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(REDACTED)
    }
}

/// A rule a deployment secret key fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretWeakness {
    TooShort,
    TooFewUniqueChars,
    InsecurePrefix,
}

impl std::fmt::Display for SecretWeakness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretWeakness::TooShort => {
                write!(f, "shorter than {} characters", MIN_SECRET_KEY_LENGTH)
            }
            SecretWeakness::TooFewUniqueChars => write!(
                f,
                "fewer than {} unique characters",
                MIN_SECRET_KEY_UNIQUE_CHARS
            ),
            SecretWeakness::InsecurePrefix => {
                write!(f, "starts with '{}'", INSECURE_SECRET_KEY_PREFIX)
            }
        }
    }
}

impl SecretKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw secret, for signing code only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Rules this key fails; empty for a key fit for deployment.
    pub fn weaknesses(&self) -> Vec<SecretWeakness> {
        let mut found = Vec::new();

        if self.0.chars().count() < MIN_SECRET_KEY_LENGTH {
            found.push(SecretWeakness::TooShort);
        }
        if self.0.chars().collect::<HashSet<_>>().len() < MIN_SECRET_KEY_UNIQUE_CHARS {
            found.push(SecretWeakness::TooFewUniqueChars);
        }
        if self.0.starts_with(INSECURE_SECRET_KEY_PREFIX) {
            found.push(SecretWeakness::InsecurePrefix);
        }

        found
    }

    pub fn is_strong(&self) -> bool {
        self.weaknesses().is_empty()
    }
}
