//! Cache Key Module
//!
//! Validated three-digit status code used to address a cache entry.

use std::fmt;
use std::str::FromStr;

use crate::cache::IMAGE_EXTENSION;
use crate::error::{CacheError, Result};

/// Number of digits in a status code key.
const KEY_LENGTH: usize = 3;

// == Cache Key ==
/// A request path reduced to exactly three ASCII digits.
///
/// The digits are not checked against the registry of real status codes;
/// `000` and `999` are as valid as `404`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    // == Validate ==
    /// Parses a raw request path into a key.
    ///
    /// A single leading `/` is stripped; the remainder must be exactly three
    /// ASCII digits with nothing else around them.
    pub fn validate(raw_path: &str) -> Result<Self> {
        let code = raw_path.strip_prefix('/').unwrap_or(raw_path);

        if code.len() == KEY_LENGTH && code.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(code.to_string()))
        } else {
            Err(CacheError::InvalidKey(raw_path.to_string()))
        }
    }

    /// The three digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    // == Blob Name ==
    /// Name of the blob holding this key's image, e.g. `404.jpeg`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.0, IMAGE_EXTENSION)
    }
}

impl FromStr for CacheKey {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        Self::validate(s)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
