//! SHA-1 hash prefix/suffix split used by the range query protocol.

use secrecy::{ExposeSecret, SecretString};
use sha1::{Digest, Sha1};

/// Number of hex characters sent to the range service.
pub const PREFIX_LEN: usize = 5;

/// Uppercase hex SHA-1 of a password, split at [`PREFIX_LEN`].
///
/// Only the prefix ever leaves the process.
#[derive(Clone, PartialEq, Eq)]
pub struct HashPrefix {
    hash: String,
}

impl HashPrefix {
    pub fn of(password: &SecretString) -> Self {
        Self::of_str(password.expose_secret())
    }

    pub(crate) fn of_str(password: &str) -> Self {
        let hash = format!("{:X}", Sha1::digest(password.as_bytes()));
        Self { hash }
    }

    pub fn prefix(&self) -> &str {
        &self.hash[..PREFIX_LEN]
    }

    pub fn suffix(&self) -> &str {
        &self.hash[PREFIX_LEN..]
    }
}

// Keep the suffix out of debug output.
impl std::fmt::Debug for HashPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashPrefix")
            .field("prefix", &self.prefix())
            .finish_non_exhaustive()
    }
}
