//! Hashing used to derive package ids.

use sha2::{Digest, Sha256};

/// Incremental fingerprint over ordered string components.
#[derive(Default)]
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    pub fn new() -> Self {
        Fingerprint {
            hasher: Sha256::new(),
        }
    }

    /// Add a string component.
    pub fn update_str(&mut self, s: &str) -> &mut Self {
        self.hasher.update(s.as_bytes());
        self.hasher.update(b"\0");
        self
    }

    /// Add a `key=value` component.
    pub fn update_pair(&mut self, key: &str, value: &str) -> &mut Self {
        self.hasher.update(key.as_bytes());
        self.hasher.update(b"=");
        self.update_str(value)
    }

    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }

    /// First 16 hex characters.
    pub fn finish_short(self) -> String {
        self.finish()[..16].to_string()
    }
}
