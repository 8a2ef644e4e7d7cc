//! Shared secret -> symmetric key
//!
//! The raw x-coordinate is not uniformly distributed, so it is hashed with
//! SHA-256 before use as an AES-256 key.

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, Zeroizing};

use super::agreement::SharedSecret;
use super::secret::{Secret, SECRET_SIZE};

/// Derive the 32-byte symmetric key for a shared secret
pub fn derive(shared: &SharedSecret) -> Secret {
    let mut digest = Sha256::digest(shared.as_bytes());

    let mut key = Zeroizing::new([0u8; SECRET_SIZE]);
    key.copy_from_slice(digest.as_slice());
    digest.as_mut_slice().zeroize();
    Secret::from(*key)
}

impl SharedSecret {
    /// Shorthand for [`derive`]
    pub fn derive_key(&self) -> Secret {
        derive(self)
    }
}
