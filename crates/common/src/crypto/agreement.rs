//! Elliptic-curve Diffie-Hellman over P-256
//!
//! The shared secret is the big-endian x-coordinate of `own_scalar * their_point`.
//! All curve arithmetic is delegated to the `p256` crate, which performs it in
//! constant time and only ever sees points that passed on-curve validation in
//! [`PublicKey::from_bytes`].

use std::fmt;

use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::keys::{KeyError, PublicKey, SecretKey};

/// Size of the raw shared secret in bytes
pub const SHARED_SECRET_SIZE: usize = 32;

/// Raw ECDH output, before key derivation
///
/// Never transmitted. Equality is constant-time and the bytes are zeroed on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; SHARED_SECRET_SIZE]);

impl SharedSecret {
    /// The encoded x-coordinate of the shared point
    pub fn as_bytes(&self) -> &[u8; SHARED_SECRET_SIZE] {
        &self.0
    }

    /// Hex rendering, for diagnostics only
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl ConstantTimeEq for SharedSecret {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl PartialEq for SharedSecret {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for SharedSecret {}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(..)")
    }
}

impl SecretKey {
    /// Compute the shared secret with a counterparty's public key
    ///
    /// Both keys are P-256 by construction, so this cannot fail. Repeated calls
    /// with the same keys return the same secret.
    pub fn diffie_hellman(&self, counterparty: &PublicKey) -> SharedSecret {
        let shared =
            p256::ecdh::diffie_hellman(self.0.to_nonzero_scalar(), counterparty.0.as_affine());

        let mut out = [0u8; SHARED_SECRET_SIZE];
        out.copy_from_slice(shared.raw_secret_bytes().as_slice());
        SharedSecret(out)
    }

    /// Decode a serialized counterparty key and compute the shared secret
    ///
    /// # Errors
    ///
    /// - `InvalidPublicKey` if the blob is malformed or off-curve
    /// - `CurveMismatch` if the blob is for a different curve
    pub fn agree(&self, counterparty: &[u8]) -> Result<SharedSecret, KeyError> {
        let public_key = PublicKey::from_bytes(counterparty)?;
        let secret = self.diffie_hellman(&public_key);
        tracing::debug!(curve = %self.curve(), "derived shared secret");
        Ok(secret)
    }
}
