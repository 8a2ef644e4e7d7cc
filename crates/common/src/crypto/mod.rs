//! Cryptographic primitives for keyshake
//!
//! This module provides the whole key-agreement-to-encryption pipeline:
//!
//! - **Key Pairs**: P-256 `SecretKey`/`PublicKey`, generated from an injected `RandomSource`
//! - **Key Encoding**: a fixed 72-byte public key blob (curve magic + X + Y)
//! - **Key Agreement**: ECDH producing a 32-byte `SharedSecret`
//! - **Key Derivation**: SHA-256 of the shared secret yields the AES-256 `Secret`
//! - **Encryption**: AES-256-CBC with PKCS#7 padding and a fresh `Iv` per message
//! - **Transport**: `Envelope` = `iv || ciphertext`
//!
//! # Exchange
//!
//! 1. Each party generates a key pair and sends `public.to_bytes()`
//! 2. Each party decodes the counterparty blob (rejecting off-curve points)
//! 3. Each party computes `own_secret.diffie_hellman(&their_public)`; both get
//!    the same x-coordinate
//! 4. Each party hashes it into the same `Secret`
//! 5. The sender seals a message under a fresh IV; the receiver opens it
//!
//! # Threat Model
//!
//! Nothing here authenticates the public keys, so an active attacker who can
//! swap them in transit wins. CBC with PKCS#7 rejects most tampering through
//! padding failures but is not an AEAD; a modified ciphertext can still unpad
//! cleanly by chance.

mod agreement;
mod curve;
mod envelope;
pub mod kdf;
mod keys;
mod random;
mod secret;

pub use agreement::{SharedSecret, SHARED_SECRET_SIZE};
pub use curve::Curve;
pub use envelope::{Envelope, EnvelopeError};
pub use keys::{KeyError, PublicKey, SecretKey, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE};
pub use random::{OsRandomSource, RandomError, RandomSource, SeededRandomSource};
pub use secret::{Iv, Secret, SecretError, BLOCK_SIZE, IV_SIZE, SECRET_SIZE};
