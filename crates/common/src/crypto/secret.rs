//! Message encryption using AES-256-CBC with PKCS#7 padding
//!
//! A `Secret` is the symmetric key both parties derive from their shared secret.
//! Every encryption takes a fresh random [`Iv`]; the cipher itself never
//! generates key material, so `encrypt`/`decrypt` are pure functions of
//! `(key, iv, data)`.

use std::fmt;
use std::ops::Deref;

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::envelope::Envelope;
use super::random::RandomSource;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Size of an AES-256 key in bytes (256 bits)
pub const SECRET_SIZE: usize = 32;
/// Size of an AES block, and so of a CBC initialization vector
pub const IV_SIZE: usize = 16;
/// AES block size in bytes
pub const BLOCK_SIZE: usize = 16;

/// Errors that can occur during encryption/decryption
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("invalid key size, expected {}, got {0}", SECRET_SIZE)]
    InvalidKeyLength(usize),
    #[error("invalid IV size, expected {}, got {0}", IV_SIZE)]
    InvalidIvLength(usize),
    #[error("failed to generate IV: {0}")]
    Random(#[from] super::random::RandomError),
    /// Wrong key, tampered ciphertext, or malformed input. The cause is
    /// deliberately not distinguished.
    #[error("decryption failed")]
    Decryption,
    #[error("secret error: {0}")]
    Default(#[from] anyhow::Error),
}

/// A 256-bit symmetric key for message encryption
///
/// Derived independently by both parties, never transmitted. Equality is
/// constant-time and the key is zeroed on drop.
///
/// # Examples
///
/// ```ignore
/// let key = alice.diffie_hellman(&bob_public).derive_key();
/// let iv = Iv::generate(&OsRandomSource)?;
///
/// let ciphertext = key.encrypt(&iv, b"Hi, I am Alice.");
/// let plaintext = key.decrypt(&iv, &ciphertext)?;
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Secret([u8; SECRET_SIZE]);

impl From<[u8; SECRET_SIZE]> for Secret {
    fn from(bytes: [u8; SECRET_SIZE]) -> Self {
        Secret(bytes)
    }
}

impl PartialEq for Secret {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for Secret {}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}

impl Secret {
    /// Create a secret from a byte slice
    ///
    /// # Errors
    ///
    /// Returns an error if the slice length is not exactly `SECRET_SIZE` bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self, SecretError> {
        if data.len() != SECRET_SIZE {
            return Err(SecretError::InvalidKeyLength(data.len()));
        }
        let mut buff = [0; SECRET_SIZE];
        buff.copy_from_slice(data);
        Ok(buff.into())
    }

    /// Get a reference to the secret key bytes
    pub fn bytes(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Encrypt `data` under this key and `iv`
    ///
    /// The output is `data.len()` rounded up to the next multiple of
    /// `BLOCK_SIZE`; a full padding block is added when `data` is already
    /// block-aligned.
    pub fn encrypt(&self, iv: &Iv, data: &[u8]) -> Vec<u8> {
        Aes256CbcEnc::new(&self.0.into(), &iv.0.into()).encrypt_padded_vec_mut::<Pkcs7>(data)
    }

    /// Decrypt `data` under this key and `iv`
    ///
    /// # Errors
    ///
    /// Returns `Decryption` if the ciphertext is empty, not block-aligned, or
    /// does not unpad cleanly. No plaintext is returned in that case.
    pub fn decrypt(&self, iv: &Iv, data: &[u8]) -> Result<Vec<u8>, SecretError> {
        if data.is_empty() || data.len() % BLOCK_SIZE != 0 {
            return Err(SecretError::Decryption);
        }

        Aes256CbcDec::new(&self.0.into(), &iv.0.into())
            .decrypt_padded_vec_mut::<Pkcs7>(data)
            .map_err(|_| SecretError::Decryption)
    }

    /// Encrypt under a fresh IV and package the result for transport
    ///
    /// # Errors
    ///
    /// Returns an error only if the random source fails.
    pub fn seal<R: RandomSource + ?Sized>(
        &self,
        rng: &R,
        data: &[u8],
    ) -> Result<Envelope, SecretError> {
        let iv = Iv::generate(rng)?;
        let ciphertext = self.encrypt(&iv, data);
        tracing::trace!(ciphertext_len = ciphertext.len(), "sealed message");
        Ok(Envelope::pack(&iv, &ciphertext))
    }

    /// Inverse of [`Secret::seal`]
    pub fn open(&self, envelope: &Envelope) -> Result<Vec<u8>, SecretError> {
        let (iv, ciphertext) = envelope.unpack();
        self.decrypt(&iv, ciphertext)
    }
}

/// A CBC initialization vector
///
/// Not secret, but must be fresh for every message encrypted under a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Iv([u8; IV_SIZE]);

impl Deref for Iv {
    type Target = [u8; IV_SIZE];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<[u8; IV_SIZE]> for Iv {
    fn from(bytes: [u8; IV_SIZE]) -> Self {
        Iv(bytes)
    }
}

impl Iv {
    /// Draw a new IV from the random source
    pub fn generate<R: RandomSource + ?Sized>(rng: &R) -> Result<Self, SecretError> {
        let mut buff = [0u8; IV_SIZE];
        rng.try_fill_bytes(&mut buff)?;
        Ok(Iv(buff))
    }

    /// Create an IV from a byte slice
    ///
    /// # Errors
    ///
    /// Returns an error if the slice length is not exactly `IV_SIZE` bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self, SecretError> {
        if data.len() != IV_SIZE {
            return Err(SecretError::InvalidIvLength(data.len()));
        }
        let mut buff = [0; IV_SIZE];
        buff.copy_from_slice(data);
        Ok(Iv(buff))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}
