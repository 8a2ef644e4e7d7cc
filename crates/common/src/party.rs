//! Independent party contexts
//!
//! A [`Party`] owns its private key and nothing else. The only values it hands
//! out are its serialized public key and, once a [`Channel`] is established,
//! sealed envelopes. Neither type exposes key material, so two parties living in
//! the same process still cannot reach each other's secrets.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::crypto::{
    Envelope, EnvelopeError, KeyError, PublicKey, RandomSource, Secret, SecretError, SecretKey,
    SharedSecret, PUBLIC_KEY_SIZE,
};

/// Number of key hash bytes shown in a channel fingerprint
const FINGERPRINT_SIZE: usize = 8;

/// Errors that can occur while establishing or using a channel
#[derive(Debug, thiserror::Error)]
pub enum PartyError {
    #[error("key error: {0}")]
    Key(#[from] KeyError),
    #[error("secret error: {0}")]
    Secret(#[from] SecretError),
    #[error("envelope error: {0}")]
    Envelope(#[from] EnvelopeError),
}

/// One side of a key exchange
///
/// # Examples
///
/// ```ignore
/// let rng = OsRandomSource::new();
/// let alice = Party::new("alice", &rng)?;
/// let bob = Party::new("bob", &rng)?;
///
/// // Only serialized public keys cross between them
/// let alice_channel = alice.establish(&bob.public_key_bytes())?;
/// let bob_channel = bob.establish(&alice.public_key_bytes())?;
///
/// let envelope = alice_channel.seal(&rng, b"Hi, I am Alice.")?;
/// assert_eq!(bob_channel.open(&envelope)?, b"Hi, I am Alice.");
/// ```
pub struct Party {
    name: String,
    secret_key: SecretKey,
}

impl fmt::Debug for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Party")
            .field("name", &self.name)
            .field("public_key", &self.public_key().to_hex())
            .finish_non_exhaustive()
    }
}

impl Party {
    /// Create a party with a freshly generated key pair
    ///
    /// # Errors
    ///
    /// Returns `KeyGeneration` if the random source fails.
    pub fn new<R: RandomSource + ?Sized>(
        name: impl Into<String>,
        rng: &R,
    ) -> Result<Self, PartyError> {
        let name = name.into();
        let secret_key = SecretKey::generate(rng)?;
        tracing::debug!(party = %name, "created party");
        Ok(Self { name, secret_key })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn public_key(&self) -> PublicKey {
        self.secret_key.public()
    }

    /// The blob to send to the counterparty
    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.public_key().to_bytes()
    }

    /// Raw ECDH output against a serialized counterparty key
    ///
    /// Useful for showing that both sides agree; [`Party::establish`] is the
    /// normal path and never hands the raw secret out.
    pub fn shared_secret(&self, counterparty: &[u8]) -> Result<SharedSecret, PartyError> {
        Ok(self.secret_key.agree(counterparty)?)
    }

    /// Agree on a symmetric key with the holder of `counterparty`
    ///
    /// # Errors
    ///
    /// - `InvalidPublicKey` if the blob is malformed or off-curve
    /// - `CurveMismatch` if the blob is for another curve
    pub fn establish(&self, counterparty: &[u8]) -> Result<Channel, PartyError> {
        let counterparty = PublicKey::from_bytes(counterparty)?;
        let key = self.secret_key.diffie_hellman(&counterparty).derive_key();
        let channel = Channel { key, counterparty };
        tracing::debug!(
            party = %self.name,
            fingerprint = %channel.fingerprint(),
            "established channel"
        );
        Ok(channel)
    }
}

/// A party's view of an agreed symmetric key
pub struct Channel {
    key: Secret,
    counterparty: PublicKey,
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("fingerprint", &self.fingerprint())
            .finish_non_exhaustive()
    }
}

impl Channel {
    pub fn counterparty(&self) -> &PublicKey {
        &self.counterparty
    }

    /// Short hex digest of the key, for confirming both sides agree
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.key.bytes());
        hex::encode(&digest[..FINGERPRINT_SIZE])
    }

    /// Encrypt `plaintext` under a fresh IV
    pub fn seal<R: RandomSource + ?Sized>(
        &self,
        rng: &R,
        plaintext: &[u8],
    ) -> Result<Envelope, PartyError> {
        Ok(self.key.seal(rng, plaintext)?)
    }

    /// Decrypt an envelope sealed by the counterparty
    pub fn open(&self, envelope: &Envelope) -> Result<Vec<u8>, PartyError> {
        Ok(self.key.open(envelope)?)
    }

    /// Decrypt raw transport bytes, rejecting short input before decryption
    pub fn open_bytes(&self, bytes: &[u8]) -> Result<Vec<u8>, PartyError> {
        let envelope = Envelope::try_from(bytes)?;
        self.open(&envelope)
    }
}
