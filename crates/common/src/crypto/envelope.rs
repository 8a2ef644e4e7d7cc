use std::fmt;

use serde::{Deserialize, Serialize};

use super::secret::{Iv, IV_SIZE};

/// Errors that can occur while parsing an envelope
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("envelope too short, expected at least {} bytes, got {len}", IV_SIZE)]
    TooShort { len: usize },
    #[error("envelope error: {0}")]
    Default(#[from] anyhow::Error),
}

/// An encrypted message as it crosses the wire
///
/// # Wire Format
///
/// ```text
/// [ iv: 16 bytes ][ ciphertext: N bytes ]
/// ```
///
/// There is no length prefix; the ciphertext runs to the end of the buffer.
/// An `Envelope` always holds at least a full IV.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Envelope(Vec<u8>);

impl Envelope {
    /// Concatenate an IV and its ciphertext
    pub fn pack(iv: &Iv, ciphertext: &[u8]) -> Self {
        let mut out = Vec::with_capacity(IV_SIZE + ciphertext.len());
        out.extend_from_slice(&iv[..]);
        out.extend_from_slice(ciphertext);
        Envelope(out)
    }

    /// Split into the IV and the ciphertext that follows it
    pub fn unpack(&self) -> (Iv, &[u8]) {
        let (iv, ciphertext) = self.0.split_at(IV_SIZE);
        let mut buff = [0u8; IV_SIZE];
        buff.copy_from_slice(iv);
        (Iv::from(buff), ciphertext)
    }

    /// Take ownership of received bytes
    ///
    /// # Errors
    ///
    /// Returns `TooShort` if `bytes` cannot hold an IV.
    pub fn from_vec(bytes: Vec<u8>) -> Result<Self, EnvelopeError> {
        if bytes.len() < IV_SIZE {
            return Err(EnvelopeError::TooShort { len: bytes.len() });
        }
        Ok(Envelope(bytes))
    }

    /// Parse an envelope from a hexadecimal string
    ///
    /// Accepts both plain hex and "0x"-prefixed hex strings.
    pub fn from_hex(hex: &str) -> Result<Self, EnvelopeError> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        let bytes = hex::decode(hex).map_err(|_| anyhow::anyhow!("envelope hex decode error"))?;
        Self::from_vec(bytes)
    }

    /// Convert envelope to hexadecimal string
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Length of the ciphertext following the IV
    pub fn ciphertext_len(&self) -> usize {
        self.0.len() - IV_SIZE
    }

    /// Whether anything follows the IV
    pub fn has_ciphertext(&self) -> bool {
        self.ciphertext_len() > 0
    }
}

impl TryFrom<&[u8]> for Envelope {
    type Error = EnvelopeError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_vec(bytes.to_vec())
    }
}

impl From<Envelope> for Vec<u8> {
    fn from(envelope: Envelope) -> Self {
        envelope.0
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope").field("len", &self.0.len()).finish()
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Envelope {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for Envelope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        Envelope::from_vec(bytes).map_err(serde::de::Error::custom)
    }
}
