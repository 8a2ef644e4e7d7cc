use std::fmt;

use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::FieldBytes;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::curve::{Curve, CURVE_HEADER_SIZE};
use super::random::RandomSource;

/// Size of a P-256 private scalar in bytes
pub const PRIVATE_KEY_SIZE: usize = 32;
/// Size of a serialized P-256 public key in bytes (header + X + Y)
pub const PUBLIC_KEY_SIZE: usize = CURVE_HEADER_SIZE + 2 * PRIVATE_KEY_SIZE;
/// Size of an uncompressed SEC1 P-256 point (0x04 || X || Y)
pub const SEC1_UNCOMPRESSED_SIZE: usize = 1 + 2 * PRIVATE_KEY_SIZE;

/// Upper bound on rejection-sampling rounds during key generation
const MAX_GENERATION_ATTEMPTS: usize = 16;

/// Errors that can occur during key operations
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("key generation failed: {0}")]
    KeyGeneration(String),
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
    #[error("curve mismatch: expected {expected}, found {found}")]
    CurveMismatch { expected: Curve, found: Curve },
    #[error("key error: {0}")]
    Default(#[from] anyhow::Error),
}

/// Public half of a P-256 key pair
///
/// Safe to copy and hand to the counterparty. On the wire it travels as a
/// fixed 72-byte blob:
///
/// ```text
/// [ magic "ECK1": u32 LE ][ coord_len = 32: u32 LE ][ X: 32 bytes ][ Y: 32 bytes ]
/// ```
///
/// # Examples
///
/// ```ignore
/// let secret_key = SecretKey::generate(&OsRandomSource)?;
/// let public_key = secret_key.public();
///
/// let blob = public_key.to_bytes();
/// let recovered = PublicKey::from_bytes(&blob)?;
/// assert_eq!(public_key, recovered);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(pub(crate) p256::PublicKey);

impl From<p256::PublicKey> for PublicKey {
    fn from(key: p256::PublicKey) -> Self {
        PublicKey(key)
    }
}

impl From<PublicKey> for p256::PublicKey {
    fn from(key: PublicKey) -> Self {
        key.0
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = KeyError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl PublicKey {
    /// The curve this key lives on
    pub fn curve(&self) -> Curve {
        Curve::P256
    }

    /// Serialize to the fixed blob layout
    ///
    /// Deterministic: the same key always yields the same bytes.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        let curve = self.curve();
        let sec1 = self.to_sec1_bytes();

        let mut out = [0u8; PUBLIC_KEY_SIZE];
        out[..4].copy_from_slice(&curve.magic().to_le_bytes());
        out[4..CURVE_HEADER_SIZE].copy_from_slice(&(curve.coordinate_size() as u32).to_le_bytes());
        // Skip the SEC1 0x04 tag; X and Y follow in order
        out[CURVE_HEADER_SIZE..].copy_from_slice(&sec1[1..]);
        out
    }

    /// Parse and validate a serialized public key
    ///
    /// # Errors
    ///
    /// - `CurveMismatch` if the blob names a curve other than P-256
    /// - `InvalidPublicKey` if the blob is malformed or the point is not on P-256
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() < CURVE_HEADER_SIZE {
            return Err(KeyError::InvalidPublicKey(format!(
                "blob too short for header, expected at least {}, got {}",
                CURVE_HEADER_SIZE,
                bytes.len()
            )));
        }

        let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let coord_len = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;

        let curve = Curve::from_magic(magic)
            .ok_or_else(|| KeyError::InvalidPublicKey(format!("unknown magic {:#010x}", magic)))?;
        if curve != Curve::P256 {
            return Err(KeyError::CurveMismatch {
                expected: Curve::P256,
                found: curve,
            });
        }

        if coord_len != curve.coordinate_size() {
            return Err(KeyError::InvalidPublicKey(format!(
                "invalid coordinate length, expected {}, got {}",
                curve.coordinate_size(),
                coord_len
            )));
        }
        if bytes.len() != curve.public_key_size() {
            return Err(KeyError::InvalidPublicKey(format!(
                "invalid public key size, expected {}, got {}",
                curve.public_key_size(),
                bytes.len()
            )));
        }

        let mut sec1 = [0u8; SEC1_UNCOMPRESSED_SIZE];
        sec1[0] = 0x04;
        sec1[1..].copy_from_slice(&bytes[CURVE_HEADER_SIZE..]);
        Self::from_sec1_bytes(&sec1)
    }

    /// Parse an uncompressed SEC1 point, rejecting points off the curve
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        p256::PublicKey::from_sec1_bytes(bytes)
            .map(PublicKey)
            .map_err(|_| KeyError::InvalidPublicKey("point is not on P-256".to_string()))
    }

    /// Encode as an uncompressed SEC1 point (0x04 || X || Y)
    pub fn to_sec1_bytes(&self) -> [u8; SEC1_UNCOMPRESSED_SIZE] {
        let point = self.0.to_encoded_point(false);
        let mut out = [0u8; SEC1_UNCOMPRESSED_SIZE];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Parse a public key from a hexadecimal string
    ///
    /// Accepts both plain hex and "0x"-prefixed hex strings.
    pub fn from_hex(hex: &str) -> Result<Self, KeyError> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        let bytes =
            hex::decode(hex).map_err(|_| anyhow::anyhow!("public key hex decode error"))?;
        Self::from_bytes(&bytes)
    }

    /// Convert public key to hexadecimal string
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bytes(&self.to_bytes())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{Error, Visitor};

        struct PublicKeyVisitor;

        impl<'de> Visitor<'de> for PublicKeyVisitor {
            type Value = PublicKey;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a serialized P-256 public key blob")
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
            where
                E: Error,
            {
                PublicKey::from_bytes(v).map_err(E::custom)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut bytes = Vec::with_capacity(PUBLIC_KEY_SIZE);
                while let Some(byte) = seq.next_element::<u8>()? {
                    bytes.push(byte);
                }
                PublicKey::from_bytes(&bytes).map_err(A::Error::custom)
            }
        }

        // Try bytes first (for binary formats), fallback to seq (for JSON)
        deserializer.deserialize_byte_buf(PublicKeyVisitor)
    }
}

/// Private half of a P-256 key pair
///
/// Owned by exactly one party. It cannot be cloned, serialized or printed,
/// and the scalar is zeroed when the key is dropped.
pub struct SecretKey(pub(crate) p256::SecretKey);

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("curve", &Curve::P256)
            .finish_non_exhaustive()
    }
}

impl SecretKey {
    /// Generate a new key pair from the given random source
    ///
    /// Draws 32 bytes and keeps them if they form a valid non-zero scalar,
    /// redrawing otherwise.
    ///
    /// # Errors
    ///
    /// Returns `KeyGeneration` if the random source fails. This is fatal for
    /// the session.
    pub fn generate<R: RandomSource + ?Sized>(rng: &R) -> Result<Self, KeyError> {
        let mut candidate = Zeroizing::new([0u8; PRIVATE_KEY_SIZE]);

        for _ in 0..MAX_GENERATION_ATTEMPTS {
            rng.try_fill_bytes(&mut candidate[..])
                .map_err(|e| KeyError::KeyGeneration(e.to_string()))?;

            if let Ok(key) = p256::SecretKey::from_bytes(FieldBytes::from_slice(&candidate[..])) {
                tracing::debug!(curve = %Curve::P256, "generated key pair");
                return Ok(SecretKey(key));
            }
            tracing::trace!("rejected out-of-range scalar candidate");
        }

        Err(KeyError::KeyGeneration(format!(
            "no valid scalar after {} attempts",
            MAX_GENERATION_ATTEMPTS
        )))
    }

    /// The curve this key lives on
    pub fn curve(&self) -> Curve {
        Curve::P256
    }

    /// Derive the public key from this secret key
    pub fn public(&self) -> PublicKey {
        PublicKey(self.0.public_key())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::crypto::random::{OsRandomSource, RandomError, SeededRandomSource};

    struct BrokenRandomSource;

    impl RandomSource for BrokenRandomSource {
        fn try_fill_bytes(&self, _dest: &mut [u8]) -> Result<(), RandomError> {
            Err(RandomError::Unavailable("entropy pool closed".to_string()))
        }
    }

    /// Always yields all-zero bytes, which is never a valid scalar
    struct ZeroRandomSource;

    impl RandomSource for ZeroRandomSource {
        fn try_fill_bytes(&self, dest: &mut [u8]) -> Result<(), RandomError> {
            dest.fill(0);
            Ok(())
        }
    }

    #[test]
    fn test_public_key_round_trip() {
        let secret_key = SecretKey::generate(&OsRandomSource).unwrap();
        let public_key = secret_key.public();

        let blob = public_key.to_bytes();
        assert_eq!(blob.len(), PUBLIC_KEY_SIZE);
        assert_eq!(&blob[..4], b"ECK1");
        assert_eq!(&blob[4..8], &32u32.to_le_bytes());

        let recovered = PublicKey::from_bytes(&blob).unwrap();
        assert_eq!(public_key, recovered);

        let recovered_hex = PublicKey::from_hex(&format!("0x{}", public_key.to_hex())).unwrap();
        assert_eq!(public_key, recovered_hex);
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let public_key = SecretKey::generate(&OsRandomSource).unwrap().public();
        assert_eq!(public_key.to_bytes(), public_key.to_bytes());
        assert_eq!(public_key.to_hex(), public_key.to_string());
    }

    #[test]
    fn test_blob_matches_sec1_coordinates() {
        let public_key = SecretKey::generate(&OsRandomSource).unwrap().public();
        let blob = public_key.to_bytes();
        let sec1 = public_key.to_sec1_bytes();

        assert_eq!(sec1[0], 0x04);
        assert_eq!(&blob[8..], &sec1[1..]);
        assert_eq!(PublicKey::from_sec1_bytes(&sec1).unwrap(), public_key);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = SecretKey::generate(&SeededRandomSource::new(42)).unwrap();
        let b = SecretKey::generate(&SeededRandomSource::new(42)).unwrap();
        let c = SecretKey::generate(&SeededRandomSource::new(43)).unwrap();

        assert_eq!(a.public(), b.public());
        assert_ne!(a.public(), c.public());
    }

    #[test]
    fn test_generation_fails_without_entropy() {
        let result = SecretKey::generate(&BrokenRandomSource);
        assert!(matches!(result, Err(KeyError::KeyGeneration(_))));
    }

    #[test]
    fn test_generation_gives_up_on_invalid_scalars() {
        let result = SecretKey::generate(&ZeroRandomSource);
        assert!(matches!(result, Err(KeyError::KeyGeneration(_))));
    }

    #[test]
    fn test_off_curve_point_rejected() {
        let mut blob = SecretKey::generate(&OsRandomSource).unwrap().public().to_bytes();
        // Nudge Y; the resulting (X, Y) is not on the curve
        blob[PUBLIC_KEY_SIZE - 1] ^= 0x01;

        let result = PublicKey::from_bytes(&blob);
        assert!(matches!(result, Err(KeyError::InvalidPublicKey(_))));
    }

    #[test]
    fn test_all_zero_coordinates_rejected() {
        let mut blob = [0u8; PUBLIC_KEY_SIZE];
        blob[..4].copy_from_slice(b"ECK1");
        blob[4..8].copy_from_slice(&32u32.to_le_bytes());

        let result = PublicKey::from_bytes(&blob);
        assert!(matches!(result, Err(KeyError::InvalidPublicKey(_))));
    }

    #[test]
    fn test_malformed_blobs_rejected() {
        let blob = SecretKey::generate(&OsRandomSource).unwrap().public().to_bytes();

        // Truncated header
        assert!(matches!(
            PublicKey::from_bytes(&blob[..5]),
            Err(KeyError::InvalidPublicKey(_))
        ));

        // Truncated coordinates
        assert!(matches!(
            PublicKey::from_bytes(&blob[..PUBLIC_KEY_SIZE - 1]),
            Err(KeyError::InvalidPublicKey(_))
        ));

        // Unknown magic
        let mut bad_magic = blob;
        bad_magic[..4].copy_from_slice(b"ECS1");
        assert!(matches!(
            PublicKey::from_bytes(&bad_magic),
            Err(KeyError::InvalidPublicKey(_))
        ));

        // Coordinate length disagrees with the curve
        let mut bad_len = blob;
        bad_len[4..8].copy_from_slice(&48u32.to_le_bytes());
        assert!(matches!(
            PublicKey::from_bytes(&bad_len),
            Err(KeyError::InvalidPublicKey(_))
        ));
    }

    #[test]
    fn test_other_curve_reports_mismatch() {
        let mut blob = vec![0u8; Curve::P384.public_key_size()];
        blob[..4].copy_from_slice(b"ECK3");
        blob[4..8].copy_from_slice(&48u32.to_le_bytes());

        let result = PublicKey::from_bytes(&blob);
        assert!(matches!(
            result,
            Err(KeyError::CurveMismatch {
                expected: Curve::P256,
                found: Curve::P384
            })
        ));
    }

    #[test]
    fn test_bad_hex_rejected() {
        assert!(matches!(
            PublicKey::from_hex("not hex"),
            Err(KeyError::Default(_))
        ));
    }

    #[test]
    fn test_serde_json_round_trip() {
        let public_key = SecretKey::generate(&OsRandomSource).unwrap().public();
        let json = serde_json::to_string(&public_key).unwrap();
        let recovered: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(public_key, recovered);
    }

    #[test]
    fn test_secret_key_debug_is_redacted() {
        let secret_key = SecretKey::generate(&SeededRandomSource::new(1)).unwrap();
        let rendered = format!("{:?}", secret_key);
        assert!(rendered.contains("P256"));
        assert!(!rendered.contains(&hex::encode(secret_key.0.to_bytes())));
    }
}
