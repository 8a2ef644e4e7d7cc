use std::fmt;

use serde::{Deserialize, Serialize};

/// Size of the public key blob header (magic + coordinate length)
pub const CURVE_HEADER_SIZE: usize = 8;

/// Named curves recognized in serialized public keys
///
/// Only [`Curve::P256`] can be used for key agreement. The others are
/// recognized so a blob from a P-384 or P-521 peer is reported as a curve
/// mismatch instead of as garbage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Curve {
    P256,
    P384,
    P521,
}

impl Curve {
    /// Blob magic, stored little-endian ("ECK1", "ECK3", "ECK5")
    pub const fn magic(&self) -> u32 {
        match self {
            Curve::P256 => 0x314B_4345,
            Curve::P384 => 0x334B_4345,
            Curve::P521 => 0x354B_4345,
        }
    }

    /// Length of one affine coordinate in bytes
    pub const fn coordinate_size(&self) -> usize {
        match self {
            Curve::P256 => 32,
            Curve::P384 => 48,
            Curve::P521 => 66,
        }
    }

    /// Total length of a serialized public key on this curve
    pub const fn public_key_size(&self) -> usize {
        CURVE_HEADER_SIZE + 2 * self.coordinate_size()
    }

    pub fn from_magic(magic: u32) -> Option<Curve> {
        [Curve::P256, Curve::P384, Curve::P521]
            .into_iter()
            .find(|curve| curve.magic() == magic)
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Curve::P256 => "P-256",
            Curve::P384 => "P-384",
            Curve::P521 => "P-521",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_magic_spells_eck() {
        assert_eq!(&Curve::P256.magic().to_le_bytes(), b"ECK1");
        assert_eq!(&Curve::P384.magic().to_le_bytes(), b"ECK3");
        assert_eq!(&Curve::P521.magic().to_le_bytes(), b"ECK5");
    }

    #[test]
    fn test_from_magic() {
        assert_eq!(Curve::from_magic(0x314B_4345), Some(Curve::P256));
        assert_eq!(Curve::from_magic(0x354B_4345), Some(Curve::P521));
        // ECDSA blob magic ("ECS1") is not a key agreement curve
        assert_eq!(Curve::from_magic(u32::from_le_bytes(*b"ECS1")), None);
    }

    #[test]
    fn test_public_key_sizes() {
        assert_eq!(Curve::P256.public_key_size(), 72);
        assert_eq!(Curve::P384.public_key_size(), 104);
        assert_eq!(Curve::P521.public_key_size(), 140);
    }
}
