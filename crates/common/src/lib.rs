/**
 * Cryptographic types and operations.
 *  - P-256 key pairs and their wire encoding
 *  - ECDH key agreement and key derivation
 *  - AES-256-CBC message protection and envelopes
 */
pub mod crypto;
/**
 * One side of a two-party exchange.
 *  A party owns its private key and hands out
 *  only its serialized public key and envelopes.
 */
pub mod party;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::crypto::{
        Curve, Envelope, Iv, OsRandomSource, PublicKey, RandomSource, Secret, SecretKey,
        SeededRandomSource, SharedSecret,
    };
    pub use crate::party::{Channel, Party, PartyError};
    pub use crate::version::BuildInfo;
}
