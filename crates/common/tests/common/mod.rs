//! Shared test utilities for key exchange integration tests
#![allow(dead_code)]

use ::common::crypto::{Envelope, PublicKey, SecretKey, SeededRandomSource};
use ::common::party::{Channel, Party};

pub const ALICE_MESSAGE: &str = "Hi, I am Alice.";

/// Two parties plus the random source that created them
pub struct Exchange {
    pub rng: SeededRandomSource,
    pub alice: Party,
    pub bob: Party,
}

/// Set up Alice and Bob from a fixed seed
pub fn setup_exchange(seed: u64) -> Exchange {
    let rng = SeededRandomSource::new(seed);
    let alice = Party::new("alice", &rng).unwrap();
    let bob = Party::new("bob", &rng).unwrap();
    Exchange { rng, alice, bob }
}

/// Swap public key blobs and establish both channels
pub fn establish(exchange: &Exchange) -> (Channel, Channel) {
    let alice_wire = exchange.alice.public_key_bytes();
    let bob_wire = exchange.bob.public_key_bytes();

    let alice_channel = exchange.alice.establish(&bob_wire).unwrap();
    let bob_channel = exchange.bob.establish(&alice_wire).unwrap();
    (alice_channel, bob_channel)
}

/// A blob with a valid header whose point is not on the curve
pub fn off_curve_blob(key: &PublicKey) -> Vec<u8> {
    let mut blob = key.to_bytes().to_vec();
    let last = blob.len() - 1;
    blob[last] ^= 0x01;
    blob
}

/// Generate a key pair from a one-off seed
pub fn key_from_seed(seed: u64) -> SecretKey {
    SecretKey::generate(&SeededRandomSource::new(seed)).unwrap()
}

/// Flip a single bit in an envelope's bytes
pub fn flip_bit(envelope: &Envelope, index: usize, mask: u8) -> Vec<u8> {
    let mut bytes = envelope.as_bytes().to_vec();
    bytes[index] ^= mask;
    bytes
}
