//! Integration tests for the full key exchange and message flow

mod common;

use ::common::crypto::{
    kdf, Curve, Envelope, EnvelopeError, Iv, KeyError, OsRandomSource, PublicKey, SecretError,
    SecretKey, BLOCK_SIZE, IV_SIZE,
};
use ::common::party::{Party, PartyError};

#[test]
fn test_alice_to_bob() {
    let rng = OsRandomSource::new();

    // Each side generates a key pair
    let alice = SecretKey::generate(&rng).unwrap();
    let bob = SecretKey::generate(&rng).unwrap();

    // Exchange serialized public keys
    let alice_wire = alice.public().to_bytes();
    let bob_wire = bob.public().to_bytes();

    // Both derive the same shared secret
    let alice_shared = alice.agree(&bob_wire).unwrap();
    let bob_shared = bob.agree(&alice_wire).unwrap();
    assert_eq!(alice_shared, bob_shared);

    // Both derive the same key
    let alice_key = kdf::derive(&alice_shared);
    let bob_key = kdf::derive(&bob_shared);
    assert_eq!(alice_key, bob_key);

    // Alice encrypts under a fresh IV and packs the envelope
    let iv = Iv::generate(&rng).unwrap();
    let ciphertext = alice_key.encrypt(&iv, common::ALICE_MESSAGE.as_bytes());
    let envelope = Envelope::pack(&iv, &ciphertext);
    assert_eq!(envelope.as_bytes().len(), IV_SIZE + BLOCK_SIZE);

    // Bob unpacks and decrypts
    let received = Envelope::try_from(envelope.as_bytes()).unwrap();
    let (received_iv, received_ciphertext) = received.unpack();
    assert_eq!(received_iv, iv);

    let plaintext = bob_key.decrypt(&received_iv, received_ciphertext).unwrap();
    assert_eq!(String::from_utf8(plaintext).unwrap(), common::ALICE_MESSAGE);
}

#[test]
fn test_party_exchange() {
    let exchange = common::setup_exchange(100);
    let (alice_channel, bob_channel) = common::establish(&exchange);

    assert_eq!(alice_channel.fingerprint(), bob_channel.fingerprint());

    let envelope = alice_channel
        .seal(&exchange.rng, common::ALICE_MESSAGE.as_bytes())
        .unwrap();
    let plaintext = bob_channel.open_bytes(envelope.as_bytes()).unwrap();
    assert_eq!(plaintext, common::ALICE_MESSAGE.as_bytes());
}

#[test]
fn test_seeded_exchange_is_reproducible() {
    let first = common::setup_exchange(7);
    let second = common::setup_exchange(7);
    let other = common::setup_exchange(8);

    assert_eq!(first.alice.public_key(), second.alice.public_key());
    assert_eq!(first.bob.public_key(), second.bob.public_key());
    assert_ne!(first.alice.public_key(), other.alice.public_key());

    let (first_channel, _) = common::establish(&first);
    let (second_channel, _) = common::establish(&second);
    assert_eq!(first_channel.fingerprint(), second_channel.fingerprint());
}

#[test]
fn test_every_pair_agrees() {
    let keys: Vec<SecretKey> = (0..5).map(common::key_from_seed).collect();

    for a in &keys {
        for b in &keys {
            assert_eq!(a.diffie_hellman(&b.public()), b.diffie_hellman(&a.public()));
        }
    }
}

#[test]
fn test_public_key_round_trip() {
    for seed in 0..10 {
        let public_key = common::key_from_seed(seed).public();
        let recovered = PublicKey::from_bytes(&public_key.to_bytes()).unwrap();
        assert_eq!(public_key, recovered);
    }
}

#[test]
fn test_off_curve_key_rejected() {
    let exchange = common::setup_exchange(200);
    let blob = common::off_curve_blob(&exchange.bob.public_key());

    assert!(matches!(
        PublicKey::from_bytes(&blob),
        Err(KeyError::InvalidPublicKey(_))
    ));
    assert!(matches!(
        exchange.alice.establish(&blob),
        Err(PartyError::Key(KeyError::InvalidPublicKey(_)))
    ));
}

#[test]
fn test_foreign_curve_rejected() {
    let exchange = common::setup_exchange(201);

    let mut blob = vec![0u8; Curve::P384.public_key_size()];
    blob[..4].copy_from_slice(&Curve::P384.magic().to_le_bytes());
    blob[4..8].copy_from_slice(&(Curve::P384.coordinate_size() as u32).to_le_bytes());

    assert!(matches!(
        exchange.alice.establish(&blob),
        Err(PartyError::Key(KeyError::CurveMismatch {
            expected: Curve::P256,
            found: Curve::P384,
        }))
    ));
}

#[test]
fn test_tampered_envelope_rejected() {
    let exchange = common::setup_exchange(300);
    let (alice_channel, bob_channel) = common::establish(&exchange);

    // One data block plus one full padding block
    let message = [0x41u8; BLOCK_SIZE];
    let envelope = alice_channel.seal(&exchange.rng, &message).unwrap();
    assert_eq!(envelope.ciphertext_len(), 2 * BLOCK_SIZE);

    // The byte just before the final block drives the last padding byte
    let last_padding_byte = envelope.as_bytes().len() - BLOCK_SIZE - 1;
    let tampered = common::flip_bit(&envelope, last_padding_byte, 0x80);
    assert!(matches!(
        bob_channel.open_bytes(&tampered),
        Err(PartyError::Secret(SecretError::Decryption))
    ));
}

#[test]
fn test_short_envelope_rejected_before_decryption() {
    let exchange = common::setup_exchange(301);
    let (_, bob_channel) = common::establish(&exchange);

    assert!(matches!(
        bob_channel.open_bytes(&[0u8; 3]),
        Err(PartyError::Envelope(EnvelopeError::TooShort { len: 3 }))
    ));
}

#[test]
fn test_independent_sessions_do_not_share_keys() {
    let rng = OsRandomSource::new();
    let alice = Party::new("alice", &rng).unwrap();
    let bob = Party::new("bob", &rng).unwrap();
    let bob_again = Party::new("bob", &rng).unwrap();

    let first = alice.establish(&bob.public_key_bytes()).unwrap();
    let second = alice.establish(&bob_again.public_key_bytes()).unwrap();
    assert_ne!(first.fingerprint(), second.fingerprint());
}
