use std::fmt;
use std::sync::Arc;

use clap::Args;

use common::crypto::{OsRandomSource, RandomSource, SeededRandomSource, SharedSecret};
use common::party::{Party, PartyError};

use crate::wire::{self, Endpoint, Frame, WireError};

/// Run the Alice/Bob exchange end to end
#[derive(Args, Debug, Clone)]
pub struct Demo {
    /// Message Alice sends (defaults to the configured message)
    #[arg(long)]
    pub message: Option<String>,

    /// Seed both parties' random sources for a reproducible run (insecure)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Also print the raw shared secrets
    #[arg(long)]
    pub reveal: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("party error: {0}")]
    Party(#[from] PartyError),
    #[error("wire error: {0}")]
    Wire(#[from] WireError),
    #[error("party task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("decrypted message is not UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error("shared secrets do not match")]
    SecretsDiffer,
}

/// What each side observed, collected after both tasks finish
pub struct DemoReport {
    pub alice_public_key: String,
    pub bob_public_key: String,
    pub alice_shared: SharedSecret,
    pub bob_shared: SharedSecret,
    pub alice_fingerprint: String,
    pub bob_fingerprint: String,
    pub plaintext: String,
    pub envelope: String,
    pub decrypted: String,
    pub reveal: bool,
}

impl DemoReport {
    pub fn secrets_match(&self) -> bool {
        self.alice_shared == self.bob_shared
    }
}

impl fmt::Debug for DemoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DemoReport")
            .field("alice_fingerprint", &self.alice_fingerprint)
            .field("bob_fingerprint", &self.bob_fingerprint)
            .field("envelope", &self.envelope)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for DemoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Alice's Public Key (hex): {}", self.alice_public_key)?;
        writeln!(f, "Bob's Public Key (hex): {}", self.bob_public_key)?;
        if self.reveal {
            writeln!(f, "Alice's Shared Secret (hex): {}", self.alice_shared.to_hex())?;
            writeln!(f, "Bob's Shared Secret (hex): {}", self.bob_shared.to_hex())?;
        }
        writeln!(f, "Shared secrets match: {}", self.secrets_match())?;
        writeln!(f, "Alice's Key Fingerprint: {}", self.alice_fingerprint)?;
        writeln!(f, "Bob's Key Fingerprint: {}", self.bob_fingerprint)?;
        writeln!(f, "Alice's Plaintext: {}", self.plaintext)?;
        writeln!(
            f,
            "Alice's Encrypted Message (IV + Ciphertext, hex): {}",
            self.envelope
        )?;
        write!(f, "Bob's Decrypted Message: {}", self.decrypted)
    }
}

struct AliceOutcome {
    public_key: String,
    shared: SharedSecret,
    fingerprint: String,
    envelope: String,
}

struct BobOutcome {
    public_key: String,
    shared: SharedSecret,
    fingerprint: String,
    decrypted: String,
}

/// Each party gets its own source so neither can observe the other's draws
fn random_source(seed: Option<u64>, offset: u64) -> Arc<dyn RandomSource> {
    match seed {
        Some(seed) => Arc::new(SeededRandomSource::new(seed.wrapping_add(offset))),
        None => Arc::new(OsRandomSource::new()),
    }
}

async fn run_alice(
    endpoint: Endpoint,
    rng: Arc<dyn RandomSource>,
    message: String,
) -> Result<AliceOutcome, DemoError> {
    let alice = Party::new("alice", rng.as_ref())?;
    endpoint
        .send(Frame::PublicKey(alice.public_key_bytes().to_vec()))
        .await?;

    let bob_key = endpoint.recv_public_key().await?;
    let shared = alice.shared_secret(&bob_key)?;
    let channel = alice.establish(&bob_key)?;

    let envelope = channel.seal(rng.as_ref(), message.as_bytes())?;
    let envelope_hex = envelope.to_hex();
    endpoint.send(Frame::Envelope(envelope.into_bytes())).await?;

    Ok(AliceOutcome {
        public_key: alice.public_key().to_hex(),
        shared,
        fingerprint: channel.fingerprint(),
        envelope: envelope_hex,
    })
}

async fn run_bob(
    endpoint: Endpoint,
    rng: Arc<dyn RandomSource>,
) -> Result<BobOutcome, DemoError> {
    let bob = Party::new("bob", rng.as_ref())?;
    endpoint
        .send(Frame::PublicKey(bob.public_key_bytes().to_vec()))
        .await?;

    let alice_key = endpoint.recv_public_key().await?;
    let shared = bob.shared_secret(&alice_key)?;
    let channel = bob.establish(&alice_key)?;

    let envelope = endpoint.recv_envelope().await?;
    let plaintext = channel.open_bytes(&envelope)?;

    Ok(BobOutcome {
        public_key: bob.public_key().to_hex(),
        shared,
        fingerprint: channel.fingerprint(),
        decrypted: String::from_utf8(plaintext)?,
    })
}

/// Run both parties concurrently and collect their views
pub async fn run(
    message: String,
    seed: Option<u64>,
    reveal: bool,
) -> Result<DemoReport, DemoError> {
    let (alice_end, bob_end) = wire::pair();

    let alice_task = tokio::spawn(run_alice(alice_end, random_source(seed, 0), message.clone()));
    let bob_task = tokio::spawn(run_bob(bob_end, random_source(seed, 1)));

    let (alice, bob) = tokio::try_join!(alice_task, bob_task)?;
    let (alice, bob) = (alice?, bob?);

    let report = DemoReport {
        alice_public_key: alice.public_key,
        bob_public_key: bob.public_key,
        alice_shared: alice.shared,
        bob_shared: bob.shared,
        alice_fingerprint: alice.fingerprint,
        bob_fingerprint: bob.fingerprint,
        plaintext: message,
        envelope: alice.envelope,
        decrypted: bob.decrypted,
        reveal,
    };

    if !report.secrets_match() {
        return Err(DemoError::SecretsDiffer);
    }
    tracing::info!(fingerprint = %report.alice_fingerprint, "demo exchange complete");

    Ok(report)
}

#[async_trait::async_trait]
impl crate::op::Op for Demo {
    type Error = DemoError;
    type Output = DemoReport;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let message = self
            .message
            .clone()
            .unwrap_or_else(|| ctx.config.message.clone());
        run(message, self.seed, self.reveal).await
    }
}
