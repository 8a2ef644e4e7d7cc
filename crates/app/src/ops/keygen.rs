use clap::Args;

use common::crypto::{KeyError, OsRandomSource, SecretKey, SeededRandomSource};

/// Generate a throwaway key pair and print its public half
///
/// The private key is dropped (and zeroed) when the command returns; it is
/// never printed or written anywhere.
#[derive(Args, Debug, Clone)]
pub struct Keygen {
    /// Use a seeded random source instead of OS entropy (reproducible, insecure)
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum KeygenError {
    #[error("key generation failed: {0}")]
    Key(#[from] KeyError),
}

#[async_trait::async_trait]
impl crate::op::Op for Keygen {
    type Error = KeygenError;
    type Output = String;

    async fn execute(&self, _ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let secret_key = match self.seed {
            Some(seed) => SecretKey::generate(&SeededRandomSource::new(seed))?,
            None => SecretKey::generate(&OsRandomSource::new())?,
        };
        let public_key = secret_key.public();

        Ok(format!(
            "Curve: {}\nPublic Key (hex): {}\nPublic Key (SEC1, hex): {}",
            public_key.curve(),
            public_key.to_hex(),
            hex::encode(public_key.to_sec1_bytes()),
        ))
    }
}
