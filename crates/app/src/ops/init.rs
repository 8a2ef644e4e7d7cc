use clap::Args;

use crate::state::{AppConfig, AppState};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Message Alice sends in the demo
    #[arg(long, default_value = crate::state::DEFAULT_MESSAGE)]
    pub message: String,

    /// Default log level written to the config
    #[arg(long, default_value = "warn")]
    pub default_log_level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] crate::state::StateError),
}

#[async_trait::async_trait]
impl crate::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            log_level: self.default_log_level.clone(),
            message: self.message.clone(),
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;
        tracing::info!(path = %state.config_path.display(), "wrote config");

        let output = format!(
            "Initialized keyshake directory at: {}\n\
             - Config: {}\n\
             - Log level: {}\n\
             - Demo message: {}",
            state.config_dir.display(),
            state.config_path.display(),
            state.config.log_level,
            state.config.message,
        );

        Ok(output)
    }
}
