use std::error::Error;
use std::path::PathBuf;

use crate::state::{AppConfig, AppState, StateError};

#[derive(Debug, Clone)]
pub struct OpContext {
    /// Loaded (or default) configuration
    pub config: AppConfig,
    /// Optional custom config path (defaults to ~/.keyshake)
    pub config_path: Option<PathBuf>,
}

impl OpContext {
    /// Create context from an optional config directory
    ///
    /// A missing config file is not an error; defaults are used until
    /// `keyshake init` writes one.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, StateError> {
        let config = AppState::load_or_default(config_path.clone())?.config;
        Ok(Self {
            config,
            config_path,
        })
    }
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::op::Op>::Error),
            )*
        }

        #[async_trait::async_trait]
        impl $crate::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx).await
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}
