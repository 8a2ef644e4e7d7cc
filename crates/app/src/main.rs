// CLI modules
mod args;
mod logging;
mod op;
mod ops;
mod state;

// In-process link between the two demo parties
mod wire;

use args::Args;
use clap::{Parser, Subcommand};
use op::Op;
use ops::{Demo, Init, Keygen, Version};

command_enum! {
    (Demo, Demo),
    (Init, Init),
    (Keygen, Keygen),
    (Version, Version),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Build context - falls back to default config when none exists
    let ctx = match op::OpContext::new(args.config_path) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    // Explicit flag > config file > default
    let log_level = match args.log_level {
        Some(level) => level,
        None => ctx.config.log_level().unwrap_or_else(|e| {
            eprintln!("Warning: {}, using warn", e);
            tracing::Level::WARN
        }),
    };
    let guard = logging::init_logging(log_level);

    let result = args.command.execute(&ctx).await;
    // Flush buffered log lines; process::exit skips destructors
    drop(guard);

    match result {
        Ok(output) => {
            println!("{}", output);
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
