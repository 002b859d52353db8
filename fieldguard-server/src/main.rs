//! fieldguard server
//!
//! Serves the protection workspace over HTTP:
//! 1. Upload a CSV dataset; confidential columns are inferred from their names
//! 2. Mask, hash, tokenize or encrypt those columns, and decrypt them again
//!
//! Usage:
//!   fieldguard keygen
//!   FIELDGUARD_KEY=... fieldguard serve --bind 127.0.0.1:8080
//!
//! There is no built-in key. Start-up fails unless a key, a passphrase and
//! salt, or `--ephemeral-key` is given.

use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use fieldguard_crypto::{EncryptionCodec, EncryptionKey, KdfParams, Salt, derive_key};
use fieldguard_datasets::{MemoryStore, SqliteStore};
use fieldguard_protect::{ProtectionEngine, Workspace};
use fieldguard_server::build_router;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "fieldguard")]
#[command(about = "Field-level protection for tabular data", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve(ServeArgs),
    /// Print a new random key for FIELDGUARD_KEY
    Keygen {
        /// Also print a random salt for FIELDGUARD_SALT
        #[arg(long)]
        salt: bool,
    },
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address for the HTTP API
    #[arg(short, long, env = "FIELDGUARD_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// SQLite file for the current dataset (in-memory if omitted)
    #[arg(short, long, env = "FIELDGUARD_DATABASE")]
    database: Option<PathBuf>,

    /// Base64-encoded 32-byte encryption key
    #[arg(long, env = "FIELDGUARD_KEY", hide_env_values = true,
          conflicts_with_all = ["passphrase", "ephemeral_key"])]
    key: Option<String>,

    /// Passphrase to derive the key from (Argon2id)
    #[arg(long, env = "FIELDGUARD_PASSPHRASE", hide_env_values = true,
          requires = "salt", conflicts_with = "ephemeral_key")]
    passphrase: Option<String>,

    /// Base64-encoded 16-byte salt for --passphrase
    #[arg(long, env = "FIELDGUARD_SALT", requires = "passphrase")]
    salt: Option<String>,

    /// Generate a throwaway key; encrypted values are lost on exit
    #[arg(long)]
    ephemeral_key: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    match Cli::parse().command {
        Command::Keygen { salt } => {
            println!("FIELDGUARD_KEY={}", EncryptionKey::generate().to_base64());
            if salt {
                println!("FIELDGUARD_SALT={}", Salt::random().to_base64());
            }
            Ok(())
        }
        Command::Serve(args) => serve(args).await,
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!("fieldguard starting...");
    let codec = load_codec(&args)?;
    let key_info = codec.key_info();
    info!("Key fingerprint: {} ({})", key_info.fingerprint, key_info.algorithm);

    let engine = ProtectionEngine::new(codec);
    let workspace = match &args.database {
        Some(path) => {
            info!("Using SQLite store at {:?}", path);
            let store = SqliteStore::open(path)
                .with_context(|| format!("Failed to open database {}", path.display()))?;
            Workspace::open(store, engine)?
        }
        None => {
            info!("Using in-memory store");
            Workspace::open(MemoryStore::new(), engine)?
        }
    };

    let app = build_router(Arc::new(workspace));
    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    info!("HTTP API listening on {}", args.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("fieldguard stopped");
    Ok(())
}

fn load_codec(args: &ServeArgs) -> Result<EncryptionCodec> {
    if let Some(encoded) = &args.key {
        let key = EncryptionKey::from_base64(encoded).context("Invalid FIELDGUARD_KEY")?;
        info!("Using configured key");
        return Ok(EncryptionCodec::new(key));
    }

    if let (Some(passphrase), Some(salt)) = (&args.passphrase, &args.salt) {
        let salt = Salt::from_base64(salt).context("Invalid FIELDGUARD_SALT")?;
        let key = derive_key(passphrase, &salt, &KdfParams::default())
            .context("Failed to derive key from passphrase")?;
        info!("Using passphrase-derived key");
        return Ok(EncryptionCodec::new(key));
    }

    if args.ephemeral_key {
        warn!(
            "Using an ephemeral key: values encrypted by this process cannot be \
             decrypted after it exits"
        );
        return Ok(EncryptionCodec::generate());
    }

    bail!(
        "no encryption key configured: set FIELDGUARD_KEY (see `fieldguard keygen`), \
         FIELDGUARD_PASSPHRASE with FIELDGUARD_SALT, or pass --ephemeral-key"
    )
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
