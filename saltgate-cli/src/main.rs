use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use saltgate_core::core_crypto::{self, CryptoBackend, PrivateKey, PublicKey, NONCE_LEN};
use saltgate_core::core_envelope::EnvelopeCodec;
use saltgate_core::core_lookup;
use saltgate_core::core_wire::{Message, TextMessage};
use saltgate_core::logging::{init_logging_with_config, LogConfig, LogLevel};

#[derive(Parser, Debug)]
#[command(name = "saltgate")]
#[command(author, version, about = "E2E messaging gateway client tools", long_about = None)]
struct Args {
    /// Set the log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Enable JSON formatted logging
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a new key pair
    Keygen {
        /// Write the private key here instead of stdout
        #[arg(long)]
        private_key_file: Option<PathBuf>,

        /// Write the public key here instead of stdout
        #[arg(long)]
        public_key_file: Option<PathBuf>,
    },

    /// Derive the public key from a private key
    DerivePublicKey {
        /// Private key in `private:<hex>` form
        private_key: String,
    },

    /// Hash an email address for directory lookup
    HashEmail { email: String },

    /// Hash a phone number for directory lookup
    HashPhone { phone: String },

    /// Seal a text message; prints nonce and ciphertext as hex
    Seal {
        /// Sender private key in `private:<hex>` form
        #[arg(long)]
        private_key: String,

        /// Recipient public key in `public:<hex>` form
        #[arg(long)]
        public_key: String,

        /// Message text
        text: String,
    },

    /// Open a sealed text message
    Open {
        /// Recipient private key in `private:<hex>` form
        #[arg(long)]
        private_key: String,

        /// Sender public key in `public:<hex>` form
        #[arg(long)]
        public_key: String,

        /// Envelope nonce as hex
        #[arg(long)]
        nonce: String,

        /// Ciphertext as hex
        ciphertext: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = args.log_level.parse::<LogLevel>().unwrap_or_else(|_| {
        eprintln!("Invalid log level '{}', using 'warn'", args.log_level);
        LogLevel::Warn
    });
    init_logging_with_config(LogConfig::new(log_level).json_format(args.json_logs))?;

    match args.command {
        Command::Keygen {
            private_key_file,
            public_key_file,
        } => keygen(private_key_file, public_key_file),
        Command::DerivePublicKey { private_key } => {
            let private = PrivateKey::decode(&private_key)?;
            let backend = core_crypto::select()?;
            println!("{}", backend.derive_public_key(&private).encode());
            Ok(())
        }
        Command::HashEmail { email } => {
            println!("{}", core_lookup::hash_email(&email));
            Ok(())
        }
        Command::HashPhone { phone } => {
            println!("{}", core_lookup::hash_phone(&phone));
            Ok(())
        }
        Command::Seal {
            private_key,
            public_key,
            text,
        } => {
            let private = PrivateKey::decode(&private_key)?;
            let public = PublicKey::decode(&public_key)?;
            let codec = EnvelopeCodec::new()?;
            let envelope =
                codec.seal_envelope(&Message::Text(TextMessage::new(text)), &private, &public)?;
            println!("nonce: {}", hex::encode(envelope.nonce));
            println!("ciphertext: {}", hex::encode(&envelope.ciphertext));
            Ok(())
        }
        Command::Open {
            private_key,
            public_key,
            nonce,
            ciphertext,
        } => {
            let private = PrivateKey::decode(&private_key)?;
            let public = PublicKey::decode(&public_key)?;
            let nonce = hex::decode(&nonce).context("nonce is not valid hex")?;
            if nonce.len() != NONCE_LEN {
                bail!("nonce must be {} bytes", NONCE_LEN);
            }
            let ciphertext = hex::decode(&ciphertext).context("ciphertext is not valid hex")?;

            let codec = EnvelopeCodec::new()?;
            let message = codec.open(&ciphertext, &private, &public, &nonce)?;
            match message {
                Message::Text(text) => println!("{}", text.text),
                other => println!("{}: {:?}", other.type_name(), other),
            }
            Ok(())
        }
    }
}

fn keygen(private_key_file: Option<PathBuf>, public_key_file: Option<PathBuf>) -> Result<()> {
    let backend = core_crypto::select()?;
    let keypair = backend.generate_keypair()?;

    match private_key_file {
        Some(path) => {
            std::fs::write(&path, format!("{}\n", keypair.private.encode()))
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "wrote private key");
        }
        None => println!("{}", keypair.private.encode()),
    }
    match public_key_file {
        Some(path) => {
            std::fs::write(&path, format!("{}\n", keypair.public.encode()))
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "wrote public key");
        }
        None => println!("{}", keypair.public.encode()),
    }
    Ok(())
}
