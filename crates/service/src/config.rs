//! Configuration for the signer.
//!
//! CLI arguments and environment variable handling using clap.

use clap::{Parser, Subcommand, ValueEnum};
use nostr_signer_core::{KeyEncoding, RngSeed, SeedError};

/// A BIP-340 Schnorr signer for Nostr keys.
#[derive(Parser, Debug, Clone)]
#[command(name = "nostr-signer")]
#[command(about = "Generates Nostr keys and signs and verifies BIP-340 Schnorr signatures")]
pub struct Args {
    /// Initial hex seed of the random generator (zero padded or truncated to 32 bytes)
    #[arg(long, env = "NOSTR_SIGNER_SEED", conflicts_with = "random_seed")]
    pub seed: Option<String>,

    /// Seed the random generator from the operating system instead of the all-zero default
    #[arg(long, env = "NOSTR_SIGNER_RANDOM_SEED", default_value = "false")]
    pub random_seed: bool,

    /// Encoding for printed keys
    #[arg(long, env = "NOSTR_SIGNER_KEY_ENCODING", value_enum, default_value_t = OutputEncoding::Hex)]
    pub encoding: OutputEncoding,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "NOSTR_SIGNER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Signer operations.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate a secret key from the seed
    GenerateKey,
    /// Generate a secret key and its verifying key from the seed
    Keypair,
    /// Greet a name, or the verifying key of a secret key
    Greet { name: String },
    /// Print the seed
    RngSeed,
    /// Sign a message
    Sign {
        /// Message to sign
        message: String,
        /// Secret key (hex or nsec)
        #[arg(long, env = "NOSTR_SIGNER_SECRET_KEY")]
        secret_key: String,
    },
    /// Validate a signature, exits with a non-zero status if it is invalid
    Validate {
        message: String,
        /// Verifying key (hex or npub)
        verifying_key: String,
        /// Hex signature
        signature: String,
    },
    /// Sign a Nostr event and print it as JSON
    SignEvent {
        /// Event content
        content: String,
        /// Secret key (hex or nsec)
        #[arg(long, env = "NOSTR_SIGNER_SECRET_KEY")]
        secret_key: String,
        /// Event kind
        #[arg(long, default_value_t = 1)]
        kind: u16,
        /// Tags as comma separated values, e.g `--tag t,nostr` (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Unix timestamp, defaults to now
        #[arg(long)]
        created_at: Option<u64>,
    },
    /// Verify a JSON Nostr event, exits with a non-zero status if it is invalid
    VerifyEvent { json: String },
    /// Read JSON requests line by line from stdin and write JSON responses to stdout
    Serve,
}

/// Printed key encoding.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEncoding {
    /// Lowercase hex
    Hex,
    /// NIP-19 bech32 (nsec/npub)
    Bech32,
}

impl From<OutputEncoding> for KeyEncoding {
    fn from(encoding: OutputEncoding) -> Self {
        match encoding {
            OutputEncoding::Hex => KeyEncoding::Hex,
            OutputEncoding::Bech32 => KeyEncoding::Bech32,
        }
    }
}

impl Args {
    /// Returns the configured initial seed.
    pub fn initial_seed(&self) -> Result<RngSeed, SeedError> {
        match &self.seed {
            Some(seed) => RngSeed::from_hex(seed),
            None if self.random_seed => Ok(RngSeed::random()),
            None => Ok(RngSeed::default()),
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.initial_seed()
            .map(|_| ())
            .map_err(|error| format!("NOSTR_SIGNER_SEED: {error}"))
    }
}

/// Splits `t,nostr` style tag arguments into tags.
pub fn parse_tags(tags: &[String]) -> Vec<Vec<String>> {
    tags.iter()
        .map(|tag| tag.split(',').map(str::to_string).collect())
        .collect()
}
