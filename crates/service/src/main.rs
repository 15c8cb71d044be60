//! Command line interface for the Nostr signer.

use anyhow::{bail, Context};
use clap::Parser;
use nostr_signer::config::{self, Args, Command};
use nostr_signer::{dispatch_json, SignerService};
use nostr_signer_core::{KeyEncoding, SecretKey, VerifyingKey};
use std::io::{self, BufRead, Write};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout only carries results.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("nostr_signer={},warn", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    let service = SignerService::new(args.initial_seed()?);
    let encoding = KeyEncoding::from(args.encoding);

    match args.command {
        Command::GenerateKey => {
            let secret_key = SecretKey::from_hex(&service.generate_key())?;
            println!("{}", secret_key.encode(encoding));
        }
        Command::Keypair => {
            let key_info = service.generate_keypair();
            let secret_key = SecretKey::from_hex(&key_info.secret_key)?;
            println!("secret key:    {}", secret_key.encode(encoding));
            println!("verifying key: {}", secret_key.verifying_key().encode(encoding));
        }
        Command::Greet { name } => println!("{}", service.greet(&name)),
        Command::RngSeed => println!("{}", service.rng_seed()),
        Command::Sign {
            message,
            secret_key,
        } => {
            let info = service.schnorr_signature(&message, &secret_key)?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::Validate {
            message,
            verifying_key,
            signature,
        } => {
            let valid = service.validate_schnorr(&message, &verifying_key, &signature);
            println!("{valid}");
            if !valid {
                // Distinguishes a malformed key from a bad signature in the exit error.
                VerifyingKey::parse(&verifying_key).context("invalid verifying key")?;
                bail!("signature is invalid");
            }
        }
        Command::SignEvent {
            content,
            secret_key,
            kind,
            tags,
            created_at,
        } => {
            let event = service.sign_event(
                &secret_key,
                kind,
                config::parse_tags(&tags),
                &content,
                created_at,
            )?;
            println!("{}", event.as_json()?);
        }
        Command::VerifyEvent { json } => {
            let valid = service.verify_event(&json);
            println!("{valid}");
            if !valid {
                bail!("event is invalid");
            }
        }
        Command::Serve => serve(&service)?,
    }

    Ok(())
}

/// Answers one JSON request per stdin line until EOF.
fn serve(service: &SignerService) -> anyhow::Result<()> {
    info!("serving requests from stdin");
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read request")?;
        if line.trim().is_empty() {
            continue;
        }
        let response = dispatch_json(service, &line);
        serde_json::to_writer(&mut stdout, &response)?;
        writeln!(stdout)?;
        stdout.flush()?;
    }
    info!("stdin closed, shutting down");
    Ok(())
}
