//! CLI administration tool for fitsync-api.
//!
//! Provides offline token tasks that do not need the HTTP API or the
//! database.
//!
//! # Usage
//!
//! ```bash
//! # Generate a signing secret
//! cargo run --bin admin -- secret
//!
//! # Mint a token pair for user 42
//! cargo run --bin admin -- issue 42
//!
//! # Check a token and show its claims
//! cargo run --bin admin -- inspect eyJhbGciOi...
//! ```
//!
//! # Environment Variables
//!
//! `issue` and `inspect` read the same token settings as the server:
//! `ACCESS_TOKEN_SECRET`, `REFRESH_TOKEN_SECRET`, `ACCESS_TOKEN_TTL_MINUTES`,
//! `REFRESH_TOKEN_TTL_DAYS` and `TOKEN_ISSUER`.

use fitsync_api::application::services::{TokenError, TokenService};
use fitsync_api::config::token_settings_from_env;
use fitsync_api::domain::entities::{Claims, TokenClass};
use fitsync_api::infrastructure::memory::MemoryRevocationStore;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::sync::Arc;

/// CLI tool for managing fitsync-api tokens.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Print a fresh random signing secret
    Secret {
        /// Secret length in bytes (printed as twice as many hex characters)
        #[arg(short, long, default_value_t = 64)]
        bytes: usize,
    },

    /// Mint an access/refresh token pair
    Issue {
        /// Subject (user id)
        user_id: i64,
    },

    /// Validate a token and print its claims
    Inspect {
        /// Raw token
        token: String,

        /// Token class to validate as; tries both when omitted
        #[arg(short, long, value_enum)]
        class: Option<ClassArg>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ClassArg {
    Access,
    Refresh,
}

impl From<ClassArg> for TokenClass {
    fn from(arg: ClassArg) -> Self {
        match arg {
            ClassArg::Access => TokenClass::Access,
            ClassArg::Refresh => TokenClass::Refresh,
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Secret { bytes } => print_secret(bytes),
        Commands::Issue { user_id } => issue(&token_service()?, user_id),
        Commands::Inspect { token, class } => inspect(&token_service()?, &token, class),
    }
}

/// Builds a token service with an empty revocation set.
///
/// Revocations live in the server's memory, so `inspect` cannot see them.
fn token_service() -> Result<TokenService> {
    let settings = token_settings_from_env().context("Invalid token configuration")?;
    Ok(TokenService::new(
        settings,
        Arc::new(MemoryRevocationStore::new()),
    ))
}

fn print_secret(bytes: usize) -> Result<()> {
    if bytes < 32 {
        anyhow::bail!("Refusing to generate a secret shorter than 32 bytes");
    }

    let secret: Vec<u8> = (0..bytes).map(|_| rand::random::<u8>()).collect();
    println!("{}", hex::encode(secret));

    Ok(())
}

fn issue(service: &TokenService, user_id: i64) -> Result<()> {
    let pair = service
        .issue_pair(user_id)
        .map_err(|e| anyhow::anyhow!("Failed to issue tokens: {}", e))?;

    println!("{}", "🔑 Token pair issued".bright_blue().bold());
    println!();
    println!("  Subject:       {}", user_id.to_string().cyan());
    println!("  Issuer:        {}", service.issuer().cyan());
    println!(
        "  Access token:  {}",
        pair.access_token.bright_yellow()
    );
    println!(
        "  Refresh token: {}",
        pair.refresh_token.bright_yellow()
    );
    println!(
        "  Expires in:    {}s",
        pair.expires_in.to_string().bright_white()
    );
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:8081/me",
        pair.access_token.bright_yellow()
    );
    println!();

    Ok(())
}

fn inspect(service: &TokenService, token: &str, class: Option<ClassArg>) -> Result<()> {
    println!("{}", "🔍 Inspect token".bright_blue().bold());
    println!();

    let classes: Vec<TokenClass> = match class {
        Some(class) => vec![class.into()],
        None => vec![TokenClass::Access, TokenClass::Refresh],
    };

    let mut last_error = TokenError::Invalid;
    for class in classes {
        match service.validate_at(token, class, chrono::Utc::now()) {
            Ok(claims) => {
                print_claims(&claims);
                return Ok(());
            }
            // an expired token of the right class beats "invalid" for the other
            Err(TokenError::Expired) => last_error = TokenError::Expired,
            Err(e) => {
                if !matches!(last_error, TokenError::Expired) {
                    last_error = e;
                }
            }
        }
    }

    match last_error {
        TokenError::Expired => println!("  Status: {}", "EXPIRED".yellow().bold()),
        _ => println!("  Status: {}", "INVALID".red().bold()),
    }
    println!();

    std::process::exit(1);
}

fn print_claims(claims: &Claims) {
    let format_ts = |ts: Option<chrono::DateTime<chrono::Utc>>| {
        ts.map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "-".to_string())
    };

    println!("  Status:  {}", "VALID".green().bold());
    println!("  Class:   {}", claims.token_type.to_string().cyan());
    println!("  Subject: {}", claims.sub.cyan());
    println!("  Issuer:  {}", claims.iss.cyan());
    println!("  Issued:  {}", format_ts(claims.issued_at()).bright_black());
    println!("  Expires: {}", format_ts(claims.expires_at()).bright_black());
    println!("  Id:      {}", claims.jti.bright_black());
    println!();
}
