use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use intervue_auth::{Claims, Role, encode_claims, verify_token};
use intervue_config::{JwtConfig, ServerConfig, UploadConfig};
use intervue_storage::UploadGuard;

#[derive(Parser)]
#[command(name = "intervue-cli")]
#[command(about = "Intervue CLI - Operator tools for the Intervue API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mint a bearer token signed with JWT_SECRET
    IssueToken {
        /// Subject identifier to embed in the token
        #[arg(short = 's', long)]
        subject: String,

        /// Role: candidate, interviewer or admin
        #[arg(short = 'r', long)]
        role: Role,

        /// Lifetime in seconds (defaults to JWT_ACCESS_EXPIRY)
        #[arg(short = 't', long)]
        ttl: Option<i64>,
    },
    /// Create the upload directory and print its absolute path
    PrepareStorage,
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::IssueToken { subject, role, ttl } => handle_issue_token(subject, role, ttl),
        Commands::PrepareStorage => handle_prepare_storage(),
    }
}

fn handle_issue_token(subject: String, role: Role, ttl: Option<i64>) -> anyhow::Result<()> {
    let jwt_config = JwtConfig::from_env(ServerConfig::from_env().environment)?;
    let ttl = ttl.unwrap_or(jwt_config.access_token_expiry);
    let claims = build_claims(subject, role, ttl, Utc::now().timestamp())?;

    let token = encode_claims(&claims, &jwt_config)?;
    // Verify with the same config the server will use.
    let principal = verify_token(&token, &jwt_config)
        .map_err(|failure| anyhow::anyhow!("issued token failed verification: {failure}"))?;

    eprintln!(
        "Issued {} token for '{}' (expires {})",
        principal.role, principal.subject, principal.expires_at
    );
    println!("{token}");
    Ok(())
}

fn build_claims(subject: String, role: Role, ttl: i64, now: i64) -> anyhow::Result<Claims> {
    anyhow::ensure!(ttl > 0, "--ttl must be positive");
    anyhow::ensure!(!subject.trim().is_empty(), "--subject must not be empty");

    let exp = now
        .checked_add(ttl)
        .ok_or_else(|| anyhow::anyhow!("--ttl {ttl} is too large"))?;

    Ok(Claims {
        sub: subject,
        role,
        iat: now,
        exp,
    })
}

fn handle_prepare_storage() -> anyhow::Result<()> {
    let config = UploadConfig::from_env();
    let dir = config.dir.clone();
    let guard = UploadGuard::new(config)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    println!("{}", guard.dir().display());
    Ok(())
}
