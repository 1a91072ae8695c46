//! CLI definitions and command routing.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::{Settings, TrustConfig};
use crate::factory::TrustManagerFactory;
use crate::resolver::StoreResolver;

#[derive(Parser)]
#[command(name = "trustroots")]
#[command(about = "Resolve, inspect and verify against the TLS trust store")]
pub struct Cli {
    /// Read settings from a TOML file (TRUSTROOTS_* variables still override)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the trust store location initialization would use
    Path,

    /// Load the trust store and list its certificates
    List {
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Verify a PEM chain (leaf first) as a TLS server certificate
    Verify {
        chain: PathBuf,
        /// DNS name or IP address the certificate must be valid for
        #[arg(long)]
        server_name: String,
    },

    /// Check the trust store for problems (missing file, expiring certs)
    Doctor {
        /// Report certificates expiring within this many days
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
}

/// Run CLI and dispatch to handlers.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Path => cmd_path(settings),
        Commands::List { json } => cmd_list(settings, json),
        Commands::Verify { chain, server_name } => cmd_verify(settings, &chain, &server_name),
        Commands::Doctor { days } => cmd_doctor(settings, days),
    }
}

fn load_settings(config: Option<&Path>) -> Result<Settings> {
    match config {
        Some(path) => {
            // A config file named on the command line must exist.
            if !path.is_file() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            let mut cfg = TrustConfig::load(path)
                .with_context(|| format!("load config: {}", path.display()))?;
            cfg.merge_env();
            Ok(Settings::new(cfg))
        }
        None => Ok(Settings::global().clone()),
    }
}

fn cmd_path(settings: Settings) -> Result<()> {
    let resolver = StoreResolver::new(settings);
    // Seeds the platform default when nothing is configured.
    resolver.select_source();
    let location = resolver.settings().trust_store().unwrap_or_default();
    println!("{}", location.display());
    Ok(())
}

fn cmd_list(settings: Settings, json: bool) -> Result<()> {
    let mut factory = TrustManagerFactory::new(settings);
    factory.init(None)?;
    let store = factory
        .validators()?
        .into_iter()
        .next()
        .map(|v| v.store().clone())
        .context("no validator")?;

    if json {
        let entries: Vec<_> = store
            .entries()
            .map(|e| {
                serde_json::json!({
                    "alias": e.alias(),
                    "subject": e.subject(),
                    "not_after": e.not_after().unix_timestamp(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for e in store.entries() {
            println!("{}\t{}\t{}", e.alias(), e.not_after().date(), e.subject());
        }
    }
    Ok(())
}

fn cmd_verify(settings: Settings, chain_path: &Path, server_name: &str) -> Result<()> {
    let chain = crate::cert::read_pem_chain(chain_path)?;
    let mut factory = TrustManagerFactory::new(settings);
    factory.init(None)?;
    for validator in factory.validators()? {
        validator
            .verify_server_chain(&chain, server_name)
            .with_context(|| format!("verify {} for {server_name}", chain_path.display()))?;
    }
    println!("OK: {} is trusted for {server_name}", chain_path.display());
    Ok(())
}

fn cmd_doctor(settings: Settings, days: u32) -> Result<()> {
    let resolver = StoreResolver::new(settings);
    let results = crate::doctor::run_checks(&resolver, days);
    let mut failed = false;
    for r in &results {
        let mark = if r.ok { "ok" } else { "FAIL" };
        println!("[{mark}] {}", r.message);
        failed |= !r.ok;
    }
    if failed {
        anyhow::bail!("trust store checks failed");
    }
    Ok(())
}
