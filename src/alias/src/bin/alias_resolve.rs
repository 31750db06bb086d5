//! # alias-resolve
//!
//! Resolves one recipient through the configured alias maps and prints the
//! resulting delivery plan as JSON. Nothing is delivered.
//!
//! ## Configuration
//!
//! - `--config` - TOML configuration file (default: /etc/localmail/localmail.toml)
//! - `RUST_LOG` - Log level (default: info)
//!
//! Only `json:<path>` alias maps can be opened from the configuration file.

use anyhow::{Context, Result};
use clap::Parser;
use localmail_alias::{
    AliasResolver, Collaborators, ExpansionPlanner, LocalConfig, OriginCanonicalizer,
    PasswdDirectory, RecordLog, TableRegistry,
};
use localmail_core::{LocalState, UserAttr};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "alias-resolve", version, about = "Show how a local recipient expands")]
struct Cli {
    /// Configuration file
    #[arg(short, long, env = "LOCALMAIL_CONFIG", default_value = "/etc/localmail/localmail.toml")]
    config: PathBuf,

    /// Envelope sender
    #[arg(short, long, default_value = "")]
    sender: String,

    /// Starting recursion depth
    #[arg(long, default_value_t = 0)]
    level: u32,

    /// Queue identifier used in records
    #[arg(long, default_value = "NOQUEUE")]
    queue_id: String,

    /// Recipient local part or address
    recipient: String,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    info!("alias-resolve v{}", localmail_alias::VERSION);

    let config = LocalConfig::load(&cli.config)
        .with_context(|| format!("Loading {}", cli.config.display()))?;
    config.validate()?;
    config.require_file_tables()?;

    let directory = PasswdDirectory::load(&config.identity.passwd_file)
        .with_context(|| format!("Loading {}", config.identity.passwd_file.display()))?;

    let myorigin = config.identity.myorigin.clone();
    let (local, recipient) = match cli.recipient.split_once('@') {
        Some((local, _)) => (local.to_string(), cli.recipient.clone()),
        None => (cli.recipient.clone(), format!("{}@{}", cli.recipient, myorigin)),
    };

    let planner = Arc::new(ExpansionPlanner::new(
        myorigin.clone(),
        config.aliases.default_privs.clone(),
    ));
    let recorder = Arc::new(RecordLog::new());

    let resolver = AliasResolver::new(
        config.aliases.clone(),
        TableRegistry::new(),
        Collaborators {
            directory: Arc::new(directory),
            canonicalizer: Arc::new(OriginCanonicalizer::new(myorigin)),
            recorder: recorder.clone(),
            dispatcher: planner.clone(),
        },
    );

    let state = LocalState::top_level(cli.queue_id, recipient, local, cli.sender)
        .with_level(cli.level);
    let status = planner
        .plan_recipient(&resolver, &state, &UserAttr::new())
        .context("Alias resolution failed")?;

    let report = json!({
        "recipient": state.recipient,
        "status": status,
        "deliveries": planner.deliveries(),
        "records": recorder.records(),
        "metrics": resolver.metrics(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
