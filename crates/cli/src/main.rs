use std::time::Instant;

use anyhow::anyhow;
use clap::{Args as ClapArgs, Parser, Subcommand};
use configuration::{BatchMode, BootstrapConfig, BootstrapConfigBuilder, HeaderSource};
use tracing::info;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Flags shared by every command, they take precedence over the config file.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct Overrides {
    /// Coretime chain rpc endpoint (e.g. ws://127.0.0.1:9910)
    #[arg(long = "coretime")]
    pub coretime: Option<String>,
    /// Secret uri of the sudo key (e.g. //Alice)
    #[arg(long = "suri")]
    pub suri: Option<String>,
    /// Fail if a submission is not finalized after this many seconds
    #[arg(long = "finalization-timeout")]
    pub finalization_timeout: Option<u64>,
    /// Wait up to this many seconds for the nodes to answer before connecting
    #[arg(long = "ready-timeout")]
    pub ready_timeout: Option<u64>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Register the collator's parachain and start the coretime sales
    Setup {
        config: Option<String>,
        #[command(flatten)]
        overrides: Overrides,
        /// Relay chain rpc endpoint (e.g. ws://127.0.0.1:9900)
        #[arg(long = "relay")]
        relay: Option<String>,
        /// Collator rpc endpoint (e.g. ws://127.0.0.1:9920)
        #[arg(long = "collator")]
        collator: Option<String>,
        #[arg(
            long = "batch-mode",
            value_parser = clap::builder::PossibleValuesParser::new(["batch", "batch_all"]),
        )]
        batch_mode: Option<String>,
        /// Which collator header is registered as the parachain head
        #[arg(
            long = "header",
            value_parser = clap::builder::PossibleValuesParser::new(["latest", "genesis"]),
        )]
        header: Option<String>,
    },
    /// Keep renewing a core each time the broker offers it
    Renew {
        config: Option<String>,
        #[command(flatten)]
        overrides: Overrides,
        /// Core to renew
        #[arg(long = "core")]
        core: Option<u16>,
        /// SS58 address paying for the renewal, defaults to the sudo account
        #[arg(long = "beneficiary")]
        beneficiary: Option<String>,
    },
    /// Print the effective configuration as toml
    Config {
        config: Option<String>,
        #[command(flatten)]
        overrides: Overrides,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let now = Instant::now();
    let args = Args::parse();

    match args.cmd {
        Commands::Setup {
            config,
            overrides,
            relay,
            collator,
            batch_mode,
            header,
        } => {
            let builder = builder_with_overrides(config.as_deref(), &overrides)?;
            let builder = apply_setup_overrides(
                builder,
                relay.as_deref(),
                collator.as_deref(),
                batch_mode.as_deref(),
                header.as_deref(),
            )?;
            let config = build(builder)?;

            let report = orchestrator::run_setup(&config).await?;
            info!(
                "relay setup finalized at {:?}, coretime setup finalized at {:?}",
                report.relay.block_hash, report.coretime.block_hash
            );

            let elapsed = now.elapsed();
            println!("🚀🚀🚀 coretime is set up, in {elapsed:.2?}");
        },
        Commands::Renew {
            config,
            overrides,
            core,
            beneficiary,
        } => {
            let builder = builder_with_overrides(config.as_deref(), &overrides)?;
            let builder = apply_renew_overrides(builder, core, beneficiary);
            let config = build(builder)?;

            orchestrator::watch_renewals(&config).await?;
        },
        Commands::Config { config, overrides } => {
            let config = build(builder_with_overrides(config.as_deref(), &overrides)?)?;
            print!("{}", config.dump_to_toml()?);
        },
    }

    Ok(())
}

/// Start from the config file (or the local network defaults) and apply the
/// flags every command accepts.
pub fn builder_with_overrides(
    config: Option<&str>,
    overrides: &Overrides,
) -> Result<BootstrapConfigBuilder, anyhow::Error> {
    let base = match config {
        Some(path) => BootstrapConfig::load_from_toml(path)?,
        None => BootstrapConfig::from_env()?,
    };
    let mut builder = BootstrapConfigBuilder::from_config(base);

    if let Some(url) = &overrides.coretime {
        builder = builder.with_coretime_url(url);
    }
    if let Some(uri) = &overrides.suri {
        builder = builder.with_signer_uri(uri.as_str());
    }
    if let Some(secs) = overrides.finalization_timeout {
        builder = builder.with_finalization_timeout(secs);
    }
    if let Some(secs) = overrides.ready_timeout {
        builder = builder.with_ready_timeout(secs);
    }

    Ok(builder)
}

pub fn apply_setup_overrides(
    mut builder: BootstrapConfigBuilder,
    relay: Option<&str>,
    collator: Option<&str>,
    batch_mode: Option<&str>,
    header: Option<&str>,
) -> Result<BootstrapConfigBuilder, anyhow::Error> {
    if let Some(url) = relay {
        builder = builder.with_relay_url(url);
    }
    if let Some(url) = collator {
        builder = builder.with_collator_url(url);
    }
    if let Some(batch_mode) = batch_mode {
        builder = builder.with_batch_mode(batch_mode.parse::<BatchMode>()?);
    }
    if let Some(header) = header {
        builder = builder.with_header_source(header.parse::<HeaderSource>()?);
    }

    Ok(builder)
}

pub fn apply_renew_overrides(
    mut builder: BootstrapConfigBuilder,
    core: Option<u16>,
    beneficiary: Option<String>,
) -> BootstrapConfigBuilder {
    if let Some(core) = core {
        builder = builder.with_renewal_core(core);
    }
    if let Some(beneficiary) = beneficiary {
        builder = builder.with_beneficiary(beneficiary);
    }

    builder
}

fn build(builder: BootstrapConfigBuilder) -> Result<BootstrapConfig, anyhow::Error> {
    builder.build().map_err(|errors| {
        anyhow!(configuration::shared::helpers::join_errors(&errors))
    })
}
