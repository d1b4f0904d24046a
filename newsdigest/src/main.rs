/*
newsdigest - single-binary command surface.
The transport is the terminal: each subcommand prints the messages that a
delivery layer would forward to the user.
*/

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use common::{Config, OracleEndpointConfig};
use newsdigest::commands;
use newsdigest::digest::DigestContext;
use newsdigest::extract::ReadabilityExtractor;
use newsdigest::ingestion::FeedSource;
use newsdigest::oracle::remote::{RemoteClassifier, RemoteGenerator};
use newsdigest::subscriptions;
use newsdigest::trust::TrustBands;

#[derive(Parser, Debug)]
#[command(name = "newsdigest", about = "Tag-filtered news digest pipeline")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the introduction / usage text
    Start,
    /// Store the topic list for a user
    Subscribe {
        /// User identifier
        #[arg(long)]
        user: i64,
        /// Comma-separated topic list, e.g. "AI, space"
        tags: Option<String>,
    },
    /// Build and print the news digest for a user
    Digest {
        /// User identifier
        #[arg(long)]
        user: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    if matches!(args.command, Command::Start) {
        // Static text; needs neither config nor collaborators.
        println!("{}", commands::start_text());
        return Ok(());
    }

    // Resolve config paths
    let default_path = PathBuf::from("config.default.toml");

    let override_path = if let Some(p) = args.config {
        if !p.exists() {
            error!(path = ?p, "specified config file not found");
            return Err(anyhow::anyhow!("Config file not found: {}", p.display()));
        }
        Some(p)
    } else {
        let p = PathBuf::from("config.toml");
        if p.exists() {
            Some(p)
        } else {
            None
        }
    };

    // Load configuration with defaults
    let config = match Config::load_with_defaults(
        if default_path.exists() { Some(&default_path) } else { None },
        override_path.as_deref(),
    )
    .await
    {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(%e, "failed to load configuration");
            return Err(e);
        }
    };
    info!(default_config = ?default_path, override_config = ?override_path, "configuration loaded");

    let db_pool = common::init_db_pool(&config.database.path).await?;
    subscriptions::ensure_schema(&db_pool).await?;

    match args.command {
        Command::Start => unreachable!("handled above"),
        Command::Subscribe { user, tags } => {
            let reply = commands::subscribe(&db_pool, user, tags.as_deref()).await?;
            println!("{}", reply);
        }
        Command::Digest { user } => {
            let ctx = build_context(&config, db_pool)?;
            let request_timeout = Duration::from_secs(
                config
                    .digest
                    .as_ref()
                    .and_then(|d| d.request_timeout_seconds)
                    .unwrap_or(120),
            );
            for message in commands::digest(&ctx, user, request_timeout).await {
                println!("{}\n", message);
            }
        }
    }

    Ok(())
}

/// Wire the collaborators up from configuration. Oracles read their API
/// keys from the environment variables the config names.
fn build_context(config: &Config, pool: sqlx::SqlitePool) -> Result<DigestContext> {
    let oracle_cfg = config
        .oracle
        .as_ref()
        .context("missing [oracle] configuration")?;
    let classifier_cfg = oracle_cfg
        .classifier
        .as_ref()
        .context("missing [oracle.classifier] configuration")?;
    let generator_cfg = oracle_cfg
        .generator
        .as_ref()
        .context("missing [oracle.generator] configuration")?;

    let classifier = RemoteClassifier::new(
        classifier_cfg
            .api_url
            .clone()
            .context("missing oracle.classifier.api_url")?,
        api_key_from_env(classifier_cfg)?,
    )
    .with_timeout(classifier_cfg.timeout_seconds.unwrap_or(20));

    let generator = RemoteGenerator::new(
        generator_cfg
            .api_url
            .clone()
            .context("missing oracle.generator.api_url")?,
        api_key_from_env(generator_cfg)?,
        generator_cfg
            .model
            .clone()
            .unwrap_or_else(|| "gpt-4o-mini".to_string()),
    )
    .with_defaults(
        generator_cfg.timeout_seconds.unwrap_or(30),
        generator_cfg.max_tokens.unwrap_or(500),
        0.5,
    );

    let fetch_timeout = config.sources.fetch_timeout_seconds.unwrap_or(10);
    let source = FeedSource::new(fetch_timeout)?;
    let extractor = ReadabilityExtractor::new(fetch_timeout)?;

    let trust_bands = config
        .trust
        .as_ref()
        .map(|t| {
            let defaults = TrustBands::default();
            TrustBands {
                low: t.low.unwrap_or(defaults.low),
                high: t.high.unwrap_or(defaults.high),
                weak_signal_trusted: t.weak_signal_trusted.unwrap_or(defaults.weak_signal_trusted),
            }
        })
        .unwrap_or_default();

    Ok(DigestContext {
        pool,
        source: Arc::new(source),
        classifier: Arc::new(classifier),
        generator: Arc::new(generator),
        extractor: Arc::new(extractor),
        source_urls: config.sources.urls.clone(),
        relevance_threshold: config
            .filter
            .as_ref()
            .and_then(|f| f.relevance_threshold)
            .unwrap_or(0.85),
        max_checked: config
            .filter
            .as_ref()
            .and_then(|f| f.max_checked)
            .unwrap_or(100),
        trust_bands,
    })
}

fn api_key_from_env(cfg: &OracleEndpointConfig) -> Result<String> {
    let api_key_env = cfg
        .api_key_env
        .as_deref()
        .context("missing api_key_env in oracle config")?;
    std::env::var(api_key_env)
        .with_context(|| format!("oracle API key env var '{}' not set", api_key_env))
}
