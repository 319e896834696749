//! Toolbelt: inspect and invoke agent tools from the terminal.
//!
//! Usage:
//!   toolbelt list                            List registered tools
//!   toolbelt invoke <NAME> --args '<JSON>'   Invoke one tool
//!   toolbelt config init                     Write a default config file
//!   toolbelt config check                    Report credential status

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use toolbelt::cache::{spawn_sweeper, CachingFetcher, ResourceCache};
use toolbelt::config::{self, ToolbeltConfig, NEWS_KEY_ENV, WEATHER_KEY_ENV};
use toolbelt::upstream::{Fetch, HttpFetcher};
use toolbelt::{RegistryBuilder, ToolRegistry};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "toolbelt")]
#[command(version)]
#[command(about = "Typed tool registry for LLM agents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file [default: ~/.toolbelt/toolbelt.toml].
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log level (debug, info, warn, error). Overrides the config file.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Register only tools that need no provider credentials.
    #[arg(long, global = true)]
    local_only: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List registered tools and their parameters.
    List,

    /// Invoke a tool by name.
    Invoke {
        /// Tool name, e.g. calculator.
        name: String,

        /// Arguments as a JSON object.
        #[arg(long, default_value = "{}")]
        args: String,

        /// Print the full JSON result instead of the display text.
        #[arg(long)]
        raw: bool,
    },

    /// Manage the config file.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Check that provider credentials are configured.
    Check,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .as_deref()
        .map(config::resolve_path)
        .unwrap_or_else(config::default_config_path);
    let mut cfg = config::load_config(&config_path)?;
    cfg.apply_env_overrides();

    // Initialize logging
    let level = cli.log_level.clone().unwrap_or_else(|| cfg.log_level.clone());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::List => cmd_list(&cfg, cli.local_only),
        Commands::Invoke { name, args, raw } => cmd_invoke(&cfg, cli.local_only, &name, &args, raw).await,
        Commands::Config(ConfigCommand::Init { force }) => cmd_config_init(&config_path, force),
        Commands::Config(ConfigCommand::Check) => cmd_config_check(&cfg),
    }
}

// ---------------------------------------------------------------------------
// Runtime assembly
// ---------------------------------------------------------------------------

/// The registry plus the background sweep task, if the page cache is on.
struct Runtime {
    registry: ToolRegistry,
    cancel: CancellationToken,
    sweeper: Option<JoinHandle<()>>,
}

impl Runtime {
    fn build(cfg: &ToolbeltConfig, local_only: bool) -> Result<Self> {
        let http: Arc<dyn Fetch> = Arc::new(HttpFetcher::new(&cfg.http)?);
        let cancel = CancellationToken::new();

        let (page_fetch, sweeper): (Arc<dyn Fetch>, _) = if cfg.cache.enabled {
            let cache = Arc::new(ResourceCache::from_settings(&cfg.cache));
            let interval = Duration::from_secs(cfg.cache.sweep_interval_secs.max(1));
            let handle = spawn_sweeper(cache.clone(), interval, cancel.clone());
            (Arc::new(CachingFetcher::new(http.clone(), cache)), Some(handle))
        } else {
            (http.clone(), None)
        };

        let mut builder = RegistryBuilder::new()
            .strict(cfg.strict_arguments)
            .with_local_tools()?
            .with_web_tools(page_fetch)?;
        if local_only {
            info!("Skipping provider tools (--local-only)");
        } else {
            builder = builder
                .with_provider_tools(cfg, http)
                .context("Provider tools unavailable; configure API keys or pass --local-only")?;
        }

        Ok(Self {
            registry: builder.build(),
            cancel,
            sweeper,
        })
    }

    async fn shutdown(self) {
        self.cancel.cancel();
        if let Some(handle) = self.sweeper {
            if let Err(e) = handle.await {
                warn!("Cache sweeper ended abnormally: {e}");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Command implementations
// ---------------------------------------------------------------------------

fn cmd_list(cfg: &ToolbeltConfig, local_only: bool) -> Result<()> {
    let registry = RegistryBuilder::new();
    let registry = if local_only {
        registry.with_local_tools()?
    } else {
        // Listing never performs a request, so any fetcher will do.
        let http: Arc<dyn Fetch> = Arc::new(HttpFetcher::new(&cfg.http)?);
        registry
            .with_local_tools()?
            .with_web_tools(http.clone())?
            .with_provider_tools(cfg, http)
            .context("Provider tools unavailable; configure API keys or pass --local-only")?
    }
    .build();

    println!();
    println!("{}", format!("=== {} tools ===", registry.len()).bold());
    for desc in registry.list_tools() {
        println!();
        println!("  {}  {}", desc.name.green().bold(), desc.description);
        for param in &desc.required_parameters {
            println!("    {} ({}, required)  {}", param.name.bold(), param.param_type, param.description);
        }
        for param in &desc.optional_parameters {
            println!("    {} ({})  {}", param.name, param.param_type, param.description.dimmed());
        }
    }
    println!();
    Ok(())
}

async fn cmd_invoke(cfg: &ToolbeltConfig, local_only: bool, name: &str, args: &str, raw: bool) -> Result<()> {
    let parsed: Value = serde_json::from_str(args).context("--args is not valid JSON")?;
    let args: Map<String, Value> = match parsed {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => bail!("--args must be a JSON object, got {other}"),
    };

    let runtime = Runtime::build(cfg, local_only)?;
    let result = runtime.registry.invoke(name, &args).await;
    runtime.shutdown().await;

    match result {
        Ok(invocation) if raw => {
            println!("{}", serde_json::to_string_pretty(&invocation)?);
            Ok(())
        }
        Ok(invocation) => {
            println!("{}", invocation.display);
            Ok(())
        }
        Err(e) => {
            let kind = if e.is_caller_error() {
                "invalid request"
            } else if e.is_upstream() {
                "upstream error"
            } else {
                "tool error"
            };
            eprintln!("{} {}", format!("{kind}:").red().bold(), e);
            Err(e).with_context(|| format!("Invocation of '{name}' failed"))
        }
    }
}

fn cmd_config_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    config::save_config(&ToolbeltConfig::default(), path)?;
    println!("{} Wrote {}", ">>>".green().bold(), path.display());
    Ok(())
}

fn cmd_config_check(cfg: &ToolbeltConfig) -> Result<()> {
    println!();
    println!("{}", "=== Credentials ===".bold());
    println!();
    println!("  {}:  {}", "Weather".bold(), key_status(&cfg.weather.api_key, WEATHER_KEY_ENV));
    println!("  {}:     {}", "News".bold(), key_status(&cfg.news.api_key, NEWS_KEY_ENV));
    println!();

    match cfg.validate_api_keys() {
        Ok(()) => {
            println!("{} All provider tools can be registered.", ">>>".green().bold());
            Ok(())
        }
        Err(e) => Err(e).context("Provider tools cannot be registered"),
    }
}

fn key_status(key: &str, env_var: &str) -> String {
    if key.trim().is_empty() {
        format!("{} (set {env_var})", "missing".red())
    } else {
        "configured".green().to_string()
    }
}
