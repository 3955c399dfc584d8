// LazyAI CLI - Command Line Interface Entry Point

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use lazyai_config::{ConfigLoader, parse_override};
use lazyai_core::{ChatDriver, ChatOptions, SessionError, SystemBrowser, YamlCredentialStore};
use lazyai_protocol::prompts::{render_code_prompt, render_pr_prompt};

/// LazyAI - AI helpers for the terminal
#[derive(Parser, Debug)]
#[command(name = "lazyai")]
#[command(version, about, long_about = None)]
struct TopCli {
    #[clap(flatten)]
    config_overrides: CliConfigOverrides,

    /// Log debug output to stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

/// CLI configuration overrides
#[derive(Debug, clap::Args)]
struct CliConfigOverrides {
    /// Configuration file (defaults to $LAZYAI_CONFIG, then ~/.lazyai.yml)
    #[arg(long = "config", value_name = "PATH", global = true)]
    path: Option<PathBuf>,

    /// Configuration override in key=value format
    #[arg(long = "set", value_name = "KEY=VALUE", global = true)]
    overrides: Vec<String>,
}

/// Available commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Send a message to SkyDeck and stream the reply
    Sdchat {
        /// Message text; piped stdin takes precedence
        message: Option<String>,

        /// Continue this conversation instead of the last one
        #[arg(short = 'c', long = "conversation", value_name = "ID")]
        conversation: Option<u64>,

        /// Open the conversation in the browser instead of streaming
        #[arg(short = 'o', long = "open")]
        open: bool,

        /// Start a new conversation
        #[arg(short = 'n', long = "new")]
        new: bool,
    },

    /// Print a feature-implementation prompt for code read from stdin
    Code,

    /// Print a PR-description prompt for the working tree diff
    Pr {
        /// Repository directory
        #[arg(short = 'd', long = "dir", default_value = ".")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = TopCli::parse();

    // Initialize logging; stdout is reserved for replies and prompts
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("LazyAI CLI starting...");

    match cli.command {
        Commands::Sdchat {
            message,
            conversation,
            open,
            new,
        } => {
            let options = ChatOptions {
                message: read_message(message).await?,
                conversation,
                new_conversation: new,
                open_in_browser: open,
            };
            run_sdchat(&cli.config_overrides, options).await?;
        }
        Commands::Code => {
            let code = read_stdin().await?;
            if code.trim().is_empty() {
                bail!("no code on stdin; usage: lazyai code < file");
            }
            print_prompt(&render_code_prompt(&code)).await?;
        }
        Commands::Pr { dir } => {
            let diff = lazyai_git::working_tree_diff(&dir)?;
            if diff.trim().is_empty() {
                bail!("no changes against HEAD in {}", dir.display());
            }
            let branch = lazyai_git::current_branch(&dir)?;
            print_prompt(&render_pr_prompt(&diff, branch.as_deref())).await?;
        }
    }

    Ok(())
}

/// Run one chat invocation against the configured SkyDeck account
async fn run_sdchat(overrides: &CliConfigOverrides, options: ChatOptions) -> Result<()> {
    let loader = match &overrides.path {
        Some(path) => ConfigLoader::with_path(path),
        None => ConfigLoader::new()?,
    };
    let parsed = overrides
        .overrides
        .iter()
        .map(|raw| parse_override(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let config = loader
        .load_with_cli_overrides(&parsed)
        .with_context(|| format!("failed to load {}", loader.path().display()))?;
    debug!(config = ?config.skydeck, "configuration loaded");

    let store = Arc::new(YamlCredentialStore::new(loader));
    let driver = ChatDriver::new(config.skydeck, store, Arc::new(SystemBrowser));

    let mut stdout = tokio::io::stdout();
    let outcome = driver
        .run(options, &mut stdout)
        .await
        .map_err(|e| match e {
            SessionError::InvalidInput(reason) => anyhow!(
                "{reason}; usage: lazyai sdchat <MESSAGE> or echo <MESSAGE> | lazyai sdchat"
            ),
            other => other.into(),
        })?;

    if let Some(url) = outcome.opened_url {
        eprintln!("Opened {url}");
    } else if outcome.bytes_streamed > 0 {
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }
    Ok(())
}

/// Message from piped stdin, else the positional argument. May be empty;
/// the driver rejects that.
async fn read_message(argument: Option<String>) -> Result<String> {
    if !std::io::stdin().is_terminal() {
        let piped = read_stdin().await?;
        if !piped.trim().is_empty() {
            return Ok(piped.trim().to_string());
        }
    }
    Ok(argument.unwrap_or_default())
}

async fn read_stdin() -> Result<String> {
    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("failed to read stdin")?;
    Ok(input)
}

async fn print_prompt(prompt: &str) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(prompt.as_bytes()).await?;
    if !prompt.ends_with('\n') {
        stdout.write_all(b"\n").await?;
    }
    stdout.flush().await?;
    Ok(())
}
