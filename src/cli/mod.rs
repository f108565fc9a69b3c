//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod agent_list;
pub mod chat;
pub mod health;
pub mod provider_list;
pub mod say;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::agent_list::list_agents;
use crate::cli::chat::run_chat;
use crate::cli::health::check_health;
use crate::cli::provider_list::{list_providers, switch_provider};
use crate::cli::say::run_say;
use crate::core::config::{Config, ConfigKey, Overrides, Settings};
use crate::core::constants::BASE_URL_ENV;
use crate::utils::logging::init_tracing;

#[derive(Parser)]
#[command(name = "wayfarer")]
#[command(version)]
#[command(about = "A terminal chat client for a multi-agent travel assistant")]
#[command(
    long_about = "Wayfarer connects to a travel assistant backend that routes each message \
to specialised agents and falls back across language-model providers. It shows which \
agent answered, the active providers and whether the backend is reachable.\n\n\
Environment Variables:\n\
  WAYFARER_API_URL  Backend base URL (overridden by --base-url)\n\
  WAYFARER_LOG      Diagnostic log filter, e.g. debug or wayfarer=trace (default: warn)\n\n\
Commands inside chat:\n\
  /help             List chat commands\n\
  /agents           Show the agents behind the assistant\n\
  /providers        Show cached provider status\n\
  /refresh          Refresh provider status now\n\
  /switch <name>    Make an available provider the default\n\
  /status           Probe the backend and show session state\n\
  /log <filename>   Enable logging to specified file\n\
  /log              Toggle logging pause/resume\n\
  /quit             Leave the chat"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend base URL
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// User identifier sent with each message
    #[arg(long, global = true, value_name = "ID")]
    pub user_id: Option<String>,

    /// Enable logging to specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<String>,

    /// Write diagnostic logs to a file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    pub debug_log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive chat (default)
    Chat,
    /// Send one message and print the reply
    Say {
        /// Message to send
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        prompt: Vec<String>,
    },
    /// List the backend's agents
    Agents,
    /// Show language-model provider status
    Providers,
    /// Make an available provider the backend default
    Switch {
        /// Provider key, e.g. openai
        provider: String,
    },
    /// Check whether the backend is reachable
    Health,
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Option<Vec<String>>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Print the current configuration
    Config,
}

impl Args {
    /// Flag and environment values that take precedence over the file.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.base_url.clone(),
            env_base_url: std::env::var(BASE_URL_ENV).ok(),
            user_id: self.user_id.clone(),
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.debug_log.as_deref())?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main(args))
}

fn parse_key(key: &str) -> Result<ConfigKey, Box<dyn Error>> {
    ConfigKey::parse(key).ok_or_else(|| {
        let known: Vec<&str> = ConfigKey::ALL.iter().map(|key| key.as_str()).collect();
        format!("Unknown config key: {key} (expected one of: {})", known.join(", ")).into()
    })
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let settings: Settings = config.resolve(&args.overrides());

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat(settings, args.log).await,
        Commands::Say { prompt } => run_say(&settings, prompt).await,
        Commands::Agents => list_agents(&settings).await,
        Commands::Providers => list_providers(&settings).await,
        Commands::Switch { provider } => switch_provider(&settings, &provider).await,
        Commands::Health => check_health(&settings).await,
        Commands::Set { key, value } => {
            let key = parse_key(&key)?;
            match value.map(|parts| parts.join(" ")) {
                Some(value) if !value.trim().is_empty() => {
                    let mut config = config;
                    config.set_value(key, &value)?;
                    let path = config.save()?;
                    println!("✅ Set {} to: {} ({})", key.as_str(), value.trim(), path.display());
                }
                _ => config.print_all(&settings),
            }
            Ok(())
        }
        Commands::Unset { key } => {
            let key = parse_key(&key)?;
            let mut config = config;
            config.unset_value(key);
            config.save()?;
            println!("✅ Unset {}", key.as_str());
            Ok(())
        }
        Commands::Config => {
            config.print_all(&settings);
            if let Ok(path) = Config::get_config_path() {
                println!("\nConfig file: {}", crate::core::config::data::path_display(&path));
            }
            Ok(())
        }
    }
}
