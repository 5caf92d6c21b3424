use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod app;
mod clipboard;
mod config;
mod controller;
mod escape;
mod events;
mod logging;
mod markdown;
mod protocol;
mod transport;
mod tui;
mod ui;

use crate::app::App;
use crate::config::Config;
use crate::controller::{ChatController, SubmitOutcome};
use crate::markdown::CommonMarkRenderer;
use crate::transport::HttpTransport;
use crate::ui::plain::PlainView;

#[derive(Parser)]
#[command(name = "chatline")]
#[command(version)]
#[command(about = "Terminal chat client for a chatbot backend", long_about = None)]
struct Cli {
    /// Backend base URL, overrides the config file
    #[arg(long, global = true, env = "CHATLINE_SERVER")]
    server: Option<String>,

    /// Config file to use instead of ~/.chatline/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one message and print the reply
    Send {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Show the effective configuration
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Config::load_from(&config_path)?.with_server_url(cli.server);

    match cli.command {
        None => run_tui(config).await,
        Some(Commands::Send { message }) => send_once(config, &message.join(" ")).await,
        Some(Commands::Config { init }) => show_config(&config, &config_path, init),
    }
}

async fn run_tui(config: Config) -> Result<()> {
    let _guard = logging::init_tui(&logging::log_dir(&config.chatline_home))?;

    let mut app = App::new(config)?;

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = app.run(&mut terminal).await;
    tui::restore()?;

    result
}

async fn send_once(config: Config, message: &str) -> Result<()> {
    logging::init_cli()?;

    let transport = HttpTransport::from_config(&config)?;
    let mut chat = ChatController::new(
        PlainView::new(io::stdout()),
        Arc::new(transport),
        CommonMarkRenderer::new(),
        config.chat_path.clone(),
    );

    if chat.submit(message).await == SubmitOutcome::Ignored {
        eprintln!("Nothing to send: the message is blank");
    }

    Ok(())
}

fn show_config(config: &Config, path: &Path, init: bool) -> Result<()> {
    if init {
        if path.exists() {
            println!("⚠️  Config already exists at {}", path.display());
            return Ok(());
        }
        Config::default().save_to(path)?;
        println!("✅ Wrote default config to {}", path.display());
        return Ok(());
    }

    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    println!("# {}", path.display());
    print!("{content}");
    Ok(())
}
