//! concierge CLI: Chat client for the booking assistant

use clap::{Parser, Subcommand};
use concierge_engine::{
    discover_capabilities, Config, ConversationController, HttpChatClient, Sender,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Voice-enabled chat client for the booking assistant
#[derive(Parser)]
#[command(name = "concierge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat TUI (default when no command specified)
    Tui,

    /// Check speech helper availability and print diagnostics
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Initialize .concierge/ directory and config
    Init,

    /// Send a single message and print the reply
    Send {
        /// The message text
        text: String,

        /// Override the chat endpoint
        #[arg(long)]
        endpoint: Option<String>,
    },
}

const CONCIERGE_DIR: &str = ".concierge";

fn config_path() -> PathBuf {
    Path::new(CONCIERGE_DIR).join("config.json")
}

fn load_config() -> Config {
    let path = config_path();
    if path.exists() {
        match Config::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config: {e}");
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    }
}

/// Route logs to a file so they never corrupt the TUI screen.
fn init_file_logging() {
    let log_path = Path::new(CONCIERGE_DIR).join("concierge.log");
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Ok(file) = std::fs::File::create(&log_path) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(Arc::new(file))
            .with_ansi(false)
            .try_init();
    }
}

fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None | Some(Commands::Tui) => {
            init_file_logging();
            let config = load_config();
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            if let Err(e) = rt.block_on(concierge_tui::run_tui(&config)) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Doctor { json }) => {
            init_stderr_logging();
            cmd_doctor(json);
        }
        Some(Commands::Init) => {
            init_stderr_logging();
            cmd_init();
        }
        Some(Commands::Send { text, endpoint }) => {
            init_stderr_logging();
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            rt.block_on(cmd_send(&text, endpoint));
        }
    }
}

fn cmd_doctor(json: bool) {
    let config = load_config();
    let result = discover_capabilities(&config);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).expect("failed to serialize")
        );
        return;
    }

    println!("Speech Capability Check\n");

    for info in [&result.recognizer, &result.synthesizer] {
        let status = if info.available() {
            "ready"
        } else if info.configured {
            "configured but not found"
        } else {
            "not configured"
        };

        println!("  {} - {}", info.kind, status);

        if let Some(path) = &info.path {
            println!("    Path: {path}");
        }
        for issue in &info.issues {
            println!("    Issue: {issue}");
        }
        println!();
    }

    println!("Endpoint: {}", config.endpoint);

    let ready = [&result.recognizer, &result.synthesizer]
        .iter()
        .filter(|i| i.available())
        .count();
    println!("{ready} speech helper(s) ready");
}

fn cmd_init() {
    let dir = Path::new(CONCIERGE_DIR);
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Failed to create {}: {e}", dir.display());
        std::process::exit(1);
    }

    let path = config_path();
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return;
    }

    let config = Config::default();
    match config.save(&path) {
        Ok(()) => {
            println!("Created {}", path.display());
            println!("Edit it to set the endpoint and speech helper commands");
        }
        Err(e) => {
            eprintln!("Failed to write config: {e}");
            std::process::exit(1);
        }
    }
}

async fn cmd_send(text: &str, endpoint: Option<String>) {
    let mut config = load_config();
    if let Some(endpoint) = endpoint {
        config.endpoint = endpoint;
    }

    let backend = Arc::new(HttpChatClient::new(&config.endpoint));
    let mut controller = ConversationController::new(backend)
        .with_greeting(&config.greeting)
        .with_muted(true);

    controller.submit(text).await;

    if let Some(reply) = controller
        .messages()
        .iter()
        .rev()
        .find(|m| m.sender == Sender::Bot)
    {
        println!("{}", reply.text);
    }
}
