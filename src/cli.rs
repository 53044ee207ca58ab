use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::SkycastError;

#[derive(Parser, Debug)]
#[command(name = "skycast")]
#[command(about = "Weather lookup client and API-key hiding weather proxy")]
#[command(version)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the weather proxy
    Serve {
        /// Bind address for the proxy
        ///
        /// Format: IP:PORT (e.g., 0.0.0.0:3000, 127.0.0.1:8080)
        #[arg(short, long, env = "BIND_ADDRESS")]
        bind_address: Option<String>,
    },
    /// Look up weather through a running proxy
    ///
    /// Adds a location on start (device position or the default city),
    /// then each CITY given, then reads commands from stdin.
    Client {
        /// Base URL of the proxy
        #[arg(short, long)]
        proxy_url: Option<String>,

        /// Device latitude; without --lat/--lon geolocation is unavailable
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Device longitude
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Cities to add after startup
        cities: Vec<String>,
    },
}

/// One line of interactive input
#[derive(Debug, Clone, PartialEq)]
pub enum ClientCommand {
    Search(String),
    Locate,
    /// 1-based position in the displayed list
    Detail(usize),
    Back,
    List,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  search <city>   add a city
  locate          add your current location
  detail <n>      show details for entry n
  back            close the detail view
  list            show the list again
  quit            leave";

impl ClientCommand {
    /// Parse a line; the error's `user_message()` is what the user sees
    pub fn parse(line: &str) -> Result<Self, SkycastError> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        match word.to_ascii_lowercase().as_str() {
            "search" | "s" => Ok(ClientCommand::Search(rest.to_string())),
            "locate" | "l" => Ok(ClientCommand::Locate),
            "detail" | "d" => rest
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .map(ClientCommand::Detail)
                .ok_or_else(|| {
                    SkycastError::validation(format!("Usage: detail <n>, got '{rest}'"))
                }),
            "back" | "b" => Ok(ClientCommand::Back),
            "list" => Ok(ClientCommand::List),
            "help" | "?" | "" => Ok(ClientCommand::Help),
            "quit" | "exit" | "q" => Ok(ClientCommand::Quit),
            other => Err(SkycastError::validation(format!(
                "Unknown command '{other}'. Type 'help'."
            ))),
        }
    }
}
