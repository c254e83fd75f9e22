//! Command-line and environment configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Trip list client kept live by a REST API and a WebSocket channel
#[derive(Parser, Debug)]
#[command(name = "tripsync")]
#[command(about = "Browse and edit trips, with live updates from the server")]
pub struct Args {
    /// Server address, `host:port` or a full http(s) URL
    #[arg(long, short, env = "TRIPSYNC_SERVER", default_value = "localhost:3000")]
    pub server: String,

    /// Write logs to this file (the terminal UI owns stdout)
    #[arg(long, env = "TRIPSYNC_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Fetch the trips once and print them
    List,
    /// Print every change pushed by the server until ctrl-c
    Watch,
}

impl Args {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::parse(&self.server)
    }
}

/// Where the REST API and the push channel live
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    host: String,
    secure: bool,
}

impl ServerConfig {
    /// Accepts `host:port`, `http://host:port` or `https://host:port`.
    pub fn parse(server: &str) -> Self {
        let server = server.trim().trim_end_matches('/');
        let (host, secure) = if let Some(rest) = server.strip_prefix("https://") {
            (rest, true)
        } else if let Some(rest) = server.strip_prefix("http://") {
            (rest, false)
        } else {
            (server, false)
        };
        Self {
            host: host.to_string(),
            secure,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Trip collection endpoint
    pub fn trips_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{scheme}://{}/trip", self.host)
    }

    /// Push channel endpoint
    pub fn live_url(&self) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        format!("{scheme}://{}", self.host)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::parse("localhost:3000")
    }
}
