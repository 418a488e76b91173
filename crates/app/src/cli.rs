//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use warden_domain::{Environment, HttpMethod};

/// Warden - OAuth2 password and refresh-token client
///
/// Obtains tokens from the configured authorization server, keeps them in a
/// local token slot and attaches them to requests aimed at that server.
#[derive(Parser, Debug, Clone)]
#[command(name = "warden")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the settings file (YAML or JSON)
    #[arg(short, long, env = "WARDEN_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Directory holding the token slot
    #[arg(long, env = "WARDEN_TOKEN_DIR")]
    pub token_dir: Option<PathBuf>,

    /// Active environment (dev, prod); overrides the settings file
    #[arg(short, long)]
    pub env: Option<Environment>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Request a token with the password grant
    Login {
        /// Resource owner user name
        #[arg(short, long)]
        username: String,

        /// Resource owner password
        #[arg(short, long, env = "WARDEN_PASSWORD", hide_env_values = true)]
        password: String,

        /// Requested scope
        #[arg(long)]
        scope: Option<String>,
    },

    /// Exchange the stored refresh token for a new token
    Refresh,

    /// Revoke the stored token and forget it
    Revoke,

    /// Show the active environment and the stored token
    Status,

    /// Send a request through the authorizing pipeline
    Request {
        /// Absolute URL
        url: String,

        /// HTTP method
        #[arg(short = 'X', long, default_value = "GET")]
        method: HttpMethod,

        /// Extra header as "Name: value" (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Request body
        #[arg(short, long)]
        data: Option<String>,
    },

    /// List environments and their servers
    Env,
}
