use std::path::PathBuf;

use clap::{Parser, Subcommand};
use postbox_domain::{CredentialBackend, HttpMethod};

#[derive(Parser, Debug)]
#[command(name = "postbox")]
#[command(about = "Postbox client - authenticated access to the messaging service")]
#[command(version)]
pub struct Cli {
    /// Load configuration from this JSON or TOML file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the service base URL
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Where the saved credential lives (file, keychain, memory)
    #[arg(long, global = true, value_name = "BACKEND")]
    pub credential_backend: Option<CredentialBackend>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Email and password, from flags or the environment
#[derive(clap::Args, Debug)]
pub struct Account {
    #[arg(long, env = "POSTBOX_EMAIL")]
    pub email: String,

    #[arg(long, env = "POSTBOX_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and save the credential
    Login(Account),

    /// Drop the session and delete the saved credential
    Logout,

    /// Show the current user, restoring from the saved credential if needed
    Whoami,

    /// Force a token renewal
    Renew,

    /// List inbox messages
    Inbox {
        /// Include messages that were already read
        #[arg(long)]
        all: bool,
        /// Include hidden messages
        #[arg(long)]
        hidden: bool,
    },

    /// Show one message
    Message { id: String },

    /// Send a plain-text message
    Send {
        /// Recipient user id (repeatable)
        #[arg(long = "to", required = true)]
        recipients: Vec<String>,
        text: String,
    },

    /// Show free blocks from a schedule endpoint
    FreeBlocks {
        /// Endpoint path relative to the base URL
        endpoint: String,
    },

    /// Request a password reset
    Forgot(Account),

    /// Register a new account
    Register(Account),

    /// Send an arbitrary request through the authenticated pipeline
    Request {
        #[arg(long, short = 'X', default_value = "GET")]
        method: HttpMethod,
        /// Endpoint path relative to the base URL
        #[arg(long, short)]
        endpoint: String,
        /// JSON body
        #[arg(long, short)]
        body: Option<String>,
        /// Send without a bearer token
        #[arg(long)]
        no_auth: bool,
    },
}
