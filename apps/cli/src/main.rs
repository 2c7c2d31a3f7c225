//! `aerofs` command-line client entry point.

mod app;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Upload content to and inspect an AeroFS appliance.
#[derive(Parser, Debug)]
#[command(name = "aerofs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (default: ~/.config/aerofs/cli.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Appliance hostname
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// OAuth access token
    #[arg(long, global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replace a file's content
    Upload {
        file_id: String,
        path: PathBuf,
        /// Last known version of the file (repeatable)
        #[arg(long = "etag")]
        etags: Vec<String>,
        #[arg(long)]
        chunk_size: Option<usize>,
    },
    /// Continue an interrupted upload
    Resume {
        file_id: String,
        upload_id: String,
        path: PathBuf,
        #[arg(long = "etag")]
        etags: Vec<String>,
        #[arg(long)]
        chunk_size: Option<usize>,
    },
    /// Show file metadata
    File { file_id: String },
    /// Show a user
    User { email: String },
    /// Print the URL that asks a user to authorize this app
    AuthorizeUrl {
        #[arg(long)]
        redirect_uri: String,
        #[arg(long, default_value = "")]
        state: String,
        #[arg(long, value_delimiter = ',', default_value = "files.read,files.write,user.read")]
        scopes: Vec<String>,
        /// appconfig.json issued by the appliance
        #[arg(long, value_name = "PATH")]
        app_config: Option<PathBuf>,
    },
    /// Exchange an authorization code for an access token
    Token {
        code: String,
        #[arg(long)]
        redirect_uri: String,
        #[arg(long, value_name = "PATH")]
        app_config: Option<PathBuf>,
        /// Store the token in the configuration file
        #[arg(long)]
        save: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = config::Config::load(cli.config.as_deref())?.with_env(|key| std::env::var(key).ok());
    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if let Some(token) = &cli.token {
        config.token = token.clone();
    }
    tracing::debug!(host = %config.host, "configuration loaded");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(app::run(cli, config))
}
