//! Binary entry point for the fsmcp server.

use clap::Parser;
use fsmcp::{Config, ConfigError, FilesServer, Root, config::DEFAULT_CONFIG_PATH};
use rmcp::ServiceExt;
use std::path::PathBuf;

/// Sandboxed files MCP server: serves one directory as read-only resources.
#[derive(Parser)]
#[command(name = "fsmcp", version, about)]
struct Cli {
    /// Directory to serve. Overrides the config file when given.
    directory: Option<String>,

    /// JSON config file with a `directory` key.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

impl Cli {
    fn root(&self) -> Result<Root, ConfigError> {
        match &self.directory {
            Some(dir) => Root::resolve(dir),
            None => Root::resolve(&Config::load(&self.config)?.directory),
        }
    }
}

#[tokio::main]
async fn main() {
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }
    let cli = Cli::parse();
    let root = match cli.root() {
        Ok(root) => root,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!("serving {}", root.path().display());

    let server = FilesServer::new(root);
    let transport = rmcp::transport::stdio();
    let service = match server.serve(transport).await {
        Ok(service) => service,
        Err(e) => {
            eprintln!("Error: failed to start server: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = service.waiting().await {
        eprintln!("Error: server error: {e}");
        std::process::exit(1);
    }
}
