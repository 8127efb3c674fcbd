//! Command-line interface for reading fsmcp resources.

use crate::{
    client::{Inspect, Target, connect},
    error::Error,
};
use clap::{Parser, Subcommand};
pub mod read;

/// Read resources from an fsmcp server launched over stdio.
#[derive(Parser, Debug)]
#[command(name = "fsmcp-inspect", version, about)]
pub struct App {
    /// Server command to launch.
    ///
    /// Use `--` before commands with flags:
    ///   fsmcp-inspect -- fsmcp --config ./config.json list
    #[arg(required = true, num_args = 1..)]
    pub target: Vec<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List resources exposed by the server.
    Resource,
    /// List resource templates exposed by the server.
    Template,
    /// List the files the server exposes.
    List,
    /// Read a file by name.
    Read {
        /// File name relative to the served directory.
        filename: String,

        /// Print the JSON envelope instead of a summary.
        #[arg(long)]
        raw: bool,
    },
    /// Read an arbitrary resource URI and print its text.
    Fetch {
        /// Resource URI, e.g. files://list.
        uri: String,
    },
}

impl App {
    /// Parse CLI arguments and execute the corresponding command.
    pub async fn run() -> Result<(), Error> {
        let app = App::parse();
        let target = Target::parse(app.target).ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "missing server command",
            ))
        })?;
        let service = connect(target).await?;

        match app.command {
            Command::Resource => {
                let resources = service.list_resources().await?;
                println!("{}", serde_json::to_string_pretty(&resources)?);
            }
            Command::Template => {
                let templates = service.list_resource_templates().await?;
                println!("{}", serde_json::to_string_pretty(&templates)?);
            }
            Command::List => {
                let files = service.list_files().await?;
                println!("{}", serde_json::to_string_pretty(&files)?);
            }
            Command::Read { filename, raw } => {
                let file = service.read_file(&filename).await?;
                if raw {
                    println!("{}", serde_json::to_string_pretty(&file)?);
                } else {
                    println!("{}", read::summarize(&file));
                }
            }
            Command::Fetch { uri } => {
                println!("{}", service.read_text(&uri).await?);
            }
        }

        service.cancel().await.ok();
        Ok(())
    }
}
