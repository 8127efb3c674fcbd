//! Connection to an fsmcp server launched as a child process.

use crate::error::Error;
use rmcp::{RoleClient, ServiceExt, service::RunningService, transport::TokioChildProcess};
use tokio::process::Command;

mod inspect;

pub use inspect::Inspect;

/// Server command to launch over stdio.
pub struct Target {
    pub program: String,
    pub args: Vec<String>,
}

impl Target {
    /// Split CLI target arguments into program and arguments.
    ///
    /// Returns `None` for an empty command.
    pub fn parse(target: Vec<String>) -> Option<Self> {
        let mut parts = target.into_iter();
        let program = parts.next()?;
        Some(Target {
            program,
            args: parts.collect(),
        })
    }
}

/// Launch the server and complete the MCP handshake.
pub async fn connect(target: Target) -> Result<RunningService<RoleClient, ()>, Error> {
    tracing::debug!(program = %target.program, "spawning server");
    let mut cmd = Command::new(&target.program);
    cmd.args(&target.args);
    let transport = TokioChildProcess::new(cmd)?;
    let service = ().serve(transport).await.map_err(Box::new)?;
    Ok(service)
}
