//! MCP server exposing one directory as read-only resources.
//!
//! Two resources are served: `files://list` lists the visible files directly
//! under the configured root, and `files://read/{filename}` returns a file's
//! text content with its size and modification time. Every path is resolved
//! and confined to the root before anything is read.

use rmcp::{
    ErrorData, RoleServer, ServerHandler,
    model::{
        Implementation, ListResourceTemplatesResult, ListResourcesResult,
        PaginatedRequestParams, ReadResourceRequestParams, ReadResourceResult, ResourceContents,
        ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
};

pub mod access;
pub mod config;
pub mod resolve;
pub mod resources;

pub use access::{AccessError, Envelope, FileAccess, FileContent, FileList, FileMetadata};
pub use config::{Config, ConfigError, Root};

/// MCP server serving the files of a single root directory.
#[derive(Debug, Clone)]
pub struct FilesServer {
    pub(crate) access: FileAccess,
}

impl FilesServer {
    /// Create a server confined to `root`.
    pub fn new(root: Root) -> Self {
        Self {
            access: FileAccess::new(root),
        }
    }

    pub fn access(&self) -> &FileAccess {
        &self.access
    }
}

impl ServerHandler for FilesServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_resources().build(),
            server_info: Implementation {
                name: "fsmcp".into(),
                title: Some("Sandboxed Files MCP Server".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Read-only access to one directory. Read files://list to see the available \
                 files, then read files://read/{filename} for a file's content and metadata."
                    .into(),
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        Ok(ListResourcesResult::with_all_items(
            resources::resource_list(),
        ))
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, ErrorData> {
        Ok(ListResourceTemplatesResult::with_all_items(
            resources::resource_templates(),
        ))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        let text = self.read_uri(&request.uri).await?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri)],
        })
    }
}
