//! MCP resource identifiers for the file accessor.

use crate::FilesServer;
use rmcp::{
    ErrorData,
    model::{AnnotateAble, RawResource, RawResourceTemplate, Resource, ResourceTemplate},
};

/// URI of the listing resource.
pub const LIST_URI: &str = "files://list";

/// URI prefix of the read template; the filename follows it.
pub const READ_PREFIX: &str = "files://read/";

/// URI template advertised for reads.
pub const READ_TEMPLATE: &str = "files://read/{filename}";

const JSON_MIME: &str = "application/json";

/// A parsed resource identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceUri<'a> {
    /// `files://list`
    List,
    /// `files://read/{filename}`, with the filename taken verbatim.
    Read(&'a str),
}

impl<'a> ResourceUri<'a> {
    /// Parse a URI, returning `None` if it names neither resource.
    pub fn parse(uri: &'a str) -> Option<Self> {
        if uri == LIST_URI {
            return Some(Self::List);
        }
        uri.strip_prefix(READ_PREFIX).map(Self::Read)
    }
}

/// Concrete resources advertised by `resources/list`.
pub fn resource_list() -> Vec<Resource> {
    let mut raw = RawResource::new(LIST_URI, "list_files");
    raw.description = Some("List all files in the served directory".into());
    raw.mime_type = Some(JSON_MIME.into());
    vec![raw.no_annotation()]
}

/// Templates advertised by `resources/templates/list`.
pub fn resource_templates() -> Vec<ResourceTemplate> {
    vec![
        RawResourceTemplate {
            uri_template: READ_TEMPLATE.into(),
            name: "read_file".into(),
            title: None,
            description: Some("Read the contents and metadata of a file by name".into()),
            mime_type: Some(JSON_MIME.into()),
            icons: None,
        }
        .no_annotation(),
    ]
}

impl FilesServer {
    /// Serve a resource URI, returning the serialized envelope.
    ///
    /// Accessor failures come back as an `error` envelope inside `Ok`; only
    /// an unknown URI is a protocol error.
    pub async fn read_uri(&self, uri: &str) -> Result<String, ErrorData> {
        let json = match ResourceUri::parse(uri) {
            Some(ResourceUri::List) => serde_json::to_string(&self.access.list().await),
            Some(ResourceUri::Read(filename)) => {
                serde_json::to_string(&self.access.read(filename).await)
            }
            None => {
                return Err(ErrorData::resource_not_found(
                    format!("unknown resource: {uri}"),
                    None,
                ));
            }
        };
        json.map_err(|e| ErrorData::internal_error(e.to_string(), None))
    }
}
