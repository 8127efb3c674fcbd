//! [`Inspect`] trait for reading fsmcp resources.

use crate::error::Error;
use fsmcp::{Envelope, FileContent, FileList, resources::{LIST_URI, READ_PREFIX}};
use rmcp::{
    RoleClient,
    model::{ReadResourceRequestParams, Resource, ResourceContents, ResourceTemplate},
    service::RunningService,
};

/// Resource queries against a connected server.
pub trait Inspect: Sync {
    /// List all resources exposed by the server.
    fn list_resources(&self) -> impl Future<Output = Result<Vec<Resource>, Error>> + Send;

    /// List all resource templates exposed by the server.
    fn list_resource_templates(
        &self,
    ) -> impl Future<Output = Result<Vec<ResourceTemplate>, Error>> + Send;

    /// Read a resource and concatenate its text contents.
    fn read_text(&self, uri: &str) -> impl Future<Output = Result<String, Error>> + Send;

    /// Read `files://list`.
    fn list_files(&self) -> impl Future<Output = Result<Envelope<FileList>, Error>> + Send {
        async move { Ok(serde_json::from_str(&self.read_text(LIST_URI).await?)?) }
    }

    /// Read `files://read/{filename}`.
    fn read_file(
        &self,
        filename: &str,
    ) -> impl Future<Output = Result<Envelope<FileContent>, Error>> + Send {
        let uri = format!("{READ_PREFIX}{filename}");
        async move { Ok(serde_json::from_str(&self.read_text(&uri).await?)?) }
    }
}

impl Inspect for RunningService<RoleClient, ()> {
    async fn list_resources(&self) -> Result<Vec<Resource>, Error> {
        Ok(self.peer().list_all_resources().await?)
    }

    async fn list_resource_templates(&self) -> Result<Vec<ResourceTemplate>, Error> {
        Ok(self.peer().list_all_resource_templates().await?)
    }

    async fn read_text(&self, uri: &str) -> Result<String, Error> {
        let result = self
            .peer()
            .read_resource(ReadResourceRequestParams {
                meta: None,
                uri: uri.to_owned(),
            })
            .await?;
        let text: String = result
            .contents
            .into_iter()
            .filter_map(|contents| match contents {
                ResourceContents::TextResourceContents { text, .. } => Some(text),
                ResourceContents::BlobResourceContents { .. } => None,
            })
            .collect();
        if text.is_empty() {
            return Err(Error::EmptyContents(uri.to_owned()));
        }
        Ok(text)
    }
}
