//! Read-only access to the files directly under the root directory.
//!
//! [`FileAccess::list`] and [`FileAccess::read`] never fail: every error is
//! captured and returned as [`Envelope::Error`].

use crate::config::Root;
use crate::resolve::{is_contained, resolve};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Uniform response shape for both operations.
///
/// Serializes untagged: either the success payload's own fields or a single
/// `error` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Success(T),
    Error { error: String },
}

impl<T> Envelope<T> {
    pub fn is_error(&self) -> bool {
        matches!(self, Envelope::Error { .. })
    }
}

impl<T> From<Result<T, AccessError>> for Envelope<T> {
    fn from(result: Result<T, AccessError>) -> Self {
        match result {
            Ok(value) => Envelope::Success(value),
            Err(e) => Envelope::Error {
                error: e.to_string(),
            },
        }
    }
}

/// Visible files in the root directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileList {
    pub files: Vec<String>,
}

/// Text content of a file together with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileContent {
    pub content: String,
    pub metadata: FileMetadata,
}

/// Size and modification time of a file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Size in bytes.
    pub size: u64,
    /// Last modification, in seconds since the Unix epoch.
    pub modified: f64,
}

/// Failures of the accessor operations.
#[derive(Error, Debug)]
pub enum AccessError {
    /// The root directory could not be enumerated.
    #[error("{0}")]
    Enumeration(std::io::Error),
    /// The requested path resolves outside the root.
    #[error("Access denied")]
    AccessDenied,
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("not a regular file: {0}")]
    NotAFile(String),
    #[error("file is not valid UTF-8 text: {0}")]
    Decode(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// File accessor confined to a single [`Root`].
#[derive(Debug, Clone)]
pub struct FileAccess {
    root: Root,
}

impl FileAccess {
    pub fn new(root: Root) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Root {
        &self.root
    }

    /// List regular files directly under the root, skipping dotfiles.
    pub async fn list(&self) -> Envelope<FileList> {
        tracing::debug!("listing {}", self.root.path().display());
        self.try_list().await.into()
    }

    /// Read `filename` relative to the root.
    ///
    /// Only containment is enforced here. Dotfiles hidden from [`list`] are
    /// still readable by exact name.
    ///
    /// [`list`]: FileAccess::list
    pub async fn read(&self, filename: &str) -> Envelope<FileContent> {
        tracing::debug!(filename, "reading");
        self.try_read(filename).await.into()
    }

    async fn try_list(&self) -> Result<FileList, AccessError> {
        let mut read_dir = tokio::fs::read_dir(self.root.path())
            .await
            .map_err(AccessError::Enumeration)?;
        let mut files = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(AccessError::Enumeration)?
        {
            // Names that are not UTF-8 could never be requested back by name.
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            // Follow symlinks; broken links are skipped.
            let is_file = tokio::fs::metadata(entry.path())
                .await
                .map(|meta| meta.is_file())
                .unwrap_or(false);
            if is_file {
                files.push(name);
            }
        }
        files.sort();
        Ok(FileList { files })
    }

    async fn try_read(&self, filename: &str) -> Result<FileContent, AccessError> {
        let root = self.root.path();
        let candidate = root.join(filename);
        let resolved = resolve(&candidate).map_err(|_| AccessError::AccessDenied)?;
        if !is_contained(&resolved, root) {
            tracing::warn!(filename, "access denied");
            return Err(AccessError::AccessDenied);
        }

        let meta = tokio::fs::metadata(&resolved).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AccessError::NotFound(filename.to_owned()),
            _ => AccessError::Io(e),
        })?;
        if !meta.is_file() {
            return Err(AccessError::NotAFile(filename.to_owned()));
        }

        let bytes = tokio::fs::read(&resolved).await?;
        let content =
            String::from_utf8(bytes).map_err(|_| AccessError::Decode(filename.to_owned()))?;
        let modified = epoch_seconds(meta.modified()?);

        Ok(FileContent {
            content,
            metadata: FileMetadata {
                size: meta.len(),
                modified,
            },
        })
    }
}

/// Seconds since the Unix epoch, negative for earlier times.
fn epoch_seconds(time: SystemTime) -> f64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_secs_f64(),
        Err(e) => -e.duration().as_secs_f64(),
    }
}

#[cfg(test)]
mod tests {
    use crate::access::{Envelope, FileAccess, FileList, epoch_seconds};
    use crate::config::Root;
    use std::fs;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;

    fn access_over(tmp: &TempDir) -> FileAccess {
        FileAccess::new(Root::resolve(tmp.path().to_str().unwrap()).unwrap())
    }

    fn denied<T>(envelope: Envelope<T>) -> bool {
        matches!(envelope, Envelope::Error { error } if error == "Access denied")
    }

    #[tokio::test]
    async fn lists_and_reads_scenario() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("test.txt"), "hello").unwrap();
        fs::write(tmp.path().join(".secret"), "hidden").unwrap();
        let access = access_over(&tmp);

        assert_eq!(
            access.list().await,
            Envelope::Success(FileList {
                files: vec!["test.txt".into()]
            })
        );

        let Envelope::Success(file) = access.read("test.txt").await else {
            panic!("expected content");
        };
        assert_eq!(file.content, "hello");
        assert_eq!(file.metadata.size, 5);

        assert!(denied(access.read("../../etc/passwd").await));

        // Hidden from the listing but readable by exact name.
        let Envelope::Success(secret) = access.read(".secret").await else {
            panic!("expected dotfile content");
        };
        assert_eq!(secret.content, "hidden");
    }

    #[tokio::test]
    async fn listing_skips_hidden_files_and_directories() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a.txt"), "a").unwrap();
        fs::write(tmp.path().join("b.md"), "b").unwrap();
        fs::write(tmp.path().join(".env"), "x").unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub").join("nested.txt"), "n").unwrap();

        let Envelope::Success(list) = access_over(&tmp).list().await else {
            panic!("expected listing");
        };
        let mut files = list.files;
        files.sort();
        assert_eq!(files, vec!["a.txt".to_string(), "b.md".to_string()]);
    }

    #[tokio::test]
    async fn empty_directory_lists_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(
            access_over(&tmp).list().await,
            Envelope::Success(FileList { files: vec![] })
        );
    }

    #[tokio::test]
    async fn listing_a_removed_root_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("gone");
        fs::create_dir(&root).unwrap();
        let access = FileAccess::new(Root::resolve(root.to_str().unwrap()).unwrap());
        fs::remove_dir(&root).unwrap();
        assert!(access.list().await.is_error());
    }

    #[tokio::test]
    async fn read_reports_size_and_mtime() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("notes.txt");
        let content = "héllo wörld\n";
        fs::write(&path, content).unwrap();
        let mtime = fs::metadata(&path)
            .unwrap()
            .modified()
            .unwrap()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs_f64();

        let Envelope::Success(file) = access_over(&tmp).read("notes.txt").await else {
            panic!("expected content");
        };
        assert_eq!(file.content, content);
        assert_eq!(file.metadata.size, content.len() as u64);
        assert_eq!(file.metadata.modified, mtime);
    }

    #[tokio::test]
    async fn repeated_calls_are_identical() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a.txt"), "a").unwrap();
        let access = access_over(&tmp);
        assert_eq!(access.list().await, access.list().await);
        assert_eq!(access.read("a.txt").await, access.read("a.txt").await);
    }

    #[tokio::test]
    async fn traversal_is_denied() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("root");
        fs::create_dir(&root).unwrap();
        fs::write(tmp.path().join("secret.txt"), "s").unwrap();
        let access = FileAccess::new(Root::resolve(root.to_str().unwrap()).unwrap());

        assert!(denied(access.read("../secret.txt").await));
        assert!(denied(access.read("../missing.txt").await));
        assert!(denied(access.read("nope/../../secret.txt").await));
        assert!(denied(access.read("/etc/passwd").await));
        assert!(denied(access.read("").await));
        assert!(denied(access.read(".").await));
    }

    #[tokio::test]
    async fn sibling_with_shared_prefix_is_denied() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("root");
        let sibling = tmp.path().join("root2");
        fs::create_dir(&root).unwrap();
        fs::create_dir(&sibling).unwrap();
        fs::write(sibling.join("x.txt"), "x").unwrap();
        let access = FileAccess::new(Root::resolve(root.to_str().unwrap()).unwrap());

        assert!(denied(access.read("../root2/x.txt").await));
    }

    #[tokio::test]
    async fn absolute_path_inside_root_is_allowed() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a.txt"), "a").unwrap();
        let access = access_over(&tmp);
        let absolute = access.root().path().join("a.txt");
        let result = access.read(absolute.to_str().unwrap()).await;
        assert!(!result.is_error());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlink_escape_is_denied() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("root");
        fs::create_dir(&root).unwrap();
        fs::write(tmp.path().join("secret.txt"), "s").unwrap();
        std::os::unix::fs::symlink(tmp.path().join("secret.txt"), root.join("link.txt"))
            .unwrap();
        let access = FileAccess::new(Root::resolve(root.to_str().unwrap()).unwrap());

        assert!(denied(access.read("link.txt").await));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn dangling_symlink_escape_is_denied() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("root");
        fs::create_dir(&root).unwrap();
        std::os::unix::fs::symlink("../outside_missing.txt", root.join("link.txt")).unwrap();
        std::os::unix::fs::symlink("../missingdir", root.join("dirlink")).unwrap();
        let access = FileAccess::new(Root::resolve(root.to_str().unwrap()).unwrap());

        assert!(denied(access.read("link.txt").await));
        assert!(denied(access.read("dirlink/x.txt").await));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn dangling_symlink_inside_root_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink("missing.txt", tmp.path().join("link.txt")).unwrap();
        let Envelope::Error { error } = access_over(&tmp).read("link.txt").await else {
            panic!("expected error");
        };
        assert_ne!(error, "Access denied");
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let result = access_over(&tmp).read("nonexistent.txt").await;
        let Envelope::Error { error } = result else {
            panic!("expected error");
        };
        assert_ne!(error, "Access denied");
    }

    #[tokio::test]
    async fn directory_is_not_readable() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        assert!(access_over(&tmp).read("sub").await.is_error());
    }

    #[tokio::test]
    async fn invalid_utf8_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("bin.dat"), [0xff, 0xfe, 0x00, 0x80]).unwrap();
        assert!(access_over(&tmp).read("bin.dat").await.is_error());
    }

    #[test]
    fn mtime_before_epoch_is_negative() {
        assert_eq!(epoch_seconds(UNIX_EPOCH), 0.0);
        assert_eq!(epoch_seconds(UNIX_EPOCH + Duration::from_millis(1500)), 1.5);
        assert_eq!(epoch_seconds(UNIX_EPOCH - Duration::from_secs(90)), -90.0);
    }

    #[test]
    fn envelope_wire_shapes() {
        let ok: Envelope<FileList> = Envelope::Success(FileList {
            files: vec!["a.txt".into()],
        });
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            serde_json::json!({ "files": ["a.txt"] })
        );

        let err: Envelope<FileList> = Envelope::Error {
            error: "Access denied".into(),
        };
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            serde_json::json!({ "error": "Access denied" })
        );

        let parsed: Envelope<FileList> =
            serde_json::from_str(r#"{"error": "boom"}"#).unwrap();
        assert!(parsed.is_error());
    }
}
