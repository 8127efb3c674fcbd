//! Human-readable rendering of a file read.

use chrono::DateTime;
use fsmcp::{Envelope, FileContent};

/// Render a read envelope as content followed by size and modification time.
pub fn summarize(envelope: &Envelope<FileContent>) -> String {
    match envelope {
        Envelope::Error { error } => format!("Error: {error}"),
        Envelope::Success(file) => {
            let modified = modified_rfc3339(file.metadata.modified)
                .unwrap_or_else(|| file.metadata.modified.to_string());
            format!(
                "{}\n\nSize: {} bytes\nModified: {}",
                file.content, file.metadata.size, modified
            )
        }
    }
}

/// Convert fractional epoch seconds to an RFC 3339 timestamp.
fn modified_rfc3339(secs: f64) -> Option<String> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9) as u32;
    DateTime::from_timestamp(whole as i64, nanos).map(|dt| dt.to_rfc3339())
}
