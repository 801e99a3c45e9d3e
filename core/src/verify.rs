//! Read-back validation of files produced by a step.

use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;

use crate::step::OutputStatus;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Check that `path` exists and holds a JSON document.
///
/// A top-level array counts its elements as records; any other value counts as one record.
/// Every failure is folded into the returned status.
pub async fn verify_output(path: &Path) -> OutputStatus {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return OutputStatus::missing(),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "output file unreadable");
            return OutputStatus::unparseable();
        }
    };

    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Array(items)) => OutputStatus::parsed(items.len()),
        Ok(_) => OutputStatus::parsed(1),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "output file is not valid JSON");
            OutputStatus::unparseable()
        }
    }
}
