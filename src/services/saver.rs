//! Save API responses to disk.

use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{LucidError, LucidResult};

/// Write `value` as pretty-printed JSON, creating parent directories as needed.
pub async fn save_json_to_file<T: Serialize + ?Sized>(
    value: &T,
    path: impl AsRef<Path>,
) -> LucidResult<()> {
    let path = path.as_ref();
    let io_error = |e: std::io::Error| {
        warn!(path = %path.display(), error = %e, "Failed to save JSON to file");
        LucidError::Io {
            message: format!("{}: {}", path.display(), e),
        }
    };

    let json = serde_json::to_string_pretty(value)
        .map_err(|e| LucidError::parse(format!("Failed to serialize JSON: {}", e)))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
    }
    tokio::fs::write(path, json).await.map_err(io_error)?;

    info!(path = %path.display(), "Response saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/users.json");

        save_json_to_file(&json!({"users": [1, 2]}), &path).await.unwrap();

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(written.contains("\n"));
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, json!({"users": [1, 2]}));
    }

    #[tokio::test]
    async fn test_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        tokio::fs::write(&blocker, "x").await.unwrap();

        let error = save_json_to_file(&json!(1), blocker.join("child.json"))
            .await
            .unwrap_err();
        assert_eq!(error.error_code(), "io_error");
    }
}
