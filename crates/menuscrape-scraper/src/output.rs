//! Menu files: one pretty-printed JSON array of canonical items per site.

use std::io::Write;
use std::path::Path;
use std::time::SystemTime;

use menuscrape_core::CanonicalMenuItem;

use crate::error::ScraperError;

/// A menu file read back from disk.
#[derive(Debug, Clone)]
pub struct StoredMenu {
    pub items: Vec<CanonicalMenuItem>,
    pub modified: Option<SystemTime>,
}

/// Writes `body` to a uniquely named temp file in `dir` and renames it over
/// `path`. Concurrent writers never share a temp file; the last rename wins.
fn replace_file(dir: &Path, path: &Path, body: &[u8]) -> std::io::Result<()> {
    let mut tmp = tempfile::Builder::new()
        .prefix(".menu-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(body)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Replaces the file at `path` with `items`. The array is written to a
/// private temp file in the same directory and renamed into place.
///
/// # Errors
///
/// Returns [`ScraperError::Serialize`] or [`ScraperError::Output`].
pub async fn write_menu(path: &Path, items: &[CanonicalMenuItem]) -> Result<(), ScraperError> {
    let body = serde_json::to_vec_pretty(items)?;
    let output_err = |source| ScraperError::Output {
        path: path.display().to_string(),
        source,
    };

    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            tokio::fs::create_dir_all(parent).await.map_err(output_err)?;
            parent.to_path_buf()
        }
        None => std::path::PathBuf::from("."),
    };
    let target = path.to_path_buf();
    tokio::task::spawn_blocking(move || replace_file(&dir, &target, &body))
        .await
        .map_err(|e| output_err(std::io::Error::other(e)))?
        .map_err(output_err)?;

    tracing::debug!(path = %path.display(), count = items.len(), "wrote menu file");
    Ok(())
}

/// Reads a menu file. `Ok(None)` when it does not exist yet.
///
/// # Errors
///
/// Returns [`ScraperError::Read`] on I/O failure and
/// [`ScraperError::Serialize`] when the file is not a menu array.
pub async fn read_menu(path: &Path) -> Result<Option<StoredMenu>, ScraperError> {
    let read_err = |source| ScraperError::Read {
        path: path.display().to_string(),
        source,
    };

    let body = match tokio::fs::read(path).await {
        Ok(body) => body,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(read_err(err)),
    };
    let items: Vec<CanonicalMenuItem> = serde_json::from_slice(&body)?;
    let modified = tokio::fs::metadata(path)
        .await
        .and_then(|m| m.modified())
        .ok();

    Ok(Some(StoredMenu { items, modified }))
}
