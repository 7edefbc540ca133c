use crate::error::SpiderError;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Reads a `.json` file from `path`.
pub async fn read_json<T: serde::de::DeserializeOwned>(
    path: impl AsRef<Path>,
) -> Result<T, SpiderError> {
    let path = path.as_ref();
    trace!("reading file path: {}", path.display());
    let file = tokio::fs::read(path)
        .await
        .map_err(|err| SpiderError::io(path, err))?;
    trace!("file read; deserializing bytes ...");
    let data: T = serde_json::from_slice(&file)?;
    Ok(data)
}

/// Serializes `data` as pretty JSON (non-ASCII left as is) and writes it atomically.
pub async fn write_json_atomic<T: serde::Serialize>(
    data: &T,
    path: impl AsRef<Path>,
) -> Result<(), SpiderError> {
    let json = serde_json::to_vec_pretty(data)?;
    write_atomic(path, &json).await
}

/// Writes `bytes` next to `path` and renames into place, so readers never see a
/// partially written file. Parent directories are created as necessary.
pub async fn write_atomic(path: impl AsRef<Path>, bytes: &[u8]) -> Result<(), SpiderError> {
    let path = path.as_ref();

    // ensure the directory exists
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        trace!("checking directory path: {}", dir.display());
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|err| SpiderError::io(dir, err))?;
    }

    let tmp = tmp_path(path);
    tokio::fs::write(&tmp, bytes)
        .await
        .map_err(|err| SpiderError::io(&tmp, err))?;

    if let Err(err) = tokio::fs::rename(&tmp, path).await {
        tokio::fs::remove_file(&tmp).await.ok();
        return Err(SpiderError::io(path, err));
    }

    debug!("{} bytes written to {}", bytes.len(), path.display());
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
