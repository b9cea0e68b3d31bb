use std::path::{Path, PathBuf};

use tokio::{
    fs::{create_dir_all, read_dir, OpenOptions},
    io::AsyncWriteExt,
};

use crate::error::{BlogErr, ContextExt};

/// Recursively collects files under `path` whose extension is one of `exts`.
///
/// The result is sorted so that callers see a stable order.
pub async fn get_files_by_ext_deep(path: &Path, exts: &[&str]) -> Result<Vec<PathBuf>, BlogErr> {
    let mut files = Vec::new();
    let mut dirs = vec![path.to_path_buf()];
    while let Some(dir) = dirs.pop() {
        let mut entries = read_dir(&dir)
            .await
            .with_context(|| format!("read directory: {}", dir.display()))?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                dirs.push(path);
            } else if path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| exts.contains(&ext))
            {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Writes `content` to `path`, creating parent directories as needed.
///
/// With `overwrite` unset an existing file is an error.
pub async fn write_file(path: &Path, content: &[u8], overwrite: bool) -> Result<(), BlogErr> {
    if let Some(prefix) = path.parent() {
        create_dir_all(prefix)
            .await
            .with_context(|| format!("create directory: {}", prefix.display()))?;
    }
    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    let mut file = options
        .open(path)
        .await
        .with_context(|| format!("open file: {}", path.display()))?;
    file.write_all(content).await?;
    file.flush().await?;
    Ok(())
}
