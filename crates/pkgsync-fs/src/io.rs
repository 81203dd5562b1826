//! File primitives: locked atomic writes for state files, and the
//! copy/remove operations used to mirror files between sync roots

use fs2::FileExt;
use std::fs::{self, FileTimes, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{Error, NormalizedPath, Result};

/// Replace the file at `path` with `content` in one rename.
///
/// The bytes go to a hidden sibling first (`.<name>.<pid>.tmp`), held under
/// an exclusive advisory lock while they are flushed, so concurrent readers
/// see either the old file or the new one. Missing parent directories are
/// created.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let target = path.to_native();
    if let Some(dir) = target.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }

    let staging = staging_path(&target);
    let lock_failed = || Error::LockFailed {
        path: target.clone(),
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&staging)
        .map_err(|e| Error::io(&staging, e))?;
    FileExt::lock_exclusive(&file).map_err(|_| lock_failed())?;
    file.write_all(content)
        .and_then(|()| file.sync_all())
        .map_err(|e| Error::io(&staging, e))?;
    FileExt::unlock(&file).map_err(|_| lock_failed())?;
    drop(file);

    fs::rename(&staging, &target).map_err(|e| Error::io(&target, e))
}

fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}

/// Read a whole file as UTF-8.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native = path.to_native();
    fs::read_to_string(&native).map_err(|e| Error::io(&native, e))
}

/// Copy `source` to `target`, carrying over permissions and timestamps.
///
/// The target keeps the source's modification time so the next scan of
/// either root sees identical versions and does not schedule a copy back.
/// Returns the number of bytes copied.
pub fn copy_preserving(source: &Path, target: &Path) -> Result<u64> {
    let meta = fs::metadata(source).map_err(|e| Error::io(source, e))?;
    let bytes = fs::copy(source, target).map_err(|e| Error::io(target, e))?;

    let mut times = FileTimes::new();
    if let Ok(modified) = meta.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }

    // fs::copy already applied the source permissions; a read-only target
    // has to be opened writable for the timestamp update.
    let permissions = meta.permissions();
    if permissions.readonly() {
        let mut writable = permissions.clone();
        #[allow(clippy::permissions_set_readonly_false)]
        writable.set_readonly(false);
        fs::set_permissions(target, writable).map_err(|e| Error::io(target, e))?;
    }

    let file = OpenOptions::new()
        .write(true)
        .open(target)
        .map_err(|e| Error::io(target, e))?;
    file.set_times(times).map_err(|e| Error::io(target, e))?;
    drop(file);

    if permissions.readonly() {
        fs::set_permissions(target, permissions).map_err(|e| Error::io(target, e))?;
    }

    Ok(bytes)
}

/// Remove `path` if it is a regular file.
///
/// Returns `Ok(false)` when there was nothing to remove.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Make sure the immediate parent directory of `target` exists.
///
/// Creates at most one directory level. A missing grandparent is reported
/// as [`Error::MissingParent`] rather than created. Returns `Ok(true)` when a
/// directory was created.
pub fn ensure_parent_dir(target: &Path) -> Result<bool> {
    let Some(parent) = target.parent() else {
        return Ok(false);
    };
    if parent.as_os_str().is_empty() || parent.is_dir() {
        return Ok(false);
    }
    if let Some(grandparent) = parent.parent()
        && !grandparent.as_os_str().is_empty()
        && !grandparent.is_dir()
    {
        return Err(Error::MissingParent {
            path: target.to_path_buf(),
        });
    }
    fs::create_dir(parent).map_err(|e| Error::io(parent, e))?;
    Ok(true)
}
