//! Atomic file replacement inside a capability directory.
//!
//! Contents are written to a hidden sibling temp file, synced, then renamed
//! over the target so readers see either the old or the new document.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use cap_std::fs::{Dir, OpenOptions};

use crate::domain::ports::KeyValueStoreError;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Replace `file_name` in `dir` with `contents`.
///
/// `file_name` must be a bare name; nested paths are rejected.
pub(super) fn write_atomic(
    dir: &Dir,
    file_name: &str,
    contents: &str,
) -> Result<(), KeyValueStoreError> {
    if file_name.is_empty() || file_name.contains(['/', '\\']) {
        return Err(KeyValueStoreError::backend(format!(
            "store file must be a bare file name, got {file_name:?}"
        )));
    }
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let tmp_name = format!(
        ".{file_name}.tmp.{}.{suffix}.{counter}",
        std::process::id()
    );

    write_temp(dir, &tmp_name, contents).map_err(|err| {
        drop(dir.remove_file(&tmp_name));
        write_error(&tmp_name, &err)
    })?;
    replace(dir, &tmp_name, file_name).map_err(|err| {
        drop(dir.remove_file(&tmp_name));
        write_error(file_name, &err)
    })?;
    sync_directory(dir);
    Ok(())
}

fn write_error(name: &str, err: &io::Error) -> KeyValueStoreError {
    KeyValueStoreError::backend(format!("failed to write {name}: {err}"))
}

fn write_temp(dir: &Dir, tmp_name: &str, contents: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

#[cfg(windows)]
fn replace(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    // Windows rename fails if the target exists.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn replace(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

fn sync_directory(dir: &Dir) {
    // Best effort; some platforms cannot sync directories.
    drop(dir.open(".").and_then(|handle| handle.sync_all()));
}
