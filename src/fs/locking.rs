//! Advisory locks on timeline files.
//!
//! Every reader of `.work/timelines/` takes a shared `fs2` lock and every
//! writer an exclusive one, so two `dealflow` invocations never see a
//! half-written timeline. [`update_exclusive`] holds the exclusive lock across
//! a whole read-modify-write, which is what makes first-time creation of a
//! deal safe against a concurrent creator.
//!
//! An empty file reads as absent: it is what a creator leaves behind between
//! opening the file and writing it.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Contents of `path` under a shared lock. `None` when the file is missing or
/// still empty.
pub fn read_shared(path: &Path) -> Result<Option<String>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to open timeline: {}", path.display()))
        }
    };
    file.lock_shared()
        .with_context(|| format!("Failed to acquire shared lock: {}", path.display()))?;
    read_locked(&file, path)
}

/// Replace the contents of `path` under an exclusive lock.
pub fn write_exclusive(path: &Path, content: &str) -> Result<()> {
    update_exclusive(path, |_| Ok(Some(content.to_string()))).map(|_| ())
}

/// Read-modify-write `path` under one exclusive lock.
///
/// `update` sees the current contents (`None` if the file is new or empty)
/// and returns the contents to write, or `None` to leave the file as it is.
/// Returns whatever ended up in the file.
pub fn update_exclusive<F>(path: &Path, update: F) -> Result<Option<String>>
where
    F: FnOnce(Option<&str>) -> Result<Option<String>>,
{
    // Truncation happens under the lock, never at open time.
    #[allow(clippy::suspicious_open_options)]
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .open(path)
        .with_context(|| format!("Failed to open timeline for writing: {}", path.display()))?;
    file.lock_exclusive()
        .with_context(|| format!("Failed to acquire exclusive lock: {}", path.display()))?;

    let current = read_locked(&file, path)?;
    let Some(next) = update(current.as_deref())? else {
        return Ok(current);
    };

    file.set_len(0)
        .with_context(|| format!("Failed to truncate timeline: {}", path.display()))?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(next.as_bytes())
        .with_context(|| format!("Failed to write timeline: {}", path.display()))?;
    file.flush()
        .with_context(|| format!("Failed to flush timeline: {}", path.display()))?;
    Ok(Some(next))
}

fn read_locked(mut file: &File, path: &Path) -> Result<Option<String>> {
    let mut content = String::new();
    file.read_to_string(&mut content)
        .with_context(|| format!("Failed to read timeline: {}", path.display()))?;
    Ok((!content.is_empty()).then_some(content))
}
