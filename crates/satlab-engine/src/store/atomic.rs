use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Locks older than this are assumed abandoned.
const STALE_AFTER_SECS: i64 = 60;

/// Write `content` to `path` via a temp file in the same directory, fsync,
/// then rename over the target.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let temp_path = dir.join(format!(".{}.tmp", temp_suffix()));

    let mut file = std::fs::File::create(&temp_path)
        .with_context(|| format!("cannot create temp file in {}", dir.display()))?;
    file.write_all(content)?;
    file.sync_all()?;
    drop(file);

    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e).with_context(|| format!("cannot rename temp to {}", path.display()));
    }
    Ok(())
}

/// Advisory lock on a directory: a `.lock` file holding the pid and a
/// unix timestamp, created exclusively. Released on drop.
#[derive(Debug)]
pub struct AdvisoryLock {
    lock_path: PathBuf,
}

impl AdvisoryLock {
    pub fn acquire(dir: &Path) -> Result<Self> {
        let lock_path = dir.join(".lock");
        if Self::is_stale(&lock_path) {
            Self::take_over_stale(&lock_path);
        }

        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
        {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                bail!("store is locked by another process (lock: {})", lock_path.display())
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("cannot acquire lock {}", lock_path.display()))
            }
        };
        let ts = chrono::Utc::now().timestamp();
        writeln!(file, "{}\n{ts}", std::process::id())
            .with_context(|| format!("cannot write lock {}", lock_path.display()))?;

        Ok(Self { lock_path })
    }

    /// Move the lock aside under a private name and delete it only if the
    /// moved file is still stale. Another process may have replaced the stale
    /// lock with a fresh one in between; that one is linked back without
    /// overwriting anything.
    fn take_over_stale(lock_path: &Path) {
        let claim = lock_path.with_file_name(format!(".lock.stale-{}", temp_suffix()));
        if std::fs::rename(lock_path, &claim).is_err() {
            return;
        }
        if Self::is_stale(&claim) {
            tracing::warn!(lock = %lock_path.display(), "removing stale store lock");
        } else {
            let _ = std::fs::hard_link(&claim, lock_path);
        }
        let _ = std::fs::remove_file(&claim);
    }

    fn is_stale(lock_path: &Path) -> bool {
        let Ok(content) = std::fs::read_to_string(lock_path) else {
            return false;
        };
        content
            .lines()
            .nth(1)
            .and_then(|ts| ts.parse::<i64>().ok())
            .is_some_and(|ts| chrono::Utc::now().timestamp() - ts > STALE_AFTER_SECS)
    }

    pub fn release(mut self) -> Result<()> {
        let path = std::mem::take(&mut self.lock_path);
        std::fs::remove_file(&path)
            .with_context(|| format!("cannot release lock {}", path.display()))
    }
}

impl Drop for AdvisoryLock {
    fn drop(&mut self) {
        if !self.lock_path.as_os_str().is_empty() {
            let _ = std::fs::remove_file(&self.lock_path);
        }
    }
}

fn temp_suffix() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("{}-{nanos:x}", std::process::id())
}
