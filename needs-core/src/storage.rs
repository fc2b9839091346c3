use anyhow::{Context, Result};
use fs2::FileExt;
use log::debug;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::NeedsError;
use crate::models::DataStore;

const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Handles saving and loading the data store from one JSON file, with an
/// advisory lock file serializing writers
pub struct Storage {
    file_path: PathBuf,
    lock_file_path: PathBuf,
}

impl Storage {
    /// Creates a new Storage instance
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        let file_path = file_path.as_ref().to_path_buf();
        let lock_file_path = file_path.with_extension("json.lock");
        Self {
            file_path,
            lock_file_path,
        }
    }

    /// Returns the path to the storage file
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn exists(&self) -> bool {
        self.file_path.exists()
    }

    /// Acquire an exclusive lock on the file for writing
    /// Returns the lock file handle which must be held during the operation
    fn acquire_write_lock(&self) -> Result<File> {
        if let Some(parent) = self.lock_file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.lock_file_path)
            .with_context(|| format!("Failed to create lock file: {:?}", self.lock_file_path))?;

        wait_for_lock(&self.file_path, || FileExt::try_lock_exclusive(&lock_file))
            .with_context(|| format!("Failed to acquire lock on {:?}", self.lock_file_path))?;

        // Holder info, for debugging stale locks
        let _ = writeln!(
            lock_file,
            "Locked by PID {} at {}",
            std::process::id(),
            chrono::Utc::now().to_rfc3339()
        );

        Ok(lock_file)
    }

    /// Acquire a shared lock on the file for reading
    fn acquire_read_lock(&self) -> Result<Option<File>> {
        if !self.lock_file_path.exists() {
            return Ok(None);
        }

        let lock_file = OpenOptions::new()
            .read(true)
            .open(&self.lock_file_path)
            .with_context(|| format!("Failed to open lock file: {:?}", self.lock_file_path))?;

        wait_for_lock(&self.file_path, || FileExt::try_lock_shared(&lock_file))
            .with_context(|| format!("Failed to acquire lock on {:?}", self.lock_file_path))?;

        Ok(Some(lock_file))
    }

    /// Writes a store with four empty collections if the file does not exist yet
    pub fn ensure_initialized(&self) -> Result<()> {
        if self.exists() {
            return Ok(());
        }
        debug!("Initializing empty data file at {:?}", self.file_path);
        let _lock = self.acquire_write_lock()?;
        // Another writer may have won the race while we waited
        if !self.exists() {
            self.write_unlocked(&DataStore::new())?;
        }
        Ok(())
    }

    /// Copies `template` into place unless the file already exists.
    ///
    /// The check and the copy happen under the write lock, so a concurrent
    /// first use cannot overwrite data written in between. Returns whether
    /// a copy was made.
    pub fn seed_from(&self, template: &Path) -> Result<bool> {
        let _lock = self.acquire_write_lock()?;
        if self.exists() {
            return Ok(false);
        }
        fs::copy(template, &self.file_path).with_context(|| {
            format!(
                "Failed to copy template {:?} to {:?}",
                template, self.file_path
            )
        })?;
        Ok(true)
    }

    /// Loads the whole store, initializing an empty one on first use
    pub fn load(&self) -> Result<DataStore> {
        self.ensure_initialized()?;

        let _lock = self.acquire_read_lock()?;
        self.read_unlocked()
    }

    /// Saves the whole store with file locking
    pub fn save(&self, store: &DataStore) -> Result<()> {
        let _lock = self.acquire_write_lock()?;
        self.write_unlocked(store)
        // Lock is released when the lock file handle is dropped
    }

    /// Reloads the file under an exclusive lock, applies `update_fn`, and
    /// writes the result back only if `update_fn` succeeded
    pub fn update_atomically<T, F>(&self, update_fn: F) -> std::result::Result<T, NeedsError>
    where
        F: FnOnce(&mut DataStore) -> std::result::Result<T, NeedsError>,
    {
        self.ensure_initialized()?;

        let _lock = self.acquire_write_lock()?;
        let mut store = self.read_unlocked()?;

        let output = update_fn(&mut store)?;

        self.write_unlocked(&store)?;
        Ok(output)
    }

    fn read_unlocked(&self) -> Result<DataStore> {
        let file = File::open(&self.file_path)
            .with_context(|| format!("Failed to open file: {:?}", self.file_path))?;
        let reader = BufReader::new(file);

        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse JSON from {:?}", self.file_path))
    }

    fn write_unlocked(&self, store: &DataStore) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(store)?;
        fs::write(&self.file_path, json)
            .with_context(|| format!("Failed to write data file: {:?}", self.file_path))
    }
}

/// Retries a non-blocking lock attempt until it succeeds or the timeout passes
fn wait_for_lock<F>(file_path: &Path, mut try_lock: F) -> Result<()>
where
    F: FnMut() -> std::io::Result<()>,
{
    let start = std::time::Instant::now();

    loop {
        match try_lock() {
            Ok(()) => return Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                if start.elapsed() > LOCK_TIMEOUT {
                    anyhow::bail!(
                        "Timeout waiting for file lock - another writer holds {:?}",
                        file_path
                    );
                }
                std::thread::sleep(Duration::from_millis(100));
            }
            Err(e) => return Err(e.into()),
        }
    }
}
