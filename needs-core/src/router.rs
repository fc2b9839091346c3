//! Storage routing between the primary data file and the demo data file

use anyhow::Result;
use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::storage::Storage;

pub const DATA_FILE_NAME: &str = "data.json";
pub const EXAMPLE_DATA_FILE_NAME: &str = "data.example.json";
pub const DEMO_DATA_FILE_NAME: &str = "data.demomode.json";

/// Which storage context an operation runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Primary,
    Demo,
}

impl From<bool> for StorageMode {
    fn from(demo_mode: bool) -> Self {
        if demo_mode {
            StorageMode::Demo
        } else {
            StorageMode::Primary
        }
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageMode::Primary => write!(f, "primary"),
            StorageMode::Demo => write!(f, "demo"),
        }
    }
}

/// Fixed file locations for both storage contexts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    /// Primary data file
    pub data_file: PathBuf,
    /// Template copied into the demo slot on first use
    pub example_data_file: PathBuf,
    /// Demo data file
    pub demo_data_file: PathBuf,
}

impl StoragePaths {
    /// Standard file names under a data directory and a demo storage directory
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(data_dir: P, demo_storage_dir: Q) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            data_file: data_dir.join(DATA_FILE_NAME),
            example_data_file: data_dir.join(EXAMPLE_DATA_FILE_NAME),
            demo_data_file: demo_storage_dir.as_ref().join(DEMO_DATA_FILE_NAME),
        }
    }
}

/// Resolves the physical data file for a storage mode
#[derive(Debug, Clone)]
pub struct StorageRouter {
    paths: StoragePaths,
}

impl StorageRouter {
    pub fn new(paths: StoragePaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Returns the data file for `mode`.
    ///
    /// In demo mode the example data set is copied into the demo slot the
    /// first time it is needed, if the demo file is missing and a template exists.
    pub fn resolve_path(&self, mode: StorageMode) -> Result<PathBuf> {
        match mode {
            StorageMode::Primary => Ok(self.paths.data_file.clone()),
            StorageMode::Demo => {
                let demo = &self.paths.demo_data_file;
                let template = &self.paths.example_data_file;
                let seeded = !demo.exists()
                    && template.exists()
                    && Storage::new(demo).seed_from(template)?;
                if seeded {
                    info!("Seeded demo data from {:?}", template);
                }
                Ok(demo.clone())
            }
        }
    }

    /// Resolves `mode` and makes sure the file holds a well-formed store
    pub fn storage(&self, mode: StorageMode) -> Result<Storage> {
        let path = self.resolve_path(mode)?;
        debug!("Routing {} storage to {:?}", mode, path);
        let storage = Storage::new(path);
        storage.ensure_initialized()?;
        Ok(storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataStore, Entity};
    use std::fs;
    use tempfile::TempDir;

    fn router_in(temp_dir: &TempDir) -> StorageRouter {
        StorageRouter::new(StoragePaths::new(
            temp_dir.path(),
            temp_dir.path().join("demo-storage"),
        ))
    }

    fn write_template(router: &StorageRouter) {
        let mut template = DataStore::new();
        template.entities.push(Entity {
            id: "sample".into(),
            name: "Sample".into(),
            description: None,
        });
        fs::write(
            &router.paths().example_data_file,
            serde_json::to_string_pretty(&template).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn test_storage_mode_from_bool() {
        assert_eq!(StorageMode::from(true), StorageMode::Demo);
        assert_eq!(StorageMode::from(false), StorageMode::Primary);
    }

    #[test]
    fn test_primary_resolves_to_data_file() {
        let temp_dir = TempDir::new().unwrap();
        let router = router_in(&temp_dir);

        let path = router.resolve_path(StorageMode::Primary).unwrap();
        assert_eq!(path, temp_dir.path().join(DATA_FILE_NAME));
    }

    #[test]
    fn test_demo_copies_template_once() {
        let temp_dir = TempDir::new().unwrap();
        let router = router_in(&temp_dir);
        write_template(&router);

        let storage = router.storage(StorageMode::Demo).unwrap();
        assert_eq!(storage.path(), router.paths().demo_data_file);
        assert_eq!(storage.load().unwrap().entities[0].id, "sample");

        // Later demo writes are not overwritten by the template
        storage.save(&DataStore::new()).unwrap();
        let storage = router.storage(StorageMode::Demo).unwrap();
        assert!(storage.load().unwrap().entities.is_empty());
    }

    #[test]
    fn test_demo_without_template_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        let router = router_in(&temp_dir);

        let storage = router.storage(StorageMode::Demo).unwrap();
        assert!(storage.exists());
        assert_eq!(storage.load().unwrap(), DataStore::new());
    }

    #[test]
    fn test_primary_and_demo_are_isolated() {
        let temp_dir = TempDir::new().unwrap();
        let router = router_in(&temp_dir);
        write_template(&router);

        let primary = router.storage(StorageMode::Primary).unwrap();
        assert!(primary.load().unwrap().entities.is_empty());

        let demo = router.storage(StorageMode::Demo).unwrap();
        assert_eq!(demo.load().unwrap().entities.len(), 1);
    }
}
