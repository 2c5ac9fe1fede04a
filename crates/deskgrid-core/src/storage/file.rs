//! JSON file store for the scene.

use super::{StorageError, StorageResult};
use crate::scene::Scene;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the persisted layout inside the storage directory.
pub const LAYOUT_FILE: &str = "layout.json";

/// Stores the scene as a JSON document in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a store rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Store in the platform data directory.
    ///
    /// On Linux: `~/.local/share/deskgrid/`
    /// On Windows: `%LOCALAPPDATA%\deskgrid\`
    pub fn default_location() -> StorageResult<Self> {
        Self::new(default_data_dir()?)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn layout_path(&self) -> PathBuf {
        self.base_path.join(LAYOUT_FILE)
    }

    pub fn exists(&self) -> bool {
        self.layout_path().exists()
    }

    pub fn load_scene(&self) -> StorageResult<Scene> {
        let path = self.layout_path();
        if !path.exists() {
            return Err(StorageError::NotFound(path.display().to_string()));
        }
        let json = fs::read_to_string(&path)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Scene::from_json(&json).map_err(|e| {
            StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Write the scene. The previous file is replaced only once the new one
    /// is fully written.
    pub fn save_scene(&self, scene: &Scene) -> StorageResult<()> {
        let json = scene
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let path = self.layout_path();
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, json)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", staging.display(), e)))?;
        fs::rename(&staging, &path)
            .map_err(|e| StorageError::Io(format!("Failed to replace {}: {}", path.display(), e)))
    }
}

/// `dirs::data_local_dir()/deskgrid`, falling back to the home directory.
pub fn default_data_dir() -> StorageResult<PathBuf> {
    let base = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
    Ok(base.join("deskgrid"))
}
