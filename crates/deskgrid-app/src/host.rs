//! Desktop host: component catalog and layout on disk, window calls
//! forwarded to the plugin runtime as [`EngineEvent`]s.

use crate::protocol::EngineEvent;
use deskgrid_core::component::Component;
use deskgrid_core::host::{BoxFuture, Host, HostError, HostResult, WindowHandle};
use deskgrid_core::scene::Scene;
use deskgrid_core::storage::{FileStorage, StorageError};
use deskgrid_core::window_shape::WindowShape;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

/// Host backed by the local file system.
///
/// Saves are handed to a writer thread so `save_config` never waits on the
/// disk. Snapshots queued while a write is in flight collapse into the
/// newest one.
pub struct DesktopHost {
    catalog_path: Option<PathBuf>,
    storage: FileStorage,
    events: Sender<EngineEvent>,
    saver: Option<Sender<Scene>>,
    writer: Option<JoinHandle<()>>,
}

impl DesktopHost {
    /// Create the host and start its writer thread. Returns the receiving
    /// end of the event stream.
    pub fn new(
        storage: FileStorage,
        catalog_path: Option<PathBuf>,
    ) -> std::io::Result<(Self, Receiver<EngineEvent>)> {
        let (events, event_rx) = mpsc::channel();
        let (saver, save_rx) = mpsc::channel::<Scene>();
        let writer_storage = storage.clone();
        let writer = std::thread::Builder::new()
            .name("deskgrid-writer".to_string())
            .spawn(move || write_snapshots(writer_storage, save_rx))?;

        let host = Self {
            catalog_path,
            storage,
            events,
            saver: Some(saver),
            writer: Some(writer),
        };
        Ok((host, event_rx))
    }

    pub fn storage(&self) -> &FileStorage {
        &self.storage
    }

    fn emit(&self, event: EngineEvent) {
        if self.events.send(event).is_err() {
            log::warn!("Event stream closed, dropping host call");
        }
    }

    /// Stop accepting saves and wait until queued snapshots are on disk.
    pub fn shutdown(&mut self) {
        self.saver.take();
        if let Some(writer) = self.writer.take() {
            if writer.join().is_err() {
                log::error!("Layout writer thread panicked");
            }
        }
    }

    fn read_catalog(path: &Path) -> HostResult<Vec<Component>> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| HostError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&json).map_err(|e| {
            HostError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })
    }
}

impl Drop for DesktopHost {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn write_snapshots(storage: FileStorage, snapshots: Receiver<Scene>) {
    while let Ok(mut scene) = snapshots.recv() {
        for newer in snapshots.try_iter() {
            scene = newer;
        }
        match storage.save_scene(&scene) {
            Ok(()) => log::debug!("Layout written ({} widgets)", scene.len()),
            Err(e) => log::error!("Failed to write layout: {}", e),
        }
    }
}

impl Host for DesktopHost {
    fn list_components(&self) -> BoxFuture<'_, HostResult<Vec<Component>>> {
        Box::pin(async move {
            let path = self
                .catalog_path
                .as_deref()
                .ok_or_else(|| HostError::Unavailable("no component catalog configured".to_string()))?;
            Self::read_catalog(path)
        })
    }

    fn load_config(&self) -> BoxFuture<'_, HostResult<Option<Scene>>> {
        Box::pin(async move {
            match self.storage.load_scene() {
                Ok(scene) => Ok(Some(scene)),
                Err(StorageError::NotFound(_)) => Ok(None),
                Err(StorageError::Serialization(e)) => Err(HostError::Serialization(e)),
                Err(StorageError::Io(e)) => Err(HostError::Io(e)),
            }
        })
    }

    fn save_config(&self, snapshot: &Scene) -> HostResult<()> {
        let saver = self
            .saver
            .as_ref()
            .ok_or_else(|| HostError::Transport("host is shutting down".to_string()))?;
        saver
            .send(snapshot.clone())
            .map_err(|_| HostError::Transport("layout writer stopped".to_string()))
    }

    fn set_ignore_mouse(&self, ignore: bool) {
        self.emit(EngineEvent::IgnoreMouse { ignore });
    }

    fn set_interactive_regions(&self, shape: &WindowShape) {
        self.emit(EngineEvent::WindowShape {
            shape: shape.clone(),
        });
    }

    fn attach_to_desktop_background(&self, window: WindowHandle) -> HostResult<()> {
        self.emit(EngineEvent::Attach { window });
        Ok(())
    }

    fn open_external_path(&self, path: &Path) -> HostResult<()> {
        if !path.exists() {
            return Err(HostError::Io(format!("{} does not exist", path.display())));
        }
        self.emit(EngineEvent::OpenPath {
            path: path.to_path_buf(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskgrid_core::geometry::GridRect;
    use deskgrid_core::scene::Widget;
    use tempfile::tempdir;

    fn host_in(dir: &Path, catalog: Option<PathBuf>) -> (DesktopHost, Receiver<EngineEvent>) {
        let storage = FileStorage::new(dir.join("data")).unwrap();
        DesktopHost::new(storage, catalog).unwrap()
    }

    #[test]
    fn test_catalog_from_file() {
        let dir = tempdir().unwrap();
        let catalog = dir.path().join("components.json");
        std::fs::write(
            &catalog,
            r#"[{ "id": "clock", "name": "Clock", "url": "clock.html", "usage": "desktop" }]"#,
        )
        .unwrap();
        let (host, _events) = host_in(dir.path(), Some(catalog));

        let listing = pollster::block_on(host.list_components()).unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].id, "clock");
    }

    #[test]
    fn test_missing_catalog_is_unavailable() {
        let dir = tempdir().unwrap();
        let (host, _events) = host_in(dir.path(), None);
        let result = pollster::block_on(host.list_components());
        assert!(matches!(result, Err(HostError::Unavailable(_))));
    }

    #[test]
    fn test_saves_reach_disk_on_shutdown() {
        let dir = tempdir().unwrap();
        let (mut host, _events) = host_in(dir.path(), None);
        assert_eq!(pollster::block_on(host.load_config()).unwrap(), None);

        let mut scene = Scene::new();
        scene.add_widget(Widget::new("clock", GridRect::new(50, 50, 200, 100)));
        host.save_config(&Scene::new()).unwrap();
        host.save_config(&scene).unwrap();
        host.shutdown();

        assert_eq!(host.storage().load_scene().unwrap(), scene);
        assert!(host.save_config(&scene).is_err());
    }

    #[test]
    fn test_window_calls_become_events() {
        let dir = tempdir().unwrap();
        let (host, events) = host_in(dir.path(), None);
        host.set_ignore_mouse(true);
        host.set_interactive_regions(&WindowShape::WholeWindow);
        host.attach_to_desktop_background(WindowHandle(3)).unwrap();
        host.open_external_path(dir.path()).unwrap();
        assert!(host.open_external_path(&dir.path().join("nope")).is_err());

        let received: Vec<EngineEvent> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![
                EngineEvent::IgnoreMouse { ignore: true },
                EngineEvent::WindowShape { shape: WindowShape::WholeWindow },
                EngineEvent::Attach { window: WindowHandle(3) },
                EngineEvent::OpenPath { path: dir.path().to_path_buf() },
            ]
        );
    }
}
