use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};

use anyhow::{Context, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use tracing::{debug, info};

/// Watches one scene file and queues a notice whenever it is written.
pub struct SceneWatcher {
    _watcher: RecommendedWatcher,
    changes: Receiver<PathBuf>,
}

impl SceneWatcher {
    /// True if the file changed since the last call. Drains queued notices.
    pub fn changed(&self) -> bool {
        let mut changed = false;
        while let Ok(path) = self.changes.try_recv() {
            debug!(path = %path.display(), "scene change queued");
            changed = true;
        }
        changed
    }
}

/// Start watching `scene`.
///
/// The parent directory is watched rather than the file, so editors that
/// save by renaming a temporary file over it are still seen.
pub fn start(scene: &Path) -> Result<SceneWatcher> {
    let file_name = scene
        .file_name()
        .with_context(|| format!("{} does not name a file", scene.display()))?
        .to_owned();
    let dir = match scene.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let (tx, rx) = channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            if event.kind.is_modify() || event.kind.is_create() {
                for path in &event.paths {
                    if path.file_name() == Some(file_name.as_os_str()) {
                        // The receiver is gone once the run has finished.
                        let _ = tx.send(path.clone());
                    }
                }
            }
        }
        Err(e) => tracing::error!("Error watching scene file: {e:?}"),
    })?;

    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch {}", dir.display()))?;
    info!(scene = %scene.display(), "watching scene for changes");

    Ok(SceneWatcher {
        _watcher: watcher,
        changes: rx,
    })
}
