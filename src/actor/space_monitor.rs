//! Watches the Spaces preferences file for deletion.
//!
//! The window server rewrites `com.apple.spaces.plist` by replacing it
//! whenever the Space layout changes, so a deletion is a useful (if
//! redundant) signal next to the active-space notification. Each watch fires
//! at most once; the owner re-arms it against the recreated file.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use notify::event::ModifyKind;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, trace, warn};

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("watched file {0} does not exist")]
    Missing(PathBuf),
    #[error(transparent)]
    Notify(#[from] notify::Error),
}

pub type DeleteCallback = Box<dyn Fn() + Send + 'static>;

/// A live subscription. Cancelling (or dropping) it stops delivery.
pub trait WatchHandle {
    fn cancel(self: Box<Self>);
}

pub trait FileWatcher {
    /// Installs a one-shot watch that calls `on_delete` when `path` is
    /// deleted or renamed away.
    fn watch(&self, path: &Path, on_delete: DeleteCallback)
    -> Result<Box<dyn WatchHandle>, WatchError>;
}

pub struct SpaceFileMonitor {
    path: PathBuf,
    watcher: Box<dyn FileWatcher>,
    on_delete: Arc<dyn Fn() + Send + Sync>,
    handle: Option<Box<dyn WatchHandle>>,
}

impl SpaceFileMonitor {
    pub fn new(
        path: PathBuf,
        watcher: Box<dyn FileWatcher>,
        on_delete: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            path,
            watcher,
            on_delete: Arc::new(on_delete),
            handle: None,
        }
    }

    pub fn is_armed(&self) -> bool { self.handle.is_some() }

    /// Replaces any existing watch with a fresh one. On failure the monitor
    /// stays disarmed until the next call.
    pub fn arm(&mut self) -> bool {
        self.disarm();

        let on_delete = self.on_delete.clone();
        match self.watcher.watch(&self.path, Box::new(move || on_delete())) {
            Ok(handle) => {
                debug!(path = ?self.path, "Watching spaces file");
                self.handle = Some(handle);
                true
            }
            Err(err) => {
                warn!(path = ?self.path, %err, "Failed to watch spaces file");
                false
            }
        }
    }

    pub fn disarm(&mut self) {
        if let Some(handle) = self.handle.take() {
            trace!(path = ?self.path, "Cancelling spaces file watch");
            handle.cancel();
        }
    }
}

impl Drop for SpaceFileMonitor {
    fn drop(&mut self) { self.disarm(); }
}

/// [`FileWatcher`] backed by `notify` (kqueue on macOS).
#[derive(Debug, Default, Clone, Copy)]
pub struct NotifyWatcher;

struct NotifyHandle {
    _watcher: RecommendedWatcher,
}

impl WatchHandle for NotifyHandle {
    fn cancel(self: Box<Self>) {}
}

impl FileWatcher for NotifyWatcher {
    fn watch(
        &self,
        path: &Path,
        on_delete: DeleteCallback,
    ) -> Result<Box<dyn WatchHandle>, WatchError> {
        if !path.exists() {
            return Err(WatchError::Missing(path.to_path_buf()));
        }

        let fired = AtomicBool::new(false);
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                Ok(event) if is_deletion(&event.kind) => {
                    if !fired.swap(true, Ordering::SeqCst) {
                        trace!(?event, "Spaces file went away");
                        on_delete();
                    }
                }
                Ok(_) => {}
                Err(err) => warn!(%err, "Spaces file watch error"),
            }
        })?;
        watcher.watch(path, RecursiveMode::NonRecursive)?;

        Ok(Box::new(NotifyHandle { _watcher: watcher }))
    }
}

fn is_deletion(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(_)))
}
