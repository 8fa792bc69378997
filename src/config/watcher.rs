//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_application;
use crate::dispatch::Application;
use crate::observability::metrics;

/// A watcher that rebuilds the application whenever the manifest changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<Application>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for rebuilt applications.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<Application>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file. Keep the returned watcher alive for as long as
    /// reloads are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx;
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    tracing::info!(path = ?path, "Config file change detected, rebuilding");
                    reload(&path, &tx);
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

/// Rebuild from disk; on failure the previous application keeps serving.
fn reload(path: &Path, tx: &mpsc::UnboundedSender<Application>) -> bool {
    match load_application(path) {
        Ok((_, app)) => {
            metrics::record_reload(true);
            tx.send(app).is_ok()
        }
        Err(e) => {
            metrics::record_reload(false);
            tracing::error!(error = %e, "Failed to reload config, keeping current application");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reload_sends_only_valid_applications() {
        let (watcher, mut rx) = ConfigWatcher::new(Path::new("unused.toml"));
        let mut file = tempfile::NamedTempFile::new().unwrap();

        file.write_all(
            br#"
            [[controllers]]
            type = "Ping"
            markers = ["singleton"]
            [[controllers.methods]]
            name = "ping"
            annotations = ["action"]
            returns = "text"
            "#,
        )
        .unwrap();
        assert!(reload(file.path(), &watcher.update_tx));
        assert_eq!(rx.try_recv().unwrap().routes().len(), 1);

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        broken.write_all(b"[[controllers]]\ntype = \"Broken\"\n").unwrap();
        assert!(!reload(broken.path(), &watcher.update_tx));
        assert!(rx.try_recv().is_err());
    }
}
