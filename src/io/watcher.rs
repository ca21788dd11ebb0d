use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Files whose change means another process mutated backend state
const WATCHED: &[&str] = &["store.json", "session.json"];

/// Events sent from the watcher to the TUI event loop.
#[derive(Debug)]
pub enum StoreEvent {
    Changed(Vec<PathBuf>),
}

/// Watches the data directory so the TUI can re-fetch after external writes.
pub struct StoreWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<StoreEvent>,
}

impl StoreWatcher {
    pub fn start(data_dir: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let Ok(event) = result else {
                    return;
                };
                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }
                let relevant: Vec<PathBuf> = event
                    .paths
                    .into_iter()
                    .filter(|p| is_watched(p))
                    .collect();
                if !relevant.is_empty() {
                    let _ = tx.send(StoreEvent::Changed(relevant));
                }
            },
            Config::default(),
        )?;

        watcher.watch(data_dir, RecursiveMode::NonRecursive)?;
        Ok(StoreWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Drain pending events without blocking
    pub fn poll(&self) -> Vec<StoreEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.rx.try_recv() {
            events.push(evt);
        }
        events
    }
}

fn is_watched(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| WATCHED.contains(&name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_backend_files_are_relevant() {
        assert!(is_watched(Path::new("/data/store.json")));
        assert!(is_watched(Path::new("/data/session.json")));
        assert!(!is_watched(Path::new("/data/.state.json")));
        assert!(!is_watched(Path::new("/data/.lock")));
        assert!(!is_watched(Path::new("/data/notifications.log")));
    }
}
