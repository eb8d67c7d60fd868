//! Custom assertions and helpers for integration tests

use minfy_capture::{Event, MinfyItem};
use std::path::Path;
use tokio::sync::broadcast;

/// Parse a manifest file written to disk
pub fn read_manifest(path: &Path) -> serde_json::Value {
    let bytes = std::fs::read(path)
        .unwrap_or_else(|e| panic!("manifest {} not readable: {e}", path.display()));
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("manifest {} is not JSON: {e}", path.display()))
}

/// Drain every event already sent to `events`
pub fn drain_events(events: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}

/// Assert two items are equal in everything but `savedAt`
pub fn assert_same_except_saved_at(a: &MinfyItem, b: &MinfyItem) {
    assert_eq!(a.extension_version(), b.extension_version());
    assert_eq!(a.core(), b.core());
    assert_eq!(a.meta(), b.meta());
}

/// Files below `root`, relative to it, sorted
pub fn files_below(root: &Path) -> Vec<String> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<String>) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                walk(root, &path, out);
            } else if let Ok(relative) = path.strip_prefix(root) {
                out.push(relative.to_string_lossy().replace('\\', "/"));
            }
        }
    }

    let mut out = Vec::new();
    walk(root, root, &mut out);
    out.sort();
    out
}
