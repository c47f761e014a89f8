use std::fs;

use crate::{CURRENT_ERR_WRITE_MARKER, Paths, ProfileStore, content_hash, write_atomic};

/// What the tracker can say about the live configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CurrentProfile {
    Named(String),
    /// Live files exist but match no stored profile.
    Unknown,
    /// No live auth document at all.
    None,
}

/// Resolves the active profile: trust the marker while it names a stored
/// profile, otherwise fall back to matching the live auth document against
/// every profile's stored copy by content hash. The marker may outlive a
/// deleted profile, so it is a hint, not an authority.
pub fn get_current(paths: &Paths, store: &ProfileStore) -> CurrentProfile {
    if let Some(name) = read_marker(paths) {
        if store.exists(&name) {
            return CurrentProfile::Named(name);
        }
    }

    let Ok(live) = fs::read(&paths.live_auth) else {
        return CurrentProfile::None;
    };
    let live_hash = content_hash(&live);
    let names = store.list().unwrap_or_default();
    for name in names {
        let Ok(stored) = fs::read(store.auth_path(&name)) else {
            continue;
        };
        if content_hash(&stored) == live_hash {
            return CurrentProfile::Named(name);
        }
    }
    CurrentProfile::Unknown
}

pub fn set_current(paths: &Paths, name: &str) -> Result<(), String> {
    write_atomic(&paths.current_marker, format!("{name}\n").as_bytes()).map_err(|err| {
        crate::msg2(CURRENT_ERR_WRITE_MARKER, paths.current_marker.display(), err)
    })
}

fn read_marker(paths: &Paths) -> Option<String> {
    let contents = fs::read_to_string(&paths.current_marker).ok()?;
    let name = contents.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
