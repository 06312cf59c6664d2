use std::path::PathBuf;
use std::sync::Mutex;

use portfolio_types::api::TokenPair;
use tracing::warn;

/// Client-local credential storage. The counterpart of the browser's
/// localStorage: infallible from the caller's point of view, so the gate
/// never has to handle storage errors mid-flow.
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Option<TokenPair>;
    fn set(&self, tokens: TokenPair);
    fn clear(&self);
}

/// In-memory store. The default for tests and short-lived processes.
#[derive(Default)]
pub struct MemoryStore {
    tokens: Mutex<Option<TokenPair>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self) -> Option<TokenPair> {
        self.tokens.lock().expect("store lock poisoned").clone()
    }

    fn set(&self, tokens: TokenPair) {
        *self.tokens.lock().expect("store lock poisoned") = Some(tokens);
    }

    fn clear(&self) {
        *self.tokens.lock().expect("store lock poisoned") = None;
    }
}

/// JSON-file-backed store for desktop use, persisting across restarts.
/// I/O failures are logged and swallowed: a store that cannot be read
/// behaves as empty, which degrades to Unauthenticated downstream.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialStore for FileStore {
    fn get(&self) -> Option<TokenPair> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                warn!("Discarding unreadable credential file: {}", e);
                None
            }
        }
    }

    fn set(&self, tokens: TokenPair) {
        let json = match serde_json::to_string(&tokens) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize credentials: {}", e);
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, json) {
            warn!("Failed to persist credentials: {}", e);
        }
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove credential file: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(access: &str, refresh: &str) -> TokenPair {
        TokenPair {
            access: access.into(),
            refresh: refresh.into(),
        }
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get().is_none());

        store.set(pair("a", "r"));
        assert_eq!(store.get().unwrap().access, "a");

        store.clear();
        assert!(store.get().is_none());
        // Clearing an empty store is a no-op.
        store.clear();
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("credentials.json"));

        assert!(store.get().is_none());
        store.set(pair("access-token", "refresh-token"));
        assert_eq!(store.get().unwrap(), pair("access-token", "refresh-token"));

        store.clear();
        assert!(store.get().is_none());
        store.clear();
    }

    #[test]
    fn file_store_treats_corrupt_file_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert!(store.get().is_none());
    }
}
