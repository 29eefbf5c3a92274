use std::sync::{Arc, Mutex};

use anyhow::Result;

/// Fixed key of the persisted access-token slot.
pub const TOKEN_KEY: &str = "accessToken";

/// A single persisted slot holding the current access token.
///
/// The token persisted here is only used to bootstrap re-authentication
/// after a restart; the session manager's in-memory copy is authoritative.
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, if any
    fn load(&self) -> Result<Option<String>>;

    /// Overwrite the persisted token
    fn save(&self, token: &str) -> Result<()>;

    /// Remove the persisted token. Clearing an empty slot is not an error.
    fn clear(&self) -> Result<()>;
}

/// Process-local token slot.
///
/// Clones share the same slot, which lets tests simulate a restart by
/// building a second manager over a clone of the first one's store.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
    writes: Arc<Mutex<usize>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a token
    pub fn with_token(token: &str) -> Self {
        let store = Self::default();
        *store.lock_slot() = Some(token.to_string());
        store
    }

    /// Current slot contents
    pub fn peek(&self) -> Option<String> {
        self.lock_slot().clone()
    }

    /// Number of successful `save` calls
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.peek())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.lock_slot() = Some(token.to_string());
        *self.writes.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.lock_slot() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_clones_share_slot() {
        let store = MemoryTokenStore::new();
        let restarted = store.clone();

        store.save("token-1").unwrap();
        assert_eq!(restarted.load().unwrap().as_deref(), Some("token-1"));
        assert_eq!(restarted.write_count(), 1);

        restarted.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_memory_store_clear_empty_slot() {
        let store = MemoryTokenStore::new();
        assert!(store.clear().is_ok());
        assert_eq!(store.peek(), None);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_memory_store_with_token() {
        let store = MemoryTokenStore::with_token("stale");
        assert_eq!(store.load().unwrap().as_deref(), Some("stale"));
        assert_eq!(store.write_count(), 0);
    }
}
