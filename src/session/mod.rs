pub mod cart;
pub mod store;

pub use cart::{Cart, CartItem};
pub use store::{FileStore, KeyValueStore, MemoryStore};

use anyhow::Result;
use std::sync::Arc;

pub const TOKEN_KEY: &str = "access_token";

/// Access token held over a key-value store.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn KeyValueStore>,
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        self.store.set(TOKEN_KEY, token.trim())
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(TOKEN_KEY)
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_lifecycle() {
        let session = Session::in_memory();
        assert!(!session.is_authenticated());
        session.set_token("  abc123\n").unwrap();
        assert_eq!(session.token(), Some("abc123".to_string()));
        session.clear().unwrap();
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_empty_token_is_not_authenticated() {
        let session = Session::in_memory();
        session.set_token("").unwrap();
        assert!(!session.is_authenticated());
    }
}
