pub mod dto;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

use std::sync::Arc;

use error::Result;
use repository::{MemoryUserStore, PgUserStore, UserStore};

/// Shared storage handle passed to the web layer as state.
#[derive(Clone)]
pub struct Database {
    store: Arc<dyn UserStore>,
}

impl Database {
    /// Connect to PostgreSQL.
    pub async fn new(database_url: &str) -> Result<Self> {
        let store = PgUserStore::connect(database_url).await?;
        Ok(Self::from_store(Arc::new(store)))
    }

    /// Process-local store; contents are lost on restart.
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(MemoryUserStore::new()))
    }

    pub fn from_store(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        self.store.run_migrations().await
    }

    pub fn store(&self) -> &dyn UserStore {
        self.store.as_ref()
    }
}
