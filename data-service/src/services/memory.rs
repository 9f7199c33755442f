use crate::models::Data;
use crate::services::DataStore;
use async_trait::async_trait;
use service_core::error::AppError;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Process-local [`DataStore`] for tests and local runs without MongoDB.
///
/// Can be switched to refuse connections or to fail writes.
#[derive(Default)]
pub struct InMemoryStore {
    records: RwLock<Vec<Data>>,
    unreachable: AtomicBool,
    fail_writes: AtomicBool,
    sessions: AtomicU64,
    inserts: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `establish_session` always fails.
    pub fn unreachable() -> Self {
        let store = Self::new();
        store.set_reachable(false);
        store
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.unreachable.store(!reachable, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of `establish_session` calls so far, failed ones included.
    pub fn session_count(&self) -> u64 {
        self.sessions.load(Ordering::SeqCst)
    }

    /// Number of `insert_one` calls so far, failed ones included.
    pub fn insert_count(&self) -> u64 {
        self.inserts.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> Result<(), AppError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "in-memory store is unreachable"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DataStore for InMemoryStore {
    async fn establish_session(&self) -> Result<(), AppError> {
        self.sessions.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()
    }

    async fn fetch_all(&self) -> Result<Vec<Data>, AppError> {
        self.check_reachable()?;
        Ok(self.records.read().await.clone())
    }

    async fn insert_one(&self, mut record: Data) -> Result<Data, AppError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "in-memory store rejected the write"
            )));
        }

        let id = record.ensure_id();
        let mut records = self.records.write().await;
        if records.iter().any(|existing| existing.id == Some(id)) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "duplicate key: _id {}",
                id
            )));
        }
        records.push(record.clone());
        Ok(record)
    }

    async fn drop_all(&self) -> Result<(), AppError> {
        self.check_reachable()?;
        self.records.write().await.clear();
        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.check_reachable()
    }
}
