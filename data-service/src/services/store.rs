use crate::models::Data;
use async_trait::async_trait;
use service_core::error::AppError;

/// Access to the record collection.
///
/// Every operation is a single round trip on its own session; nothing is
/// batched or shared between callers.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Makes sure a usable connection exists, dialing if needed.
    async fn establish_session(&self) -> Result<(), AppError>;

    /// All records, in storage order. Empty collection yields an empty vec.
    async fn fetch_all(&self) -> Result<Vec<Data>, AppError>;

    /// Stores `record`, generating its id when absent, and returns it.
    async fn insert_one(&self, record: Data) -> Result<Data, AppError>;

    /// Drops every record. A database that does not exist is not an error.
    async fn drop_all(&self) -> Result<(), AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}
