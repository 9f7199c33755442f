use crate::models::{random_payload, Data, PAYLOAD_LEN};
use crate::services::DataStore;
use service_core::error::AppError;

/// Clears the store and seeds it with one random record.
///
/// A failed drop is logged and does not stop the seeding.
pub async fn initialize_store(store: &dyn DataStore) -> Result<Data, AppError> {
    if let Err(e) = store.drop_all().await {
        tracing::warn!(error = %e, "Failed to drop database during initialization");
    }

    let seeded = store
        .insert_one(Data::new(random_payload(PAYLOAD_LEN)))
        .await
        .map_err(|e| {
            tracing::error!("Failed to seed initial record: {}", e);
            e
        })?;

    tracing::info!(id = ?seeded.id, "Store initialized with seed record");
    Ok(seeded)
}
