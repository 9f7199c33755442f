use crate::config::MongoConfig;
use crate::models::Data;
use crate::services::DataStore;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    error::{Error as MongoError, ErrorKind},
    options::ClientOptions,
    Client as MongoClient, ClientSession, Collection,
};
use service_core::error::AppError;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

/// Server error code for "ns not found".
const NAMESPACE_NOT_FOUND: i32 = 26;

/// Upper bound on a health check, independent of the dial timeout.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum DialError {
    #[error("dial with configured addresses '{addrs}' failed: {source}")]
    Configured { addrs: String, source: MongoError },

    #[error("fallback dial to host '{host}' failed: {source}")]
    Host { host: String, source: MongoError },
}

/// MongoDB-backed [`DataStore`].
///
/// The driver client is dialed lazily and cached; each operation runs on a
/// fresh `ClientSession` that is released when the operation returns.
#[derive(Clone)]
pub struct MongoGateway {
    config: MongoConfig,
    client: Arc<RwLock<Option<MongoClient>>>,
}

impl MongoGateway {
    pub fn new(config: MongoConfig) -> Self {
        Self {
            config,
            client: Arc::new(RwLock::new(None)),
        }
    }

    /// Builds a gateway and dials it once.
    pub async fn connect(config: MongoConfig) -> Result<Self, AppError> {
        let gateway = Self::new(config);
        gateway.establish_session().await?;
        Ok(gateway)
    }

    pub fn config(&self) -> &MongoConfig {
        &self.config
    }

    /// First step: the full seed list, dial timeout and target database.
    async fn dial_with_info(&self) -> Result<MongoClient, MongoError> {
        let uri = format!(
            "mongodb://{}/{}",
            self.config.addr_list().join(","),
            self.config.database
        );
        let mut options = ClientOptions::parse(uri).await?;
        options.app_name = Some("data-service".to_string());
        options.connect_timeout = Some(self.config.dial_timeout);
        options.server_selection_timeout = Some(self.config.dial_timeout);
        options.default_database = Some(self.config.database.clone());

        let client = MongoClient::with_options(options)?;
        ping(&client).await?;
        Ok(client)
    }

    /// Second step: the bare host, still bounded by the dial timeout.
    async fn dial_host(&self) -> Result<MongoClient, MongoError> {
        let mut options = ClientOptions::parse(format!("mongodb://{}", self.config.host)).await?;
        options.connect_timeout = Some(self.config.dial_timeout);
        options.server_selection_timeout = Some(self.config.dial_timeout);
        let client = MongoClient::with_options(options)?;
        ping(&client).await?;
        Ok(client)
    }

    async fn dial(&self) -> Result<MongoClient, DialError> {
        tracing::info!(addrs = %self.config.addrs, "Connecting to MongoDB");
        let primary = match self.dial_with_info().await {
            Ok(client) => return Ok(client),
            Err(source) => DialError::Configured {
                addrs: self.config.addrs.clone(),
                source,
            },
        };
        tracing::warn!(error = %primary, host = %self.config.host, "Falling back to bare host dial");

        self.dial_host().await.map_err(|source| DialError::Host {
            host: self.config.host.clone(),
            source,
        })
    }

    async fn client(&self) -> Result<MongoClient, AppError> {
        let cached = self.client.read().await.clone();
        if let Some(client) = cached {
            return Ok(client);
        }
        self.establish_session().await?;
        self.client
            .read()
            .await
            .clone()
            .ok_or(AppError::ServiceUnavailable)
    }

    /// The records collection together with a fresh session on it.
    async fn session(&self) -> Result<(Collection<Data>, ClientSession), AppError> {
        let client = self.client().await?;
        let session = client.start_session(None).await.map_err(|e| {
            tracing::error!("Failed to start MongoDB session: {}", e);
            AppError::from(e)
        })?;
        let collection = client
            .database(&self.config.database)
            .collection(&self.config.collection);
        Ok((collection, session))
    }
}

async fn ping(client: &MongoClient) -> Result<(), MongoError> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 }, None)
        .await?;
    Ok(())
}

fn is_namespace_not_found(err: &MongoError) -> bool {
    matches!(err.kind.as_ref(), ErrorKind::Command(cmd) if cmd.code == NAMESPACE_NOT_FOUND)
}

#[async_trait]
impl DataStore for MongoGateway {
    async fn establish_session(&self) -> Result<(), AppError> {
        let cached = self.client.read().await.clone();
        if let Some(client) = cached {
            match ping(&client).await {
                Ok(()) => return Ok(()),
                Err(e) => tracing::warn!(error = %e, "Cached MongoDB client failed ping, re-dialing"),
            }
        }

        let client = self.dial().await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::DatabaseError(anyhow::Error::new(e))
        })?;
        *self.client.write().await = Some(client);

        tracing::debug!(database = %self.config.database, "MongoDB session established");
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<Data>, AppError> {
        let (collection, mut session) = self.session().await?;

        let mut cursor = collection
            .find_with_session(doc! {}, None, &mut session)
            .await
            .map_err(|e| {
                tracing::error!("Failed to query records: {}", e);
                AppError::from(e)
            })?;

        let records: Vec<Data> = cursor.stream(&mut session).try_collect().await.map_err(|e| {
            tracing::error!("Failed to collect records: {}", e);
            AppError::from(e)
        })?;

        Ok(records)
    }

    async fn insert_one(&self, mut record: Data) -> Result<Data, AppError> {
        let (collection, mut session) = self.session().await?;
        record.ensure_id();

        collection
            .insert_one_with_session(&record, None, &mut session)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert record: {}", e);
                AppError::from(e)
            })?;

        Ok(record)
    }

    async fn drop_all(&self) -> Result<(), AppError> {
        let client = self.client().await?;
        match client.database(&self.config.database).drop(None).await {
            Ok(()) => Ok(()),
            Err(e) if is_namespace_not_found(&e) => Ok(()),
            Err(e) => {
                tracing::error!("Failed to drop database {}: {}", self.config.database, e);
                Err(AppError::from(e))
            }
        }
    }

    async fn health_check(&self) -> Result<(), AppError> {
        let check = async {
            let client = self.client().await?;
            ping(&client).await.map_err(AppError::from)
        };

        match tokio::time::timeout(HEALTH_CHECK_TIMEOUT, check).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                tracing::error!("MongoDB health check failed: {}", e);
                Err(e)
            }
            Err(_) => {
                tracing::error!(timeout = ?HEALTH_CHECK_TIMEOUT, "MongoDB health check timed out");
                Err(AppError::ServiceUnavailable)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn invalid_uri_error() -> MongoError {
        ClientOptions::parse("not-a-mongodb-uri").await.unwrap_err()
    }

    #[tokio::test]
    async fn test_dial_errors_are_distinct() {
        let configured = DialError::Configured {
            addrs: "localhost:27017".to_string(),
            source: invalid_uri_error().await,
        };
        let host = DialError::Host {
            host: "localhost".to_string(),
            source: invalid_uri_error().await,
        };

        assert!(configured
            .to_string()
            .starts_with("dial with configured addresses 'localhost:27017'"));
        assert!(host.to_string().starts_with("fallback dial to host 'localhost'"));
    }

    #[tokio::test]
    async fn test_other_errors_are_not_namespace_not_found() {
        assert!(!is_namespace_not_found(&invalid_uri_error().await));
    }

    #[test]
    fn test_new_gateway_is_not_dialed() {
        let gateway = MongoGateway::new(MongoConfig::default());
        assert_eq!(gateway.config().database, "context");
        assert!(gateway.client.try_read().unwrap().is_none());
    }
}
