pub mod database;
pub mod init;
pub mod memory;
pub mod metrics;
pub mod store;

pub use database::{DialError, MongoGateway, HEALTH_CHECK_TIMEOUT};
pub use init::initialize_store;
pub use memory::InMemoryStore;
pub use metrics::{get_metrics, init_metrics, record_operation};
pub use store::DataStore;
