pub mod data;
pub mod health;

pub use data::{get_data, post_data};
pub use health::{health_check, metrics_endpoint, readiness_check};
