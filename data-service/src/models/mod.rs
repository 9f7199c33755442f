pub mod data;

pub use data::{random_payload, Data, PAYLOAD_LEN};
