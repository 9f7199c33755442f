pub mod data;
pub mod envelope;

pub use data::{DataInput, DataResponse};
pub use envelope::Envelope;
