pub mod data_form;
pub mod session;

pub use data_form::DataForm;
pub use session::{session_middleware, DbHandle};
