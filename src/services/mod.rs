// Service exports
pub mod csv;
pub mod email;
pub mod storage;

pub use email::{EmailError, Mailer};
pub use storage::{JsonStore, StorageError};
