//! Request Facade
//!
//! The remote-callable operations of the client directory: list all,
//! get by id, get by email, search, create, update and delete. Each call
//! is translated into client index operations and wrapped by the
//! invocation monitor.

mod directory;
mod errors;
mod ids;

pub use directory::{operation, ClientDirectory};
pub use errors::{ServiceError, ServiceResult};
pub use ids::IdGenerator;
