pub mod service;
pub mod tracing;

pub use self::service::*;
pub use self::tracing::*;
