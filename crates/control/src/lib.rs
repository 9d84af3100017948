pub mod concurrency;
pub mod dispatcher;
pub mod idle_watchdog;
pub mod instance_pool;

pub use concurrency::*;
pub use dispatcher::*;
pub use idle_watchdog::*;
pub use instance_pool::*;
