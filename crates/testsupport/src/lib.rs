pub mod http_client;
pub mod server;

pub use http_client::*;
pub use server::*;
