pub mod dynamic_html;
pub mod handler;
pub mod registry;

pub use dynamic_html::*;
pub use handler::*;
pub use registry::*;
