pub mod convert_handlers;
pub mod system_handlers;

pub use convert_handlers::*;
pub use system_handlers::*;
