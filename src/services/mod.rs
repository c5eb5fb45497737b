pub mod log;
pub mod session;
pub mod store;

pub use log::*;
pub use session::*;
pub use store::*;
