//! Database records, session and row helpers

pub mod accessor;
pub mod init;
pub mod models;
pub mod session;
pub mod value;

pub use accessor::*;
pub use init::*;
pub use models::*;
pub use session::*;
pub use value::*;
