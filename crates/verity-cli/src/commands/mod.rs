//! Command implementations.

pub mod demo;
pub mod health;
pub mod verify;

pub use self::demo::execute_demo;
pub use self::health::execute_health;
pub use self::verify::{build_request, execute_verify};
