// handlers/public/mod.rs - endpoints that do not require a token
//
// Registration and login are the only way to obtain a token.
pub mod users;

pub use users::{login, register};
