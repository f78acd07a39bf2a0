// handlers/protected/mod.rs - endpoints behind token authentication
//
// Every handler here receives the resolved `AuthUser` as an extension and
// passes it explicitly to the services.
pub mod addresses;
pub mod contacts;
pub mod users;
