pub mod address;
pub mod contact;
pub mod user;

pub use address::{Address, NewAddress};
pub use contact::{Contact, NewContact};
pub use user::{NewUser, User};
