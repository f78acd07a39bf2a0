pub mod addresses;
pub mod contacts;
pub mod ownership;

pub use addresses::AddressService;
pub use contacts::ContactService;
