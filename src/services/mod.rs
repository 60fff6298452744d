pub mod catalog;
pub mod email;

pub use catalog::{CatalogService, NewVideo};
pub use email::EmailService;
