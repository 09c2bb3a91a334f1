//! Screen rendering and input handling.

mod form;
mod home;
pub mod success;

pub use form::FormScreen;
pub use home::HomeScreen;
