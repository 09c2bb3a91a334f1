//! Terminal front end for the wizard.

mod app;
mod screens;

pub use app::{App, run};
pub use screens::HomeScreen;
