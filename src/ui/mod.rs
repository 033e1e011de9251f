//! GUI panels and application state.

pub mod app;
pub mod components;
pub mod department_panel;
pub mod dialogs;
pub mod landing;
pub mod login_panel;

pub use app::ConsoleApp;
