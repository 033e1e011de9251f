pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod forms;
pub mod graphql;
pub mod models;
pub mod route;
pub mod session;
pub mod sync;
pub mod tree;
pub mod ui;

pub use error::{AppError, Result};
