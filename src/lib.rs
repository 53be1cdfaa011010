pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod forms;
pub mod http;
pub mod models;
pub mod navigation;
pub mod notify;
pub mod screens;
pub mod services;
pub mod session;

pub use app::Backoffice;
pub use error::{ClientError, ClientResult};
