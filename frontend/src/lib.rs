pub mod api;
pub mod chart;
pub mod color;
pub mod components;
pub mod dom;
pub mod error;
pub mod filter;
pub mod forms;
pub mod model;
pub mod settings;
pub mod shell;

pub use error::{ClientError, Result};
