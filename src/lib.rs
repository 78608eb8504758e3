pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod repository;
pub mod routes;

pub use config::Config;
pub use context::AppContext;
pub use error::{AppError, AppResult};
