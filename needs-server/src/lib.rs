pub mod api;
pub mod config;
pub mod error;
pub mod state;

pub use api::router;
pub use config::ServerConfig;
pub use error::{ApiError, ErrorResponse};
pub use state::AppState;
