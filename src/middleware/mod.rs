mod config_gate;
mod cors;
mod error_handler;

pub use config_gate::require_credentials;
pub use cors::cors_layer;
pub use error_handler::log_errors;
