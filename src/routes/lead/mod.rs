mod handler;
pub mod model;

pub use handler::{SESSION_COOKIE, method_not_allowed, preflight, relay};
