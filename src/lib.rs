use std::sync::Arc;

use cache::SessionStore;
use config::Config;
use telegram::Messenger;
use utils::Clock;

pub mod cache;
pub mod config;
pub mod error;
pub mod form;
pub mod middleware;
pub mod result;
pub mod router;
pub mod routes;
pub mod telegram;
pub mod utils;
pub mod validation;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<dyn SessionStore>,
    pub messenger: Arc<dyn Messenger>,
    pub clock: Arc<dyn Clock>,
}
