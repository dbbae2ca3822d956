use std::sync::Arc;

use clipshelf::{AppConfig, Catalog};

pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Catalog,
}
