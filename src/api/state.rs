use std::sync::Arc;

use crate::storage::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub bcrypt_cost: u32,
    pub cors_origin: Arc<str>,
}

impl AppState {
    pub fn new(db: Database, bcrypt_cost: u32, cors_origin: &str) -> Self {
        Self {
            db,
            bcrypt_cost,
            cors_origin: Arc::from(cors_origin),
        }
    }
}
