pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state handed to every handler.
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub auth: auth::AuthService,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, cfg: config::AppConfig) -> Self {
        let auth = auth::AuthService::new(auth::AuthConfig {
            jwt_secret: cfg.jwt_secret.clone(),
            token_expiration: Duration::from_secs(cfg.jwt_expiration_secs),
        });
        let services = handlers::AppServices::new(db.clone());
        Self {
            db,
            config: cfg,
            auth,
            services,
        }
    }
}
