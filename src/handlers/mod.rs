pub mod auth;
pub mod comments;
pub mod common;
pub mod companies;
pub mod histories;
pub mod inspections;
pub mod quality;
pub mod users;

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::services::{
    comments::CommentService, histories::HistoryService, inspections::InspectionService,
    quality::QualityService, users::UserService,
};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub users: UserService,
    pub inspections: InspectionService,
    pub quality: QualityService,
    pub comments: CommentService,
    pub histories: HistoryService,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            users: UserService::new(db.clone()),
            inspections: InspectionService::new(db.clone()),
            quality: QualityService::new(db.clone()),
            comments: CommentService::new(db.clone()),
            histories: HistoryService::new(db),
        }
    }
}
