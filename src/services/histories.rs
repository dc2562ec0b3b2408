use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::ParentType;
use crate::entities::{history, user, History};
use crate::errors::ServiceError;

/// History entry joined with the user who made the change.
#[derive(Debug, FromQueryResult, Serialize, ToSchema)]
pub struct HistoryRow {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub parent_type: String,
    pub parent_id: i32,
    pub action: String,
    pub created_at: DateTime<Utc>,
}

/// Read side of the audit log. Rows are written exclusively by the update
/// engines; there is no user-facing write path.
#[derive(Clone)]
pub struct HistoryService {
    db: Arc<DatabaseConnection>,
}

impl HistoryService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// History of one parent, newest first.
    pub async fn list(
        &self,
        parent: ParentType,
        parent_id: i32,
    ) -> Result<Vec<HistoryRow>, ServiceError> {
        History::find()
            .join(JoinType::InnerJoin, history::Relation::User.def())
            .column_as(user::Column::Username, "username")
            .filter(history::Column::ParentType.eq(parent.as_str()))
            .filter(history::Column::ParentId.eq(parent_id))
            .order_by_desc(history::Column::CreatedAt)
            .order_by_desc(history::Column::Id)
            .into_model::<HistoryRow>()
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }
}
