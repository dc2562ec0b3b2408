use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    ModelTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

use super::{ensure_owner, ParentType};
use crate::auth::CurrentUser;
use crate::entities::{comment, user, Comment};
use crate::errors::ServiceError;

/// Comment joined with its author for listing.
#[derive(Debug, FromQueryResult, Serialize, ToSchema)]
pub struct CommentRow {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub parent_type: String,
    pub parent_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct CommentService {
    db: Arc<DatabaseConnection>,
}

impl CommentService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Append a comment to an inspection or quality-improvement item. The
    /// parent's existence is not verified; see DESIGN.md.
    #[instrument(skip(self, content))]
    pub async fn add(
        &self,
        current: &CurrentUser,
        parent: ParentType,
        parent_id: i32,
        content: String,
    ) -> Result<comment::Model, ServiceError> {
        let now = Utc::now();
        let model = comment::ActiveModel {
            user_id: Set(current.user_id),
            parent_type: Set(parent.as_str().to_owned()),
            parent_id: Set(parent_id),
            content: Set(content),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(
            "Comment {} added to {} {} by user {}",
            model.id, parent, parent_id, current.user_id
        );
        Ok(model)
    }

    /// Comments of one parent, oldest first.
    pub async fn list(
        &self,
        parent: ParentType,
        parent_id: i32,
    ) -> Result<Vec<CommentRow>, ServiceError> {
        Comment::find()
            .join(JoinType::InnerJoin, comment::Relation::User.def())
            .column_as(user::Column::Username, "username")
            .filter(comment::Column::ParentType.eq(parent.as_str()))
            .filter(comment::Column::ParentId.eq(parent_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .into_model::<CommentRow>()
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Author-only edit.
    #[instrument(skip(self, content))]
    pub async fn update(
        &self,
        current: &CurrentUser,
        id: i32,
        content: String,
    ) -> Result<comment::Model, ServiceError> {
        let model = Comment::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Comment {} not found", id)))?;

        ensure_owner(model.user_id, current)?;

        let mut active: comment::ActiveModel = model.into();
        active.content = Set(content);
        active.updated_at = Set(Utc::now());
        active.update(&*self.db).await.map_err(Into::into)
    }

    /// Author-only deletion.
    #[instrument(skip(self))]
    pub async fn delete(&self, current: &CurrentUser, id: i32) -> Result<(), ServiceError> {
        let model = Comment::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Comment {} not found", id)))?;

        ensure_owner(model.user_id, current)?;

        model.delete(&*self.db).await?;
        info!("Comment {} deleted by user {}", id, current.user_id);
        Ok(())
    }
}
