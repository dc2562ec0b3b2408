use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    ModelTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
    TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

use super::audit::ChangeSet;
use super::{ensure_owner, reference, ParentType};
use crate::auth::CurrentUser;
use crate::entities::{
    company, inspection::STATUS_IN_PROGRESS, quality_improvement, user, QualityImprovement,
};
use crate::errors::ServiceError;

/// New quality-improvement item; the company is referenced by natural key.
#[derive(Debug, Clone)]
pub struct CreateQualityInput {
    pub company_name: String,
    pub item_description: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub progress: Option<i32>,
    pub status: Option<String>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateQualityInput {
    pub item_description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub progress: Option<i32>,
    pub status: Option<String>,
}

impl UpdateQualityInput {
    pub fn is_empty(&self) -> bool {
        self.item_description.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.progress.is_none()
            && self.status.is_none()
    }
}

/// Quality-improvement row joined with its author and company.
#[derive(Debug, FromQueryResult, Serialize, ToSchema)]
pub struct QualityRow {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub company_name: String,
    pub item_description: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub progress: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct QualityService {
    db: Arc<DatabaseConnection>,
}

impl QualityService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a quality-improvement item; company resolution shares the
    /// insert's transaction.
    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        current: &CurrentUser,
        input: CreateQualityInput,
    ) -> Result<quality_improvement::Model, ServiceError> {
        let txn = self.db.begin().await?;

        let company_id = reference::resolve_or_create_company(&txn, &input.company_name).await?;

        let now = Utc::now();
        let model = quality_improvement::ActiveModel {
            user_id: Set(current.user_id),
            company_id: Set(company_id),
            item_description: Set(input.item_description),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            progress: Set(input.progress.unwrap_or(0)),
            status: Set(input
                .status
                .unwrap_or_else(|| STATUS_IN_PROGRESS.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            "Quality improvement {} created by user {}",
            model.id, current.user_id
        );
        Ok(model)
    }

    fn joined() -> Select<QualityImprovement> {
        QualityImprovement::find()
            .join(JoinType::InnerJoin, quality_improvement::Relation::User.def())
            .join(
                JoinType::InnerJoin,
                quality_improvement::Relation::Company.def(),
            )
            .column_as(user::Column::Username, "username")
            .column_as(company::Column::CompanyName, "company_name")
    }

    /// All quality-improvement items, newest first.
    pub async fn list(&self) -> Result<Vec<QualityRow>, ServiceError> {
        Self::joined()
            .order_by_desc(quality_improvement::Column::CreatedAt)
            .into_model::<QualityRow>()
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Items authored by one user, newest first.
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<QualityRow>, ServiceError> {
        Self::joined()
            .filter(quality_improvement::Column::UserId.eq(user_id))
            .order_by_desc(quality_improvement::Column::CreatedAt)
            .into_model::<QualityRow>()
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    pub async fn get(&self, id: i32) -> Result<QualityRow, ServiceError> {
        Self::joined()
            .filter(quality_improvement::Column::Id.eq(id))
            .into_model::<QualityRow>()
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Quality improvement {} not found", id)))
    }

    /// Owner-gated audited update, same diff policy as inspections.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        current: &CurrentUser,
        id: i32,
        input: UpdateQualityInput,
    ) -> Result<quality_improvement::Model, ServiceError> {
        if input.is_empty() {
            return Err(ServiceError::ValidationError(
                "No valid fields to update".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let model = QualityImprovement::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Quality improvement {} not found", id))
            })?;

        ensure_owner(model.user_id, current)?;

        let mut changes = ChangeSet::default();
        let mut active: quality_improvement::ActiveModel = model.clone().into();

        if let Some(value) = input.item_description {
            changes.compare("Improvement Item", &model.item_description, value.as_str());
            active.item_description = Set(value);
        }
        if let Some(value) = input.start_date {
            changes.compare("Start Date", &model.start_date, &value);
            active.start_date = Set(Some(value));
        }
        if let Some(value) = input.end_date {
            changes.compare("End Date", &model.end_date, &value);
            active.end_date = Set(Some(value));
        }
        if let Some(value) = input.progress {
            changes.compare("Progress", &model.progress, &value);
            active.progress = Set(value);
        }
        if let Some(value) = input.status {
            changes.compare("Status", &model.status, value.as_str());
            active.status = Set(value);
        }

        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        changes
            .write_history(&txn, current.user_id, ParentType::Quality, id)
            .await?;

        txn.commit().await?;

        info!(
            "Quality improvement {} updated by user {} ({} change(s))",
            id,
            current.user_id,
            changes.changes().len()
        );
        Ok(updated)
    }

    /// Owner-gated deletion.
    #[instrument(skip(self))]
    pub async fn delete(&self, current: &CurrentUser, id: i32) -> Result<(), ServiceError> {
        let model = QualityImprovement::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Quality improvement {} not found", id))
            })?;

        ensure_owner(model.user_id, current)?;

        model.delete(&*self.db).await?;
        info!(
            "Quality improvement {} deleted by user {}",
            id, current.user_id
        );
        Ok(())
    }
}
