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
    company, inspection, inspection::STATUS_IN_PROGRESS, product, user, Inspection,
};
use crate::errors::ServiceError;

/// New inspection, after handler-level validation. Company and product are
/// referenced by natural key and created lazily.
#[derive(Debug, Clone)]
pub struct CreateInspectionInput {
    pub company_name: String,
    pub product_name: String,
    pub product_code: String,
    pub inspected_quantity: i32,
    pub defective_quantity: i32,
    pub actioned_quantity: Option<i32>,
    pub defect_reason: Option<String>,
    pub solution: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub progress_percentage: Option<i32>,
    pub status: Option<String>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateInspectionInput {
    pub inspected_quantity: Option<i32>,
    pub defective_quantity: Option<i32>,
    pub actioned_quantity: Option<i32>,
    pub defect_reason: Option<String>,
    pub solution: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub progress_percentage: Option<i32>,
    pub status: Option<String>,
}

impl UpdateInspectionInput {
    pub fn is_empty(&self) -> bool {
        self.inspected_quantity.is_none()
            && self.defective_quantity.is_none()
            && self.actioned_quantity.is_none()
            && self.defect_reason.is_none()
            && self.solution.is_none()
            && self.target_date.is_none()
            && self.progress_percentage.is_none()
            && self.status.is_none()
    }
}

/// Inspection row joined with its author, company and product for listing.
#[derive(Debug, FromQueryResult, Serialize, ToSchema)]
pub struct InspectionRow {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub company_name: String,
    pub product_name: String,
    pub product_code: String,
    pub inspected_quantity: i32,
    pub defective_quantity: i32,
    pub actioned_quantity: Option<i32>,
    pub defect_reason: Option<String>,
    pub solution: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub progress_percentage: i32,
    pub status: String,
    pub image_path: Option<String>,
    pub excel_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct InspectionService {
    db: Arc<DatabaseConnection>,
}

impl InspectionService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create an inspection. Company and product resolution runs inside the
    /// same transaction as the insert, so a failure downstream also rolls
    /// back a speculatively created reference row.
    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        current: &CurrentUser,
        input: CreateInspectionInput,
    ) -> Result<inspection::Model, ServiceError> {
        let txn = self.db.begin().await?;

        let company_id = reference::resolve_or_create_company(&txn, &input.company_name).await?;
        let product_id =
            reference::resolve_or_create_product(&txn, &input.product_code, &input.product_name)
                .await?;

        let now = Utc::now();
        let model = inspection::ActiveModel {
            user_id: Set(current.user_id),
            company_id: Set(company_id),
            product_id: Set(product_id),
            inspected_quantity: Set(input.inspected_quantity),
            defective_quantity: Set(input.defective_quantity),
            actioned_quantity: Set(input.actioned_quantity),
            defect_reason: Set(input.defect_reason),
            solution: Set(input.solution),
            target_date: Set(input.target_date),
            progress_percentage: Set(input.progress_percentage.unwrap_or(0)),
            status: Set(input
                .status
                .unwrap_or_else(|| STATUS_IN_PROGRESS.to_string())),
            image_path: Set(None),
            excel_path: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!("Inspection {} created by user {}", model.id, current.user_id);
        Ok(model)
    }

    fn joined() -> Select<Inspection> {
        Inspection::find()
            .join(JoinType::InnerJoin, inspection::Relation::User.def())
            .join(JoinType::InnerJoin, inspection::Relation::Company.def())
            .join(JoinType::InnerJoin, inspection::Relation::Product.def())
            .column_as(user::Column::Username, "username")
            .column_as(company::Column::CompanyName, "company_name")
            .column_as(product::Column::ProductName, "product_name")
            .column_as(product::Column::ProductCode, "product_code")
    }

    /// All inspections, newest first.
    pub async fn list(&self) -> Result<Vec<InspectionRow>, ServiceError> {
        Self::joined()
            .order_by_desc(inspection::Column::CreatedAt)
            .into_model::<InspectionRow>()
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Inspections authored by one user, newest first.
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<InspectionRow>, ServiceError> {
        Self::joined()
            .filter(inspection::Column::UserId.eq(user_id))
            .order_by_desc(inspection::Column::CreatedAt)
            .into_model::<InspectionRow>()
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    pub async fn get(&self, id: i32) -> Result<InspectionRow, ServiceError> {
        Self::joined()
            .filter(inspection::Column::Id.eq(id))
            .into_model::<InspectionRow>()
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Inspection {} not found", id)))
    }

    /// Owner-gated partial update. Each field whose display string actually
    /// changes yields one history row, committed atomically with the update.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        current: &CurrentUser,
        id: i32,
        input: UpdateInspectionInput,
    ) -> Result<inspection::Model, ServiceError> {
        if input.is_empty() {
            return Err(ServiceError::ValidationError(
                "No valid fields to update".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let model = Inspection::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Inspection {} not found", id)))?;

        ensure_owner(model.user_id, current)?;

        let mut changes = ChangeSet::default();
        let mut active: inspection::ActiveModel = model.clone().into();

        if let Some(value) = input.inspected_quantity {
            changes.compare("Inspected Quantity", &model.inspected_quantity, &value);
            active.inspected_quantity = Set(value);
        }
        if let Some(value) = input.defective_quantity {
            changes.compare("Defective Quantity", &model.defective_quantity, &value);
            active.defective_quantity = Set(value);
        }
        if let Some(value) = input.actioned_quantity {
            changes.compare("Actioned Quantity", &model.actioned_quantity, &value);
            active.actioned_quantity = Set(Some(value));
        }
        if let Some(value) = input.defect_reason {
            changes.compare("Defect Reason", &model.defect_reason, value.as_str());
            active.defect_reason = Set(Some(value));
        }
        if let Some(value) = input.solution {
            changes.compare("Solution", &model.solution, value.as_str());
            active.solution = Set(Some(value));
        }
        if let Some(value) = input.target_date {
            changes.compare("Target Date", &model.target_date, &value);
            active.target_date = Set(Some(value));
        }
        if let Some(value) = input.progress_percentage {
            changes.compare("Progress", &model.progress_percentage, &value);
            active.progress_percentage = Set(value);
        }
        if let Some(value) = input.status {
            changes.compare("Status", &model.status, value.as_str());
            active.status = Set(value);
        }

        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        changes
            .write_history(&txn, current.user_id, ParentType::Inspection, id)
            .await?;

        txn.commit().await?;

        info!(
            "Inspection {} updated by user {} ({} change(s))",
            id,
            current.user_id,
            changes.changes().len()
        );
        Ok(updated)
    }

    /// Owner-gated deletion.
    #[instrument(skip(self))]
    pub async fn delete(&self, current: &CurrentUser, id: i32) -> Result<(), ServiceError> {
        let model = Inspection::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Inspection {} not found", id)))?;

        ensure_owner(model.user_id, current)?;

        model.delete(&*self.db).await?;
        info!("Inspection {} deleted by user {}", id, current.user_id);
        Ok(())
    }
}
