use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use super::is_unique_violation;
use crate::auth::{hash_password, verify_password, CurrentUser};
use crate::config::AppConfig;
use crate::entities::{
    inspection, quality_improvement, user, user::ROLE_ADMIN, user::ROLE_USER, Inspection,
    QualityImprovement, User,
};
use crate::errors::ServiceError;

/// User listing entry for dropdown/filter use. Never exposes the hash.
#[derive(Debug, FromQueryResult, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
}

/// Account management and credential verification.
#[derive(Clone)]
pub struct UserService {
    db: Arc<DatabaseConnection>,
}

impl UserService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create an account with a one-way hashed password. Duplicate usernames
    /// are rejected whether caught by the pre-check or by the unique
    /// constraint under concurrency.
    #[instrument(skip(self, password))]
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: &str,
    ) -> Result<user::Model, ServiceError> {
        if role != ROLE_ADMIN && role != ROLE_USER {
            return Err(ServiceError::ValidationError(format!(
                "Unknown role '{}'",
                role
            )));
        }

        let existing = User::find()
            .filter(user::Column::Username.eq(username))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Username '{}' is already taken",
                username
            )));
        }

        let password_hash = hash_password(password)?;
        let row = user::ActiveModel {
            username: Set(username.to_owned()),
            password_hash: Set(password_hash),
            role: Set(role.to_owned()),
            last_login: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        match row.insert(&*self.db).await {
            Ok(model) => {
                info!("User created: {} ({})", model.username, model.role);
                Ok(model)
            }
            Err(err) if is_unique_violation(&err) => Err(ServiceError::Conflict(format!(
                "Username '{}' is already taken",
                username
            ))),
            Err(err) => Err(err.into()),
        }
    }

    /// Verify credentials for login. On success `last_login` is stamped
    /// best-effort: a failure there is logged and the login still succeeds.
    #[instrument(skip(self, password))]
    pub async fn verify_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<user::Model, ServiceError> {
        let Some(found) = User::find()
            .filter(user::Column::Username.eq(username))
            .one(&*self.db)
            .await?
        else {
            return Err(ServiceError::AuthError("Invalid credentials".to_string()));
        };

        if !verify_password(password, &found.password_hash) {
            return Err(ServiceError::AuthError("Invalid credentials".to_string()));
        }

        let mut active: user::ActiveModel = found.clone().into();
        active.last_login = Set(Some(Utc::now()));
        if let Err(err) = active.update(&*self.db).await {
            warn!("failed to record last_login for {}: {}", found.username, err);
        }

        Ok(found)
    }

    /// Replace the caller's password after verifying the current one.
    #[instrument(skip(self, current_password, new_password))]
    pub async fn change_password(
        &self,
        user_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ServiceError> {
        let found = self.get(user_id).await?;

        if !verify_password(current_password, &found.password_hash) {
            return Err(ServiceError::AuthError(
                "Current password is incorrect".to_string(),
            ));
        }

        let mut active: user::ActiveModel = found.into();
        active.password_hash = Set(hash_password(new_password)?);
        active.update(&*self.db).await?;
        Ok(())
    }

    pub async fn get(&self, user_id: i32) -> Result<user::Model, ServiceError> {
        User::find_by_id(user_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user_id)))
    }

    /// Fail unless the given user holds the admin role.
    pub async fn ensure_admin(&self, user_id: i32) -> Result<user::Model, ServiceError> {
        let found = self.get(user_id).await?;
        if !found.is_admin() {
            return Err(ServiceError::Forbidden(
                "Administrator privileges are required".to_string(),
            ));
        }
        Ok(found)
    }

    /// All users ordered by name, for dropdown/filter use.
    pub async fn list(&self) -> Result<Vec<UserSummary>, ServiceError> {
        User::find()
            .select_only()
            .column(user::Column::Id)
            .column(user::Column::Username)
            .order_by_asc(user::Column::Username)
            .into_model::<UserSummary>()
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Admin-only deletion. Blocked while the target still owns inspections
    /// or quality-improvement records, and for the caller's own account.
    #[instrument(skip(self))]
    pub async fn delete_user(
        &self,
        current: &CurrentUser,
        target_id: i32,
    ) -> Result<(), ServiceError> {
        self.ensure_admin(current.user_id).await?;

        if current.user_id == target_id {
            return Err(ServiceError::ValidationError(
                "You cannot delete your own account".to_string(),
            ));
        }

        let target = self.get(target_id).await?;

        let owned_inspections = Inspection::find()
            .filter(inspection::Column::UserId.eq(target_id))
            .count(&*self.db)
            .await?;
        let owned_quality = QualityImprovement::find()
            .filter(quality_improvement::Column::UserId.eq(target_id))
            .count(&*self.db)
            .await?;
        if owned_inspections > 0 || owned_quality > 0 {
            return Err(ServiceError::Conflict(
                "User still owns inspection or quality-improvement records".to_string(),
            ));
        }

        let username = target.username.clone();
        target.delete(&*self.db).await?;
        info!("User deleted: {}", username);
        Ok(())
    }

    /// Create the configured administrator account when it does not exist
    /// yet. Called once at startup.
    pub async fn seed_admin(&self, cfg: &AppConfig) -> Result<(), ServiceError> {
        let Some(password) = cfg.admin_password.as_deref() else {
            return Ok(());
        };

        let existing = User::find()
            .filter(user::Column::Username.eq(cfg.admin_username.as_str()))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Ok(());
        }

        self.create_user(&cfg.admin_username, password, ROLE_ADMIN)
            .await?;
        info!("Seeded administrator account '{}'", cfg.admin_username);
        Ok(())
    }
}
