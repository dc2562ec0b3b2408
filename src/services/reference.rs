//! Get-or-create resolution of reference entities by natural key. Both
//! helpers are generic over the connection so they run inside the caller's
//! transaction: a failure after the speculative insert rolls the reference
//! row back together with the dependent record.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use super::is_unique_violation;
use crate::entities::{company, product, Company, Product};
use crate::errors::ServiceError;

/// Resolve a company by name, creating it when unseen. Concurrent creations
/// of the same name race on the unique constraint; the loser re-selects the
/// winner's row instead of failing the request.
pub async fn resolve_or_create_company<C>(conn: &C, name: &str) -> Result<i32, ServiceError>
where
    C: ConnectionTrait + TransactionTrait,
{
    if let Some(existing) = Company::find()
        .filter(company::Column::CompanyName.eq(name))
        .one(conn)
        .await?
    {
        return Ok(existing.id);
    }

    // The speculative insert runs in a savepoint so a lost race leaves the
    // enclosing transaction usable for the retry lookup.
    let savepoint = conn.begin().await?;
    let inserted = company::ActiveModel {
        company_name: Set(name.to_owned()),
        ..Default::default()
    }
    .insert(&savepoint)
    .await;

    match inserted {
        Ok(created) => {
            savepoint.commit().await?;
            Ok(created.id)
        }
        Err(err) if is_unique_violation(&err) => {
            savepoint.rollback().await?;
            Company::find()
                .filter(company::Column::CompanyName.eq(name))
                .one(conn)
                .await?
                .map(|winner| winner.id)
                .ok_or(ServiceError::DatabaseError(err))
        }
        Err(err) => {
            savepoint.rollback().await?;
            Err(err.into())
        }
    }
}

/// Resolve a product by code, creating it (with the given display name) when
/// unseen. Same race policy as companies.
pub async fn resolve_or_create_product<C>(
    conn: &C,
    code: &str,
    name: &str,
) -> Result<i32, ServiceError>
where
    C: ConnectionTrait + TransactionTrait,
{
    if let Some(existing) = Product::find()
        .filter(product::Column::ProductCode.eq(code))
        .one(conn)
        .await?
    {
        return Ok(existing.id);
    }

    let savepoint = conn.begin().await?;
    let inserted = product::ActiveModel {
        product_code: Set(code.to_owned()),
        product_name: Set(name.to_owned()),
        ..Default::default()
    }
    .insert(&savepoint)
    .await;

    match inserted {
        Ok(created) => {
            savepoint.commit().await?;
            Ok(created.id)
        }
        Err(err) if is_unique_violation(&err) => {
            savepoint.rollback().await?;
            Product::find()
                .filter(product::Column::ProductCode.eq(code))
                .one(conn)
                .await?
                .map(|winner| winner.id)
                .ok_or(ServiceError::DatabaseError(err))
        }
        Err(err) => {
            savepoint.rollback().await?;
            Err(err.into())
        }
    }
}

/// Companies ordered by name, for filter dropdowns.
pub async fn list_companies(db: &DatabaseConnection) -> Result<Vec<company::Model>, ServiceError> {
    Company::find()
        .order_by_asc(company::Column::CompanyName)
        .all(db)
        .await
        .map_err(Into::into)
}
