use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A quality inspection record. Owned by the creating user; only the owner
/// may update or delete it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inspections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Owner (author) of the record
    pub user_id: i32,

    pub company_id: i32,

    pub product_id: i32,

    pub inspected_quantity: i32,

    pub defective_quantity: i32,

    pub actioned_quantity: Option<i32>,

    pub defect_reason: Option<String>,

    pub solution: Option<String>,

    pub target_date: Option<NaiveDate>,

    /// 0-100
    pub progress_percentage: i32,

    /// Workflow state, e.g. "inProgress"
    pub status: String,

    /// Filename of an attached image, when one has been uploaded
    pub image_path: Option<String>,

    /// Filename of an attached spreadsheet
    pub excel_path: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id"
    )]
    Company,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub const STATUS_IN_PROGRESS: &str = "inProgress";
