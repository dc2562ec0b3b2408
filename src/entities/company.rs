use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reference entity created lazily the first time an inspection or
/// quality-improvement item names a company.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Natural key
    #[sea_orm(unique)]
    pub company_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::inspection::Entity")]
    Inspections,
    #[sea_orm(has_many = "super::quality_improvement::Entity")]
    QualityImprovements,
}

impl Related<super::inspection::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inspections.def()
    }
}

impl Related<super::quality_improvement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QualityImprovements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
