use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users_table::Migration),
            Box::new(m20250101_000002_create_companies_table::Migration),
            Box::new(m20250101_000003_create_products_table::Migration),
            Box::new(m20250101_000004_create_inspections_table::Migration),
            Box::new(m20250101_000005_create_quality_improvements_table::Migration),
            Box::new(m20250101_000006_create_comments_table::Migration),
            Box::new(m20250101_000007_create_histories_table::Migration),
        ]
    }
}

// Migration implementations

mod m20250101_000001_create_users_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Users::Username)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(
                            ColumnDef::new(Users::Role)
                                .string()
                                .not_null()
                                .default("user"),
                        )
                        .col(ColumnDef::new(Users::LastLogin).timestamp_with_time_zone().null())
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        Username,
        PasswordHash,
        Role,
        LastLogin,
        CreatedAt,
    }
}

mod m20250101_000002_create_companies_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000002_create_companies_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Companies::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Companies::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Companies::CompanyName)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Companies::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Companies {
        Table,
        Id,
        CompanyName,
    }
}

mod m20250101_000003_create_products_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000003_create_products_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Products::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Products::ProductCode)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Products::ProductName).string().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Products {
        Table,
        Id,
        ProductCode,
        ProductName,
    }
}

mod m20250101_000004_create_inspections_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000004_create_inspections_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Inspections::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Inspections::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Inspections::UserId).integer().not_null())
                        .col(ColumnDef::new(Inspections::CompanyId).integer().not_null())
                        .col(ColumnDef::new(Inspections::ProductId).integer().not_null())
                        .col(
                            ColumnDef::new(Inspections::InspectedQuantity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Inspections::DefectiveQuantity)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Inspections::ActionedQuantity).integer().null())
                        .col(ColumnDef::new(Inspections::DefectReason).string().null())
                        .col(ColumnDef::new(Inspections::Solution).string().null())
                        .col(ColumnDef::new(Inspections::TargetDate).date().null())
                        .col(
                            ColumnDef::new(Inspections::ProgressPercentage)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Inspections::Status)
                                .string()
                                .not_null()
                                .default("inProgress"),
                        )
                        .col(ColumnDef::new(Inspections::ImagePath).string().null())
                        .col(ColumnDef::new(Inspections::ExcelPath).string().null())
                        .col(
                            ColumnDef::new(Inspections::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Inspections::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_inspections_user")
                                .from(Inspections::Table, Inspections::UserId)
                                .to(Users::Table, Users::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_inspections_company")
                                .from(Inspections::Table, Inspections::CompanyId)
                                .to(Companies::Table, Companies::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_inspections_product")
                                .from(Inspections::Table, Inspections::ProductId)
                                .to(Products::Table, Products::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Inspections::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Inspections {
        Table,
        Id,
        UserId,
        CompanyId,
        ProductId,
        InspectedQuantity,
        DefectiveQuantity,
        ActionedQuantity,
        DefectReason,
        Solution,
        TargetDate,
        ProgressPercentage,
        Status,
        ImagePath,
        ExcelPath,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Companies {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Products {
        Table,
        Id,
    }
}

mod m20250101_000005_create_quality_improvements_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000005_create_quality_improvements_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(QualityImprovements::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(QualityImprovements::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(QualityImprovements::UserId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(QualityImprovements::CompanyId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(QualityImprovements::ItemDescription)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(QualityImprovements::StartDate).date().null())
                        .col(ColumnDef::new(QualityImprovements::EndDate).date().null())
                        .col(
                            ColumnDef::new(QualityImprovements::Progress)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(QualityImprovements::Status)
                                .string()
                                .not_null()
                                .default("inProgress"),
                        )
                        .col(
                            ColumnDef::new(QualityImprovements::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(QualityImprovements::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_quality_improvements_user")
                                .from(QualityImprovements::Table, QualityImprovements::UserId)
                                .to(Users::Table, Users::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_quality_improvements_company")
                                .from(QualityImprovements::Table, QualityImprovements::CompanyId)
                                .to(Companies::Table, Companies::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(QualityImprovements::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum QualityImprovements {
        Table,
        Id,
        UserId,
        CompanyId,
        ItemDescription,
        StartDate,
        EndDate,
        Progress,
        Status,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Companies {
        Table,
        Id,
    }
}

mod m20250101_000006_create_comments_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000006_create_comments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // No FK on (parent_type, parent_id): the parent is polymorphic and
            // comment creation intentionally skips a parent-existence check.
            manager
                .create_table(
                    Table::create()
                        .table(Comments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Comments::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Comments::UserId).integer().not_null())
                        .col(ColumnDef::new(Comments::ParentType).string().not_null())
                        .col(ColumnDef::new(Comments::ParentId).integer().not_null())
                        .col(ColumnDef::new(Comments::Content).text().not_null())
                        .col(
                            ColumnDef::new(Comments::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Comments::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_comments_user")
                                .from(Comments::Table, Comments::UserId)
                                .to(Users::Table, Users::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_comments_parent")
                        .table(Comments::Table)
                        .col(Comments::ParentType)
                        .col(Comments::ParentId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Comments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Comments {
        Table,
        Id,
        UserId,
        ParentType,
        ParentId,
        Content,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
    }
}

mod m20250101_000007_create_histories_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000007_create_histories_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Histories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Histories::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Histories::UserId).integer().not_null())
                        .col(ColumnDef::new(Histories::ParentType).string().not_null())
                        .col(ColumnDef::new(Histories::ParentId).integer().not_null())
                        .col(ColumnDef::new(Histories::Action).text().not_null())
                        .col(
                            ColumnDef::new(Histories::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_histories_user")
                                .from(Histories::Table, Histories::UserId)
                                .to(Users::Table, Users::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_histories_parent")
                        .table(Histories::Table)
                        .col(Histories::ParentType)
                        .col(Histories::ParentId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Histories::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Histories {
        Table,
        Id,
        UserId,
        ParentType,
        ParentId,
        Action,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
    }
}
