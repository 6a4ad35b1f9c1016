//! Migration to create user_organizations link table

use sea_orm_migration::prelude::*;

use super::m20260801_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserOrganizations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserOrganizations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserOrganizations::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserOrganizations::OrganizationId)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_organizations_user")
                            .from(UserOrganizations::Table, UserOrganizations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_organizations_organization_id")
                    .table(UserOrganizations::Table)
                    .col(UserOrganizations::OrganizationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserOrganizations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum UserOrganizations {
    Table,
    Id,
    UserId,
    OrganizationId,
}
