use sea_query::{
    ColumnDef, Index, IndexCreateStatement, IndexDropStatement, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::Account;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Account::Table)
        .col(
            ColumnDef::new(Account::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(ColumnDef::new(Account::FullName).string().not_null())
        .col(
            ColumnDef::new(Account::Email)
                .string()
                .not_null()
                .string_len(320),
        )
        .col(ColumnDef::new(Account::PasswordHash).string().not_null())
        .col(
            ColumnDef::new(Account::MobileNumber)
                .string()
                .not_null()
                .string_len(15),
        )
        .col(
            ColumnDef::new(Account::ProfilePictureUrl)
                .string()
                .not_null(),
        )
        .col(
            ColumnDef::new(Account::CreatedEventIds)
                .text()
                .not_null()
                .default("[]"),
        )
        .col(
            ColumnDef::new(Account::AttendingEventIds)
                .text()
                .not_null()
                .default("[]"),
        )
        .col(ColumnDef::new(Account::CreatedAt).big_integer().not_null())
        .col(ColumnDef::new(Account::UpdatedAt).big_integer().not_null())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Account::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}

pub struct CreateUk1;

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateUk1 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        sqlx::query(
            r#"CREATE UNIQUE INDEX "uk_account_k3Qe8v" on "account" ("email" COLLATE NOCASE)"#,
        )
        .execute(connection)
        .await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        sqlx::query(r#"DROP INDEX "uk_account_k3Qe8v""#)
            .execute(connection)
            .await?;

        Ok(())
    }
}

pub struct CreateUk2;

fn create_uk_2() -> IndexCreateStatement {
    Index::create()
        .name("uk_account_Zp4m1c")
        .table(Account::Table)
        .unique()
        .col(Account::MobileNumber)
        .to_owned()
}

fn drop_uk_2() -> IndexDropStatement {
    Index::drop()
        .name("uk_account_Zp4m1c")
        .table(Account::Table)
        .to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateUk2 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_uk_2().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_uk_2().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
