mod account;
mod event;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "eventflow",
    "m0001",
    vec_box![],
    vec_box![
        account::CreateTable,
        account::CreateUk1,
        account::CreateUk2,
        event::CreateTable,
        event::CreateIdx1,
        event::CreateIdx2
    ]
);
