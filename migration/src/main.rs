// migration/src/main.rs

use migration::Migrator;
use sea_orm_migration::prelude::*;

// sea-orm-migration の CLI は非同期ランタイムが必要なため async-std を使用
#[async_std::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
