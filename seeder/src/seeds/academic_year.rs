use crate::seed::Seeder;
use db::models::academic_year::Model;
use sea_orm::{DatabaseConnection, DbErr};

pub struct AcademicYearSeeder;

#[async_trait::async_trait]
impl Seeder for AcademicYearSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        Model::create(db, "2024/2025", false).await?;
        Model::create(db, "2025/2026", true).await?;
        Ok(())
    }
}
