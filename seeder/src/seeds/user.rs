use crate::seed::Seeder;
use db::models::user::{Model, UserRole};
use fake::{Fake, faker::name::en::Name};
use sea_orm::{DatabaseConnection, DbErr};

pub struct UserSeeder;

pub const TEACHERS: usize = 8;
pub const STUDENTS_PER_CLASS: usize = 30;
pub const CLASSES: usize = 3;

#[async_trait::async_trait]
impl Seeder for UserSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        // Fixed accounts
        Model::create(db, "admin", "School Administrator", UserRole::Admin).await?;
        Model::create(db, "SPV01", "Industry Supervisor", UserRole::Supervisor).await?;

        for n in 1..=TEACHERS {
            let name: String = Name().fake();
            Model::create(db, &format!("T{n:03}"), &name, UserRole::Teacher).await?;
        }

        for n in 1..=STUDENTS_PER_CLASS * CLASSES {
            let name: String = Name().fake();
            Model::create(db, &format!("S{n:04}"), &name, UserRole::Student).await?;
        }
        Ok(())
    }
}
