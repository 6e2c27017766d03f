use crate::seed::Seeder;
use chrono::Utc;
use db::models::{academic_year, active_schedule_week, schedule::WeekType};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};

pub struct ActiveWeekSeeder;

#[async_trait::async_trait]
impl Seeder for ActiveWeekSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let Some(year) = academic_year::Model::find_active(db).await? else {
            return Err(DbErr::RecordNotFound("active academic year".into()));
        };

        for (grade, week_type) in [(10, WeekType::General), (11, WeekType::General), (12, WeekType::A)] {
            active_schedule_week::ActiveModel {
                grade: Set(grade),
                academic_year_id: Set(year.id),
                week_type: Set(week_type),
                updated_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        Ok(())
    }
}
