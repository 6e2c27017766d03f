use crate::seed::Seeder;
use crate::seeds::school_class::users_with_role;
use chrono::NaiveTime;
use db::models::{
    academic_year, room,
    schedule::{self, DayOfWeek, WeekType},
    school_class, subject, teaching_assignment,
    user::UserRole,
};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};

pub struct ScheduleSeeder;

const DAYS: [DayOfWeek; 5] = [
    DayOfWeek::Monday,
    DayOfWeek::Tuesday,
    DayOfWeek::Wednesday,
    DayOfWeek::Thursday,
    DayOfWeek::Friday,
];

/// Two 90-minute blocks per day.
const BLOCKS: [(u32, u32, u32, u32); 2] = [(7, 30, 9, 0), (9, 15, 10, 45)];

#[async_trait::async_trait]
impl Seeder for ScheduleSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let Some(year) = academic_year::Model::find_active(db).await? else {
            return Err(DbErr::RecordNotFound("active academic year".into()));
        };
        let teachers = users_with_role(db, UserRole::Teacher).await?;
        let subjects = subject::Entity::find().all(db).await?;
        let rooms = room::Entity::find().all(db).await?;
        let classes = school_class::Entity::find().all(db).await?;
        if teachers.is_empty() || subjects.is_empty() {
            return Err(DbErr::RecordNotFound("teachers or subjects".into()));
        }

        for class in &classes {
            let mut assignments = Vec::with_capacity(subjects.len());
            for subject in &subjects {
                let teacher = &teachers[fastrand::usize(..teachers.len())];
                assignments.push(
                    teaching_assignment::Model::create(db, teacher.id, subject.id, class.id, year.id)
                        .await?,
                );
            }

            let mut slot = 0usize;
            for day in DAYS {
                for (sh, sm, eh, em) in BLOCKS {
                    let assignment = &assignments[slot % assignments.len()];
                    // Grade 12 alternates A/B weeks on its first block (external placement).
                    let week_type = match (class.grade, sh) {
                        (12, 7) if slot % 4 == 0 => WeekType::A,
                        (12, 7) => WeekType::B,
                        _ => WeekType::General,
                    };
                    let room_id = (!rooms.is_empty()).then(|| rooms[fastrand::usize(..rooms.len())].id);
                    schedule::Model::create(
                        db,
                        assignment.id,
                        day,
                        NaiveTime::from_hms_opt(sh, sm, 0).unwrap_or_default(),
                        NaiveTime::from_hms_opt(eh, em, 0).unwrap_or_default(),
                        week_type,
                        room_id,
                    )
                    .await?;
                    slot += 1;
                }
            }
        }
        Ok(())
    }
}
