use crate::seed::Seeder;
use crate::seeds::user::STUDENTS_PER_CLASS;
use db::models::{
    academic_year, class_student, major,
    school_class::Model,
    user::{self, UserRole},
};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};

pub struct SchoolClassSeeder;

/// (name, grade, major code)
const CLASSES: [(&str, i32, &str); 3] = [
    ("X RPL 1", 10, "RPL"),
    ("XI TKJ 1", 11, "TKJ"),
    ("XII RPL 1", 12, "RPL"),
];

#[async_trait::async_trait]
impl Seeder for SchoolClassSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let Some(year) = academic_year::Model::find_active(db).await? else {
            return Err(DbErr::RecordNotFound("active academic year".into()));
        };

        let teachers = users_with_role(db, UserRole::Teacher).await?;
        let students = users_with_role(db, UserRole::Student).await?;
        let majors = major::Entity::find().all(db).await?;

        for (idx, (name, grade, major_code)) in CLASSES.into_iter().enumerate() {
            let major_id = majors.iter().find(|m| m.code == major_code).map(|m| m.id);
            let homeroom = teachers.get(idx).map(|t| t.id);
            let class = Model::create(db, name, grade, major_id, homeroom).await?;

            for student in students.iter().skip(idx * STUDENTS_PER_CLASS).take(STUDENTS_PER_CLASS) {
                class_student::Model::enroll(db, class.id, student.id, year.id).await?;
            }
        }
        Ok(())
    }
}

pub async fn users_with_role(db: &DatabaseConnection, role: UserRole) -> Result<Vec<user::Model>, DbErr> {
    user::Entity::find()
        .filter(user::Column::Role.eq(role))
        .order_by_asc(user::Column::Username)
        .all(db)
        .await
}
