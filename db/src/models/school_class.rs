use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A homeroom class (rombel), e.g. `XII RPL 1`. Lives in the `classes` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    /// Grade level (10, 11, 12). Active schedule weeks are declared per grade.
    pub grade: i32,
    pub major_id: Option<i64>,
    pub homeroom_teacher_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::major::Entity",
        from = "Column::MajorId",
        to = "super::major::Column::Id",
        on_delete = "SetNull"
    )]
    Major,
    #[sea_orm(has_many = "super::class_student::Entity")]
    Students,
    #[sea_orm(has_many = "super::teaching_assignment::Entity")]
    TeachingAssignments,
}

impl Related<super::major::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Major.def()
    }
}

impl Related<super::class_student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl Related<super::teaching_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeachingAssignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C>(
        db: &C,
        name: &str,
        grade: i32,
        major_id: Option<i64>,
        homeroom_teacher_id: Option<i64>,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        ActiveModel {
            name: Set(name.to_owned()),
            grade: Set(grade),
            major_id: Set(major_id),
            homeroom_teacher_id: Set(homeroom_teacher_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }
}
