use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Enrolment of a student in a class for one academic year.
///
/// The primary key is (student, academic year): a student sits in exactly one class per year.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "class_students")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub student_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub academic_year_id: i64,
    pub class_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::school_class::Entity",
        from = "Column::ClassId",
        to = "super::school_class::Column::Id",
        on_delete = "Cascade"
    )]
    Class,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::school_class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn enroll<C>(
        db: &C,
        class_id: i64,
        student_id: i64,
        academic_year_id: i64,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        ActiveModel {
            student_id: Set(student_id),
            academic_year_id: Set(academic_year_id),
            class_id: Set(class_id),
        }
        .insert(db)
        .await
    }

    pub async fn is_enrolled<C>(
        db: &C,
        class_id: i64,
        student_id: i64,
        academic_year_id: i64,
    ) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let found = Entity::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::AcademicYearId.eq(academic_year_id))
            .one(db)
            .await?;
        Ok(found.is_some())
    }

    /// Student ids enrolled in a class for the given year.
    pub async fn student_ids<C>(
        db: &C,
        class_id: i64,
        academic_year_id: i64,
    ) -> Result<Vec<i64>, DbErr>
    where
        C: ConnectionTrait,
    {
        let rows = Entity::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::AcademicYearId.eq(academic_year_id))
            .all(db)
            .await?;
        Ok(rows.into_iter().map(|r| r.student_id).collect())
    }
}
