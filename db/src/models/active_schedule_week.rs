use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::schedule::WeekType;

/// Which rotation week is in force for a grade level during an academic year.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "active_schedule_weeks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub grade: i32,
    pub academic_year_id: i64,
    pub week_type: WeekType,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::academic_year::Entity",
        from = "Column::AcademicYearId",
        to = "super::academic_year::Column::Id",
        on_delete = "Cascade"
    )]
    AcademicYear,
}

impl Related<super::academic_year::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AcademicYear.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn find_for<C>(
        db: &C,
        grade: i32,
        academic_year_id: i64,
    ) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::Grade.eq(grade))
            .filter(Column::AcademicYearId.eq(academic_year_id))
            .one(db)
            .await
    }
}
