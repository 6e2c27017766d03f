//! Academic configuration read by the attendance and journal rules: the active
//! academic year and the per-grade active schedule week.

use chrono::Utc;
use db::models::academic_year::{self, Entity as AcademicYear};
use db::models::active_schedule_week::{self, Entity as ActiveScheduleWeek};
use db::models::schedule::WeekType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use sea_orm::sea_query::Expr;

use crate::error::{is_unique_violation, AppError};

/// The single active academic year.
pub async fn active_academic_year<C>(db: &C) -> Result<academic_year::Model, AppError>
where
    C: ConnectionTrait,
{
    academic_year::Model::find_active(db)
        .await?
        .ok_or_else(|| AppError::not_found("No active academic year"))
}

pub async fn list_academic_years<C>(db: &C) -> Result<Vec<academic_year::Model>, AppError>
where
    C: ConnectionTrait,
{
    Ok(AcademicYear::find()
        .order_by_desc(academic_year::Column::Name)
        .all(db)
        .await?)
}

/// Creates an inactive year. Names are unique.
pub async fn create_academic_year<C>(db: &C, name: &str) -> Result<academic_year::Model, AppError>
where
    C: ConnectionTrait,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::invalid("Academic year name is required"));
    }

    match academic_year::Model::create(db, name, false).await {
        Ok(year) => {
            tracing::info!(year_id = year.id, name = %year.name, "Academic year created");
            Ok(year)
        }
        Err(e) if is_unique_violation(&e) => Err(AppError::conflict(format!(
            "Academic year {name} already exists"
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Makes `year_id` the only active year.
pub async fn activate_academic_year(
    db: &DatabaseConnection,
    year_id: i64,
) -> Result<academic_year::Model, AppError> {
    let txn = db.begin().await?;

    let Some(year) = AcademicYear::find_by_id(year_id).one(&txn).await? else {
        return Err(AppError::not_found(format!(
            "Academic year {year_id} not found"
        )));
    };

    AcademicYear::update_many()
        .col_expr(academic_year::Column::Active, Expr::value(false))
        .filter(academic_year::Column::Active.eq(true))
        .exec(&txn)
        .await?;

    let mut active = year.into_active_model();
    active.active = Set(true);
    let year = active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(year_id = year.id, name = %year.name, "Academic year activated");
    Ok(year)
}

pub async fn active_week_for<C>(
    db: &C,
    grade: i32,
    academic_year_id: i64,
) -> Result<Option<active_schedule_week::Model>, AppError>
where
    C: ConnectionTrait,
{
    Ok(active_schedule_week::Model::find_for(db, grade, academic_year_id).await?)
}

/// Declares which rotation week is in force for `grade` in the active year.
pub async fn set_active_week<C>(
    db: &C,
    grade: i32,
    week_type: WeekType,
) -> Result<active_schedule_week::Model, AppError>
where
    C: ConnectionTrait,
{
    if grade <= 0 {
        return Err(AppError::invalid("Grade must be a positive number"));
    }
    let year = active_academic_year(db).await?;

    let saved = match active_schedule_week::Model::find_for(db, grade, year.id).await? {
        Some(existing) => {
            let mut active = existing.into_active_model();
            active.week_type = Set(week_type);
            active.updated_at = Set(Utc::now());
            active.update(db).await?
        }
        None => {
            active_schedule_week::ActiveModel {
                grade: Set(grade),
                academic_year_id: Set(year.id),
                week_type: Set(week_type),
                updated_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(db)
            .await?
        }
    };

    tracing::info!(grade, week_type = %week_type, year_id = year.id, "Active week set");
    Ok(saved)
}

pub async fn list_active_weeks<C>(db: &C) -> Result<Vec<active_schedule_week::Model>, AppError>
where
    C: ConnectionTrait,
{
    let year = active_academic_year(db).await?;
    Ok(ActiveScheduleWeek::find()
        .filter(active_schedule_week::Column::AcademicYearId.eq(year.id))
        .order_by_asc(active_schedule_week::Column::Grade)
        .all(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::test_utils::setup_test_db;

    #[tokio::test]
    async fn no_active_year_is_not_found() {
        let db = setup_test_db().await;
        let err = active_academic_year(&db).await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    #[tokio::test]
    async fn activation_is_exclusive() {
        let db = setup_test_db().await;
        let first = academic_year::Model::create(&db, "2024/2025", true).await.unwrap();
        let second = create_academic_year(&db, "2025/2026").await.unwrap();
        assert!(!second.active);

        activate_academic_year(&db, second.id).await.unwrap();

        let years = list_academic_years(&db).await.unwrap();
        let active: Vec<_> = years.iter().filter(|y| y.active).map(|y| y.id).collect();
        assert_eq!(active, vec![second.id]);
        assert_eq!(active_academic_year(&db).await.unwrap().id, second.id);
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn activating_unknown_year_fails_and_keeps_current() {
        let db = setup_test_db().await;
        let year = academic_year::Model::create(&db, "2025/2026", true).await.unwrap();

        let err = activate_academic_year(&db, 999).await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
        assert_eq!(active_academic_year(&db).await.unwrap().id, year.id);
    }

    #[tokio::test]
    async fn duplicate_year_name_conflicts() {
        let db = setup_test_db().await;
        create_academic_year(&db, "2025/2026").await.unwrap();
        let err = create_academic_year(&db, " 2025/2026 ").await.unwrap_err();
        assert_eq!(err.kind(), "conflict");
    }

    #[tokio::test]
    async fn set_active_week_upserts_per_grade() {
        let db = setup_test_db().await;
        let year = academic_year::Model::create(&db, "2025/2026", true).await.unwrap();

        let a = set_active_week(&db, 12, WeekType::A).await.unwrap();
        let b = set_active_week(&db, 12, WeekType::B).await.unwrap();
        set_active_week(&db, 10, WeekType::General).await.unwrap();

        assert_eq!(a.id, b.id);
        let week = active_week_for(&db, 12, year.id).await.unwrap().unwrap();
        assert_eq!(week.week_type, WeekType::B);

        let grades: Vec<_> = list_active_weeks(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|w| w.grade)
            .collect();
        assert_eq!(grades, vec![10, 12]);
    }
}
