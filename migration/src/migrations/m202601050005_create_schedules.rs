use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202601050005_create_schedules"
    }
}

fn week_type_col(name: &str) -> ColumnDef {
    ColumnDef::new(Alias::new(name))
        .enumeration(
            Alias::new("week_type"),
            vec![Alias::new("a"), Alias::new("b"), Alias::new("general")],
        )
        .not_null()
        .default("general")
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("teaching_assignments"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("teacher_id")).big_integer().not_null())
                    .col(ColumnDef::new(Alias::new("subject_id")).big_integer().not_null())
                    .col(ColumnDef::new(Alias::new("class_id")).big_integer().not_null())
                    .col(
                        ColumnDef::new(Alias::new("academic_year_id"))
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assignments_teacher")
                            .from(Alias::new("teaching_assignments"), Alias::new("teacher_id"))
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assignments_subject")
                            .from(Alias::new("teaching_assignments"), Alias::new("subject_id"))
                            .to(Alias::new("subjects"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assignments_class")
                            .from(Alias::new("teaching_assignments"), Alias::new("class_id"))
                            .to(Alias::new("classes"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assignments_year")
                            .from(
                                Alias::new("teaching_assignments"),
                                Alias::new("academic_year_id"),
                            )
                            .to(Alias::new("academic_years"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .name("idx_assignments_teacher_subject_class_year")
                            .col(Alias::new("teacher_id"))
                            .col(Alias::new("subject_id"))
                            .col(Alias::new("class_id"))
                            .col(Alias::new("academic_year_id"))
                            .unique(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Alias::new("schedules"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("teaching_assignment_id"))
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("day_of_week"))
                            .enumeration(
                                Alias::new("day_of_week"),
                                vec![
                                    Alias::new("monday"),
                                    Alias::new("tuesday"),
                                    Alias::new("wednesday"),
                                    Alias::new("thursday"),
                                    Alias::new("friday"),
                                    Alias::new("saturday"),
                                    Alias::new("sunday"),
                                ],
                            )
                            .not_null(),
                    )
                    .col(ColumnDef::new(Alias::new("start_time")).time().not_null())
                    .col(ColumnDef::new(Alias::new("end_time")).time().not_null())
                    .col(week_type_col("week_type"))
                    .col(ColumnDef::new(Alias::new("room_id")).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedules_assignment")
                            .from(Alias::new("schedules"), Alias::new("teaching_assignment_id"))
                            .to(Alias::new("teaching_assignments"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedules_room")
                            .from(Alias::new("schedules"), Alias::new("room_id"))
                            .to(Alias::new("rooms"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Alias::new("active_schedule_weeks"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("grade")).integer().not_null())
                    .col(
                        ColumnDef::new(Alias::new("academic_year_id"))
                            .big_integer()
                            .not_null(),
                    )
                    .col(week_type_col("week_type"))
                    .col(
                        ColumnDef::new(Alias::new("updated_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_active_weeks_year")
                            .from(Alias::new("active_schedule_weeks"), Alias::new("academic_year_id"))
                            .to(Alias::new("academic_years"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .name("idx_active_weeks_grade_year")
                            .col(Alias::new("grade"))
                            .col(Alias::new("academic_year_id"))
                            .unique(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in ["active_schedule_weeks", "schedules", "teaching_assignments"] {
            manager
                .drop_table(Table::drop().table(Alias::new(table)).to_owned())
                .await?;
        }
        Ok(())
    }
}
