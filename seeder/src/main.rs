use crate::seed::{Seeder, run_seeder};
use crate::seeds::{
    academic_year::AcademicYearSeeder, active_week::ActiveWeekSeeder, catalog::CatalogSeeder,
    school_class::SchoolClassSeeder, schedule::ScheduleSeeder, user::UserSeeder,
};
use colored::Colorize;
use db::models::academic_year;
use migration::Migrator;
use sea_orm::{EntityTrait, PaginatorTrait};
use sea_orm_migration::MigratorTrait;
use std::process::exit;
use util::config;

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    if let Err(e) = common::logger::init_logger(&config::log_level(), "logs/seeder.log") {
        eprintln!("Failed to initialize logger: {e}");
    }

    let db = match db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("{} {e}", "Failed to connect to database:".red());
            exit(1);
        }
    };
    if let Err(e) = Migrator::up(&db, None).await {
        eprintln!("{} {e}", "Failed to apply migrations:".red());
        exit(1);
    }

    match academic_year::Entity::find().count(&db).await {
        Ok(0) => {}
        Ok(_) => {
            println!("{}", "Database already seeded; run `migration fresh` first".yellow());
            return;
        }
        Err(e) => {
            eprintln!("{} {e}", "Failed to inspect database:".red());
            exit(1);
        }
    }

    for (seeder, name) in [
        (Box::new(AcademicYearSeeder) as Box<dyn Seeder + Send + Sync>, "AcademicYear"),
        (Box::new(CatalogSeeder), "Catalog"),
        (Box::new(UserSeeder), "User"),
        (Box::new(SchoolClassSeeder), "SchoolClass"),
        (Box::new(ScheduleSeeder), "Schedule"),
        (Box::new(ActiveWeekSeeder), "ActiveWeek"),
    ] {
        run_seeder(&*seeder, name, &db).await;
    }
}
