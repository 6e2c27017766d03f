use crate::seed::Seeder;
use db::models::{major, room, subject};
use sea_orm::{DatabaseConnection, DbErr};

pub struct CatalogSeeder;

pub const MAJORS: [(&str, &str); 3] = [
    ("RPL", "Rekayasa Perangkat Lunak"),
    ("TKJ", "Teknik Komputer dan Jaringan"),
    ("AKL", "Akuntansi dan Keuangan Lembaga"),
];

const SUBJECTS: [(&str, &str); 6] = [
    ("MTK", "Matematika"),
    ("BIN", "Bahasa Indonesia"),
    ("BIG", "Bahasa Inggris"),
    ("PKN", "Pendidikan Pancasila"),
    ("PRO", "Pemrograman Dasar"),
    ("JAR", "Dasar Jaringan"),
];

#[async_trait::async_trait]
impl Seeder for CatalogSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        for (code, name) in MAJORS {
            major::Model::create(db, code, name).await?;
        }
        for (code, name) in SUBJECTS {
            subject::Model::create(db, code, name).await?;
        }
        for n in 1..=10 {
            room::Model::create(db, &format!("R{n:03}"), &format!("Ruang {n}")).await?;
        }
        Ok(())
    }
}
