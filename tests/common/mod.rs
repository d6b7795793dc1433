//! Helpers for integration tests.

use chrono::{NaiveDate, Utc};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use milestone_tracker::db::{DbPool, establish_connection_pool};
use milestone_tracker::domain::admin::{Admin, NewAdmin};
use milestone_tracker::domain::student::NewStudent;
use milestone_tracker::domain::types::{
    AdminEmail, AdminId, GuardianName, StudentName, StudentStatus,
};
use milestone_tracker::repository::{AdminWriter, DieselRepository};
use tempfile::NamedTempFile;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

#[allow(dead_code)]
pub fn create_admin(repo: &DieselRepository) -> Admin {
    repo.create_admin(&NewAdmin {
        email: AdminEmail::new("admin@school.com").expect("valid email"),
        password_hash: "$argon2id$placeholder".to_string(),
    })
    .expect("should create admin")
}

#[allow(dead_code)]
pub fn new_student(name: &str, created_by: AdminId) -> NewStudent {
    let now = Utc::now().naive_utc();
    NewStudent {
        full_name: StudentName::new(name).expect("valid name"),
        date_of_birth: NaiveDate::from_ymd_opt(2021, 3, 15).expect("valid date"),
        gender: None,
        avatar_url: None,
        parent_name: GuardianName::new("Sarah Johnson").expect("valid guardian"),
        parent_email: None,
        parent_phone: None,
        address: None,
        allergies: None,
        medical_notes: None,
        status: StudentStatus::Active,
        created_by,
        created_at: now,
        updated_at: now,
    }
}
