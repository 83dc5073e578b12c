pub mod contest_repository;
pub mod leaderboard;
pub mod problem_repository;
pub mod registration_repository;
pub mod submission_repository;
pub mod user_repository;

pub use contest_repository::{ContestRecord, ContestRepository, NewContest, SeaOrmContestRepository};
pub use problem_repository::{ProblemDraft, ProblemRecord, ProblemRepository, SeaOrmProblemRepository};
pub use registration_repository::{
    RegistrationRecord, RegistrationRepository, SeaOrmRegistrationRepository,
};
pub use submission_repository::{
    NewSubmission, SeaOrmSubmissionRepository, SubmissionRecord, SubmissionRepository,
};
pub use user_repository::{NewUser, SeaOrmUserRepository, UserRecord, UserRepository};

use std::sync::Arc;

use anyhow::{Result, anyhow};
use sea_orm::DatabaseConnection;

/// Every store the HTTP layer talks to, behind trait objects.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub contests: Arc<dyn ContestRepository>,
    pub registrations: Arc<dyn RegistrationRepository>,
    pub problems: Arc<dyn ProblemRepository>,
    pub submissions: Arc<dyn SubmissionRepository>,
}

impl Repositories {
    pub fn sea_orm(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(SeaOrmUserRepository::new(db.clone())),
            contests: Arc::new(SeaOrmContestRepository::new(db.clone())),
            registrations: Arc::new(SeaOrmRegistrationRepository::new(db.clone())),
            problems: Arc::new(SeaOrmProblemRepository::new(db.clone())),
            submissions: Arc::new(SeaOrmSubmissionRepository::new(db)),
        }
    }
}

/// Row ids are `INTEGER` columns; domain ids are unsigned.
pub(crate) fn to_db_id(table: &str, id: u32) -> Result<i32> {
    i32::try_from(id).map_err(|_| anyhow!("{table}.id {id} is out of range"))
}

pub(crate) fn from_db_id(table: &str, id: i32) -> Result<u32> {
    u32::try_from(id).map_err(|_| anyhow!("invalid {table}.id from database: {id}"))
}

#[cfg(test)]
pub(crate) mod test_db {
    use arena_migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database, DatabaseConnection};

    /// Fresh migrated in-memory SQLite database. A single pooled connection
    /// keeps every query on the same in-memory file.
    pub async fn connect() -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let db = Database::connect(options)
            .await
            .expect("in-memory sqlite should open");
        Migrator::up(&db, None).await.expect("migrations should apply");
        db
    }
}
