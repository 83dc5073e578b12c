use crate::entity::{problem, submission};
use crate::repository::{from_db_id, to_db_id};
use anyhow::{Result, anyhow};
use arena_core::domain::{ContestId, ProblemId, SolvedProblem, SubmissionId, SubmissionStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub user_id: String,
    pub problem_id: ProblemId,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub user_id: String,
    pub problem_id: ProblemId,
    pub status: SubmissionStatus,
}

/// Submissions are append-only: there is no update or delete.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn create(&self, new_submission: NewSubmission) -> Result<SubmissionRecord>;
    /// Passing submissions for one problem, oldest first.
    async fn list_passed_for_problem(&self, problem_id: ProblemId) -> Result<Vec<SubmissionRecord>>;
    /// Passing submissions joined with their problem's points, optionally
    /// restricted to one contest. Repeat solves are returned as stored.
    async fn list_solved(&self, contest_id: Option<ContestId>) -> Result<Vec<SolvedProblem>>;
}

#[derive(Clone)]
pub struct SeaOrmSubmissionRepository {
    db: DatabaseConnection,
}

impl SeaOrmSubmissionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_status(code: i16) -> Result<SubmissionStatus> {
        match code {
            0 => Ok(SubmissionStatus::Passed),
            1 => Ok(SubmissionStatus::Failed),
            _ => Err(anyhow!("invalid submission.status code from database: {code}")),
        }
    }

    fn map_status_code(status: SubmissionStatus) -> i16 {
        match status {
            SubmissionStatus::Passed => 0,
            SubmissionStatus::Failed => 1,
        }
    }

    fn map_model(model: submission::Model) -> Result<SubmissionRecord> {
        Ok(SubmissionRecord {
            id: SubmissionId::new(from_db_id("submission", model.id)?),
            user_id: model.user_id,
            problem_id: ProblemId::new(from_db_id("problem", model.problem_id)?),
            status: Self::map_status(model.status)?,
            created_at: model.created_at,
        })
    }
}

#[async_trait]
impl SubmissionRepository for SeaOrmSubmissionRepository {
    async fn create(&self, new_submission: NewSubmission) -> Result<SubmissionRecord> {
        let active_model = submission::ActiveModel {
            user_id: Set(new_submission.user_id),
            problem_id: Set(to_db_id("problem", new_submission.problem_id.value())?),
            status: Set(Self::map_status_code(new_submission.status)),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Self::map_model(model)
    }

    async fn list_passed_for_problem(&self, problem_id: ProblemId) -> Result<Vec<SubmissionRecord>> {
        let models = submission::Entity::find()
            .filter(submission::Column::ProblemId.eq(to_db_id("problem", problem_id.value())?))
            .filter(submission::Column::Status.eq(Self::map_status_code(SubmissionStatus::Passed)))
            .order_by_asc(submission::Column::CreatedAt)
            .order_by_asc(submission::Column::Id)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn list_solved(&self, contest_id: Option<ContestId>) -> Result<Vec<SolvedProblem>> {
        let mut query = submission::Entity::find()
            .find_also_related(problem::Entity)
            .filter(submission::Column::Status.eq(Self::map_status_code(SubmissionStatus::Passed)));
        if let Some(contest_id) = contest_id {
            query = query.filter(problem::Column::ContestId.eq(to_db_id("contest", contest_id.value())?));
        }

        let rows = query.order_by_asc(submission::Column::Id).all(&self.db).await?;

        rows.into_iter()
            .filter_map(|(submission, problem)| problem.map(|problem| (submission, problem)))
            .map(|(submission, problem)| {
                Ok(SolvedProblem {
                    user_id: submission.user_id,
                    problem_id: ProblemId::new(from_db_id("problem", problem.id)?),
                    points: problem.points,
                })
            })
            .collect()
    }
}
