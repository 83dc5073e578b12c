use crate::entity::problem;
use crate::repository::{from_db_id, to_db_id};
use anyhow::{Result, anyhow};
use arena_core::domain::{ContestId, Difficulty, DomainError, JudgeTask, ProblemId};
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemRecord {
    pub id: ProblemId,
    /// `None` for practice problems.
    pub contest_id: Option<ContestId>,
    pub title: String,
    pub description: String,
    pub input: String,
    pub output: String,
    pub template: String,
    pub runner_code: String,
    pub difficulty: Difficulty,
    pub points: i32,
    pub signature_json: Option<String>,
    pub test_cases_json: Option<String>,
}

impl ProblemRecord {
    /// What the judge should do with a submission for this problem.
    pub fn task(&self) -> std::result::Result<JudgeTask, DomainError> {
        JudgeTask::from_stored(
            &self.input,
            &self.output,
            &self.runner_code,
            self.signature_json.as_deref(),
            self.test_cases_json.as_deref(),
        )
    }
}

/// Problem fields as written by admins. On update `runner_code: None` keeps
/// the stored runner code.
#[derive(Debug, Clone, Default)]
pub struct ProblemDraft {
    pub contest_id: Option<ContestId>,
    pub title: String,
    pub description: String,
    pub input: String,
    pub output: String,
    pub template: String,
    pub runner_code: Option<String>,
    pub difficulty: Difficulty,
    pub points: i32,
    pub signature_json: Option<String>,
    pub test_cases_json: Option<String>,
}

#[async_trait]
pub trait ProblemRepository: Send + Sync {
    async fn create(&self, draft: ProblemDraft) -> Result<ProblemRecord>;
    async fn update(&self, problem_id: ProblemId, draft: ProblemDraft)
    -> Result<Option<ProblemRecord>>;
    async fn delete(&self, problem_id: ProblemId) -> Result<bool>;
    async fn find_by_id(&self, problem_id: ProblemId) -> Result<Option<ProblemRecord>>;
    async fn list_all(&self) -> Result<Vec<ProblemRecord>>;
    async fn list_practice(&self) -> Result<Vec<ProblemRecord>>;
    async fn list_by_contest(&self, contest_id: ContestId) -> Result<Vec<ProblemRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmProblemRepository {
    db: DatabaseConnection,
}

impl SeaOrmProblemRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_difficulty(code: i16) -> Result<Difficulty> {
        match code {
            0 => Ok(Difficulty::Easy),
            1 => Ok(Difficulty::Medium),
            2 => Ok(Difficulty::Hard),
            _ => Err(anyhow!("invalid problem.difficulty code from database: {code}")),
        }
    }

    fn map_difficulty_code(difficulty: Difficulty) -> i16 {
        match difficulty {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }

    fn map_contest_id(contest_id: Option<ContestId>) -> Result<Option<i32>> {
        contest_id
            .map(|id| to_db_id("contest", id.value()))
            .transpose()
    }

    fn map_model(model: problem::Model) -> Result<ProblemRecord> {
        let contest_id = model
            .contest_id
            .map(|id| from_db_id("contest", id))
            .transpose()?
            .and_then(ContestId::attached);

        Ok(ProblemRecord {
            id: ProblemId::new(from_db_id("problem", model.id)?),
            contest_id,
            title: model.title,
            description: model.description,
            input: model.input,
            output: model.output,
            template: model.template,
            runner_code: model.runner_code,
            difficulty: Self::map_difficulty(model.difficulty)?,
            points: model.points,
            signature_json: model.signature_json,
            test_cases_json: model.test_cases_json,
        })
    }

    async fn find_where(&self, filter: sea_orm::Condition) -> Result<Vec<ProblemRecord>> {
        let models = problem::Entity::find()
            .filter(filter)
            .order_by_asc(problem::Column::Id)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }
}

#[async_trait]
impl ProblemRepository for SeaOrmProblemRepository {
    async fn create(&self, draft: ProblemDraft) -> Result<ProblemRecord> {
        let active_model = problem::ActiveModel {
            contest_id: Set(Self::map_contest_id(draft.contest_id)?),
            title: Set(draft.title),
            description: Set(draft.description),
            input: Set(draft.input),
            output: Set(draft.output),
            template: Set(draft.template),
            runner_code: Set(draft.runner_code.unwrap_or_default()),
            difficulty: Set(Self::map_difficulty_code(draft.difficulty)),
            points: Set(draft.points),
            signature_json: Set(draft.signature_json),
            test_cases_json: Set(draft.test_cases_json),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Self::map_model(model)
    }

    async fn update(
        &self,
        problem_id: ProblemId,
        draft: ProblemDraft,
    ) -> Result<Option<ProblemRecord>> {
        let Some(model) = problem::Entity::find_by_id(to_db_id("problem", problem_id.value())?)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model: problem::ActiveModel = model.into();
        active_model.contest_id = Set(Self::map_contest_id(draft.contest_id)?);
        active_model.title = Set(draft.title);
        active_model.description = Set(draft.description);
        active_model.input = Set(draft.input);
        active_model.output = Set(draft.output);
        active_model.template = Set(draft.template);
        if let Some(runner_code) = draft.runner_code {
            active_model.runner_code = Set(runner_code);
        }
        active_model.difficulty = Set(Self::map_difficulty_code(draft.difficulty));
        active_model.points = Set(draft.points);
        active_model.signature_json = Set(draft.signature_json);
        active_model.test_cases_json = Set(draft.test_cases_json);

        let updated = active_model.update(&self.db).await?;
        Self::map_model(updated).map(Some)
    }

    async fn delete(&self, problem_id: ProblemId) -> Result<bool> {
        let result = problem::Entity::delete_by_id(to_db_id("problem", problem_id.value())?)
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn find_by_id(&self, problem_id: ProblemId) -> Result<Option<ProblemRecord>> {
        let model = problem::Entity::find_by_id(to_db_id("problem", problem_id.value())?)
            .one(&self.db)
            .await?;

        model.map(Self::map_model).transpose()
    }

    async fn list_all(&self) -> Result<Vec<ProblemRecord>> {
        self.find_where(sea_orm::Condition::all()).await
    }

    async fn list_practice(&self) -> Result<Vec<ProblemRecord>> {
        self.find_where(sea_orm::Condition::all().add(problem::Column::ContestId.is_null()))
            .await
    }

    async fn list_by_contest(&self, contest_id: ContestId) -> Result<Vec<ProblemRecord>> {
        let id = to_db_id("contest", contest_id.value())?;
        self.find_where(sea_orm::Condition::all().add(problem::Column::ContestId.eq(id)))
            .await
    }
}
