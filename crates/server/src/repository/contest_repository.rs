use crate::entity::{contest, problem};
use crate::repository::{from_db_id, to_db_id};
use anyhow::Result;
use arena_core::domain::ContestId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContestRecord {
    pub id: ContestId,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub registration_config: String,
}

#[derive(Debug, Clone)]
pub struct NewContest {
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub registration_config: String,
}

#[async_trait]
pub trait ContestRepository: Send + Sync {
    async fn create(&self, new_contest: NewContest) -> Result<ContestRecord>;
    async fn update(&self, contest_id: ContestId, contest: NewContest)
    -> Result<Option<ContestRecord>>;
    /// Deletes the contest; its problems become practice problems. Returns
    /// `false` if no such contest existed.
    async fn delete(&self, contest_id: ContestId) -> Result<bool>;
    async fn find_by_id(&self, contest_id: ContestId) -> Result<Option<ContestRecord>>;
    async fn list(&self) -> Result<Vec<ContestRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmContestRepository {
    db: DatabaseConnection,
}

impl SeaOrmContestRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: contest::Model) -> Result<ContestRecord> {
        Ok(ContestRecord {
            id: ContestId::new(from_db_id("contest", model.id)?),
            title: model.title,
            description: model.description,
            start_time: model.start_time,
            end_time: model.end_time,
            registration_config: model.registration_config,
        })
    }
}

#[async_trait]
impl ContestRepository for SeaOrmContestRepository {
    async fn create(&self, new_contest: NewContest) -> Result<ContestRecord> {
        let active_model = contest::ActiveModel {
            title: Set(new_contest.title),
            description: Set(new_contest.description),
            start_time: Set(new_contest.start_time),
            end_time: Set(new_contest.end_time),
            registration_config: Set(new_contest.registration_config),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Self::map_model(model)
    }

    async fn update(
        &self,
        contest_id: ContestId,
        contest: NewContest,
    ) -> Result<Option<ContestRecord>> {
        let Some(model) = contest::Entity::find_by_id(to_db_id("contest", contest_id.value())?)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model: contest::ActiveModel = model.into();
        active_model.title = Set(contest.title);
        active_model.description = Set(contest.description);
        active_model.start_time = Set(contest.start_time);
        active_model.end_time = Set(contest.end_time);
        active_model.registration_config = Set(contest.registration_config);

        let updated = active_model.update(&self.db).await?;
        Self::map_model(updated).map(Some)
    }

    async fn delete(&self, contest_id: ContestId) -> Result<bool> {
        let id = to_db_id("contest", contest_id.value())?;
        let txn = self.db.begin().await?;

        problem::Entity::update_many()
            .col_expr(problem::Column::ContestId, Expr::value(Option::<i32>::None))
            .filter(problem::Column::ContestId.eq(id))
            .exec(&txn)
            .await?;
        let result = contest::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    async fn find_by_id(&self, contest_id: ContestId) -> Result<Option<ContestRecord>> {
        let model = contest::Entity::find_by_id(to_db_id("contest", contest_id.value())?)
            .one(&self.db)
            .await?;

        model.map(Self::map_model).transpose()
    }

    async fn list(&self) -> Result<Vec<ContestRecord>> {
        let models = contest::Entity::find()
            .order_by_asc(contest::Column::Id)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }
}
