use crate::entity::registration;
use crate::repository::{from_db_id, to_db_id};
use anyhow::Result;
use arena_core::domain::ContestId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRecord {
    pub id: u32,
    pub user_id: String,
    pub contest_id: ContestId,
    pub registered_at: DateTime<Utc>,
    pub extra_info: String,
}

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    async fn register(
        &self,
        user_id: &str,
        contest_id: ContestId,
        extra_info: String,
    ) -> Result<RegistrationRecord>;
    async fn is_registered(&self, user_id: &str, contest_id: ContestId) -> Result<bool>;
    async fn list_by_contest(&self, contest_id: ContestId) -> Result<Vec<RegistrationRecord>>;
    async fn count_by_contest(&self, contest_id: ContestId) -> Result<u64>;
}

#[derive(Clone)]
pub struct SeaOrmRegistrationRepository {
    db: DatabaseConnection,
}

impl SeaOrmRegistrationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: registration::Model) -> Result<RegistrationRecord> {
        Ok(RegistrationRecord {
            id: from_db_id("registration", model.id)?,
            user_id: model.user_id,
            contest_id: ContestId::new(from_db_id("contest", model.contest_id)?),
            registered_at: model.registered_at,
            extra_info: model.extra_info,
        })
    }
}

#[async_trait]
impl RegistrationRepository for SeaOrmRegistrationRepository {
    async fn register(
        &self,
        user_id: &str,
        contest_id: ContestId,
        extra_info: String,
    ) -> Result<RegistrationRecord> {
        let active_model = registration::ActiveModel {
            user_id: Set(user_id.to_string()),
            contest_id: Set(to_db_id("contest", contest_id.value())?),
            registered_at: Set(Utc::now()),
            extra_info: Set(extra_info),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Self::map_model(model)
    }

    async fn is_registered(&self, user_id: &str, contest_id: ContestId) -> Result<bool> {
        let count = registration::Entity::find()
            .filter(registration::Column::UserId.eq(user_id))
            .filter(registration::Column::ContestId.eq(to_db_id("contest", contest_id.value())?))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn list_by_contest(&self, contest_id: ContestId) -> Result<Vec<RegistrationRecord>> {
        let models = registration::Entity::find()
            .filter(registration::Column::ContestId.eq(to_db_id("contest", contest_id.value())?))
            .order_by_asc(registration::Column::Id)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn count_by_contest(&self, contest_id: ContestId) -> Result<u64> {
        let count = registration::Entity::find()
            .filter(registration::Column::ContestId.eq(to_db_id("contest", contest_id.value())?))
            .count(&self.db)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{ContestRepository, NewContest, SeaOrmContestRepository, test_db};

    async fn setup() -> (SeaOrmRegistrationRepository, ContestId) {
        let db = test_db::connect().await;
        let contest = SeaOrmContestRepository::new(db.clone())
            .create(NewContest {
                title: "Round".to_string(),
                description: String::new(),
                start_time: Utc::now(),
                end_time: Utc::now(),
                registration_config: "Team".to_string(),
            })
            .await
            .expect("insert contest");
        (SeaOrmRegistrationRepository::new(db), contest.id)
    }

    #[tokio::test]
    async fn register_then_query_status_and_list() {
        let (repo, contest_id) = setup().await;

        assert!(!repo.is_registered("alice", contest_id).await.expect("status"));
        repo.register("alice", contest_id, "Team Rocket".to_string())
            .await
            .expect("register alice");
        repo.register("bob", contest_id, String::new())
            .await
            .expect("register bob");

        assert!(repo.is_registered("alice", contest_id).await.expect("status"));
        assert!(!repo.is_registered("alice", ContestId::new(999)).await.expect("status"));
        assert_eq!(repo.count_by_contest(contest_id).await.expect("count"), 2);

        let registrations = repo.list_by_contest(contest_id).await.expect("list");
        assert_eq!(registrations.len(), 2);
        assert_eq!(registrations[0].user_id, "alice");
        assert_eq!(registrations[0].extra_info, "Team Rocket");
    }

    #[tokio::test]
    async fn duplicate_registration_violates_unique_index() {
        let (repo, contest_id) = setup().await;

        repo.register("alice", contest_id, String::new())
            .await
            .expect("first registration");
        assert!(
            repo.register("alice", contest_id, String::new())
                .await
                .is_err()
        );
    }
}
