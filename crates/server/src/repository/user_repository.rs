use crate::entity::user;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait, QueryOrder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, new_user: NewUser) -> Result<UserRecord>;
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>>;
    async fn list(&self) -> Result<Vec<UserRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: user::Model) -> UserRecord {
        UserRecord {
            username: model.username,
            email: model.email,
            created_at: model.created_at,
        }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<UserRecord> {
        let active_model = user::ActiveModel {
            username: Set(new_user.username),
            email: Set(new_user.email),
            created_at: Set(Utc::now()),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Self::map_model(model))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let model = user::Entity::find_by_id(username.to_string())
            .one(&self.db)
            .await?;

        Ok(model.map(Self::map_model))
    }

    async fn list(&self) -> Result<Vec<UserRecord>> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::Username)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Self::map_model).collect())
    }
}
